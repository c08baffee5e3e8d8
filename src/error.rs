use std::io;

use thiserror::Error;

/// An error returned by the game server itself, carried by `ServerError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ServerErrorCode {
    General = 0,
    DesyncError = 1,
    SavegameFailed = 2,
    ConnectionLost = 3,
    IllegalPacket = 4,
    NewGrfMismatch = 5,
    NotAuthorized = 6,
    NotExpected = 7,
    WrongRevision = 8,
    NameInUse = 9,
    WrongPassword = 10,
    CompanyMismatch = 11,
    KicKed = 12,
    Cheater = 13,
    Full = 14,
    TooManyCommands = 15,
    TimeoutPassword = 16,
    TimeoutComputer = 17,
    TimeoutMap = 18,
    TimeoutJoin = 19,
    InvalidClientName = 20,
    NotOnAllowList = 21,
    NoAuthenticationMethodAvailable = 22,
}

impl ServerErrorCode {
    pub fn from_u8(v: u8) -> Option<Self> {
        use ServerErrorCode::*;
        let all = [
            General,
            DesyncError,
            SavegameFailed,
            ConnectionLost,
            IllegalPacket,
            NewGrfMismatch,
            NotAuthorized,
            NotExpected,
            WrongRevision,
            NameInUse,
            WrongPassword,
            CompanyMismatch,
            KicKed,
            Cheater,
            Full,
            TooManyCommands,
            TimeoutPassword,
            TimeoutComputer,
            TimeoutMap,
            TimeoutJoin,
            InvalidClientName,
            NotOnAllowList,
            NoAuthenticationMethodAvailable,
        ];
        all.into_iter().find(|e| *e as u8 == v)
    }
}

/// The reason a connection went away, surfaced exactly once as `Disconnected(cause)`.
#[derive(Clone, Debug, PartialEq)]
pub enum DisconnectCause {
    /// The embedder called `disconnect()`.
    Requested,
    /// The embedder called `force_disconnect()`.
    Forced,
    /// The socket was closed or errored out from under us.
    ConnectionLost,
    /// A poll or connect timeout elapsed.
    Timeout,
    /// The server rejected us with a `ServerError` packet.
    Rejected(ServerErrorCode),
    /// The wire protocol itself was violated (framing or handshake).
    ProtocolError(String),
}

/// The complete error taxonomy for this crate, per the wire/validation/auth/transport split.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid packet header")]
    InvalidHeader,

    #[error("packet {declared} declares length {declared_len} but body is {actual_len} bytes")]
    InvalidPacketLength {
        declared: u8,
        declared_len: usize,
        actual_len: usize,
    },

    #[error("unknown packet id {0}")]
    UnknownPacket(u8),

    #[error("packet exhausted while reading a {0}")]
    PacketExhausted(&'static str),

    #[error("string for field `{field}` is {len} bytes (incl. NUL), exceeds the maximum of {max}")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("value {value} out of range for field `{field}`")]
    InvalidEnumValue { field: &'static str, value: u64 },

    #[error("expected {expected} elements, got {actual}")]
    WrongArity { expected: usize, actual: usize },

    #[error("server offered auth method {0:?} which we did not advertise")]
    UnexpectedAuthMethod(u8),

    #[error("authentication failed, server closed the connection during the handshake")]
    AuthFailed,

    #[error("AEAD authentication tag did not verify")]
    CryptoFailure,

    #[error("connection lost")]
    ConnectionLost(#[source] io::Error),

    #[error("operation timed out")]
    Timeout,

    #[error("server rejected us: {0:?}")]
    ServerRejected(ServerErrorCode),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AdminResult<T> = std::result::Result<T, AdminError>;
