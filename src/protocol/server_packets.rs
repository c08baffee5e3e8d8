//! Server → Administrator packets: decoding from a [`RawFrame`](super::frame::RawFrame) body.

use bytes::{Buf, Bytes};

use crate::crypto::NONCE_LEN;
use crate::error::{AdminError, AdminResult, ServerErrorCode};

use super::registry::server_id;
use super::types::{AuthMethod, ChatAction, CompanyRemoveReason, DestType, FrequencyMask, Landscape, UpdateType};
use super::util::{read_bool, read_i64, read_str, read_u16, read_u32, read_u8};

/// One history entry inside [`ServerPacket::CompanyEconomy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EconomyHistory {
    pub value: i64,
    pub performance: u16,
    pub delivered_cargo: u16,
}

/// Number of history entries `ServerCompanyEconomy` always carries, zero-padded or truncated.
pub const ECONOMY_HISTORY_LEN: usize = 2;

/// One packet the server can send to this administrator connection.
#[derive(Debug, Clone)]
pub enum ServerPacket {
    Full,
    Banned,
    Error {
        code: ServerErrorCode,
    },
    Protocol {
        version: u8,
        update_frequencies: Vec<(UpdateType, FrequencyMask)>,
    },
    Welcome {
        name: String,
        version: String,
        dedicated: bool,
        map_name: String,
        seed: u32,
        landscape: Landscape,
        start_date: u32,
        map_x: u16,
        map_y: u16,
    },
    NewGame,
    Shutdown,
    Date {
        date: u32,
    },
    ClientJoin {
        client_id: u32,
    },
    ClientInfo {
        client_id: u32,
        hostname: String,
        name: String,
        language: u8,
        join_date: u32,
        play_as: u8,
    },
    ClientUpdate {
        client_id: u32,
        name: String,
        play_as: u8,
    },
    ClientQuit {
        client_id: u32,
    },
    ClientError {
        client_id: u32,
        code: ServerErrorCode,
    },
    CompanyNew {
        company_id: u8,
    },
    CompanyInfo {
        company_id: u8,
        name: String,
        manager_name: String,
        color: u8,
        password_protected: bool,
        start_year: u32,
        is_ai: bool,
        bankruptcy_counter: u8,
        shareholders: [u8; 4],
    },
    CompanyUpdate {
        company_id: u8,
        name: String,
        manager_name: String,
        color: u8,
        password_protected: bool,
        bankrupt_quarters: u8,
        shareholders: [u8; 4],
    },
    CompanyRemove {
        company_id: u8,
        reason: CompanyRemoveReason,
    },
    CompanyEconomy {
        company_id: u8,
        money: i64,
        loan: i64,
        income: i64,
        delivered_cargo: u16,
        history: [EconomyHistory; ECONOMY_HISTORY_LEN],
    },
    CompanyStats {
        company_id: u8,
        vehicles: [u16; 5],
        stations: [u16; 5],
    },
    Chat {
        action: ChatAction,
        dest_type: DestType,
        client_id: u32,
        message: String,
        data: i64,
    },
    Rcon {
        color: u16,
        message: String,
    },
    Console {
        origin: String,
        message: String,
    },
    CmdNames {
        names: Vec<(u16, String)>,
    },
    Gamescript {
        json: String,
    },
    RconEnd {
        command: String,
    },
    Pong {
        payload: u32,
    },
    CmdLogging {
        client_id: u32,
        company_id: u8,
        command_id: u16,
        p1: u32,
        p2: u32,
        tile: u32,
        text: String,
        frame: u32,
    },
    AuthRequest {
        method: AuthMethod,
        server_public_key: [u8; 32],
        key_exchange_nonce: [u8; NONCE_LEN],
    },
    EnableEncryption {
        encryption_nonce: [u8; NONCE_LEN],
    },
}

impl ServerPacket {
    /// Decodes a packet body given the id already pulled off the frame header.
    pub fn decode(id: u8, body: Bytes) -> AdminResult<ServerPacket> {
        let mut buf = body;
        let packet = match id {
            server_id::FULL => ServerPacket::Full,
            server_id::BANNED => ServerPacket::Banned,
            server_id::ERROR => ServerPacket::Error {
                code: read_error_code(&mut buf)?,
            },
            server_id::PROTOCOL => {
                let version = read_u8(&mut buf, "version")?;
                let mut update_frequencies = Vec::new();
                while read_bool(&mut buf, "continuation")? {
                    let update_type = UpdateType::from_u16(read_u16(&mut buf, "update_type")?)?;
                    let support = FrequencyMask::from_bits_truncate(read_u16(&mut buf, "support")?);
                    update_frequencies.push((update_type, support));
                }
                ServerPacket::Protocol {
                    version,
                    update_frequencies,
                }
            }
            server_id::WELCOME => ServerPacket::Welcome {
                name: read_str(&mut buf, "name")?,
                version: read_str(&mut buf, "version")?,
                dedicated: read_bool(&mut buf, "dedicated")?,
                map_name: read_str(&mut buf, "map_name")?,
                seed: read_u32(&mut buf, "seed")?,
                landscape: Landscape::from_u8(read_u8(&mut buf, "landscape")?)?,
                start_date: read_u32(&mut buf, "start_date")?,
                map_x: read_u16(&mut buf, "map_x")?,
                map_y: read_u16(&mut buf, "map_y")?,
            },
            server_id::NEWGAME => ServerPacket::NewGame,
            server_id::SHUTDOWN => ServerPacket::Shutdown,
            server_id::DATE => ServerPacket::Date {
                date: read_u32(&mut buf, "date")?,
            },
            server_id::CLIENT_JOIN => ServerPacket::ClientJoin {
                client_id: read_u32(&mut buf, "client_id")?,
            },
            server_id::CLIENT_INFO => ServerPacket::ClientInfo {
                client_id: read_u32(&mut buf, "client_id")?,
                hostname: read_str(&mut buf, "hostname")?,
                name: read_str(&mut buf, "name")?,
                language: read_u8(&mut buf, "language")?,
                join_date: read_u32(&mut buf, "join_date")?,
                play_as: read_u8(&mut buf, "play_as")?,
            },
            server_id::CLIENT_UPDATE => ServerPacket::ClientUpdate {
                client_id: read_u32(&mut buf, "client_id")?,
                name: read_str(&mut buf, "name")?,
                play_as: read_u8(&mut buf, "play_as")?,
            },
            server_id::CLIENT_QUIT => ServerPacket::ClientQuit {
                client_id: read_u32(&mut buf, "client_id")?,
            },
            server_id::CLIENT_ERROR => ServerPacket::ClientError {
                client_id: read_u32(&mut buf, "client_id")?,
                code: read_error_code(&mut buf)?,
            },
            server_id::COMPANY_NEW => ServerPacket::CompanyNew {
                company_id: read_u8(&mut buf, "company_id")?,
            },
            server_id::COMPANY_INFO => {
                let company_id = read_u8(&mut buf, "company_id")?;
                let name = read_str(&mut buf, "name")?;
                let manager_name = read_str(&mut buf, "manager_name")?;
                let color = read_u8(&mut buf, "color")?;
                let password_protected = read_bool(&mut buf, "password_protected")?;
                let start_year = read_u32(&mut buf, "start_year")?;
                let is_ai = read_bool(&mut buf, "is_ai")?;
                let bankruptcy_counter = read_u8(&mut buf, "bankruptcy_counter")?;
                let shareholders = read_shareholders(&mut buf)?;
                ServerPacket::CompanyInfo {
                    company_id,
                    name,
                    manager_name,
                    color,
                    password_protected,
                    start_year,
                    is_ai,
                    bankruptcy_counter,
                    shareholders,
                }
            }
            server_id::COMPANY_UPDATE => {
                let company_id = read_u8(&mut buf, "company_id")?;
                let name = read_str(&mut buf, "name")?;
                let manager_name = read_str(&mut buf, "manager_name")?;
                let color = read_u8(&mut buf, "color")?;
                let password_protected = read_bool(&mut buf, "password_protected")?;
                let bankrupt_quarters = read_u8(&mut buf, "bankrupt_quarters")?;
                let shareholders = read_shareholders(&mut buf)?;
                ServerPacket::CompanyUpdate {
                    company_id,
                    name,
                    manager_name,
                    color,
                    password_protected,
                    bankrupt_quarters,
                    shareholders,
                }
            }
            server_id::COMPANY_REMOVE => ServerPacket::CompanyRemove {
                company_id: read_u8(&mut buf, "company_id")?,
                reason: CompanyRemoveReason::from_u8(read_u8(&mut buf, "reason")?)?,
            },
            server_id::COMPANY_ECONOMY => {
                let company_id = read_u8(&mut buf, "company_id")?;
                let money = read_i64(&mut buf, "money")?;
                let loan = read_i64(&mut buf, "loan")?;
                let income = read_i64(&mut buf, "income")?;
                let delivered_cargo = read_u16(&mut buf, "delivered_cargo")?;
                let mut raw = Vec::new();
                while buf.has_remaining() {
                    raw.push(EconomyHistory {
                        value: read_i64(&mut buf, "history.value")?,
                        performance: read_u16(&mut buf, "history.performance")?,
                        delivered_cargo: read_u16(&mut buf, "history.delivered_cargo")?,
                    });
                }
                ServerPacket::CompanyEconomy {
                    company_id,
                    money,
                    loan,
                    income,
                    delivered_cargo,
                    history: fit_history(raw),
                }
            }
            server_id::COMPANY_STATS => {
                let company_id = read_u8(&mut buf, "company_id")?;
                let mut vehicles = [0u16; 5];
                for slot in vehicles.iter_mut() {
                    *slot = read_u16(&mut buf, "vehicles")?;
                }
                let mut stations = [0u16; 5];
                for slot in stations.iter_mut() {
                    *slot = read_u16(&mut buf, "stations")?;
                }
                ServerPacket::CompanyStats {
                    company_id,
                    vehicles,
                    stations,
                }
            }
            server_id::CHAT => ServerPacket::Chat {
                action: ChatAction::from_u8(read_u8(&mut buf, "action")?)?,
                dest_type: DestType::from_u8(read_u8(&mut buf, "dest_type")?)?,
                client_id: read_u32(&mut buf, "client_id")?,
                message: read_str(&mut buf, "message")?,
                data: read_i64(&mut buf, "data")?,
            },
            server_id::RCON => ServerPacket::Rcon {
                color: read_u16(&mut buf, "color")?,
                message: read_str(&mut buf, "message")?,
            },
            server_id::CONSOLE => ServerPacket::Console {
                origin: read_str(&mut buf, "origin")?,
                message: read_str(&mut buf, "message")?,
            },
            server_id::CMD_NAMES => {
                let mut names = Vec::new();
                while read_bool(&mut buf, "continuation")? {
                    let command_id = read_u16(&mut buf, "command_id")?;
                    let name = read_str(&mut buf, "name")?;
                    names.push((command_id, name));
                }
                ServerPacket::CmdNames { names }
            }
            server_id::GAMESCRIPT => ServerPacket::Gamescript {
                json: read_str(&mut buf, "json")?,
            },
            server_id::RCON_END => ServerPacket::RconEnd {
                command: read_str(&mut buf, "command")?,
            },
            server_id::PONG => ServerPacket::Pong {
                payload: read_u32(&mut buf, "payload")?,
            },
            server_id::CMD_LOGGING => ServerPacket::CmdLogging {
                client_id: read_u32(&mut buf, "client_id")?,
                company_id: read_u8(&mut buf, "company_id")?,
                command_id: read_u16(&mut buf, "command_id")?,
                p1: read_u32(&mut buf, "p1")?,
                p2: read_u32(&mut buf, "p2")?,
                tile: read_u32(&mut buf, "tile")?,
                text: read_str(&mut buf, "text")?,
                frame: read_u32(&mut buf, "frame")?,
            },
            server_id::AUTH_REQUEST => {
                let method_byte = read_u8(&mut buf, "method")?;
                let method = match method_byte {
                    0x01 => AuthMethod::X25519Pake,
                    0x02 => AuthMethod::X25519AuthorizedKey,
                    other => {
                        return Err(AdminError::UnexpectedAuthMethod(other));
                    }
                };
                let mut server_public_key = [0u8; 32];
                if buf.remaining() < 32 {
                    return Err(AdminError::PacketExhausted("server_public_key"));
                }
                buf.copy_to_slice(&mut server_public_key);
                let mut key_exchange_nonce = [0u8; NONCE_LEN];
                if buf.remaining() < NONCE_LEN {
                    return Err(AdminError::PacketExhausted("key_exchange_nonce"));
                }
                buf.copy_to_slice(&mut key_exchange_nonce);
                ServerPacket::AuthRequest {
                    method,
                    server_public_key,
                    key_exchange_nonce,
                }
            }
            server_id::ENABLE_ENCRYPTION => {
                let mut encryption_nonce = [0u8; NONCE_LEN];
                if buf.remaining() < NONCE_LEN {
                    return Err(AdminError::PacketExhausted("encryption_nonce"));
                }
                buf.copy_to_slice(&mut encryption_nonce);
                ServerPacket::EnableEncryption { encryption_nonce }
            }
            other => return Err(AdminError::UnknownPacket(other)),
        };
        Ok(packet)
    }
}

fn read_error_code(buf: &mut impl Buf) -> AdminResult<ServerErrorCode> {
    let raw = read_u8(buf, "code")?;
    ServerErrorCode::from_u8(raw).ok_or(AdminError::InvalidEnumValue {
        field: "error_code",
        value: raw as u64,
    })
}

/// Reads the fixed 4-element shareholders vector shared by `ServerCompanyInfo`
/// and `ServerCompanyUpdate`.
fn read_shareholders(buf: &mut impl Buf) -> AdminResult<[u8; 4]> {
    let mut shareholders = [0u8; 4];
    for slot in shareholders.iter_mut() {
        *slot = read_u8(buf, "shareholders")?;
    }
    Ok(shareholders)
}

/// Forces a history list to exactly [`ECONOMY_HISTORY_LEN`] entries: missing
/// entries are zero-filled, extra ones are dropped.
fn fit_history(mut raw: Vec<EconomyHistory>) -> [EconomyHistory; ECONOMY_HISTORY_LEN] {
    raw.resize(
        ECONOMY_HISTORY_LEN,
        EconomyHistory {
            value: 0,
            performance: 0,
            delivered_cargo: 0,
        },
    );
    raw.truncate(ECONOMY_HISTORY_LEN);
    [raw[0], raw[1]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::{FrameCodec, RawFrame};
    use asynchronous_codec::Decoder;
    use bytes::BytesMut;

    fn decode_framed(literal: &[u8]) -> RawFrame {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(literal);
        codec.decode(&mut buf).unwrap().unwrap()
    }

    #[test]
    fn welcome_s1_full_decode() {
        let literal: &[u8] = b"\x31\x00\x68Unnamed Server\x001.9.0\x00\x00Random Map\x00\xca\r1k\x00\x1f\xde\n\x00\x00\x01\x00\x01";
        let frame = decode_framed(literal);
        let packet = ServerPacket::decode(frame.id, frame.body).unwrap();
        match packet {
            ServerPacket::Welcome {
                name,
                version,
                dedicated,
                map_name,
                seed,
                landscape,
                start_date,
                map_x,
                map_y,
            } => {
                assert_eq!(name, "Unnamed Server");
                assert_eq!(version, "1.9.0");
                assert!(!dedicated);
                assert_eq!(map_name, "Random Map");
                assert_eq!(seed, 0x6b310dca);
                assert_eq!(landscape, Landscape::Temperate);
                assert_eq!(start_date, 0x000ade1f);
                assert_eq!(map_x, 256);
                assert_eq!(map_y, 256);
            }
            other => panic!("expected Welcome, got {other:?}"),
        }
    }

    #[test]
    fn company_economy_pads_short_history() {
        let mut body = BytesMut::new();
        body.extend_from_slice(&[3u8]); // company_id
        body.extend_from_slice(&100i64.to_le_bytes()); // money
        body.extend_from_slice(&(-50i64).to_le_bytes()); // loan
        body.extend_from_slice(&7i64.to_le_bytes()); // income
        body.extend_from_slice(&42u16.to_le_bytes()); // delivered_cargo
        body.extend_from_slice(&1000i64.to_le_bytes());
        body.extend_from_slice(&5u16.to_le_bytes());
        body.extend_from_slice(&9u16.to_le_bytes());

        let packet = ServerPacket::decode(server_id::COMPANY_ECONOMY, body.freeze()).unwrap();
        match packet {
            ServerPacket::CompanyEconomy { history, .. } => {
                assert_eq!(history[0].value, 1000);
                assert_eq!(history[1].value, 0);
            }
            other => panic!("expected CompanyEconomy, got {other:?}"),
        }
    }

    #[test]
    fn cmd_names_continuation_loop() {
        let mut body = BytesMut::new();
        body.extend_from_slice(&[1]); // continue
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(b"CMD_BUILD_RAIL\0");
        body.extend_from_slice(&[1]); // continue
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(b"CMD_BUILD_ROAD\0");
        body.extend_from_slice(&[0]); // stop

        let packet = ServerPacket::decode(server_id::CMD_NAMES, body.freeze()).unwrap();
        match packet {
            ServerPacket::CmdNames { names } => {
                assert_eq!(names.len(), 2);
                assert_eq!(names[0], (0, "CMD_BUILD_RAIL".to_string()));
                assert_eq!(names[1], (1, "CMD_BUILD_ROAD".to_string()));
            }
            other => panic!("expected CmdNames, got {other:?}"),
        }
    }

    #[test]
    fn unknown_packet_id_is_rejected() {
        let err = ServerPacket::decode(250, Bytes::new()).unwrap_err();
        assert!(matches!(err, AdminError::UnknownPacket(250)));
    }
}
