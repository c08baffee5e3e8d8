//! Administrator → Server packets: construction and encoding.

use bytes::{BufMut, Bytes, BytesMut};

use crate::crypto::{MAC_LEN, PUBLIC_KEY_LEN};
use crate::error::AdminResult;

use super::registry::admin_id;
use super::types::{AuthMethodMask, ChatAction, DestType, Frequency, FrequencyMask, UpdateType};
use super::util::{write_str, write_u16, write_u32, write_u8};

pub const MAX_PASSWORD_LEN: usize = 33;
pub const MAX_NAME_LEN: usize = 25;
pub const MAX_VERSION_LEN: usize = 33;
pub const MAX_CHAT_LEN: usize = 900;
pub const MAX_RCON_LEN: usize = 500;
pub const MAX_GAMESCRIPT_LEN: usize = 1450;

/// One packet this client can send to the server.
#[derive(Debug, Clone)]
pub enum AdminPacket {
    Join {
        password: String,
        name: String,
        version: String,
    },
    Quit,
    UpdateFrequency {
        update_type: UpdateType,
        frequency: FrequencyMask,
    },
    Poll {
        update_type: UpdateType,
        extra: u32,
    },
    Chat {
        action: ChatAction,
        dest_type: DestType,
        client_id: u32,
        message: String,
    },
    Rcon {
        command: String,
    },
    Gamescript {
        json: String,
    },
    Ping {
        payload: u32,
    },
    JoinSecure {
        name: String,
        version: String,
        methods: AuthMethodMask,
    },
    AuthResponse {
        public_key: [u8; PUBLIC_KEY_LEN],
        ciphertext: Vec<u8>,
        mac: [u8; MAC_LEN],
    },
}

impl AdminPacket {
    pub fn id(&self) -> u8 {
        match self {
            AdminPacket::Join { .. } => admin_id::JOIN,
            AdminPacket::Quit => admin_id::QUIT,
            AdminPacket::UpdateFrequency { .. } => admin_id::UPDATE_FREQUENCY,
            AdminPacket::Poll { .. } => admin_id::POLL,
            AdminPacket::Chat { .. } => admin_id::CHAT,
            AdminPacket::Rcon { .. } => admin_id::RCON,
            AdminPacket::Gamescript { .. } => admin_id::GAMESCRIPT,
            AdminPacket::Ping { .. } => admin_id::PING,
            AdminPacket::JoinSecure { .. } => admin_id::JOIN_SECURE,
            AdminPacket::AuthResponse { .. } => admin_id::AUTH_RESPONSE,
        }
    }

    /// Encodes just the body (everything after the 3-byte frame header).
    pub fn encode_body(&self) -> AdminResult<Bytes> {
        let mut buf = BytesMut::new();
        match self {
            AdminPacket::Join {
                password,
                name,
                version,
            } => {
                write_str(&mut buf, "password", password, MAX_PASSWORD_LEN)?;
                write_str(&mut buf, "name", name, MAX_NAME_LEN)?;
                write_str(&mut buf, "version", version, MAX_VERSION_LEN)?;
            }
            AdminPacket::Quit => {}
            AdminPacket::UpdateFrequency {
                update_type,
                frequency,
            } => {
                write_u16(&mut buf, *update_type as u16);
                write_u16(&mut buf, frequency.bits());
            }
            AdminPacket::Poll { update_type, extra } => {
                write_u8(&mut buf, *update_type as u16 as u8);
                write_u32(&mut buf, *extra);
            }
            AdminPacket::Chat {
                action,
                dest_type,
                client_id,
                message,
            } => {
                write_u8(&mut buf, *action as u8);
                write_u8(&mut buf, *dest_type as u8);
                write_u32(&mut buf, *client_id);
                write_str(&mut buf, "message", message, MAX_CHAT_LEN)?;
            }
            AdminPacket::Rcon { command } => {
                write_str(&mut buf, "command", command, MAX_RCON_LEN)?;
            }
            AdminPacket::Gamescript { json } => {
                write_str(&mut buf, "json", json, MAX_GAMESCRIPT_LEN)?;
            }
            AdminPacket::Ping { payload } => {
                write_u32(&mut buf, *payload);
            }
            AdminPacket::JoinSecure {
                name,
                version,
                methods,
            } => {
                write_str(&mut buf, "name", name, MAX_NAME_LEN)?;
                write_str(&mut buf, "version", version, MAX_VERSION_LEN)?;
                write_u8(&mut buf, methods.bits());
            }
            AdminPacket::AuthResponse {
                public_key,
                ciphertext,
                mac,
            } => {
                buf.put_slice(public_key);
                buf.put_slice(ciphertext);
                buf.put_slice(mac);
            }
        }
        Ok(buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::{FrameCodec, OutboundFrame};
    use asynchronous_codec::Encoder;
    use bytes::BytesMut;

    fn encode_framed(packet: &AdminPacket) -> BytesMut {
        let mut codec = FrameCodec::new();
        let mut dst = BytesMut::new();
        codec
            .encode(
                OutboundFrame {
                    id: packet.id(),
                    body: packet.encode_body().unwrap(),
                },
                &mut dst,
            )
            .unwrap();
        dst
    }

    #[test]
    fn join_wire_shape_s2() {
        let packet = AdminPacket::Join {
            password: "123qwe".into(),
            name: "libottdadmin2".into(),
            version: "0.0.3a1".into(),
        };
        let wire = encode_framed(&packet);
        let expected = [
            b"\x20\x00\x00".as_slice(),
            b"123qwe\0libottdadmin2\x000.0.3a1\0",
        ]
        .concat();
        assert_eq!(&wire[..], &expected[..]);
    }

    #[test]
    fn chat_wire_shape_s3() {
        let packet = AdminPacket::Chat {
            action: ChatAction::Chat,
            dest_type: DestType::Broadcast,
            client_id: 0,
            message: "test".into(),
        };
        let wire = encode_framed(&packet);
        let expected = b"\x0e\x00\x04\x03\x00\x00\x00\x00\x00test\x00";
        assert_eq!(&wire[..], &expected[..]);
    }

    #[test]
    fn password_too_long_is_rejected() {
        let packet = AdminPacket::Join {
            password: "x".repeat(40),
            name: "n".into(),
            version: "v".into(),
        };
        assert!(packet.encode_body().is_err());
    }
}
