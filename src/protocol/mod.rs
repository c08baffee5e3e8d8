//! The wire protocol: framing, the packet registry, and the two packet
//! families (administrator→server, server→administrator).

pub mod admin_packets;
pub mod frame;
pub mod registry;
pub mod server_packets;
pub mod types;
pub mod util;

pub use admin_packets::AdminPacket;
pub use frame::{FrameCodec, OutboundFrame, RawFrame, HEADER_SIZE, MAX_FRAME_SIZE};
pub use server_packets::{EconomyHistory, ServerPacket, ECONOMY_HISTORY_LEN};
