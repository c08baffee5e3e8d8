//! The public event stream: one [`Observation`] per meaningful change the
//! connection observes, delivered to the embedder over a bounded channel.

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::error::{DisconnectCause, ServerErrorCode};
use crate::mirror::{ClientRecord, CompanyEconomy, CompanyRecord, CompanyStats};
use crate::protocol::types::CompanyRemoveReason;

/// One change the embedder should react to.
#[derive(Debug, Clone)]
pub enum Observation {
    Connected,
    Disconnected(DisconnectCause),
    Authenticated,
    NewMap {
        name: String,
        version: String,
        dedicated: bool,
        map_name: String,
        seed: u32,
        map_x: u16,
        map_y: u16,
    },
    Protocol {
        version: u8,
    },
    DateChanged(NaiveDate),
    ClientJoined(ClientRecord),
    ClientUpdated(ClientRecord),
    ClientLeft {
        client_id: u32,
        error: Option<ServerErrorCode>,
    },
    CompanyNew(CompanyRecord),
    CompanyUpdated(CompanyRecord),
    CompanyRemoved {
        company_id: u8,
        reason: CompanyRemoveReason,
    },
    CompanyEconomy {
        company_id: u8,
        economy: CompanyEconomy,
    },
    CompanyStats {
        company_id: u8,
        stats: CompanyStats,
    },
    Chat {
        from_client: u32,
        message: String,
    },
    Console {
        origin: String,
        message: String,
    },
    RconOutput {
        color: u16,
        message: String,
    },
    RconEnd {
        command: String,
    },
    Pong {
        payload: u32,
        sent_at: Instant,
        received_at: Instant,
        elapsed: Duration,
    },
    CmdNames(Vec<(u16, String)>),
    Shutdown,
    NewGame,
}
