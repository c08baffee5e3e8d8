//! The per-company slice of the state mirror.

use crate::protocol::EconomyHistory;

/// The synthetic company id the mirror always carries for unassigned clients,
/// even though the server never sends a `CompanyInfo`/`CompanyNew` for it.
pub const SPECTATOR_COMPANY_ID: u8 = 255;

/// A company as last reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    pub id: u8,
    pub name: String,
    pub manager_name: String,
    pub color: u8,
    pub password_protected: bool,
    pub start_year: u32,
    pub is_ai: bool,
    pub bankrupt_quarters: u8,
    pub shareholders: [u8; 4],
    pub economy: Option<CompanyEconomy>,
    pub stats: Option<CompanyStats>,
}

impl CompanyRecord {
    /// The always-present "Spectators" entry, synthesized rather than
    /// learned from any packet.
    pub fn spectators() -> CompanyRecord {
        CompanyRecord {
            id: SPECTATOR_COMPANY_ID,
            name: "Spectators".to_string(),
            manager_name: String::new(),
            color: 0,
            password_protected: false,
            start_year: 0,
            is_ai: false,
            bankrupt_quarters: 0,
            shareholders: [0; 4],
            economy: None,
            stats: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyEconomy {
    pub money: i64,
    pub loan: i64,
    pub income: i64,
    pub delivered_cargo: u16,
    pub history: [EconomyHistory; crate::protocol::ECONOMY_HISTORY_LEN],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyStats {
    pub vehicles: [u16; 5],
    pub stations: [u16; 5],
}
