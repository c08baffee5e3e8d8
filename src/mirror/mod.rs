//! The state mirror: a local, read-only reconstruction of the server's
//! clients, companies and map/command metadata, kept current by feeding it
//! every decoded [`ServerPacket`](crate::protocol::ServerPacket).

pub mod client;
pub mod company;

pub use client::ClientRecord;
pub use company::{CompanyEconomy, CompanyRecord, CompanyStats, SPECTATOR_COMPANY_ID};

use std::collections::HashMap;

use crate::observation::Observation;
use crate::protocol::util::gamedate_to_date;
use crate::protocol::ServerPacket;

/// Everything learned about the remote game so far.
#[derive(Debug, Default)]
pub struct StateMirror {
    pub clients: HashMap<u32, ClientRecord>,
    pub companies: HashMap<u8, CompanyRecord>,
    pub current_date: Option<chrono::NaiveDate>,
    pub command_names: HashMap<u16, String>,
    pub protocol_version: Option<u8>,
}

impl StateMirror {
    pub fn new() -> Self {
        let mut companies = HashMap::new();
        companies.insert(SPECTATOR_COMPANY_ID, CompanyRecord::spectators());
        StateMirror {
            clients: HashMap::new(),
            companies,
            current_date: None,
            command_names: HashMap::new(),
            protocol_version: None,
        }
    }

    /// Applies one decoded server packet, mutating mirrored state and
    /// returning whatever observations it implies (zero, one, or several).
    pub fn apply(&mut self, packet: &ServerPacket) -> Vec<Observation> {
        match packet {
            ServerPacket::Protocol { version, .. } => {
                self.protocol_version = Some(*version);
                vec![Observation::Protocol { version: *version }]
            }
            ServerPacket::Welcome {
                name,
                version,
                dedicated,
                map_name,
                seed,
                start_date,
                map_x,
                map_y,
                ..
            } => {
                self.current_date = gamedate_to_date(*start_date);
                vec![Observation::NewMap {
                    name: name.clone(),
                    version: version.clone(),
                    dedicated: *dedicated,
                    map_name: map_name.clone(),
                    seed: *seed,
                    map_x: *map_x,
                    map_y: *map_y,
                }]
            }
            ServerPacket::NewGame => vec![Observation::NewGame],
            ServerPacket::Shutdown => vec![Observation::Shutdown],
            ServerPacket::Date { date } => match gamedate_to_date(*date) {
                Some(d) => {
                    self.current_date = Some(d);
                    vec![Observation::DateChanged(d)]
                }
                None => Vec::new(),
            },
            ServerPacket::ClientInfo {
                client_id,
                hostname,
                name,
                language,
                join_date,
                play_as,
            } => {
                let record = ClientRecord {
                    id: *client_id,
                    hostname: hostname.clone(),
                    name: name.clone(),
                    language: *language,
                    join_date: *join_date,
                    play_as: *play_as,
                };
                self.clients.insert(*client_id, record.clone());
                vec![Observation::ClientJoined(record)]
            }
            ServerPacket::ClientUpdate {
                client_id,
                name,
                play_as,
            } => {
                let record = self
                    .clients
                    .entry(*client_id)
                    .or_insert_with(|| ClientRecord {
                        id: *client_id,
                        hostname: String::new(),
                        name: String::new(),
                        language: 0,
                        join_date: 0,
                        play_as: *play_as,
                    });
                record.name = name.clone();
                record.play_as = *play_as;
                vec![Observation::ClientUpdated(record.clone())]
            }
            ServerPacket::ClientJoin { .. } => Vec::new(),
            ServerPacket::ClientQuit { client_id } => {
                self.clients.remove(client_id);
                vec![Observation::ClientLeft {
                    client_id: *client_id,
                    error: None,
                }]
            }
            ServerPacket::ClientError { client_id, code } => {
                self.clients.remove(client_id);
                vec![Observation::ClientLeft {
                    client_id: *client_id,
                    error: Some(*code),
                }]
            }
            ServerPacket::CompanyNew { company_id } => {
                let record = self
                    .companies
                    .entry(*company_id)
                    .or_insert_with(|| blank_company(*company_id))
                    .clone();
                vec![Observation::CompanyNew(record)]
            }
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
            } => {
                let record = self
                    .companies
                    .entry(*company_id)
                    .or_insert_with(|| blank_company(*company_id));
                record.name = name.clone();
                record.manager_name = manager_name.clone();
                record.color = *color;
                record.password_protected = *password_protected;
                record.start_year = *start_year;
                record.is_ai = *is_ai;
                record.bankrupt_quarters = *bankruptcy_counter;
                record.shareholders = *shareholders;
                vec![Observation::CompanyUpdated(record.clone())]
            }
            ServerPacket::CompanyUpdate {
                company_id,
                name,
                manager_name,
                color,
                password_protected,
                bankrupt_quarters,
                shareholders,
            } => {
                let record = self
                    .companies
                    .entry(*company_id)
                    .or_insert_with(|| blank_company(*company_id));
                record.name = name.clone();
                record.manager_name = manager_name.clone();
                record.color = *color;
                record.password_protected = *password_protected;
                record.bankrupt_quarters = *bankrupt_quarters;
                record.shareholders = *shareholders;
                vec![Observation::CompanyUpdated(record.clone())]
            }
            ServerPacket::CompanyRemove { company_id, reason } => {
                self.companies.remove(company_id);
                vec![Observation::CompanyRemoved {
                    company_id: *company_id,
                    reason: *reason,
                }]
            }
            ServerPacket::CompanyEconomy {
                company_id,
                money,
                loan,
                income,
                delivered_cargo,
                history,
            } => {
                let economy = CompanyEconomy {
                    money: *money,
                    loan: *loan,
                    income: *income,
                    delivered_cargo: *delivered_cargo,
                    history: *history,
                };
                if let Some(record) = self.companies.get_mut(company_id) {
                    record.economy = Some(economy);
                }
                vec![Observation::CompanyEconomy {
                    company_id: *company_id,
                    economy,
                }]
            }
            ServerPacket::CompanyStats {
                company_id,
                vehicles,
                stations,
            } => {
                let stats = CompanyStats {
                    vehicles: *vehicles,
                    stations: *stations,
                };
                if let Some(record) = self.companies.get_mut(company_id) {
                    record.stats = Some(stats);
                }
                vec![Observation::CompanyStats {
                    company_id: *company_id,
                    stats,
                }]
            }
            ServerPacket::Chat {
                client_id, message, ..
            } => vec![Observation::Chat {
                from_client: *client_id,
                message: message.clone(),
            }],
            ServerPacket::Console { origin, message } => vec![Observation::Console {
                origin: origin.clone(),
                message: message.clone(),
            }],
            ServerPacket::Rcon { color, message } => vec![Observation::RconOutput {
                color: *color,
                message: message.clone(),
            }],
            ServerPacket::RconEnd { command } => vec![Observation::RconEnd {
                command: command.clone(),
            }],
            ServerPacket::CmdNames { names } => {
                self.command_names.clear();
                self.command_names.extend(names.iter().cloned());
                vec![Observation::CmdNames(names.clone())]
            }
            // Handled one layer up, in the connection state machine: framing
            // errors, bans, the gamescript channel, ping correlation and the
            // auth handshake packets are not part of the mirrored game state.
            ServerPacket::Full
            | ServerPacket::Banned
            | ServerPacket::Error { .. }
            | ServerPacket::Gamescript { .. }
            | ServerPacket::CmdLogging { .. }
            | ServerPacket::Pong { .. }
            | ServerPacket::AuthRequest { .. }
            | ServerPacket::EnableEncryption { .. } => Vec::new(),
        }
    }
}

fn blank_company(id: u8) -> CompanyRecord {
    CompanyRecord {
        id,
        name: String::new(),
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
