//! The packet registry: every numeric packet id mapped to its name. Populated
//! once at process init and consulted for diagnostics and for the
//! `UnknownPacket` error path.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Administrator → Server packet ids.
pub mod admin_id {
    pub const JOIN: u8 = 0;
    pub const QUIT: u8 = 1;
    pub const UPDATE_FREQUENCY: u8 = 2;
    pub const POLL: u8 = 3;
    pub const CHAT: u8 = 4;
    pub const RCON: u8 = 5;
    pub const GAMESCRIPT: u8 = 6;
    pub const PING: u8 = 7;
    pub const JOIN_SECURE: u8 = 8;
    pub const AUTH_RESPONSE: u8 = 9;
}

/// Server → Administrator packet ids.
pub mod server_id {
    pub const FULL: u8 = 100;
    pub const BANNED: u8 = 101;
    pub const ERROR: u8 = 102;
    pub const PROTOCOL: u8 = 103;
    pub const WELCOME: u8 = 104;
    pub const NEWGAME: u8 = 105;
    pub const SHUTDOWN: u8 = 106;
    pub const DATE: u8 = 107;
    pub const CLIENT_JOIN: u8 = 108;
    pub const CLIENT_INFO: u8 = 109;
    pub const CLIENT_UPDATE: u8 = 110;
    pub const CLIENT_QUIT: u8 = 111;
    pub const CLIENT_ERROR: u8 = 112;
    pub const COMPANY_NEW: u8 = 113;
    pub const COMPANY_INFO: u8 = 114;
    pub const COMPANY_UPDATE: u8 = 115;
    pub const COMPANY_REMOVE: u8 = 116;
    pub const COMPANY_ECONOMY: u8 = 117;
    pub const COMPANY_STATS: u8 = 118;
    pub const CHAT: u8 = 119;
    pub const RCON: u8 = 120;
    pub const CONSOLE: u8 = 121;
    pub const CMD_NAMES: u8 = 122;
    pub const CMD_LOGGING: u8 = 123;
    pub const GAMESCRIPT: u8 = 124;
    pub const RCON_END: u8 = 125;
    pub const PONG: u8 = 126;
    pub const AUTH_REQUEST: u8 = 127;
    pub const ENABLE_ENCRYPTION: u8 = 128;
}

static ADMIN_NAMES: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    use admin_id::*;
    HashMap::from([
        (JOIN, "AdminJoin"),
        (QUIT, "AdminQuit"),
        (UPDATE_FREQUENCY, "AdminUpdateFrequency"),
        (POLL, "AdminPoll"),
        (CHAT, "AdminChat"),
        (RCON, "AdminRcon"),
        (GAMESCRIPT, "AdminGamescript"),
        (PING, "AdminPing"),
        (JOIN_SECURE, "AdminJoinSecure"),
        (AUTH_RESPONSE, "AdminAuthResponse"),
    ])
});

static SERVER_NAMES: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    use server_id::*;
    HashMap::from([
        (FULL, "ServerFull"),
        (BANNED, "ServerBanned"),
        (ERROR, "ServerError"),
        (PROTOCOL, "ServerProtocol"),
        (WELCOME, "ServerWelcome"),
        (NEWGAME, "ServerNewGame"),
        (SHUTDOWN, "ServerShutdown"),
        (DATE, "ServerDate"),
        (CLIENT_JOIN, "ServerClientJoin"),
        (CLIENT_INFO, "ServerClientInfo"),
        (CLIENT_UPDATE, "ServerClientUpdate"),
        (CLIENT_QUIT, "ServerClientQuit"),
        (CLIENT_ERROR, "ServerClientError"),
        (COMPANY_NEW, "ServerCompanyNew"),
        (COMPANY_INFO, "ServerCompanyInfo"),
        (COMPANY_UPDATE, "ServerCompanyUpdate"),
        (COMPANY_REMOVE, "ServerCompanyRemove"),
        (COMPANY_ECONOMY, "ServerCompanyEconomy"),
        (COMPANY_STATS, "ServerCompanyStats"),
        (CHAT, "ServerChat"),
        (RCON, "ServerRcon"),
        (CONSOLE, "ServerConsole"),
        (CMD_NAMES, "ServerCmdNames"),
        (GAMESCRIPT, "ServerGamescript"),
        (RCON_END, "ServerRconEnd"),
        (PONG, "ServerPong"),
        (CMD_LOGGING, "ServerCmdLogging"),
        (AUTH_REQUEST, "ServerAuthRequest"),
        (ENABLE_ENCRYPTION, "ServerEnableEncryption"),
    ])
});

/// Looks up the human-readable name of an administrator→server packet id.
pub fn admin_packet_name(id: u8) -> Option<&'static str> {
    ADMIN_NAMES.get(&id).copied()
}

/// Looks up the human-readable name of a server→administrator packet id.
pub fn server_packet_name(id: u8) -> Option<&'static str> {
    SERVER_NAMES.get(&id).copied()
}
