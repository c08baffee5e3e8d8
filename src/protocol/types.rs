//! Shared wire enums used across several packet bodies.

use enumflags2::{bitflags, BitFlags};

use crate::error::AdminError;

/// The server's publish-subscribe axes: *what* to subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum UpdateType {
    Date = 0,
    ClientInfo = 1,
    CompanyInfo = 2,
    CompanyEconomy = 3,
    CompanyStats = 4,
    Chat = 5,
    Console = 6,
    CmdNames = 7,
    CmdLogging = 8,
    Gamescript = 9,
}

impl UpdateType {
    pub const ALL: [UpdateType; 10] = [
        UpdateType::Date,
        UpdateType::ClientInfo,
        UpdateType::CompanyInfo,
        UpdateType::CompanyEconomy,
        UpdateType::CompanyStats,
        UpdateType::Chat,
        UpdateType::Console,
        UpdateType::CmdNames,
        UpdateType::CmdLogging,
        UpdateType::Gamescript,
    ];

    pub fn from_u16(v: u16) -> Result<Self, AdminError> {
        Self::ALL
            .into_iter()
            .find(|t| *t as u16 == v)
            .ok_or(AdminError::InvalidEnumValue {
                field: "update_type",
                value: v as u64,
            })
    }
}

/// *When* a subscription fires. A bitmask: the server may grant several
/// frequencies for a single update type (e.g. both `DAILY` and `AUTOMATIC`).
#[bitflags]
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frequency {
    Poll = 0x01,
    Daily = 0x02,
    Weekly = 0x04,
    Monthly = 0x08,
    Quarterly = 0x10,
    Annually = 0x20,
    Automatic = 0x40,
}

pub type FrequencyMask = BitFlags<Frequency>;

/// Authentication methods advertised in `AdminJoinSecure` and chosen by the
/// server in `ServerAuthRequest`.
#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    X25519Pake = 0x01,
    X25519AuthorizedKey = 0x02,
}

pub type AuthMethodMask = BitFlags<AuthMethod>;

/// `NetworkAction` — why a chat message/event was generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ChatAction {
    Join = 0,
    Leave = 1,
    ServerMessage = 2,
    Chat = 3,
    ChatCompany = 4,
    ChatClient = 5,
    GiveMoney = 6,
    NameChange = 7,
    CompanySpectator = 8,
    CompanyJoin = 9,
    CompanyNew = 10,
    Kicked = 11,
}

impl ChatAction {
    const ALL: [ChatAction; 12] = [
        ChatAction::Join,
        ChatAction::Leave,
        ChatAction::ServerMessage,
        ChatAction::Chat,
        ChatAction::ChatCompany,
        ChatAction::ChatClient,
        ChatAction::GiveMoney,
        ChatAction::NameChange,
        ChatAction::CompanySpectator,
        ChatAction::CompanyJoin,
        ChatAction::CompanyNew,
        ChatAction::Kicked,
    ];

    pub fn from_u8(v: u8) -> Result<Self, AdminError> {
        Self::ALL
            .into_iter()
            .find(|a| *a as u8 == v)
            .ok_or(AdminError::InvalidEnumValue {
                field: "chat_action",
                value: v as u64,
            })
    }
}

/// `DestType` — who a chat message is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DestType {
    Broadcast = 0,
    Team = 1,
    Client = 2,
}

impl DestType {
    const ALL: [DestType; 3] = [DestType::Broadcast, DestType::Team, DestType::Client];

    pub fn from_u8(v: u8) -> Result<Self, AdminError> {
        Self::ALL
            .into_iter()
            .find(|d| *d as u8 == v)
            .ok_or(AdminError::InvalidEnumValue {
                field: "dest_type",
                value: v as u64,
            })
    }
}

/// Why a company record was removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CompanyRemoveReason {
    Manual = 0,
    Autoclean = 1,
    Bankrupt = 2,
}

impl CompanyRemoveReason {
    const ALL: [CompanyRemoveReason; 3] = [
        CompanyRemoveReason::Manual,
        CompanyRemoveReason::Autoclean,
        CompanyRemoveReason::Bankrupt,
    ];

    pub fn from_u8(v: u8) -> Result<Self, AdminError> {
        Self::ALL
            .into_iter()
            .find(|r| *r as u8 == v)
            .ok_or(AdminError::InvalidEnumValue {
                field: "company_remove_reason",
                value: v as u64,
            })
    }
}

/// The map's landscape/climate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Landscape {
    Temperate = 0,
    Arctic = 1,
    Tropic = 2,
    Toyland = 3,
}

impl Landscape {
    const ALL: [Landscape; 4] = [
        Landscape::Temperate,
        Landscape::Arctic,
        Landscape::Tropic,
        Landscape::Toyland,
    ];

    pub fn from_u8(v: u8) -> Result<Self, AdminError> {
        Self::ALL
            .into_iter()
            .find(|l| *l as u8 == v)
            .ok_or(AdminError::InvalidEnumValue {
                field: "landscape",
                value: v as u64,
            })
    }
}
