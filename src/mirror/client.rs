//! The per-client slice of the state mirror.

/// A connected player/spectator as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub id: u32,
    pub hostname: String,
    pub name: String,
    pub language: u8,
    pub join_date: u32,
    /// The company this client is playing as, or [`crate::mirror::company::SPECTATOR_COMPANY_ID`].
    pub play_as: u8,
}
