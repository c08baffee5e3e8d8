//! Connection configuration. A plain builder — no file format or CLI flag
//! parsing lives in this crate; that belongs to the embedder.

use std::time::Duration;

use crate::protocol::types::{Frequency, FrequencyMask, UpdateType};

/// Default update-type/frequency subscriptions applied on `ServerWelcome`.
pub fn default_update_types() -> Vec<(UpdateType, FrequencyMask)> {
    vec![
        (UpdateType::ClientInfo, Frequency::Automatic.into()),
        (UpdateType::CompanyInfo, Frequency::Automatic.into()),
        (UpdateType::CompanyEconomy, Frequency::Monthly.into()),
        (UpdateType::CompanyStats, Frequency::Monthly.into()),
        (UpdateType::Chat, Frequency::Automatic.into()),
        (UpdateType::Console, Frequency::Automatic.into()),
        (UpdateType::Date, Frequency::Daily.into()),
        (UpdateType::CmdNames, Frequency::Poll.into()),
    ]
}

/// Everything needed to dial and authenticate with a server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub secret_key: Option<[u8; 32]>,
    pub use_insecure_join: bool,
    pub name: String,
    pub version: String,
    pub update_types: Vec<(UpdateType, FrequencyMask)>,
    pub poll_timeout: Duration,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        ClientConfig {
            host: host.into(),
            port: 3977,
            password: None,
            secret_key: None,
            use_insecure_join: true,
            name: "openttd-admin".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            update_types: default_update_types(),
            poll_timeout: Duration::from_millis(250),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Configures the secure join path with a 32-byte X25519 authorized key.
    pub fn secret_key(mut self, key: [u8; 32]) -> Self {
        self.secret_key = Some(key);
        self.use_insecure_join = false;
        self
    }

    pub fn use_insecure_join(mut self, insecure: bool) -> Self {
        self.use_insecure_join = insecure;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn update_types(mut self, update_types: Vec<(UpdateType, FrequencyMask)>) -> Self {
        self.update_types = update_types;
        self
    }

    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}
