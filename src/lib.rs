//! An async client for the OpenTTD Admin Port protocol: connect to a running
//! server, authenticate (plaintext password or an X25519-authenticated
//! secure join), subscribe to update streams, issue rcon/chat/gamescript
//! commands, and keep a local mirror of clients, companies and map state.
//!
//! The protocol engine (framing, packet registry, crypto, connection state
//! machine, state mirror) is runtime-agnostic; pick a transport adapter with
//! the `rt-tokio` (default) or `rt-async-io` feature.

pub mod config;
pub mod connection;
pub mod crypto;
pub mod error;
pub mod mirror;
pub mod observation;
pub mod ping;
pub mod protocol;
pub mod transport;

pub use config::ClientConfig;
pub use connection::{Connection, ConnectionState};
pub use error::{AdminError, AdminResult, DisconnectCause, ServerErrorCode};
pub use observation::Observation;

#[cfg(feature = "rt-tokio")]
mod rt_tokio_connect {
    use futures::channel::mpsc;

    use crate::config::ClientConfig;
    use crate::connection::Connection;
    use crate::error::AdminResult;
    use crate::observation::Observation;
    use crate::transport::tokio::TokioTransport;

    /// Dials `config.host:config.port` over tokio and returns a connection
    /// ready for [`Connection::run`], plus its observation receiver.
    pub async fn connect(
        config: ClientConfig,
    ) -> AdminResult<(Connection<TokioTransport>, mpsc::Receiver<Observation>)> {
        let addr = resolve(&config).await?;
        let transport = crate::transport::tokio::connect(addr).await?;
        Ok(Connection::new(transport, config))
    }

    async fn resolve(config: &ClientConfig) -> std::io::Result<std::net::SocketAddr> {
        use tokio::net::lookup_host;
        lookup_host((config.host.as_str(), config.port))
            .await?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved")
            })
    }
}

#[cfg(feature = "rt-tokio")]
pub use rt_tokio_connect::connect;

#[cfg(feature = "rt-async-io")]
mod rt_async_io_connect {
    use std::net::ToSocketAddrs;

    use futures::channel::mpsc;

    use crate::config::ClientConfig;
    use crate::connection::Connection;
    use crate::error::{AdminError, AdminResult};
    use crate::observation::Observation;
    use crate::transport::async_io::AsyncIoTransport;

    /// Dials `config.host:config.port` over the readiness-driven `async-io`
    /// stack and returns a connection ready for [`Connection::run`].
    pub async fn connect(
        config: ClientConfig,
    ) -> AdminResult<(Connection<AsyncIoTransport>, mpsc::Receiver<Observation>)> {
        let addr = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(AdminError::Io)?
            .next()
            .ok_or_else(|| {
                AdminError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses resolved",
                ))
            })?;
        let transport = crate::transport::async_io::connect(addr).await?;
        Ok(Connection::new(transport, config))
    }
}

#[cfg(feature = "rt-async-io")]
pub use rt_async_io_connect::connect as connect_async_io;
