//! Transport adapter for the cooperatively-scheduled `tokio` runtime.

use std::io;
use std::net::SocketAddr;

use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// A tokio `TcpStream` wrapped so it implements `futures::io::{AsyncRead,
/// AsyncWrite}` instead of tokio's own traits.
pub type TokioTransport = Compat<TcpStream>;

/// Connects to `addr` and returns a stream usable as a [`super::Transport`].
pub async fn connect(addr: SocketAddr) -> io::Result<TokioTransport> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    Ok(stream.compat())
}
