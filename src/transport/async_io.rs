//! Transport adapter for the readiness-driven `async-io`/`async-net` stack.

use std::io;
use std::net::SocketAddr;

use async_net::TcpStream;

/// An `async-net` `TcpStream` already implements `futures::io::{AsyncRead,
/// AsyncWrite}` directly, so no compatibility shim is needed here.
pub type AsyncIoTransport = TcpStream;

/// Connects to `addr` and returns a stream usable as a [`super::Transport`].
pub async fn connect(addr: SocketAddr) -> io::Result<AsyncIoTransport> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    Ok(stream)
}
