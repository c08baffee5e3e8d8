//! Runtime-agnostic transport: a connected byte stream plus the two
//! concrete adapters that produce one, gated behind the `rt-tokio` and
//! `rt-async-io` features.

use futures::io::{AsyncRead, AsyncWrite};

#[cfg(feature = "rt-async-io")]
pub mod async_io;
#[cfg(feature = "rt-tokio")]
pub mod tokio;

/// Any connected, full-duplex byte stream the frame codec can be run over.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}
