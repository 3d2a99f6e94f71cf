use crate::{ComError, Connection};
use glint_codec::Codec;
use std::net::SocketAddr;
use tokio::net::{TcpListener, ToSocketAddrs};

/// Accepts typed connections. The caller decides how each peer is served.
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let inner = TcpListener::bind(addr).await?;
        let local_addr = inner.local_addr()?;
        Ok(Self { inner, local_addr })
    }

    /// Wait for the next peer.
    pub async fn accept<Tx: Codec, Rx: Codec>(&self) -> Result<Connection<Tx, Rx>, ComError> {
        let (stream, addr) = self.inner.accept().await?;
        log::debug!("accepted connection from {addr}");
        Connection::from_stream(stream)
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
