use crate::{ComError, framing};
use glint_codec::Codec;
use std::marker::PhantomData;
use std::net::SocketAddr;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

/// Bidirectional typed connection: sends `Tx`, receives `Rx`.
pub struct Connection<Tx, Rx> {
    writer: Writer<Tx>,
    reader: Reader<Rx>,
    peer_addr: SocketAddr,
}

/// Sending half of a [`Connection`].
pub struct Writer<Tx> {
    inner: OwnedWriteHalf,
    _marker: PhantomData<Tx>,
}

/// Receiving half of a [`Connection`].
pub struct Reader<Rx> {
    inner: OwnedReadHalf,
    _marker: PhantomData<Rx>,
}

impl<Tx: Codec, Rx: Codec> Connection<Tx, Rx> {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let stream = TcpStream::connect(addr).await?;
        Self::from_stream(stream)
    }

    /// Wrap an already connected stream.
    pub fn from_stream(stream: TcpStream) -> Result<Self, ComError> {
        let peer_addr = stream.peer_addr()?;
        // frames are written whole, no point in coalescing
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            writer: Writer {
                inner: write_half,
                _marker: PhantomData,
            },
            reader: Reader {
                inner: read_half,
                _marker: PhantomData,
            },
            peer_addr,
        })
    }

    pub async fn send(&mut self, value: &Tx) -> Result<(), ComError> {
        self.writer.send(value).await
    }

    /// Returns `ComError::ConnectionClosed` once the peer hangs up.
    pub async fn recv(&mut self) -> Result<Rx, ComError> {
        self.reader.recv().await
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Split so sending and receiving can live in different tasks.
    pub fn into_split(self) -> (Writer<Tx>, Reader<Rx>) {
        (self.writer, self.reader)
    }
}

impl<Tx: Codec> Writer<Tx> {
    pub async fn send(&mut self, value: &Tx) -> Result<(), ComError> {
        framing::write_message(&mut self.inner, value).await
    }
}

impl<Rx: Codec> Reader<Rx> {
    pub async fn recv(&mut self) -> Result<Rx, ComError> {
        framing::read_message(&mut self.inner).await
    }
}
