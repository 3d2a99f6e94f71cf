use crate::worker::process_request;
use crate::{BoxReport, FrameRequest, Mailbox, Transport, TransportError, mailbox};
use glint_com::{ComError, Connection, Listener, MAX_MESSAGE_SIZE};
use glint_vision::FramePipeline;
use std::net::SocketAddr;
use tokio::net::ToSocketAddrs;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Client side of a pipeline worker reached over TCP.
///
/// Writing and reading each run in their own task so `recv` stays
/// cancel-safe; a half-read message is never abandoned.
pub struct RemoteTransport {
    outbox: Mailbox<FrameRequest>,
    results: mpsc::Receiver<BoxReport>,
    tasks: [JoinHandle<()>; 2],
    peer_addr: SocketAddr,
}

impl RemoteTransport {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let conn = Connection::<FrameRequest, BoxReport>::connect(addr).await?;
        let peer_addr = conn.peer_addr();
        let (mut writer, mut reader) = conn.into_split();
        log::info!("connected to worker at {peer_addr}");

        let (outbox, mut inbox) = mailbox::<FrameRequest>();
        let write_task = tokio::spawn(async move {
            while let Some(request) = inbox.recv().await {
                match writer.send(&request).await {
                    Ok(()) => {}
                    // Refused before any byte was written, the stream is still in sync.
                    Err(ComError::MessageTooLarge(len)) => {
                        log::warn!("frame {} dropped, {len} bytes is too large", request.seq);
                    }
                    Err(e) => {
                        log::warn!("sending frame {} failed: {e}", request.seq);
                        break;
                    }
                }
            }
        });

        let (tx, results) = mpsc::channel(1);
        let read_task = tokio::spawn(async move {
            loop {
                match reader.recv().await {
                    Ok(report) => {
                        if tx.send(report).await.is_err() {
                            break;
                        }
                    }
                    Err(ComError::ConnectionClosed) => {
                        log::info!("worker {peer_addr} closed the connection");
                        break;
                    }
                    Err(e) => {
                        log::warn!("receiving from worker {peer_addr} failed: {e}");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            outbox,
            results,
            tasks: [write_task, read_task],
            peer_addr,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}

impl Transport for RemoteTransport {
    fn send(&mut self, request: FrameRequest) -> Result<(), TransportError> {
        match request.wire_len() {
            Some(len) if len <= MAX_MESSAGE_SIZE as usize => self.outbox.post(request),
            Some(len) => Err(TransportError::Unsendable(format!(
                "frame {} is {len} bytes, limit {MAX_MESSAGE_SIZE}",
                request.seq
            ))),
            None => Err(TransportError::Unsendable(format!(
                "frame {} is {}x{}, sides are limited to u32",
                request.seq, request.frame.width, request.frame.height
            ))),
        }
    }

    async fn recv(&mut self) -> Result<BoxReport, TransportError> {
        self.results.recv().await.ok_or(TransportError::Closed)
    }
}

impl Drop for RemoteTransport {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// TCP pipeline worker. Each connection is served by its own task, one
/// request at a time.
pub struct WorkerServer {
    listener: Listener,
    pipeline: FramePipeline,
}

impl WorkerServer {
    pub async fn bind(addr: impl ToSocketAddrs, pipeline: FramePipeline) -> Result<Self, ComError> {
        let listener = Listener::bind(addr).await?;
        Ok(Self { listener, pipeline })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Accept connections until the listener fails.
    pub async fn run(self) -> Result<(), ComError> {
        log::info!(
            "worker listening on {} (threshold {})",
            self.local_addr(),
            self.pipeline.threshold()
        );
        loop {
            let conn = match self.listener.accept::<BoxReport, FrameRequest>().await {
                Ok(conn) => conn,
                Err(ComError::Io(e)) => {
                    log::warn!("accept error: {e}");
                    // keep a persistent error from spinning the loop
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    continue;
                }
                Err(e) => return Err(e),
            };
            tokio::spawn(serve_connection(conn, self.pipeline));
        }
    }
}

async fn serve_connection(mut conn: Connection<BoxReport, FrameRequest>, pipeline: FramePipeline) {
    let peer = conn.peer_addr();
    log::info!("serving {peer}");
    loop {
        let request = match conn.recv().await {
            Ok(request) => request,
            Err(ComError::ConnectionClosed) => break,
            Err(e) => {
                log::warn!("dropping {peer}: {e}");
                break;
            }
        };
        if let Some(report) = process_request(pipeline, request).await {
            if let Err(e) = conn.send(&report).await {
                log::warn!("reply to {peer} failed: {e}");
                break;
            }
        }
    }
    log::info!("{peer} disconnected");
}

/// Bind `addr` and serve pipeline requests forever.
pub async fn serve(addr: impl ToSocketAddrs, pipeline: FramePipeline) -> Result<(), ComError> {
    WorkerServer::bind(addr, pipeline).await?.run().await
}
