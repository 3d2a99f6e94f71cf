use crate::worker::process_request;
use crate::{BoxReport, FrameRequest, Mailbox, TransportError, mailbox};
use glint_vision::FramePipeline;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Asynchronous boundary between the capture loop and a pipeline worker.
///
/// `send` is fire-and-forget and never waits; results come back through
/// `recv` in whatever order the worker produces them. `recv` must be
/// cancel-safe, since the loop races it against commands and timers.
#[allow(async_fn_in_trait)]
pub trait Transport {
    fn send(&mut self, request: FrameRequest) -> Result<(), TransportError>;

    async fn recv(&mut self) -> Result<BoxReport, TransportError>;
}

/// Pipeline worker running as a task in this process.
pub struct LocalTransport {
    outbox: Mailbox<FrameRequest>,
    results: mpsc::Receiver<BoxReport>,
    worker: JoinHandle<()>,
}

impl LocalTransport {
    /// Spawn the worker on the current runtime.
    pub fn spawn(pipeline: FramePipeline) -> Self {
        let (outbox, mut inbox) = mailbox::<FrameRequest>();
        let (tx, results) = mpsc::channel(1);

        let worker = tokio::spawn(async move {
            while let Some(request) = inbox.recv().await {
                if let Some(report) = process_request(pipeline, request).await {
                    if tx.send(report).await.is_err() {
                        break;
                    }
                }
            }
            log::debug!("local worker stopped");
        });

        Self {
            outbox,
            results,
            worker,
        }
    }
}

impl Transport for LocalTransport {
    fn send(&mut self, request: FrameRequest) -> Result<(), TransportError> {
        self.outbox.post(request)
    }

    async fn recv(&mut self) -> Result<BoxReport, TransportError> {
        self.results.recv().await.ok_or(TransportError::Closed)
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
