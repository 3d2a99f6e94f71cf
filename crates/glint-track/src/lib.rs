//! Real-time edge tracking: capture a frame, find its bounding box on a
//! worker, publish the box, repeat. At most one frame is ever in flight.

pub mod capture;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod remote;
pub mod session;
pub mod sink;
pub mod steer;
pub mod transport;
mod worker;

pub use capture::{CaptureLoop, LoopStats, TrackerHandle};
pub use config::TrackerConfig;
pub use error::{TrackError, TransportError};
pub use mailbox::{Mailbox, MailboxReceiver, mailbox};
pub use message::{BoxReport, FrameRequest};
pub use remote::{RemoteTransport, WorkerServer, serve};
pub use session::{LoopState, ResultAction, Session};
pub use sink::{ResultSink, WatchSink};
pub use steer::{Correction, Steering};
pub use transport::{LocalTransport, Transport};
