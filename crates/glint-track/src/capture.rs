use crate::{
    FrameRequest, ResultAction, ResultSink, Session, TrackError, TrackerConfig, Transport,
    TransportError,
};
use glint_camera::{CameraError, FrameSource};
use glint_vision::Frame;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Stop,
    Shutdown,
}

/// Counters kept by a running [`CaptureLoop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_captured: u64,
    pub results_applied: u64,
    /// Stale results, and reports for frames the worker rejected.
    pub results_discarded: u64,
    pub capture_failures: u64,
    /// Rejected sends, transport errors and timeouts.
    pub transport_failures: u64,
}

/// Controls a [`CaptureLoop`] from anywhere. Cheap to clone.
///
/// Every method returns false once the loop has exited.
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl TrackerHandle {
    pub fn start(&self) -> bool {
        self.tx.send(Command::Start).is_ok()
    }

    pub fn stop(&self) -> bool {
        self.tx.send(Command::Stop).is_ok()
    }

    /// Make [`CaptureLoop::run`] return.
    pub fn shutdown(&self) -> bool {
        self.tx.send(Command::Shutdown).is_ok()
    }
}

enum Event {
    Command(Option<Command>),
    Captured(Result<Frame, CameraError>),
    Report(Result<crate::BoxReport, TransportError>),
    TimedOut,
}

/// Capture, hand off, wait, publish, repeat.
///
/// Frames are never queued: while one is with the worker no capture is
/// requested, so a slow worker lowers the frame rate instead of building
/// a backlog.
pub struct CaptureLoop<S, T, K> {
    source: S,
    transport: T,
    sink: K,
    config: TrackerConfig,
    session: Session,
    stats: LoopStats,
    commands: mpsc::UnboundedReceiver<Command>,
    next_capture: Option<Instant>,
    deadline: Option<Instant>,
}

impl<S, T, K> CaptureLoop<S, T, K>
where
    S: FrameSource,
    T: Transport,
    K: ResultSink,
{
    pub fn new(source: S, transport: T, sink: K, config: TrackerConfig) -> (Self, TrackerHandle) {
        let (tx, commands) = mpsc::unbounded_channel();
        let capture_loop = Self {
            source,
            transport,
            sink,
            config,
            session: Session::new(),
            stats: LoopStats::default(),
            commands,
            next_capture: None,
            deadline: None,
        };
        (capture_loop, TrackerHandle { tx })
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Drive the loop until shutdown or until every handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns `TrackError::Transport` if the worker side closes.
    pub async fn run(&mut self) -> Result<(), TrackError> {
        loop {
            let wants_frame = self.session.wants_frame();
            let next_capture = self.next_capture;
            let deadline = self.deadline;

            let event = tokio::select! {
                cmd = self.commands.recv() => Event::Command(cmd),
                frame = paced_capture(&mut self.source, next_capture), if wants_frame => {
                    Event::Captured(frame)
                }
                report = self.transport.recv() => Event::Report(report),
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    Event::TimedOut
                }
            };

            match event {
                Event::Command(Some(Command::Start)) => self.on_start(),
                Event::Command(Some(Command::Stop)) => self.on_stop(),
                Event::Command(Some(Command::Shutdown)) | Event::Command(None) => {
                    log::info!("capture loop shutting down");
                    return Ok(());
                }
                Event::Captured(frame) => self.on_captured(frame),
                Event::Report(Ok(report)) => self.on_report(report),
                Event::Report(Err(TransportError::Closed)) => {
                    log::error!("transport closed, capture loop exiting");
                    return Err(TransportError::Closed.into());
                }
                Event::Report(Err(e)) => {
                    log::warn!("transport error: {e}");
                    self.stats.transport_failures += 1;
                    self.abandon_in_flight();
                }
                Event::TimedOut => {
                    log::warn!("{}", TransportError::TimedOut);
                    self.stats.transport_failures += 1;
                    self.abandon_in_flight();
                }
            }
        }
    }

    fn on_start(&mut self) {
        if self.session.start() {
            log::info!("tracking started");
            self.next_capture = None;
        }
    }

    fn on_stop(&mut self) {
        if self.session.stop() {
            log::info!("tracking stopped");
            self.deadline = None;
        }
    }

    fn on_captured(&mut self, frame: Result<Frame, CameraError>) {
        let now = Instant::now();
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("capture failed: {e}");
                self.stats.capture_failures += 1;
                self.session.capture_failed();
                self.next_capture = Some(now + self.config.retry_delay());
                return;
            }
        };

        self.stats.frames_captured += 1;
        self.next_capture = Some(now + self.config.frame_interval());
        let Some(seq) = self.session.frame_captured() else {
            return;
        };

        let request = FrameRequest {
            seq,
            active: self.session.is_active(),
            frame,
        };
        match self.transport.send(request) {
            Ok(()) => self.deadline = Some(now + self.config.result_timeout()),
            Err(e) => {
                log::warn!("frame {seq} not sent: {e}");
                self.stats.transport_failures += 1;
                self.session.abandon();
                self.next_capture = Some(now + self.config.retry_delay());
            }
        }
    }

    fn on_report(&mut self, report: crate::BoxReport) {
        match self.session.result(report.seq) {
            ResultAction::Discard => {
                log::debug!("discarding stale result {}", report.seq);
                self.stats.results_discarded += 1;
            }
            ResultAction::Apply => {
                self.deadline = None;
                match report.bbox {
                    Some(bbox) => {
                        let detection = bbox.detection();
                        log::debug!("frame {}: {:?}", report.seq, detection);
                        self.sink.on_bounding_box(detection);
                        self.stats.results_applied += 1;
                    }
                    None => {
                        log::warn!("frame {} produced no result", report.seq);
                        self.stats.results_discarded += 1;
                    }
                }
            }
        }
    }

    fn abandon_in_flight(&mut self) {
        self.deadline = None;
        if let Some(seq) = self.session.abandon() {
            log::debug!("abandoned frame {seq}");
        }
    }
}

async fn paced_capture<S: FrameSource>(
    source: &mut S,
    not_before: Option<Instant>,
) -> Result<Frame, CameraError> {
    if let Some(at) = not_before {
        sleep_until(at).await;
    }
    source.capture().await
}
