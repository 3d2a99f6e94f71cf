use glint_camera::{CameraError, FrameSource};
use glint_track::{
    BoxReport, CaptureLoop, FrameRequest, LocalTransport, ResultSink, TrackError, TrackerConfig,
    Transport, TransportError, WatchSink,
};
use glint_vision::{BoundingBox, Frame};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, Instant, sleep, sleep_until, timeout};

/// Shared counters between the mocks and the test body.
#[derive(Default)]
struct Counters {
    in_flight: AtomicBool,
    captures: AtomicUsize,
    sends: AtomicUsize,
    overlaps: AtomicUsize,
}

struct MockSource {
    counters: Arc<Counters>,
    fail_first: usize,
}

impl FrameSource for MockSource {
    async fn capture(&mut self) -> Result<Frame, CameraError> {
        let n = self.counters.captures.fetch_add(1, Ordering::SeqCst);
        if self.counters.in_flight.load(Ordering::SeqCst) {
            self.counters.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        if n < self.fail_first {
            return Err(CameraError::Stream("no frame".to_string()));
        }
        Frame::filled(4, 4, [0, 0, 0, 255]).map_err(CameraError::from)
    }
}

#[derive(Clone, Copy)]
enum Reply {
    Box(BoundingBox),
    Rejected,
    Never,
    RejectSend,
}

struct MockTransport {
    counters: Arc<Counters>,
    delay: Duration,
    reply: Reply,
    pending: Option<(u64, Instant)>,
}

impl MockTransport {
    fn new(counters: Arc<Counters>, delay: Duration, reply: Reply) -> Self {
        Self {
            counters,
            delay,
            reply,
            pending: None,
        }
    }
}

impl Transport for MockTransport {
    fn send(&mut self, request: FrameRequest) -> Result<(), TransportError> {
        if let Reply::RejectSend = self.reply {
            return Err(TransportError::Busy);
        }
        self.counters.sends.fetch_add(1, Ordering::SeqCst);
        if self.counters.in_flight.swap(true, Ordering::SeqCst) {
            self.counters.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        if !matches!(self.reply, Reply::Never) {
            self.pending = Some((request.seq, Instant::now() + self.delay));
        }
        Ok(())
    }

    async fn recv(&mut self) -> Result<BoxReport, TransportError> {
        let Some((_, ready_at)) = self.pending else {
            return std::future::pending().await;
        };
        sleep_until(ready_at).await;
        let (seq, _) = self.pending.take().ok_or(TransportError::Closed)?;
        self.counters.in_flight.store(false, Ordering::SeqCst);
        let bbox = match self.reply {
            Reply::Box(bbox) => Some(bbox),
            _ => None,
        };
        Ok(BoxReport { seq, bbox })
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    seen: Arc<Mutex<Vec<Option<BoundingBox>>>>,
}

impl RecordingSink {
    fn seen(&self) -> Vec<Option<BoundingBox>> {
        self.seen.lock().unwrap().clone()
    }
}

impl ResultSink for RecordingSink {
    fn on_bounding_box(&mut self, bbox: Option<BoundingBox>) {
        self.seen.lock().unwrap().push(bbox);
    }
}

fn target() -> BoundingBox {
    BoundingBox::from_extents(10, 20, 30, 40)
}

fn config() -> TrackerConfig {
    TrackerConfig::default()
        .with_frame_interval(Duration::from_millis(10))
        .with_result_timeout(Duration::from_secs(1))
        .with_retry_delay(Duration::from_millis(50))
}

#[tokio::test(start_paused = true)]
async fn test_never_captures_while_busy() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 0,
    };
    let transport = MockTransport::new(counters.clone(), Duration::from_millis(100), Reply::Box(target()));
    let sink = RecordingSink::default();
    let (mut capture_loop, handle) = CaptureLoop::new(source, transport, sink.clone(), config());

    let driver = async {
        handle.start();
        sleep(Duration::from_millis(1050)).await;
        handle.shutdown();
    };
    let (result, ()) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();

    let stats = capture_loop.stats();
    assert_eq!(counters.overlaps.load(Ordering::SeqCst), 0);
    // the 100 ms worker, not the 10 ms interval, sets the pace
    assert!(stats.frames_captured <= 11, "{stats:?}");
    assert!(stats.results_applied >= 9, "{stats:?}");
    assert!(stats.frames_captured - stats.results_applied <= 1);
    assert_eq!(counters.sends.load(Ordering::SeqCst) as u64, stats.frames_captured);
    assert!(sink.seen().iter().all(|b| *b == Some(target())));
}

#[tokio::test(start_paused = true)]
async fn test_late_result_after_stop_is_discarded() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 0,
    };
    let transport = MockTransport::new(counters.clone(), Duration::from_millis(100), Reply::Box(target()));
    let sink = RecordingSink::default();
    let (mut capture_loop, handle) = CaptureLoop::new(source, transport, sink.clone(), config());

    let driver = async {
        handle.start();
        // first result lands at 100 ms, second frame is in flight until 200 ms
        sleep(Duration::from_millis(150)).await;
        handle.stop();
        sleep(Duration::from_millis(350)).await;
        handle.shutdown();
    };
    let (result, ()) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();

    let stats = capture_loop.stats();
    assert_eq!(sink.seen(), vec![Some(target())]);
    assert_eq!(stats.frames_captured, 2);
    assert_eq!(stats.results_applied, 1);
    assert_eq!(stats.results_discarded, 1);
    assert!(!capture_loop.session().is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_degenerate_result_clears_sink() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 0,
    };
    let degenerate = BoundingBox::from_extents(4, 4, 0, 0);
    let transport = MockTransport::new(counters, Duration::from_millis(20), Reply::Box(degenerate));
    let sink = RecordingSink::default();
    let (mut capture_loop, handle) = CaptureLoop::new(source, transport, sink.clone(), config());

    let driver = async {
        handle.start();
        sleep(Duration::from_millis(50)).await;
        handle.shutdown();
    };
    let (result, ()) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();

    let seen = sink.seen();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(Option::is_none));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_frame_is_no_update() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 0,
    };
    let transport = MockTransport::new(counters, Duration::from_millis(20), Reply::Rejected);
    let sink = RecordingSink::default();
    let (mut capture_loop, handle) = CaptureLoop::new(source, transport, sink.clone(), config());

    let driver = async {
        handle.start();
        sleep(Duration::from_millis(200)).await;
        handle.shutdown();
    };
    let (result, ()) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();

    let stats = capture_loop.stats();
    assert!(sink.seen().is_empty());
    assert_eq!(stats.results_applied, 0);
    // no waiting for the timeout: the loop moved straight on
    assert!(stats.frames_captured >= 5, "{stats:?}");
    assert_eq!(stats.transport_failures, 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_frees_the_loop() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 0,
    };
    let transport = MockTransport::new(counters, Duration::ZERO, Reply::Never);
    let sink = RecordingSink::default();
    let config = config().with_result_timeout(Duration::from_millis(200));
    let (mut capture_loop, handle) = CaptureLoop::new(source, transport, sink.clone(), config);

    let driver = async {
        handle.start();
        sleep(Duration::from_millis(950)).await;
        handle.shutdown();
    };
    let (result, ()) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();

    let stats = capture_loop.stats();
    assert_eq!(stats.frames_captured, 5);
    assert_eq!(stats.transport_failures, 4);
    assert_eq!(stats.results_applied, 0);
    assert!(sink.seen().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_capture_failures_are_retried() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 3,
    };
    let transport = MockTransport::new(counters.clone(), Duration::from_millis(10), Reply::Box(target()));
    let sink = RecordingSink::default();
    let (mut capture_loop, handle) = CaptureLoop::new(source, transport, sink.clone(), config());

    let driver = async {
        handle.start();
        sleep(Duration::from_millis(300)).await;
        handle.shutdown();
    };
    let (result, ()) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();

    let stats = capture_loop.stats();
    assert_eq!(stats.capture_failures, 3);
    assert!(stats.results_applied >= 1);
    assert_eq!(sink.seen()[0], Some(target()));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_send_is_retried() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 0,
    };
    let transport = MockTransport::new(counters, Duration::ZERO, Reply::RejectSend);
    let (mut capture_loop, handle) =
        CaptureLoop::new(source, transport, RecordingSink::default(), config());

    let driver = async {
        handle.start();
        sleep(Duration::from_millis(220)).await;
        handle.shutdown();
    };
    let (result, ()) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();

    let stats = capture_loop.stats();
    // attempts at 0, 50, 100, 150, 200 ms
    assert_eq!(stats.transport_failures, 5);
    assert!(capture_loop.session().wants_frame());
}

#[tokio::test(start_paused = true)]
async fn test_idle_until_started() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 0,
    };
    let transport = MockTransport::new(counters.clone(), Duration::ZERO, Reply::Box(target()));
    let (mut capture_loop, handle) =
        CaptureLoop::new(source, transport, RecordingSink::default(), config());

    let driver = async {
        sleep(Duration::from_millis(500)).await;
        handle.shutdown();
    };
    let (result, ()) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();
    assert_eq!(counters.captures.load(Ordering::SeqCst), 0);
}

struct ClosedTransport;

impl Transport for ClosedTransport {
    fn send(&mut self, _request: FrameRequest) -> Result<(), TransportError> {
        Err(TransportError::Closed)
    }

    async fn recv(&mut self) -> Result<BoxReport, TransportError> {
        Err(TransportError::Closed)
    }
}

#[tokio::test]
async fn test_closed_transport_ends_the_loop() {
    let counters = Arc::new(Counters::default());
    let source = MockSource { counters, fail_first: 0 };
    let (mut capture_loop, handle) =
        CaptureLoop::new(source, ClosedTransport, RecordingSink::default(), config());
    handle.start();

    let result = timeout(Duration::from_secs(5), capture_loop.run()).await.unwrap();
    assert!(matches!(
        result,
        Err(TrackError::Transport(TransportError::Closed))
    ));
}

#[tokio::test]
async fn test_dropping_every_handle_ends_the_loop() {
    let counters = Arc::new(Counters::default());
    let source = MockSource {
        counters: counters.clone(),
        fail_first: 0,
    };
    let transport = MockTransport::new(counters, Duration::ZERO, Reply::Never);
    let (mut capture_loop, handle) =
        CaptureLoop::new(source, transport, RecordingSink::default(), config());
    drop(handle);
    timeout(Duration::from_secs(5), capture_loop.run())
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_local_pipeline_end_to_end() {
    struct Blocks;

    impl FrameSource for Blocks {
        async fn capture(&mut self) -> Result<Frame, CameraError> {
            Frame::from_fn(20, 20, |x, y| {
                if (5..=14).contains(&x) && (8..=11).contains(&y) {
                    [255, 255, 255, 255]
                } else {
                    [0, 0, 0, 255]
                }
            })
            .map_err(CameraError::from)
        }
    }

    let config = config().with_threshold(100.0);
    let transport = LocalTransport::spawn(config.pipeline());
    let sink = WatchSink::new();
    let mut rx = sink.subscribe();
    let (mut capture_loop, handle) = CaptureLoop::new(Blocks, transport, sink, config);

    let driver = async {
        handle.start();
        let changed = timeout(Duration::from_secs(5), rx.changed()).await;
        handle.shutdown();
        changed.is_ok()
    };
    let (result, changed) = tokio::join!(capture_loop.run(), driver);
    result.unwrap();
    assert!(changed);

    let bbox = capture_loop.sink().current().unwrap();
    assert_eq!(bbox, BoundingBox::from_extents(4, 7, 15, 12));
}
