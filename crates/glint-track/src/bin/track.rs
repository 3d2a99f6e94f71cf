use glint_base::log_fatal;
use glint_camera::{FrameSource, ReplaySource};
use glint_track::{
    CaptureLoop, LocalTransport, RemoteTransport, Steering, TrackError, TrackerConfig, Transport,
    WatchSink, serve,
};
use glint_vision::BoundingBox;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const USAGE: &str = "usage: track serve <addr>
       track local <image>...
       track remote <addr> <image>...
       track camera [device] [WIDTHxHEIGHT]    (v4l2 builds only)";

#[tokio::main]
async fn main() {
    glint_base::init_stdout_logger();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args).await {
        log_fatal!("{e}");
    }
}

async fn run(args: &[String]) -> Result<(), TrackError> {
    let config = TrackerConfig::default();
    config.validate()?;

    match args {
        [cmd, addr] if cmd == "serve" => Ok(serve(addr.as_str(), config.pipeline()).await?),
        [cmd, images @ ..] if cmd == "local" && !images.is_empty() => {
            let source = ReplaySource::from_paths(images)?.looping(true);
            let transport = LocalTransport::spawn(config.pipeline());
            track(source, transport, config).await
        }
        [cmd, addr, images @ ..] if cmd == "remote" && !images.is_empty() => {
            let source = ReplaySource::from_paths(images)?.looping(true);
            let transport = RemoteTransport::connect(addr.as_str()).await?;
            track(source, transport, config).await
        }
        #[cfg(feature = "v4l2")]
        [cmd, rest @ ..] if cmd == "camera" && rest.len() <= 2 => {
            let mut camera_config = match rest.first() {
                Some(device) => glint_camera::CameraConfig::new(device),
                None => glint_camera::CameraConfig::default(),
            };
            if let Some(size) = rest.get(1) {
                let resolution = glint_camera::Resolution::parse(size)
                    .ok_or_else(|| TrackError::Config(format!("bad resolution {size:?}")))?;
                camera_config = camera_config.with_resolution(resolution);
            }
            let source = glint_camera::V4l2Camera::new(camera_config)?;
            let transport = LocalTransport::spawn(config.pipeline());
            track(source, transport, config).await
        }
        _ => Err(TrackError::Config(USAGE.to_string())),
    }
}

/// Track until interrupted, logging every box and the steering it implies.
async fn track<S: FrameSource, T: Transport>(
    source: S,
    transport: T,
    config: TrackerConfig,
) -> Result<(), TrackError> {
    let sink = WatchSink::new();
    let reporter = spawn_reporter(sink.subscribe());
    let (mut capture_loop, handle) = CaptureLoop::new(source, transport, sink, config);
    handle.start();

    let result = tokio::select! {
        result = capture_loop.run() => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("interrupted");
            Ok(())
        }
    };

    let stats = capture_loop.stats();
    log::info!(
        "captured {} frames, applied {} results, discarded {}, {} capture and {} transport failures",
        stats.frames_captured,
        stats.results_applied,
        stats.results_discarded,
        stats.capture_failures,
        stats.transport_failures
    );
    reporter.abort();
    result
}

fn spawn_reporter(mut rx: watch::Receiver<Option<BoundingBox>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut steering = Steering::default();
        while rx.changed().await.is_ok() {
            let bbox = *rx.borrow_and_update();
            match bbox.and_then(|b| b.to_rect().zip(b.center())) {
                Some((rect, center)) => {
                    let correction = steering.update(center);
                    log::info!(
                        "object at ({}, {}) {}x{}, pan {:+} tilt {:+}",
                        rect.x,
                        rect.y,
                        rect.width,
                        rect.height,
                        correction.pan,
                        correction.tilt
                    );
                }
                None => {
                    steering.reset();
                    log::info!("no object");
                }
            }
        }
    })
}
