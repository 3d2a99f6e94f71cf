use glint_vision::BoundingBox;
use tokio::sync::watch;

/// Receives every applied result. `None` means nothing is detected and any
/// overlay should be cleared.
pub trait ResultSink {
    fn on_bounding_box(&mut self, bbox: Option<BoundingBox>);
}

/// Publishes the latest box on a watch channel.
///
/// Readers always see a whole box; each update replaces the previous one.
#[derive(Debug)]
pub struct WatchSink {
    tx: watch::Sender<Option<BoundingBox>>,
}

impl Default for WatchSink {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchSink {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<BoundingBox>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<BoundingBox> {
        *self.tx.borrow()
    }
}

impl ResultSink for WatchSink {
    fn on_bounding_box(&mut self, bbox: Option<BoundingBox>) {
        self.tx.send_replace(bbox);
    }
}
