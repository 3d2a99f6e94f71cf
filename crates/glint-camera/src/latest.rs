//! Single-slot hand-off between a producer thread and an async consumer.
//!
//! Publishing overwrites whatever the consumer has not taken yet, so the
//! consumer always receives the newest value and never works through a
//! backlog.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

struct Shared<T> {
    slot: Mutex<Option<T>>,
    notify: Notify,
    sender_alive: AtomicBool,
    receiver_alive: AtomicBool,
}

impl<T> Shared<T> {
    fn slot(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Producer half. Never blocks.
pub struct LatestSender<T> {
    shared: Arc<Shared<T>>,
}

/// Consumer half.
pub struct LatestReceiver<T> {
    shared: Arc<Shared<T>>,
}

pub fn latest<T>() -> (LatestSender<T>, LatestReceiver<T>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(None),
        notify: Notify::new(),
        sender_alive: AtomicBool::new(true),
        receiver_alive: AtomicBool::new(true),
    });
    (
        LatestSender {
            shared: shared.clone(),
        },
        LatestReceiver { shared },
    )
}

impl<T> LatestSender<T> {
    /// Store `value`, replacing any value not yet taken.
    ///
    /// Returns `Ok(true)` if an older value was replaced, or gives `value`
    /// back once the receiver is gone.
    pub fn publish(&self, value: T) -> Result<bool, T> {
        if !self.is_open() {
            return Err(value);
        }
        let replaced = self.shared.slot().replace(value).is_some();
        self.shared.notify.notify_one();
        Ok(replaced)
    }

    pub fn is_open(&self) -> bool {
        self.shared.receiver_alive.load(Ordering::Acquire)
    }
}

impl<T> Drop for LatestSender<T> {
    fn drop(&mut self) {
        self.shared.sender_alive.store(false, Ordering::Release);
        self.shared.notify.notify_one();
    }
}

impl<T> LatestReceiver<T> {
    /// Wait for the newest value. `None` once the sender is gone and the
    /// slot is empty.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            if let Some(value) = self.try_recv() {
                return Some(value);
            }
            if !self.shared.sender_alive.load(Ordering::Acquire) {
                // the sender may have published right before dropping
                return self.try_recv();
            }
            // notify_one stores a permit, so a publish between the checks
            // above and this await is not lost
            self.shared.notify.notified().await;
        }
    }

    pub fn try_recv(&mut self) -> Option<T> {
        self.shared.slot().take()
    }
}

impl<T> Drop for LatestReceiver<T> {
    fn drop(&mut self) {
        self.shared.receiver_alive.store(false, Ordering::Release);
    }
}
