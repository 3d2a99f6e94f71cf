use crate::TransportError;
use tokio::sync::mpsc;

/// Create a single-slot mailbox.
///
/// A post is rejected while the previous message has not been taken yet;
/// nothing is ever queued behind it.
pub fn mailbox<T>() -> (Mailbox<T>, MailboxReceiver<T>) {
    let (tx, rx) = mpsc::channel(1);
    (Mailbox { tx }, MailboxReceiver { rx })
}

#[derive(Debug)]
pub struct Mailbox<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Mailbox<T> {
    /// Place `msg` in the slot without waiting.
    ///
    /// # Errors
    ///
    /// `TransportError::Busy` if the slot is occupied, `TransportError::Closed`
    /// if the receiver is gone. The message is dropped in both cases.
    pub fn post(&self, msg: T) -> Result<(), TransportError> {
        self.tx.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TransportError::Busy,
            mpsc::error::TrySendError::Closed(_) => TransportError::Closed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct MailboxReceiver<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> MailboxReceiver<T> {
    /// Take the next message, or `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}
