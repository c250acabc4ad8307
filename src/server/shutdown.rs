//! Lets the accept loop know that a shutdown was requested.

use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;

// Topic broadcasts the shutdown signal. Subscribers get a Listener they can
// select on; dropping the sender wakes every listener at once.
#[derive(Debug)]
pub(crate) struct Topic {
    tx: RwLock<Option<broadcast::Sender<()>>>,
}

impl Topic {
    pub(crate) fn new() -> Topic {
        let (tx, _) = broadcast::channel(1);
        Topic { tx: RwLock::new(Some(tx)) }
    }

    // Signals shutdown. Idempotent.
    pub(crate) fn notify(&self) {
        drop(self.tx.write().unwrap_or_else(PoisonError::into_inner).take());
    }

    pub(crate) fn subscribe(&self) -> Listener {
        let guard = self.tx.read().unwrap_or_else(PoisonError::into_inner);
        Listener {
            fired: guard.is_none(),
            rx: guard.as_ref().map(|tx| tx.subscribe()),
        }
    }
}

// Listener resolves once shutdown is signalled.
#[derive(Debug)]
pub(crate) struct Listener {
    fired: bool,
    rx: Option<broadcast::Receiver<()>>,
}

impl Listener {
    /// Waits for the shutdown notice. Returns immediately if it was already
    /// given.
    pub(crate) async fn listen(&mut self) {
        if self.fired {
            return;
        }
        if let Some(rx) = self.rx.as_mut() {
            // Only the channel closing can wake us; no values are ever sent.
            let _ = rx.recv().await;
        }
        self.fired = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_wakes_existing_and_future_listeners() {
        let topic = Topic::new();
        let mut before = topic.subscribe();
        topic.notify();
        before.listen().await;

        let mut after = topic.subscribe();
        after.listen().await;
    }
}
