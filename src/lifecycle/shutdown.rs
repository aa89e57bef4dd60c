//! Stop latch shared by the probe timer and the status API.

use tokio::sync::watch;

/// Sticky stop flag.
///
/// Once [`trigger`](Shutdown::trigger) is called every [`ShutdownSignal`]
/// resolves, including ones subscribed afterwards. Dropping the `Shutdown`
/// releases waiters too, so an owner going away never strands a loop.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Latch the flag. Later calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed to a background loop.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves once the owning [`Shutdown`] is triggered or dropped.
    pub async fn triggered(&mut self) {
        // Err means the sender is gone, which counts as a stop.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
