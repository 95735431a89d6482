//! Shutdown coordination for the client.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Subscribe, wrapped in a [`ShutdownSignal`].
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal::new(self.subscribe())
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`Shutdown`], remembering whether it has fired.
///
/// A dropped coordinator is not a shutdown: `recv` then never completes.
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: Option<broadcast::Receiver<()>>,
    triggered: bool,
}

impl ShutdownSignal {
    pub fn new(rx: broadcast::Receiver<()>) -> Self {
        Self {
            rx: Some(rx),
            triggered: false,
        }
    }

    /// A signal that never fires.
    pub fn detached() -> Self {
        Self {
            rx: None,
            triggered: false,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Complete once shutdown has been triggered; immediately if it already was.
    pub async fn recv(&mut self) {
        if self.triggered {
            return;
        }

        if let Some(rx) = self.rx.as_mut() {
            match rx.recv().await {
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    self.triggered = true;
                    return;
                }
                Err(RecvError::Closed) => self.rx = None,
            }
        }

        std::future::pending::<()>().await
    }
}
