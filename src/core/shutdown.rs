//! Cancellation signal shared by the generator and the observer monitor.

use std::sync::Arc;

use tokio::sync::watch;

/// Fires cancellation. Clones fire the same signal.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

/// Waits for cancellation.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Create a signal and its first listener.
    pub fn channel() -> (Self, ShutdownListener) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, ShutdownListener { rx })
    }

    /// Another listener on this signal.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl ShutdownListener {
    /// Whether cancellation has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation fires.
    ///
    /// Dropping every signal without cancelling means the run can no longer
    /// be cancelled, so this then never resolves. Cancel-safe; meant for
    /// `tokio::select!` loops.
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
