// Cooperative cancellation for orchestration and background tasks.
// A single trigger fans out to any number of cloned tokens.

use std::future;
use std::sync::Arc;

use tokio::sync::watch;

/// Owner side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side of a cancellation signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
    _keepalive: Option<Arc<watch::Sender<bool>>>,
}

impl CancelHandle {
    /// Create a handle and its first token.
    pub fn new() -> (Self, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (
            Self { tx },
            CancelToken {
                rx,
                _keepalive: None,
            },
        )
    }

    /// Signal every token. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Hand out another token bound to this handle.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
            _keepalive: None,
        }
    }
}

impl CancelToken {
    /// A token that never fires.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            rx,
            _keepalive: Some(Arc::new(tx)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is signalled. Pends forever if the handle was dropped
    /// without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                future::pending::<()>().await;
            }
        }
    }
}
