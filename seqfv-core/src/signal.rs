//! One-shot completion signal for the list of target identifiers

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SignalState {
    Pending,
    Ready(Arc<Vec<String>>),
    Abandoned,
}

/// Resolves exactly once, when alignment tracks have been built.
/// Any number of callers may wait; clones share the same state.
#[derive(Debug, Clone)]
pub struct TargetsSignal {
    tx: Arc<watch::Sender<SignalState>>,
}

impl Default for TargetsSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetsSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SignalState::Pending);
        Self { tx: Arc::new(tx) }
    }

    /// Publish the targets. Returns false if the signal was already settled.
    pub fn complete(&self, targets: Vec<String>) -> bool {
        self.tx.send_if_modified(move |state| {
            if *state == SignalState::Pending {
                *state = SignalState::Ready(Arc::new(targets));
                true
            } else {
                false
            }
        })
    }

    /// Settle without targets; waiters receive `None`
    pub fn abandon(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == SignalState::Pending {
                *state = SignalState::Abandoned;
                true
            } else {
                false
            }
        })
    }

    /// Completed or abandoned
    pub fn is_settled(&self) -> bool {
        *self.tx.borrow() != SignalState::Pending
    }

    pub fn is_complete(&self) -> bool {
        matches!(*self.tx.borrow(), SignalState::Ready(_))
    }

    /// Wait until the build settles
    pub async fn wait(&self) -> Option<Arc<Vec<String>>> {
        let mut rx = self.tx.subscribe();
        let settled = rx.wait_for(|state| *state != SignalState::Pending).await.ok()?;
        match &*settled {
            SignalState::Ready(targets) => Some(Arc::clone(targets)),
            _ => None,
        }
    }
}
