use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Cooperative cancellation flag shared by every download of a session.
///
/// Downloads capture the current token when they start and poll it between batches.
/// [`StopSignal::clear`] installs a fresh token so downloads started afterwards run again.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    token: Arc<Mutex<CancellationToken>>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn stop(&self) {
        self.token().cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token().is_cancelled()
    }

    pub fn clear(&self) {
        let mut token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *token = CancellationToken::new();
    }
}
