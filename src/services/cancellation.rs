use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Cancellation signal shared by every request of one search
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the token to the cancelled state. Returns `true` only for the
    /// call that performed the transition.
    pub fn cancel(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.inner.cancel();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    pub fn check(&self) -> AppResult<()> {
        if self.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Runs `request` unless the token fires first.
    ///
    /// An in-flight request is dropped the moment the token is cancelled and
    /// its output is never observed.
    pub async fn guard<F, T>(&self, request: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.check()?;

        tokio::select! {
            biased;
            _ = self.inner.cancelled() => Err(AppError::Cancelled),
            result = request => {
                self.check()?;
                result
            }
        }
    }
}

#[derive(Debug)]
struct ActiveSearch {
    id: Uuid,
    token: CancelToken,
}

/// Owns the single active-search slot
///
/// Beginning a search cancels whichever one is still running.
#[derive(Debug, Default)]
pub struct SearchController {
    active: Mutex<Option<ActiveSearch>>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<ActiveSearch>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a new search and returns its handle. Any search still active
    /// is cancelled first.
    pub fn begin(&self) -> SearchHandle<'_> {
        let id = Uuid::new_v4();
        let token = CancelToken::new();

        let previous = self.slot().replace(ActiveSearch {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            tracing::info!(search_id = %previous.id, "Superseding active search");
            previous.token.cancel();
        }

        SearchHandle {
            controller: self,
            id,
            token,
        }
    }

    /// Cancels the active search. Returns `false` when nothing was running.
    pub fn cancel(&self) -> bool {
        let active = self.slot().take();
        match active {
            Some(active) => {
                tracing::info!(search_id = %active.id, "Cancelling active search");
                active.token.cancel()
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot().is_some()
    }
}

/// A running search. Dropping it releases the slot (if still owned).
#[derive(Debug)]
pub struct SearchHandle<'a> {
    controller: &'a SearchController,
    id: Uuid,
    token: CancelToken,
}

impl SearchHandle<'_> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Releases the slot and reports whether the search was cancelled before
    /// it could finish.
    ///
    /// Runs under the slot lock, so a `cancel()` racing with completion either
    /// lands first (and this returns `true`) or finds no active search.
    pub fn finish(self) -> bool {
        self.release()
    }

    fn release(&self) -> bool {
        let mut slot = self.controller.slot();
        if slot.as_ref().is_some_and(|active| active.id == self.id) {
            *slot = None;
            return self.token.is_cancelled();
        }
        // whoever took the slot cancelled this search
        true
    }
}

impl Drop for SearchHandle<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
