//! Async driver wiring a [`ScanSession`] to a [`ScreenerApi`].
//!
//! The session sits behind a mutex that is only held for bookkeeping, never
//! across the network await, so triggers can be issued concurrently and the
//! session's busy flag alone decides which one runs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::session::{PendingFetch, ScanSession, ScrollPosition, SessionState};
use crate::error::ScanError;
use crate::models::scan::{CompanyRow, ScanResponse};
use crate::services::screener::ScreenerApi;
use crate::strategies::builder::StrategyBuilder;

pub struct Scanner {
    api: Arc<dyn ScreenerApi>,
    session: Arc<Mutex<ScanSession>>,
}

fn lock(session: &Mutex<ScanSession>) -> MutexGuard<'_, ScanSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the busy flag if the fetch future is dropped before completing.
struct FetchGuard<'a> {
    session: &'a Mutex<ScanSession>,
    pending: Option<PendingFetch>,
}

impl FetchGuard<'_> {
    fn finish(mut self, outcome: Result<ScanResponse, ScanError>) {
        if let Some(pending) = self.pending.take() {
            lock(self.session).complete(pending, outcome);
        }
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if self.pending.is_some() {
            lock(self.session).abandon();
        }
    }
}

impl Scanner {
    pub fn new(api: Arc<dyn ScreenerApi>) -> Self {
        Self::with_session(api, ScanSession::new())
    }

    pub fn with_session(api: Arc<dyn ScreenerApi>, session: ScanSession) -> Self {
        Self {
            api,
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Read the session under the lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&ScanSession) -> R) -> R {
        f(&lock(&self.session))
    }

    pub fn results(&self) -> Vec<CompanyRow> {
        self.inspect(|session| session.results().to_vec())
    }

    pub fn state(&self) -> SessionState {
        self.inspect(ScanSession::state)
    }

    pub fn has_more(&self) -> bool {
        self.inspect(ScanSession::has_more)
    }

    pub fn last_error(&self) -> Option<String> {
        self.inspect(|session| session.last_error().map(str::to_string))
    }

    /// Fresh scan. Returns whether a request was sent.
    pub async fn submit(&self, strategy: &StrategyBuilder) -> bool {
        let pending = lock(&self.session).begin_submit(
            strategy.entry(),
            strategy.exit(),
            &strategy.filters,
        );
        self.run(pending).await
    }

    /// Fetch the page at the current cursor. Returns whether a request was sent.
    pub async fn load_more(&self, strategy: &StrategyBuilder) -> bool {
        let pending = lock(&self.session).begin_next_page(
            strategy.entry(),
            strategy.exit(),
            &strategy.filters,
        );
        self.run(pending).await
    }

    /// Scroll signal from the results view.
    pub async fn on_scroll(&self, position: ScrollPosition, strategy: &StrategyBuilder) -> bool {
        if !self.inspect(|session| session.should_load_more(position)) {
            return false;
        }
        self.load_more(strategy).await
    }

    async fn run(&self, pending: Option<PendingFetch>) -> bool {
        let Some(pending) = pending else {
            return false;
        };
        debug!(offset = pending.offset(), fresh = pending.is_fresh(), "sending scan request");
        let request = pending.request.clone();
        let guard = FetchGuard {
            session: &self.session,
            pending: Some(pending),
        };
        let outcome = self.api.apply_filters(&request).await;
        guard.finish(outcome);
        true
    }
}
