//! Scan session state machine.
//!
//! `Idle -> Fetching -> {Idle, Error}`, re-entrant from `Idle` and `Error`.
//! The session does no I/O: `begin_*` decide whether a fetch may start and
//! build its request, `complete` applies the outcome. At most one fetch is
//! in flight; triggers arriving while busy are dropped, not queued.

use tracing::{debug, info, warn};

use crate::config::{PAGE_SIZE, SCROLL_THRESHOLD_PX};
use crate::error::ScanError;
use crate::models::scan::{CompanyRow, ScanFilters, ScanRequest, ScanResponse};
use crate::models::strategy::GroupNode;
use crate::strategies::serializer::serialize_tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Fetching,
    Error,
}

/// Scroll metrics of the results view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub fn distance_from_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    pub fn is_near_bottom(&self) -> bool {
        self.distance_from_bottom() <= SCROLL_THRESHOLD_PX
    }
}

/// A fetch the session has agreed to start. Hand it back to
/// [`ScanSession::complete`] together with the transport outcome.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub request: ScanRequest,
    fresh: bool,
    generation: u64,
}

impl PendingFetch {
    pub fn offset(&self) -> u32 {
        self.request.offset
    }

    /// True for the first page of a new submission.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }
}

#[derive(Debug, Clone)]
pub struct ScanSession {
    results: Vec<CompanyRow>,
    cursor: u32,
    has_more: bool,
    state: SessionState,
    last_error: Option<String>,
    page_size: u32,
    /// Stamp of the fetch currently in flight; bumped on every start.
    generation: u64,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            results: Vec::new(),
            cursor: 0,
            has_more: true,
            state: SessionState::Idle,
            last_error: None,
            page_size: page_size.max(1),
            generation: 0,
        }
    }

    pub fn results(&self) -> &[CompanyRow] {
        &self.results
    }

    /// Offset the next continuation page will be requested at.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::Fetching
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Start a fresh scan from offset 0, discarding accumulated results.
    ///
    /// Returns `None` while a fetch is outstanding, or when the entry tree
    /// has no condition with a selected left operand (the session moves to
    /// `Error` and keeps its results).
    pub fn begin_submit(
        &mut self,
        entry: &GroupNode,
        exit: &GroupNode,
        filters: &ScanFilters,
    ) -> Option<PendingFetch> {
        if self.is_busy() {
            debug!("submit ignored, fetch already in flight");
            return None;
        }
        if !self.admit(entry) {
            return None;
        }

        self.results.clear();
        self.cursor = 0;
        self.has_more = true;
        Some(self.start(entry, exit, filters, 0, true))
    }

    /// Request the page at the current cursor, keeping accumulated results.
    pub fn begin_next_page(
        &mut self,
        entry: &GroupNode,
        exit: &GroupNode,
        filters: &ScanFilters,
    ) -> Option<PendingFetch> {
        if self.is_busy() {
            debug!(cursor = self.cursor, "next page ignored, fetch already in flight");
            return None;
        }
        if !self.has_more {
            debug!(cursor = self.cursor, "next page ignored, results exhausted");
            return None;
        }
        if !self.admit(entry) {
            return None;
        }

        Some(self.start(entry, exit, filters, self.cursor, false))
    }

    fn admit(&mut self, entry: &GroupNode) -> bool {
        if entry.has_any_valid_rule() {
            return true;
        }
        let error = ScanError::Validation;
        warn!(error = %error, "scan rejected before request");
        self.last_error = Some(error.user_message());
        self.state = SessionState::Error;
        false
    }

    fn start(
        &mut self,
        entry: &GroupNode,
        exit: &GroupNode,
        filters: &ScanFilters,
        offset: u32,
        fresh: bool,
    ) -> PendingFetch {
        self.state = SessionState::Fetching;
        self.last_error = None;
        self.generation += 1;
        let request = ScanRequest::new(
            filters,
            serialize_tree(entry),
            serialize_tree(exit),
            self.page_size,
            offset,
        );
        PendingFetch {
            request,
            fresh,
            generation: self.generation,
        }
    }

    /// Apply the outcome of `pending` and leave the busy state.
    ///
    /// Outcomes of a fetch that is no longer the one in flight (abandoned,
    /// or superseded by a later start) are dropped without touching the
    /// session. Errors keep whatever results were already accumulated.
    pub fn complete(&mut self, pending: PendingFetch, outcome: Result<ScanResponse, ScanError>) {
        if !self.is_busy() || pending.generation != self.generation {
            debug!(
                offset = pending.offset(),
                generation = pending.generation,
                current = self.generation,
                "outcome of superseded fetch ignored"
            );
            return;
        }
        match outcome {
            Ok(response) => {
                let rows = response.companies;
                let received = rows.len();
                if pending.fresh {
                    self.results = rows;
                } else {
                    self.results.extend(rows);
                }
                self.has_more = received >= self.page_size as usize;
                if self.has_more {
                    self.cursor = pending.offset() + self.page_size;
                }
                self.last_error = None;
                self.state = SessionState::Idle;
                info!(
                    offset = pending.offset(),
                    rows = received,
                    total = self.results.len(),
                    has_more = self.has_more,
                    "scan page applied"
                );
            }
            Err(error) => {
                self.last_error = Some(error.user_message());
                self.state = SessionState::Error;
                warn!(offset = pending.offset(), error = %error, "scan page failed");
            }
        }
    }

    /// Leave the busy state without an outcome, for a fetch that was
    /// dropped before it finished.
    pub fn abandon(&mut self) {
        if self.is_busy() {
            debug!(cursor = self.cursor, "in-flight fetch abandoned");
            self.state = SessionState::Idle;
        }
    }

    /// Whether a scroll at `position` should trigger the next page.
    pub fn should_load_more(&self, position: ScrollPosition) -> bool {
        position.is_near_bottom() && self.has_more && !self.is_busy()
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}
