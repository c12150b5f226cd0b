//! Shared fixtures for unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stratscan::models::{
    CompanyRow, ConditionNode, GroupNode, IndicatorCatalog, IndicatorRef, LogicalOperator, Node,
    ScanRequest, ScanResponse,
};
use stratscan::ScanError;
use stratscan::services::ScreenerApi;
use tokio::sync::Notify;

pub fn rows(count: usize, start: usize) -> Vec<CompanyRow> {
    (start..start + count)
        .map(|i| CompanyRow::new(format!("SYM{}", i)))
        .collect()
}

pub fn page(count: usize, start: usize) -> ScanResponse {
    ScanResponse {
        companies: rows(count, start),
    }
}

pub fn rule(key: &str) -> Node {
    Node::Rule(ConditionNode::new().with_left(IndicatorRef::select(key)))
}

/// AND[ RSI, OR[ SMA, EMA ], MACD ]
pub fn sample_tree() -> GroupNode {
    GroupNode::new(
        LogicalOperator::AND,
        vec![
            rule("RSI"),
            Node::Group(GroupNode::new(
                LogicalOperator::OR,
                vec![rule("SMA"), rule("EMA")],
            )),
            rule("MACD"),
        ],
    )
}

pub fn valid_entry() -> GroupNode {
    GroupNode::new(LogicalOperator::AND, vec![rule("RSI")])
}

pub fn empty_exit() -> GroupNode {
    GroupNode::empty(LogicalOperator::OR)
}

/// Scripted backend: replies with queued pages in order, optionally waiting
/// on a gate before answering. Records every request it sees.
pub struct StubApi {
    pages: Mutex<VecDeque<Result<ScanResponse, ScanError>>>,
    pub requests: Mutex<Vec<ScanRequest>>,
    pub calls: AtomicUsize,
    pub gate: Option<Arc<Notify>>,
    pub catalog: Option<IndicatorCatalog>,
}

impl StubApi {
    pub fn new(pages: Vec<Result<ScanResponse, ScanError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
            catalog: None,
        }
    }

    pub fn gated(pages: Vec<Result<ScanResponse, ScanError>>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(pages)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn offsets(&self) -> Vec<u32> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.offset)
            .collect()
    }
}

#[async_trait]
impl ScreenerApi for StubApi {
    async fn fetch_indicators(&self) -> Result<IndicatorCatalog, ScanError> {
        self.catalog.clone().ok_or(ScanError::Api {
            status: 503,
            message: "catalog offline".to_string(),
        })
    }

    async fn apply_filters(&self, request: &ScanRequest) -> Result<ScanResponse, ScanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ScanResponse::default()))
    }
}
