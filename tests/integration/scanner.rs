//! Paged scans driven end-to-end over HTTP.

use stratscan::config::EditMode;
use stratscan::core::SessionState;
use stratscan::models::{LogicalOperator, Timeframe};
use stratscan::strategies::{OperandSide, StrategyBuilder, TreeKind};

use crate::test_utils::{mock_page, mock_page_failure, TestApp};

fn momentum_strategy() -> StrategyBuilder {
    let mut strategy = StrategyBuilder::new(EditMode::Immediate);
    strategy.select_indicator(TreeKind::Entry, &[0], OperandSide::Left, "RSI");
    strategy.set_right_value(TreeKind::Entry, &[0], "60");
    strategy.add_group(TreeKind::Exit, &[]);
    strategy.select_indicator(TreeKind::Exit, &[0, 0], OperandSide::Left, "RSI");
    strategy.filters.timeframe = Timeframe::Weekly;
    strategy
}

#[tokio::test]
async fn follows_pages_until_short_page() {
    let app = TestApp::new().await;
    mock_page(&app.backend, 0, 50).await;
    mock_page(&app.backend, 50, 50).await;
    mock_page(&app.backend, 100, 30).await;

    let strategy = momentum_strategy();
    assert!(app.scanner.submit(&strategy).await);
    while app.scanner.has_more() {
        assert!(app.scanner.load_more(&strategy).await);
    }

    let results = app.scanner.results();
    assert_eq!(results.len(), 130);
    assert_eq!(results[0].symbol, "SYM0");
    assert_eq!(results[129].symbol, "SYM129");
    assert_eq!(app.scanner.state(), SessionState::Idle);

    let bodies = app.scan_bodies().await;
    assert_eq!(bodies.len(), 3);
    let offsets: Vec<u64> = bodies.iter().map(|b| b["offset"].as_u64().unwrap()).collect();
    assert_eq!(offsets, vec![0, 50, 100]);
    for body in &bodies {
        assert_eq!(body["limit"], 50);
        assert_eq!(body["timeframe"], "1W");
        assert_eq!(body["entry"], bodies[0]["entry"]);
        assert_eq!(body["exit"]["logic"], LogicalOperator::OR.to_string());
        assert_eq!(body["exit"]["children"][0]["children"][0]["left"], "RSI");
    }

    // Exhausted: no further request goes out.
    assert!(!app.scanner.load_more(&strategy).await);
    assert_eq!(app.scan_bodies().await.len(), 3);
}

#[tokio::test]
async fn failed_continuation_keeps_results_and_shows_body() {
    let app = TestApp::new().await;
    mock_page(&app.backend, 0, 50).await;
    mock_page_failure(&app.backend, 50, 503, "matching engine overloaded").await;

    let strategy = momentum_strategy();
    app.scanner.submit(&strategy).await;
    app.scanner.load_more(&strategy).await;

    assert_eq!(app.scanner.state(), SessionState::Error);
    assert_eq!(
        app.scanner.last_error().as_deref(),
        Some("matching engine overloaded")
    );
    assert_eq!(app.scanner.results().len(), 50);
    assert!(app.scanner.has_more());
}

#[tokio::test]
async fn resubmit_restarts_from_first_page() {
    let app = TestApp::new().await;
    mock_page(&app.backend, 0, 50).await;
    mock_page(&app.backend, 50, 10).await;

    let strategy = momentum_strategy();
    app.scanner.submit(&strategy).await;
    app.scanner.load_more(&strategy).await;
    assert_eq!(app.scanner.results().len(), 60);

    app.scanner.submit(&strategy).await;
    assert_eq!(app.scanner.results().len(), 50);
    assert!(app.scanner.has_more());

    let offsets: Vec<u64> = app
        .scan_bodies()
        .await
        .iter()
        .map(|b| b["offset"].as_u64().unwrap())
        .collect();
    assert_eq!(offsets, vec![0, 50, 0]);
}

#[tokio::test]
async fn rejected_strategy_never_reaches_backend() {
    let app = TestApp::new().await;
    mock_page(&app.backend, 0, 50).await;

    let strategy = StrategyBuilder::new(EditMode::Commit);
    assert!(!app.scanner.submit(&strategy).await);
    assert_eq!(app.scanner.state(), SessionState::Error);
    assert!(app.scan_bodies().await.is_empty());
}
