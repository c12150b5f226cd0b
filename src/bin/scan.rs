//! Stratscan demo runner
//!
//! Loads the indicator catalog, builds a strategy (default or from
//! `STRATEGY_FILE`), submits it and follows pages until the backend runs out
//! or `SCAN_MAX_PAGES` is reached.

use std::env;
use std::fs;
use std::sync::Arc;

use dotenvy::dotenv;
use stratscan::config::ScreenerConfig;
use stratscan::core::{ScanSession, Scanner};
use stratscan::logging;
use stratscan::models::CompanyRow;
use stratscan::services::{load_catalog, HttpScreenerClient, ScreenerApi};
use stratscan::strategies::{OperandSide, StrategyBuilder, StrategyTrees, TreeKind};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = ScreenerConfig::from_env()?;
    let max_pages: usize = env::var("SCAN_MAX_PAGES")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3);

    let env = stratscan::config::get_environment();
    info!(environment = %env, "Starting stratscan");
    info!(api = %config.base_url(), edit_mode = ?config.edit_mode, "Screener API");

    let api: Arc<dyn ScreenerApi> = Arc::new(HttpScreenerClient::new(&config));
    let catalog = load_catalog(api.as_ref()).await;

    let strategy = match env::var("STRATEGY_FILE") {
        Ok(path) => {
            info!(path = %path, "Loading strategy trees");
            let trees: StrategyTrees = serde_json::from_str(&fs::read_to_string(&path)?)?;
            let mut strategy = StrategyBuilder::from_trees(trees, config.edit_mode);
            if strategy.name.is_empty() {
                strategy.name = path;
            }
            strategy
        }
        Err(_) => {
            let mut strategy = StrategyBuilder::new(config.edit_mode);
            strategy.name = "default".to_string();
            match catalog.keys().next() {
                Some(key) => {
                    strategy.select_indicator(TreeKind::Entry, &[0], OperandSide::Left, key);
                    strategy.set_right_value(TreeKind::Entry, &[0], "0");
                }
                None => warn!("Catalog is empty and no STRATEGY_FILE set; scan will be rejected"),
            }
            strategy
        }
    };

    let scanner = Scanner::with_session(api, ScanSession::with_page_size(config.page_size));
    info!(
        strategy = %strategy.name,
        conditions = strategy.entry().condition_count(),
        "Submitting scan"
    );
    scanner.submit(&strategy).await;
    let mut pages = 1;
    while scanner.last_error().is_none() && scanner.has_more() && pages < max_pages {
        scanner.load_more(&strategy).await;
        pages += 1;
    }

    if let Some(message) = scanner.last_error() {
        error!(error = %message, "Scan failed");
    }

    let results = scanner.results();
    println!("{} ({} results)", strategy.name, results.len());
    for row in &results {
        print_row(row);
    }
    if scanner.has_more() {
        println!("  ... more results available");
    }

    Ok(())
}

fn print_row(row: &CompanyRow) {
    println!(
        "  {:<12} {:<10} {:<24} {}",
        row.symbol,
        row.market_cap_category.as_deref().unwrap_or("—"),
        row.industry.as_deref().unwrap_or("—"),
        row.display_date()
    );
}
