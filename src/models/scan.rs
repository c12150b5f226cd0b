//! Scan request/response payloads and the shared filter fields

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::WireNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1D")]
    Daily,
    #[serde(rename = "1W")]
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketCapCategory {
    SmallCap,
    MidCap,
    LargeCap,
}

/// Market cap selection; `All` is sent as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketCapFilter {
    #[default]
    All,
    Only(MarketCapCategory),
}

impl MarketCapFilter {
    pub fn category(&self) -> Option<MarketCapCategory> {
        match self {
            MarketCapFilter::All => None,
            MarketCapFilter::Only(category) => Some(*category),
        }
    }
}

/// Filter fields shared by every page of a scan. Percentages are kept as the
/// text the user typed and only parsed when a request is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanFilters {
    pub timeframe: Timeframe,
    pub market_cap: MarketCapFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub target_pct: String,
    pub sl_pct: String,
}

impl ScanFilters {
    pub fn target_pct_value(&self) -> Option<f64> {
        parse_percent(&self.target_pct)
    }

    pub fn sl_pct_value(&self) -> Option<f64> {
        parse_percent(&self.sl_pct)
    }
}

/// Blank or non-numeric text becomes `None`.
pub fn parse_percent(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Body of `POST /filters/apply`. `entry` and `exit` are always group nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub timeframe: Timeframe,
    pub market_cap_category: Option<MarketCapCategory>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub entry: WireNode,
    pub exit: WireNode,
    pub target_pct: Option<f64>,
    pub sl_pct: Option<f64>,
    pub limit: u32,
    pub offset: u32,
}

impl ScanRequest {
    pub fn new(filters: &ScanFilters, entry: WireNode, exit: WireNode, limit: u32, offset: u32) -> Self {
        Self {
            timeframe: filters.timeframe,
            market_cap_category: filters.market_cap.category(),
            start_date: filters.start_date,
            end_date: filters.end_date,
            entry,
            exit,
            target_pct: filters.target_pct_value(),
            sl_pct: filters.sl_pct_value(),
            limit,
            offset,
        }
    }
}

/// One matching company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRow {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl CompanyRow {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            market_cap_category: None,
            industry: None,
            date: None,
        }
    }

    /// Date portion of `date` (anything after the first space is a time).
    pub fn display_date(&self) -> &str {
        self.date
            .as_deref()
            .and_then(|date| date.split(' ').next())
            .filter(|date| !date.is_empty())
            .unwrap_or("—")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub companies: Vec<CompanyRow>,
}
