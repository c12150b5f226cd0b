//! Environment-driven configuration for the screener client

use std::env;
use std::str::FromStr;

use url::Url;

use crate::error::ConfigError;

/// Rows requested per page; a shorter page means the result set is exhausted.
pub const PAGE_SIZE: u32 = 50;

/// Distance from the bottom of the result list (in px) that counts as "near the end".
pub const SCROLL_THRESHOLD_PX: f64 = 80.0;

/// Default lookback window for a freshly selected indicator.
pub const DEFAULT_PERIOD: u32 = 14;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Current deployment environment (`APP_ENV`), lowercased. Defaults to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .map(|v| v.to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}

/// How operand edits reach the expression tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Every field change is written to the tree as it happens.
    Immediate,
    /// Field changes accumulate in a scratch copy until saved.
    #[default]
    Commit,
}

impl FromStr for EditMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "immediate" => Ok(EditMode::Immediate),
            "commit" => Ok(EditMode::Commit),
            other => Err(ConfigError::InvalidEditMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    pub api_base_url: Url,
    pub edit_mode: EditMode,
    pub page_size: u32,
}

impl ScreenerConfig {
    /// Build from `SCREENER_API_URL` and `SCREENER_EDIT_MODE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = env::var("SCREENER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let edit_mode = match env::var("SCREENER_EDIT_MODE") {
            Ok(mode) => mode.parse()?,
            Err(_) => EditMode::default(),
        };
        Self::new(&raw_url, edit_mode)
    }

    pub fn new(api_base_url: &str, edit_mode: EditMode) -> Result<Self, ConfigError> {
        let parsed = Url::parse(api_base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", api_base_url, e)))?;
        Ok(Self {
            api_base_url: parsed,
            edit_mode,
            page_size: PAGE_SIZE,
        })
    }

    /// Base URL as text, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.as_str().trim_end_matches('/')
    }

    pub fn indicators_endpoint(&self) -> String {
        format!("{}/metadata/indicators", self.base_url())
    }

    pub fn apply_filters_endpoint(&self) -> String {
        format!("{}/filters/apply", self.base_url())
    }
}
