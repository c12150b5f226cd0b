//! Indicator operands and the indicator metadata catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PERIOD;

/// OHLCV field an indicator is sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    Volume,
}

impl PriceSource {
    pub fn all() -> [PriceSource; 5] {
        [
            PriceSource::Open,
            PriceSource::High,
            PriceSource::Low,
            PriceSource::Close,
            PriceSource::Volume,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::Open => "open",
            PriceSource::High => "high",
            PriceSource::Low => "low",
            PriceSource::Close => "close",
            PriceSource::Volume => "volume",
        }
    }
}

impl FromStr for PriceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceSource::all()
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown price source: {}", s))
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operand of a condition: a named indicator with its sampling parameters.
/// An empty `key` means nothing has been selected yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndicatorRefRepr")]
pub struct IndicatorRef {
    pub key: String,
    pub source: PriceSource,
    pub period: u32,
    pub offset: u32,
}

impl IndicatorRef {
    pub fn unset() -> Self {
        Self {
            key: String::new(),
            source: PriceSource::default(),
            period: DEFAULT_PERIOD,
            offset: 0,
        }
    }

    /// Operand as it looks right after picking `key` from the catalog.
    pub fn select(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::unset()
        }
    }

    /// Drop the selected indicator but keep the sampling parameters.
    pub fn clear(self) -> Self {
        Self {
            key: String::new(),
            ..self
        }
    }

    pub fn is_set(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn with_source(self, source: PriceSource) -> Self {
        Self { source, ..self }
    }

    /// Zero is not a valid lookback and is ignored.
    pub fn with_period(self, period: u32) -> Self {
        if period == 0 {
            return self;
        }
        Self { period, ..self }
    }

    pub fn with_offset(self, offset: u32) -> Self {
        Self { offset, ..self }
    }
}

impl Default for IndicatorRef {
    fn default() -> Self {
        Self::unset()
    }
}

/// Shapes an operand may arrive in from saved UI state: a bare key, `null`,
/// or an object carrying any subset of the fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum IndicatorRefRepr {
    Missing(()),
    Key(String),
    Fields {
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        period: Option<u32>,
        #[serde(default)]
        offset: Option<u32>,
    },
}

impl From<IndicatorRefRepr> for IndicatorRef {
    fn from(repr: IndicatorRefRepr) -> Self {
        match repr {
            IndicatorRefRepr::Missing(()) => IndicatorRef::unset(),
            IndicatorRefRepr::Key(key) => IndicatorRef::select(key),
            IndicatorRefRepr::Fields {
                key,
                source,
                period,
                offset,
            } => IndicatorRef {
                key: key.unwrap_or_default(),
                source: source
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
                period: period.filter(|p| *p > 0).unwrap_or(DEFAULT_PERIOD),
                offset: offset.unwrap_or(0),
            },
        }
    }
}

/// Catalog entry describing an indicator the backend knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorMeta {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Indicator metadata fetched once per session. Used only for labels and the
/// selection list; an empty catalog still lets selectors show raw keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorCatalog {
    #[serde(default)]
    pub indicators: Vec<IndicatorMeta>,
}

impl IndicatorCatalog {
    pub fn new(indicators: Vec<IndicatorMeta>) -> Self {
        Self { indicators }
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn get(&self, key: &str) -> Option<&IndicatorMeta> {
        self.indicators.iter().find(|meta| meta.key == key)
    }

    /// Display label for `key`, falling back to the key itself.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key)
            .and_then(|meta| meta.label.as_deref())
            .unwrap_or(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.indicators.iter().map(|meta| meta.key.as_str())
    }
}
