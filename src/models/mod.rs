//! Shared data models: operands, expression trees, wire shapes, scan payloads.

pub mod indicators;
pub mod scan;
pub mod strategy;
pub mod wire;

pub use indicators::{IndicatorCatalog, IndicatorMeta, IndicatorRef, PriceSource};
pub use scan::{
    CompanyRow, MarketCapCategory, MarketCapFilter, ScanFilters, ScanRequest, ScanResponse,
    Timeframe,
};
pub use strategy::{Comparison, ConditionNode, GroupNode, LogicalOperator, Node, RightType};
pub use wire::{WireCondition, WireGroup, WireNode};
