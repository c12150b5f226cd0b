//! Backend wire shape of an expression tree

use serde::{Deserialize, Serialize};

use super::strategy::{Comparison, LogicalOperator, RightType};

/// Flat condition record sent to the matching service. Operands are reduced
/// to bare indicator keys; `right_value` is either the literal text or the
/// right indicator's key depending on `right_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCondition {
    pub left: String,
    pub left_lookback: u32,
    pub operator: Comparison,
    pub right_type: RightType,
    pub right_value: String,
    pub right_lookback: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireGroup {
    pub logic: LogicalOperator,
    pub children: Vec<WireNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireNode {
    Rule(WireCondition),
    Group(WireGroup),
}
