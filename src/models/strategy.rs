//! Expression tree data models for entry/exit screening strategies

use std::fmt;

use serde::{Deserialize, Serialize};

use super::indicators::IndicatorRef;

/// Logical operators for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    AND,
    OR,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::AND => f.write_str("AND"),
            LogicalOperator::OR => f.write_str("OR"),
        }
    }
}

/// Comparison operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "=")]
    Equal,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::Equal => "=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Which right-hand operand of a condition is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RightType {
    #[default]
    Value,
    Indicator,
}

/// Leaf of the expression tree: `left <operator> right`.
///
/// Both right-hand slots are kept; `right_type` decides which one counts.
/// `right_value` is the literal exactly as typed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionNode {
    #[serde(default)]
    pub left: IndicatorRef,
    #[serde(default)]
    pub operator: Comparison,
    #[serde(default)]
    pub right_type: RightType,
    #[serde(default)]
    pub right_value: String,
    #[serde(default)]
    pub right_indicator: IndicatorRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_lookback: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_lookback: Option<u32>,
}

impl ConditionNode {
    /// Empty condition: `>` against a literal, both operands unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_left(self, left: IndicatorRef) -> Self {
        Self { left, ..self }
    }

    pub fn with_operator(self, operator: Comparison) -> Self {
        Self { operator, ..self }
    }

    /// Switching to `Indicator` always starts from an unset right operand;
    /// switching to `Value` keeps whatever literal was typed before.
    pub fn with_right_type(self, right_type: RightType) -> Self {
        let right_indicator = match right_type {
            RightType::Indicator => IndicatorRef::unset(),
            RightType::Value => self.right_indicator,
        };
        Self {
            right_type,
            right_indicator,
            ..self
        }
    }

    pub fn with_right_value(self, right_value: impl Into<String>) -> Self {
        Self {
            right_value: right_value.into(),
            ..self
        }
    }

    pub fn with_right_indicator(self, right_indicator: IndicatorRef) -> Self {
        Self {
            right_indicator,
            ..self
        }
    }
}

/// Internal node: children combined with `logic`, in display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupNode {
    #[serde(default)]
    pub logic: LogicalOperator,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl GroupNode {
    pub fn new(logic: LogicalOperator, children: Vec<Node>) -> Self {
        Self { logic, children }
    }

    pub fn empty(logic: LogicalOperator) -> Self {
        Self::new(logic, Vec::new())
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of conditions anywhere below this group.
    pub fn condition_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::Rule(_) => 1,
                Node::Group(group) => group.condition_count(),
            })
            .sum()
    }
}

/// Individual condition or group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Rule(ConditionNode),
    Group(GroupNode),
}

impl Node {
    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            Node::Group(group) => Some(group),
            Node::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&ConditionNode> {
        match self {
            Node::Rule(rule) => Some(rule),
            Node::Group(_) => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Group(GroupNode::default())
    }
}

impl From<ConditionNode> for Node {
    fn from(rule: ConditionNode) -> Self {
        Node::Rule(rule)
    }
}

impl From<GroupNode> for Node {
    fn from(group: GroupNode) -> Self {
        Node::Group(group)
    }
}
