//! Canonicalization of live expression trees into the backend wire shape,
//! and the admission check run before a scan is submitted.

use crate::models::strategy::{ConditionNode, GroupNode, Node, RightType};
use crate::models::wire::{WireCondition, WireGroup, WireNode};

/// Convert any node to its wire form. Total: unset operands become empty
/// strings, empty groups become groups with no children.
pub fn to_wire(node: &Node) -> WireNode {
    match node {
        Node::Rule(rule) => WireNode::Rule(condition_to_wire(rule)),
        Node::Group(group) => WireNode::Group(group_to_wire(group)),
    }
}

/// Wire form of a tree root; always a `group` node.
pub fn serialize_tree(root: &GroupNode) -> WireNode {
    WireNode::Group(group_to_wire(root))
}

fn group_to_wire(group: &GroupNode) -> WireGroup {
    WireGroup {
        logic: group.logic,
        children: group.children.iter().map(to_wire).collect(),
    }
}

fn condition_to_wire(rule: &ConditionNode) -> WireCondition {
    // The literal is forwarded untouched; the backend rejects bad numbers.
    let right_value = match rule.right_type {
        RightType::Value => rule.right_value.clone(),
        RightType::Indicator => rule.right_indicator.key.clone(),
    };
    WireCondition {
        left: rule.left.key.clone(),
        left_lookback: rule.left_lookback.unwrap_or(0),
        operator: rule.operator,
        right_type: rule.right_type,
        right_value,
        right_lookback: rule.right_lookback.unwrap_or(0),
    }
}

/// True if any condition in the subtree has a selected left operand. The
/// right-hand side, operator and literal parseability are not checked.
pub fn has_any_valid_rule(node: &Node) -> bool {
    match node {
        Node::Rule(rule) => rule.left.is_set(),
        Node::Group(group) => group.has_any_valid_rule(),
    }
}

impl GroupNode {
    pub fn has_any_valid_rule(&self) -> bool {
        self.children.iter().any(has_any_valid_rule)
    }
}
