//! Unit tests for expression tree models

use stratscan::models::{
    Comparison, ConditionNode, GroupNode, IndicatorRef, LogicalOperator, Node, RightType,
};

use crate::test_utils::sample_tree;

#[test]
fn test_new_condition_defaults() {
    let rule = ConditionNode::new();
    assert_eq!(rule.operator, Comparison::GreaterThan);
    assert_eq!(rule.right_type, RightType::Value);
    assert!(!rule.left.is_set());
    assert!(!rule.right_indicator.is_set());
    assert!(rule.right_value.is_empty());
}

#[test]
fn test_switch_to_indicator_resets_right_operand() {
    let rule = ConditionNode::new()
        .with_right_type(RightType::Indicator)
        .with_right_indicator(IndicatorRef::select("SMA"))
        .with_right_type(RightType::Value)
        .with_right_type(RightType::Indicator);
    assert!(!rule.right_indicator.is_set());
}

#[test]
fn test_switch_to_value_keeps_literal() {
    let rule = ConditionNode::new()
        .with_right_value("30")
        .with_right_type(RightType::Indicator)
        .with_right_type(RightType::Value);
    assert_eq!(rule.right_value, "30");
}

#[test]
fn test_condition_count_recurses() {
    assert_eq!(sample_tree().condition_count(), 4);
    assert_eq!(GroupNode::empty(LogicalOperator::OR).condition_count(), 0);
}

#[test]
fn test_ui_shape_deserializes_with_loose_operands() {
    let json = r#"{
        "type": "group",
        "logic": "AND",
        "children": [
            {"type": "rule", "left": "RSI", "operator": "<", "rightType": "value", "rightValue": "30"},
            {"type": "group", "logic": "OR", "children": []}
        ]
    }"#;
    let node: Node = serde_json::from_str(json).unwrap();
    let group = node.as_group().unwrap();
    assert_eq!(group.children.len(), 2);
    let rule = group.children[0].as_rule().unwrap();
    assert_eq!(rule.left, IndicatorRef::select("RSI"));
    assert_eq!(rule.operator, Comparison::LessThan);
    assert!(!rule.right_indicator.is_set());
    assert!(group.children[1].as_group().unwrap().is_empty());
}
