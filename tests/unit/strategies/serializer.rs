//! Unit tests for canonicalization and the admission check

use serde_json::json;
use stratscan::models::{
    ConditionNode, GroupNode, IndicatorRef, LogicalOperator, Node, RightType, WireNode,
};
use stratscan::strategies::editor::{add_condition, add_group, remove_node, update_rule};
use stratscan::strategies::{has_any_valid_rule, serialize_tree, to_wire};

use crate::test_utils::{rule, sample_tree};

#[test]
fn test_rule_wire_shape() {
    let node = Node::Rule(
        ConditionNode::new()
            .with_left(IndicatorRef::select("RSI").with_period(21))
            .with_right_value("30"),
    );
    let value = serde_json::to_value(to_wire(&node)).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "rule",
            "left": "RSI",
            "leftLookback": 0,
            "operator": ">",
            "rightType": "value",
            "rightValue": "30",
            "rightLookback": 0
        })
    );
}

#[test]
fn test_lookbacks_are_forwarded() {
    let mut condition = ConditionNode::new().with_left(IndicatorRef::select("SMA"));
    condition.left_lookback = Some(3);
    condition.right_lookback = Some(1);
    match to_wire(&Node::Rule(condition)) {
        WireNode::Rule(wire) => {
            assert_eq!(wire.left_lookback, 3);
            assert_eq!(wire.right_lookback, 1);
        }
        other => panic!("expected rule, got {:?}", other),
    }
}

#[test]
fn test_empty_exit_serializes_as_childless_group() {
    let value = serde_json::to_value(serialize_tree(&GroupNode::empty(LogicalOperator::OR))).unwrap();
    assert_eq!(value, json!({"type": "group", "logic": "OR", "children": []}));
}

#[test]
fn test_unset_operands_degrade_to_empty_strings() {
    let tree = add_condition(GroupNode::empty(LogicalOperator::AND), &[]);
    let tree = update_rule(tree, &[0], |r| r.with_right_type(RightType::Indicator));
    let value = serde_json::to_value(serialize_tree(&tree)).unwrap();
    assert_eq!(value["children"][0]["left"], "");
    assert_eq!(value["children"][0]["rightType"], "indicator");
    assert_eq!(value["children"][0]["rightValue"], "");
}

#[test]
fn test_nested_groups_keep_order_and_logic() {
    let value = serde_json::to_value(serialize_tree(&sample_tree())).unwrap();
    assert_eq!(value["logic"], "AND");
    assert_eq!(value["children"][0]["left"], "RSI");
    assert_eq!(value["children"][1]["type"], "group");
    assert_eq!(value["children"][1]["logic"], "OR");
    assert_eq!(value["children"][1]["children"][0]["left"], "SMA");
    assert_eq!(value["children"][1]["children"][1]["left"], "EMA");
    assert_eq!(value["children"][2]["left"], "MACD");
}

#[test]
fn test_right_indicator_key_becomes_right_value() {
    let tree = GroupNode::new(LogicalOperator::AND, vec![rule("CLOSE")]);
    let tree = update_rule(tree, &[0], |r| {
        r.with_right_value("50")
            .with_right_type(RightType::Indicator)
            .with_right_indicator(IndicatorRef::select("RSI"))
    });
    let value = serde_json::to_value(serialize_tree(&tree)).unwrap();
    assert_eq!(value["children"][0]["rightValue"], "RSI");

    // Switching back before submit sends the literal, not the stale key.
    let tree = update_rule(tree, &[0], |r| r.with_right_type(RightType::Value));
    let value = serde_json::to_value(serialize_tree(&tree)).unwrap();
    assert_eq!(value["children"][0]["rightType"], "value");
    assert_eq!(value["children"][0]["rightValue"], "50");
}

#[test]
fn test_serialize_is_total_over_editor_shapes() {
    let mut tree = GroupNode::empty(LogicalOperator::AND);
    tree = add_group(tree, &[]);
    tree = add_group(tree, &[0]);
    tree = remove_node(tree, &[0, 0]);
    tree = add_group(tree, &[0, 0]);
    tree = remove_node(tree, &[0, 0, 0]);
    let wire = serialize_tree(&tree);
    assert!(serde_json::to_string(&wire).is_ok());
}

#[test]
fn test_no_valid_rule_when_all_left_operands_unset() {
    let tree = add_group(add_condition(GroupNode::empty(LogicalOperator::AND), &[]), &[]);
    let tree = update_rule(tree, &[0], |r| r.with_right_value("10"));
    assert!(!tree.has_any_valid_rule());
    assert!(!GroupNode::empty(LogicalOperator::AND).has_any_valid_rule());
}

#[test]
fn test_nested_left_operand_makes_tree_valid() {
    let tree = add_group(add_condition(GroupNode::empty(LogicalOperator::AND), &[]), &[]);
    let tree = update_rule(tree, &[1, 0], |r| r.with_left(IndicatorRef::select("ATR")));
    assert!(tree.has_any_valid_rule());
    assert!(has_any_valid_rule(&Node::Group(tree)));
}

#[test]
fn test_incomplete_right_side_is_still_valid() {
    let condition = ConditionNode::new()
        .with_left(IndicatorRef::select("RSI"))
        .with_right_value("not a number");
    assert!(has_any_valid_rule(&Node::Rule(condition)));

    let condition = ConditionNode::new()
        .with_left(IndicatorRef::select("RSI"))
        .with_right_type(RightType::Indicator);
    assert!(has_any_valid_rule(&Node::Rule(condition)));
}
