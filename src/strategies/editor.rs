//! Path-addressed edits over expression trees.
//!
//! A path is a sequence of child indices from the root (empty = the root).
//! Every edit consumes the old root and returns a new one; only the nodes on
//! the root-to-target path are rebuilt, untouched siblings are moved across
//! as they are. Paths come from the current tree shape and must not be
//! reused after a structural edit.

use tracing::warn;

use crate::models::strategy::{ConditionNode, GroupNode, LogicalOperator, Node};

/// Apply `f` to the node at `path` and rebuild the path up to `node`.
///
/// An index past the end of a group, or a path that descends into a
/// condition, violates the caller's precondition: debug builds panic,
/// release builds log and return the tree unchanged.
pub fn update_node<F>(node: Node, path: &[usize], f: F) -> Node
where
    F: FnOnce(Node) -> Node,
{
    let Some((&index, rest)) = path.split_first() else {
        return f(node);
    };

    match node {
        Node::Group(group) => Node::Group(update_child(group, index, rest, f)),
        Node::Rule(rule) => {
            debug_assert!(false, "path descends into a condition at index {}", index);
            warn!(index, "path descends into a condition, edit ignored");
            Node::Rule(rule)
        }
    }
}

fn update_child<F>(mut group: GroupNode, index: usize, rest: &[usize], f: F) -> GroupNode
where
    F: FnOnce(Node) -> Node,
{
    if index < group.children.len() {
        let child = std::mem::take(&mut group.children[index]);
        group.children[index] = update_node(child, rest, f);
    } else {
        debug_assert!(
            false,
            "path index {} out of range for group with {} children",
            index,
            group.children.len()
        );
        warn!(index, len = group.children.len(), "path index out of range, edit ignored");
    }
    group
}

/// Apply `f` to the group at `path`. A path addressing a condition is left alone.
pub fn update_group<F>(root: GroupNode, path: &[usize], f: F) -> GroupNode
where
    F: FnOnce(GroupNode) -> GroupNode,
{
    let Some((&index, rest)) = path.split_first() else {
        return f(root);
    };
    update_child(root, index, rest, |node| match node {
        Node::Group(group) => Node::Group(f(group)),
        rule @ Node::Rule(_) => {
            warn!(?path, "expected a group at path, found a condition");
            rule
        }
    })
}

/// Apply `f` to the condition at `path`. A path addressing a group is left alone.
pub fn update_rule<F>(root: GroupNode, path: &[usize], f: F) -> GroupNode
where
    F: FnOnce(ConditionNode) -> ConditionNode,
{
    let Some((&index, rest)) = path.split_first() else {
        warn!("expected a condition, the root is a group");
        return root;
    };
    update_child(root, index, rest, |node| match node {
        Node::Rule(rule) => Node::Rule(f(rule)),
        group @ Node::Group(_) => {
            warn!(?path, "expected a condition at path, found a group");
            group
        }
    })
}

/// Append an empty condition to the group at `path`.
pub fn add_condition(root: GroupNode, path: &[usize]) -> GroupNode {
    update_group(root, path, |group| group.with_child(Node::Rule(ConditionNode::new())))
}

/// Append a nested OR group, seeded with one empty condition, to the group at `path`.
pub fn add_group(root: GroupNode, path: &[usize]) -> GroupNode {
    update_group(root, path, |group| {
        let nested = GroupNode::new(LogicalOperator::OR, vec![Node::Rule(ConditionNode::new())]);
        group.with_child(Node::Group(nested))
    })
}

/// Remove the node at `path` from its parent. The root cannot be removed;
/// an empty path returns the tree unchanged.
pub fn remove_node(root: GroupNode, path: &[usize]) -> GroupNode {
    let Some((&index, parent_path)) = path.split_last() else {
        return root;
    };
    update_group(root, parent_path, |mut group| {
        if index < group.children.len() {
            group.children.remove(index);
        } else {
            debug_assert!(false, "remove index {} out of range", index);
            warn!(index, "remove index out of range, edit ignored");
        }
        group
    })
}

pub fn set_logic(root: GroupNode, path: &[usize], logic: LogicalOperator) -> GroupNode {
    update_group(root, path, |group| GroupNode { logic, ..group })
}

/// Read-only lookup of the node at a non-empty `path`.
pub fn node_at<'a>(root: &'a GroupNode, path: &[usize]) -> Option<&'a Node> {
    let (&first, rest) = path.split_first()?;
    let mut node = root.children.get(first)?;
    for &index in rest {
        node = node.as_group()?.children.get(index)?;
    }
    Some(node)
}

/// Read-only lookup of the group at `path` (the root for an empty path).
pub fn group_at<'a>(root: &'a GroupNode, path: &[usize]) -> Option<&'a GroupNode> {
    if path.is_empty() {
        return Some(root);
    }
    node_at(root, path)?.as_group()
}

/// Paths of every condition in display order.
pub fn condition_paths(root: &GroupNode) -> Vec<Vec<usize>> {
    fn walk(group: &GroupNode, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        for (index, child) in group.children.iter().enumerate() {
            prefix.push(index);
            match child {
                Node::Rule(_) => out.push(prefix.clone()),
                Node::Group(nested) => walk(nested, prefix, out),
            }
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(root, &mut Vec::new(), &mut out);
    out
}
