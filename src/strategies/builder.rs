//! Top-level strategy state: the entry and exit trees, the shared scan
//! filters, and at most one open operand draft.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::draft::{write_operand, OperandDraft, OperandSide};
use super::editor;
use crate::config::EditMode;
use crate::models::indicators::IndicatorRef;
use crate::models::scan::ScanFilters;
use crate::models::strategy::{Comparison, ConditionNode, GroupNode, LogicalOperator, Node, RightType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeKind {
    Entry,
    Exit,
}

/// Saved entry/exit trees in the UI shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyTrees {
    #[serde(default)]
    pub name: String,
    pub entry: GroupNode,
    #[serde(default = "default_exit")]
    pub exit: GroupNode,
}

fn default_entry() -> GroupNode {
    GroupNode::new(LogicalOperator::AND, vec![Node::Rule(ConditionNode::new())])
}

fn default_exit() -> GroupNode {
    GroupNode::empty(LogicalOperator::OR)
}

#[derive(Debug, Clone)]
pub struct StrategyBuilder {
    pub name: String,
    pub filters: ScanFilters,
    entry: GroupNode,
    exit: GroupNode,
    edit_mode: EditMode,
    draft: Option<(TreeKind, OperandDraft)>,
}

impl StrategyBuilder {
    /// Entry starts as AND with one empty condition; exit as an empty OR.
    pub fn new(edit_mode: EditMode) -> Self {
        Self {
            name: String::new(),
            filters: ScanFilters::default(),
            entry: default_entry(),
            exit: default_exit(),
            edit_mode,
            draft: None,
        }
    }

    pub fn from_trees(trees: StrategyTrees, edit_mode: EditMode) -> Self {
        Self {
            name: trees.name,
            entry: trees.entry,
            exit: trees.exit,
            ..Self::new(edit_mode)
        }
    }

    pub fn entry(&self) -> &GroupNode {
        &self.entry
    }

    pub fn exit(&self) -> &GroupNode {
        &self.exit
    }

    pub fn tree(&self, kind: TreeKind) -> &GroupNode {
        match kind {
            TreeKind::Entry => &self.entry,
            TreeKind::Exit => &self.exit,
        }
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn trees(&self) -> StrategyTrees {
        StrategyTrees {
            name: self.name.clone(),
            entry: self.entry.clone(),
            exit: self.exit.clone(),
        }
    }

    /// Replace one root with `f(old_root)`.
    fn replace<F>(&mut self, kind: TreeKind, f: F)
    where
        F: FnOnce(GroupNode) -> GroupNode,
    {
        let slot = match kind {
            TreeKind::Entry => &mut self.entry,
            TreeKind::Exit => &mut self.exit,
        };
        let old = std::mem::take(slot);
        *slot = f(old);
    }

    /// Structural edits reshape the tree, so any open draft path is stale.
    fn structural<F>(&mut self, kind: TreeKind, f: F)
    where
        F: FnOnce(GroupNode) -> GroupNode,
    {
        if let Some((draft_kind, draft)) = self.draft.take() {
            if draft_kind == kind {
                debug!(tree = ?kind, path = ?draft.path(), "structural edit closed open draft");
            } else {
                self.draft = Some((draft_kind, draft));
            }
        }
        self.replace(kind, f);
    }

    /// Close the open draft if it sits on the condition at (`kind`, `path`)
    /// and, when given, on `side`. Used by edits that replace an operand
    /// outside the draft, which would otherwise be overwritten by the
    /// draft's snapshot on the next edit or save.
    fn close_draft_at(&mut self, kind: TreeKind, path: &[usize], side: Option<OperandSide>) {
        let stale = matches!(
            &self.draft,
            Some((draft_kind, draft))
                if *draft_kind == kind
                    && draft.path() == path
                    && side.map_or(true, |side| draft.side() == side)
        );
        if stale {
            if let Some((_, draft)) = self.draft.take() {
                debug!(tree = ?kind, path = ?draft.path(), side = ?draft.side(), "operand replaced, open draft closed");
            }
        }
    }

    fn edit_rule<F>(&mut self, kind: TreeKind, path: &[usize], f: F)
    where
        F: FnOnce(ConditionNode) -> ConditionNode,
    {
        self.replace(kind, |root| editor::update_rule(root, path, f));
    }

    pub fn add_condition(&mut self, kind: TreeKind, path: &[usize]) {
        self.structural(kind, |root| editor::add_condition(root, path));
    }

    pub fn add_group(&mut self, kind: TreeKind, path: &[usize]) {
        self.structural(kind, |root| editor::add_group(root, path));
    }

    pub fn remove_node(&mut self, kind: TreeKind, path: &[usize]) {
        if path.is_empty() {
            return;
        }
        self.structural(kind, |root| editor::remove_node(root, path));
    }

    pub fn set_logic(&mut self, kind: TreeKind, path: &[usize], logic: LogicalOperator) {
        self.replace(kind, |root| editor::set_logic(root, path, logic));
    }

    /// Arbitrary edit of one condition. May touch either operand, so an
    /// open draft on that condition is closed.
    pub fn update_rule<F>(&mut self, kind: TreeKind, path: &[usize], f: F)
    where
        F: FnOnce(ConditionNode) -> ConditionNode,
    {
        self.close_draft_at(kind, path, None);
        self.edit_rule(kind, path, f);
    }

    pub fn set_operator(&mut self, kind: TreeKind, path: &[usize], operator: Comparison) {
        self.edit_rule(kind, path, |rule| rule.with_operator(operator));
    }

    /// Switching type resets the right indicator, so a draft on it is closed.
    pub fn set_right_type(&mut self, kind: TreeKind, path: &[usize], right_type: RightType) {
        self.close_draft_at(kind, path, Some(OperandSide::Right));
        self.edit_rule(kind, path, |rule| rule.with_right_type(right_type));
    }

    pub fn set_right_value(&mut self, kind: TreeKind, path: &[usize], text: &str) {
        self.edit_rule(kind, path, |rule| rule.with_right_value(text));
    }

    /// Picking an indicator from the catalog applies at once in either mode.
    pub fn select_indicator(&mut self, kind: TreeKind, path: &[usize], side: OperandSide, key: &str) {
        self.close_draft_at(kind, path, Some(side));
        self.replace(kind, |root| write_operand(root, path, side, IndicatorRef::select(key)));
    }

    pub fn clear_indicator(&mut self, kind: TreeKind, path: &[usize], side: OperandSide) {
        self.close_draft_at(kind, path, Some(side));
        self.edit_rule(kind, path, |rule| match side {
            OperandSide::Left => {
                let left = rule.left.clone().clear();
                rule.with_left(left)
            }
            OperandSide::Right => {
                let right = rule.right_indicator.clone().clear();
                rule.with_right_indicator(right)
            }
        });
    }

    /// Open the parameter editor for one operand, closing any other draft.
    pub fn open_operand(&mut self, kind: TreeKind, path: &[usize], side: OperandSide) -> bool {
        self.draft = OperandDraft::open(self.tree(kind), path, side, self.edit_mode)
            .map(|draft| (kind, draft));
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&OperandDraft> {
        self.draft.as_ref().map(|(_, draft)| draft)
    }

    /// Returns false if no draft is open.
    pub fn edit_operand<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(IndicatorRef) -> IndicatorRef,
    {
        let Some((kind, mut draft)) = self.draft.take() else {
            return false;
        };
        self.replace(kind, |root| draft.edit(root, f));
        self.draft = Some((kind, draft));
        true
    }

    pub fn save_operand(&mut self) {
        if let Some((kind, draft)) = self.draft.take() {
            self.replace(kind, |root| draft.save(root));
        }
    }

    pub fn cancel_operand(&mut self) {
        if let Some((kind, draft)) = self.draft.take() {
            self.replace(kind, |root| draft.cancel(root));
        }
    }
}

impl Default for StrategyBuilder {
    fn default() -> Self {
        Self::new(EditMode::default())
    }
}
