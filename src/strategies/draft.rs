//! Editing one indicator operand of a condition, either straight into the
//! tree or through a scratch copy that is only written back on save.

use tracing::debug;

use super::editor::{node_at, update_rule};
use crate::config::EditMode;
use crate::models::indicators::IndicatorRef;
use crate::models::strategy::{GroupNode, RightType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    Left,
    Right,
}

/// Open edit on the operand at (`path`, `side`).
///
/// The draft remembers its path, so it is only valid while the tree keeps
/// its shape; structural edits must close it first.
#[derive(Debug, Clone, PartialEq)]
pub struct OperandDraft {
    path: Vec<usize>,
    side: OperandSide,
    mode: EditMode,
    original: IndicatorRef,
    draft: IndicatorRef,
}

impl OperandDraft {
    /// Returns `None` if `path` does not address a condition, or if the right
    /// side is requested while the condition compares against a literal.
    pub fn open(root: &GroupNode, path: &[usize], side: OperandSide, mode: EditMode) -> Option<Self> {
        let rule = node_at(root, path)?.as_rule()?;
        let operand = match side {
            OperandSide::Left => &rule.left,
            OperandSide::Right if rule.right_type == RightType::Indicator => &rule.right_indicator,
            OperandSide::Right => return None,
        };
        Some(Self {
            path: path.to_vec(),
            side,
            mode,
            original: operand.clone(),
            draft: operand.clone(),
        })
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn side(&self) -> OperandSide {
        self.side
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Operand as currently shown in the editor.
    pub fn current(&self) -> &IndicatorRef {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    /// Apply one field change. In immediate mode the change is written to
    /// `root` right away; in commit mode `root` comes back untouched.
    pub fn edit<F>(&mut self, root: GroupNode, f: F) -> GroupNode
    where
        F: FnOnce(IndicatorRef) -> IndicatorRef,
    {
        self.draft = f(std::mem::take(&mut self.draft));
        match self.mode {
            EditMode::Immediate => write_operand(root, &self.path, self.side, self.draft.clone()),
            EditMode::Commit => root,
        }
    }

    pub fn save(self, root: GroupNode) -> GroupNode {
        match self.mode {
            EditMode::Immediate => root,
            EditMode::Commit => {
                debug!(path = ?self.path, side = ?self.side, key = %self.draft.key, "saving operand draft");
                write_operand(root, &self.path, self.side, self.draft)
            }
        }
    }

    /// Close without saving. Immediate-mode edits are already in the tree
    /// and stay there.
    pub fn cancel(self, root: GroupNode) -> GroupNode {
        debug!(path = ?self.path, dirty = self.is_dirty(), "discarding operand draft");
        root
    }
}

/// Replace one operand of the condition at `path`.
pub fn write_operand(root: GroupNode, path: &[usize], side: OperandSide, operand: IndicatorRef) -> GroupNode {
    update_rule(root, path, |rule| match side {
        OperandSide::Left => rule.with_left(operand),
        OperandSide::Right => rule.with_right_indicator(operand),
    })
}
