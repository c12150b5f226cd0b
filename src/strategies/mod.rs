//! Strategy trees: path editing, operand drafts, canonicalization.

pub mod builder;
pub mod draft;
pub mod editor;
pub mod serializer;

pub use builder::{StrategyBuilder, StrategyTrees, TreeKind};
pub use draft::{OperandDraft, OperandSide};
pub use serializer::{has_any_valid_rule, serialize_tree, to_wire};
