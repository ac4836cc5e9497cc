//! Constant folding of static subtrees.
//!
//! Each node family implements [`Fold`]: it knows how to build a literal
//! node from a cached value and how to hand each of its child slots to the
//! [`ConstantFolder`]. The folder replaces a static slot with its literal in
//! place. Trees own their children, so every slot is visited exactly once
//! and no node is shared between two parents.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::OptimiserConfig;
use crate::analysis::all_descendants_static;
use crate::ludeme::Function;

/// A node family that can be folded.
pub trait Fold: Function + Sized {
    /// Whether the node is already a literal.
    fn is_constant(&self) -> bool;

    /// Value cached during preprocessing, if any.
    fn cached_value(&self) -> Option<&Self::Output>;

    /// Literal node carrying `value`, or `None` if the family has no literals.
    fn constant(value: Self::Output) -> Option<Self>;

    /// Pass every child slot to the folder.
    fn fold_children(&mut self, folder: &mut ConstantFolder);
}

/// Outcome of a folding pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldReport {
    /// Static subtrees replaced by literals.
    pub replaced: usize,
    /// Static subtrees left alone because they had no cached value.
    pub uncached: usize,
    /// Static nodes with a non-static descendant; never folded.
    pub violations: Vec<String>,
}

impl FoldReport {
    /// Whether the pass changed nothing.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.replaced == 0
    }

    pub(crate) fn merge(&mut self, other: FoldReport) {
        self.replaced += other.replaced;
        self.uncached += other.uncached;
        self.violations.extend(other.violations);
    }
}

/// Walks child slots and replaces static subtrees with literals.
#[derive(Debug)]
pub struct ConstantFolder {
    config: OptimiserConfig,
    report: FoldReport,
}

impl ConstantFolder {
    #[must_use]
    pub fn new(config: OptimiserConfig) -> Self {
        Self {
            config,
            report: FoldReport::default(),
        }
    }

    /// Fold one slot, replacing it if it is static, recursing otherwise.
    pub fn visit<T: Fold>(&mut self, slot: &mut T) {
        if slot.is_constant() {
            return;
        }
        if !slot.is_static() {
            slot.fold_children(self);
            return;
        }
        if self.config.verify_static_descendants && !all_descendants_static(&*slot) {
            let message = format!(
                "`{}` is flagged static but has a non-static descendant",
                slot.name()
            );
            warn!(%message, "static subtree left unfolded");
            self.report.violations.push(message);
            slot.fold_children(self);
            return;
        }

        match slot.cached_value().cloned().and_then(T::constant) {
            Some(literal) => {
                if self.config.log_replacements {
                    debug!(ludeme = slot.name(), value = ?slot.cached_value(), "folded static subtree");
                }
                *slot = literal;
                self.report.replaced += 1;
            }
            None => {
                self.report.uncached += 1;
                slot.fold_children(self);
            }
        }
    }

    /// Consume the folder and return what it did.
    #[must_use]
    pub fn finish(self) -> FoldReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameMetadata;
    use crate::ludeme::{IntFunction, IntKind, Ludeme};
    use std::sync::Arc;

    fn c(value: i32) -> IntFunction {
        IntFunction::constant(value)
    }

    #[test]
    fn test_folds_static_child_in_place() {
        let game = Arc::new(GameMetadata::builder("Test", 2).build().unwrap());
        let mut tree = IntFunction::add([IntFunction::mover(), IntFunction::mul([c(2), c(3)])]);
        tree.preprocess(&game);

        let mut folder = ConstantFolder::new(OptimiserConfig::default());
        folder.visit(&mut tree);
        let report = folder.finish();

        assert_eq!(report.replaced, 1);
        let IntKind::Add(items) = tree.kind() else {
            panic!("root should stay an add");
        };
        assert!(matches!(items[1].kind(), IntKind::Constant(6)));
    }

    #[test]
    fn test_unpreprocessed_tree_is_left_alone() {
        let mut tree = IntFunction::abs(c(-3));
        let mut folder = ConstantFolder::new(OptimiserConfig::default());
        folder.visit(&mut tree);

        let report = folder.finish();
        assert_eq!(report.replaced, 0);
        assert_eq!(report.uncached, 1);
        assert!(matches!(tree.kind(), IntKind::Abs(_)));
    }

    #[test]
    fn test_report_merge() {
        let mut a = FoldReport {
            replaced: 1,
            ..FoldReport::default()
        };
        a.merge(FoldReport {
            replaced: 2,
            uncached: 1,
            violations: vec!["x".into()],
        });
        assert_eq!(a.replaced, 3);
        assert_eq!(a.uncached, 1);
        assert!(!a.is_unchanged());
    }
}
