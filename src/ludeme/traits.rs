//! The contract every rule node implements.
//!
//! [`Ludeme`] is the object-safe half: structure, static summaries,
//! diagnostics and preprocessing. Analysis passes walk trees through
//! `&dyn Ludeme` without knowing node kinds. [`Function`] adds evaluation
//! with a per-kind output type, so a boolean node cannot be asked for a
//! region.
//!
//! Each summary is the node's own contribution combined with its children's,
//! so node kinds only describe themselves and the recursion lives here.

use std::fmt;
use std::sync::Arc;

use super::cache::NodeCache;
use super::flags::{ConceptSet, GameFlags};
use super::value::ValueKind;
use crate::analysis::Diagnostics;
use crate::context::{Context, RegisterEffects, RegisterSet};
use crate::core::GameMetadata;

/// A rule node.
pub trait Ludeme: fmt::Debug + Send + Sync {
    /// Rule-language keyword of this node.
    fn name(&self) -> &'static str;

    /// Kind of value the node evaluates to.
    fn value_kind(&self) -> ValueKind;

    /// Visit direct children in declaration order.
    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn Ludeme));

    // === Own contributions ===

    /// Whether this node alone, ignoring children, depends only on static
    /// inputs (constants, board topology, player count).
    fn own_static(&self) -> bool {
        true
    }

    /// Capabilities needed by this node alone.
    fn own_flags(&self, _game: &GameMetadata) -> GameFlags {
        GameFlags::empty()
    }

    /// Concepts expressed by this node alone.
    fn own_concepts(&self, _game: &GameMetadata) -> ConceptSet {
        ConceptSet::empty()
    }

    /// Registers this node reads or binds itself.
    fn own_effects(&self) -> RegisterEffects {
        RegisterEffects::NONE
    }

    /// Check resources this node needs from the game; report what is missing.
    fn own_missing_requirement(&self, _game: &GameMetadata, _report: &mut Diagnostics) -> bool {
        false
    }

    /// Check for argument combinations that fail at runtime.
    fn own_will_crash(&self, _game: &GameMetadata, _report: &mut Diagnostics) -> bool {
        false
    }

    /// Resolve deferred defaults that depend on the game (e.g. the board's
    /// default adjacency relation).
    fn resolve_defaults(&self, _game: &GameMetadata) {}

    // === Cached summaries ===

    /// Whether the subtree evaluates to the same value in every context.
    ///
    /// Never true for a node with a non-static descendant.
    fn is_static(&self) -> bool;

    /// Registers the subtree reads and writes.
    fn effects(&self) -> RegisterEffects;

    /// One-time preparation: children first, then deferred defaults, then
    /// the cached value if the node is static. Repeated calls do nothing.
    fn preprocess(&self, game: &Arc<GameMetadata>);

    // === Recursive summaries ===

    /// Capabilities the subtree needs.
    fn game_flags(&self, game: &GameMetadata) -> GameFlags {
        let mut flags = self.own_flags(game);
        self.for_each_child(&mut |child| flags |= child.game_flags(game));
        flags
    }

    /// Concepts the subtree expresses.
    fn concepts(&self, game: &GameMetadata) -> ConceptSet {
        let mut concepts = self.own_concepts(game);
        self.for_each_child(&mut |child| concepts |= child.concepts(game));
        concepts
    }

    /// Whether the subtree needs something the game does not provide.
    ///
    /// Every child is visited so that every problem is reported.
    fn missing_requirement(&self, game: &GameMetadata, report: &mut Diagnostics) -> bool {
        let mut missing = self.own_missing_requirement(game, report);
        self.for_each_child(&mut |child| missing |= child.missing_requirement(game, report));
        missing
    }

    /// Whether the subtree is predicted to fail at runtime.
    fn will_crash(&self, game: &GameMetadata, report: &mut Diagnostics) -> bool {
        let mut crash = self.own_will_crash(game, report);
        self.for_each_child(&mut |child| crash |= child.will_crash(game, report));
        crash
    }

    /// Registers the subtree may read.
    fn reads_effects(&self) -> RegisterSet {
        self.effects().reads
    }

    /// Registers the subtree may write.
    fn writes_effects(&self) -> RegisterSet {
        self.effects().writes
    }
}

/// A ludeme that evaluates to a value.
pub trait Function: Ludeme {
    /// Evaluation result. Cheap to clone: cached values are handed out by clone.
    type Output: Clone + fmt::Debug + Send + Sync;

    /// Evaluate against a context.
    ///
    /// Registers bound during evaluation are restored before returning.
    fn eval(&self, ctx: &mut Context) -> Self::Output;
}

/// Static flag from the node's own contribution and its children.
pub(crate) fn compute_static(node: &dyn Ludeme) -> bool {
    if !node.own_static() {
        return false;
    }
    let mut all = true;
    node.for_each_child(&mut |child| all &= child.is_static());
    all
}

/// Register effects from the node's own contribution and its children.
pub(crate) fn compute_effects(node: &dyn Ludeme) -> RegisterEffects {
    let mut effects = node.own_effects();
    node.for_each_child(&mut |child| effects = effects.union(child.effects()));
    effects
}

/// Shared preprocessing routine for every node family.
pub(crate) fn preprocess_node<F: Function>(
    node: &F,
    cache: &NodeCache<F::Output>,
    game: &Arc<GameMetadata>,
) {
    node.for_each_child(&mut |child| child.preprocess(game));
    node.resolve_defaults(game);
    node.effects();

    if cache.is_filled() || !node.is_static() {
        return;
    }
    // Static nodes ignore state, so a fresh context is as good as any.
    let mut ctx = Context::new(Arc::clone(game), 0);
    let value = node.eval(&mut ctx);
    cache.fill(value);
}

/// Count every node in a tree.
pub fn node_count(node: &dyn Ludeme) -> usize {
    let mut count = 1;
    node.for_each_child(&mut |child| count += node_count(child));
    count
}
