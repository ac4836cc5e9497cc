//! Integer-array ludemes.

use std::sync::Arc;

use super::cache::NodeCache;
use super::flags::{ConceptSet, GameFlags};
use super::int::IntFunction;
use super::region::RegionFunction;
use super::traits::{compute_effects, compute_static, preprocess_node, Function, Ludeme};
use super::value::{IntArray, ValueKind};
use crate::context::{Context, RegisterEffects};
use crate::core::GameMetadata;
use crate::optimiser::{ConstantFolder, Fold};

/// An integer-array ludeme.
#[derive(Clone, Debug)]
pub struct IntArrayFunction {
    kind: IntArrayKind,
    cache: NodeCache<IntArray>,
}

/// Integer-array node kinds.
#[derive(Clone, Debug)]
pub enum IntArrayKind {
    Constant(IntArray),
    /// One element per operand.
    Values(Vec<IntFunction>),
    /// Scores in player order.
    Scores,
    /// Sites of a region in ascending order.
    SitesOf(Box<RegionFunction>),
    /// Ascending copy of another array.
    Sorted(Box<IntArrayFunction>),
}

impl IntArrayFunction {
    #[must_use]
    pub fn new(kind: IntArrayKind) -> Self {
        Self {
            kind,
            cache: NodeCache::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &IntArrayKind {
        &self.kind
    }

    pub fn constant(values: impl IntoIterator<Item = i32>) -> Self {
        Self::new(IntArrayKind::Constant(values.into_iter().collect()))
    }

    pub fn values(items: impl IntoIterator<Item = IntFunction>) -> Self {
        Self::new(IntArrayKind::Values(items.into_iter().collect()))
    }

    pub fn scores() -> Self {
        Self::new(IntArrayKind::Scores)
    }

    pub fn sites_of(region: RegionFunction) -> Self {
        Self::new(IntArrayKind::SitesOf(Box::new(region)))
    }

    pub fn sorted(array: IntArrayFunction) -> Self {
        Self::new(IntArrayKind::Sorted(Box::new(array)))
    }
}

impl Function for IntArrayFunction {
    type Output = IntArray;

    fn eval(&self, ctx: &mut Context) -> IntArray {
        if let Some(value) = self.cache.value() {
            return value.clone();
        }

        match &self.kind {
            IntArrayKind::Constant(values) => values.clone(),
            IntArrayKind::Values(items) => items.iter().map(|item| item.eval(ctx)).collect(),
            IntArrayKind::Scores => ctx.state().scores().values().copied().collect(),
            IntArrayKind::SitesOf(region) => region.eval(ctx).iter().collect(),
            IntArrayKind::Sorted(array) => {
                let mut values = array.eval(ctx);
                values.sort();
                values
            }
        }
    }
}

impl Ludeme for IntArrayFunction {
    fn name(&self) -> &'static str {
        match &self.kind {
            IntArrayKind::Constant(_) => "array",
            IntArrayKind::Values(_) => "values",
            IntArrayKind::Scores => "scores",
            IntArrayKind::SitesOf(_) => "array Sites",
            IntArrayKind::Sorted(_) => "sort",
        }
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::IntArray
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn Ludeme)) {
        match &self.kind {
            IntArrayKind::Constant(_) | IntArrayKind::Scores => {}
            IntArrayKind::Values(items) => {
                for item in items {
                    visit(item);
                }
            }
            IntArrayKind::SitesOf(region) => visit(region.as_ref()),
            IntArrayKind::Sorted(array) => visit(array.as_ref()),
        }
    }

    fn own_static(&self) -> bool {
        !matches!(self.kind, IntArrayKind::Scores)
    }

    fn own_flags(&self, _game: &GameMetadata) -> GameFlags {
        match self.kind {
            IntArrayKind::Scores => GameFlags::SCORE,
            _ => GameFlags::empty(),
        }
    }

    fn own_concepts(&self, _game: &GameMetadata) -> ConceptSet {
        match self.kind {
            IntArrayKind::Scores => ConceptSet::SCORING,
            IntArrayKind::SitesOf(_) => ConceptSet::REGION_SET,
            IntArrayKind::Sorted(_) => ConceptSet::SORTING,
            _ => ConceptSet::empty(),
        }
    }

    fn is_static(&self) -> bool {
        self.cache.is_static(|| compute_static(self))
    }

    fn effects(&self) -> RegisterEffects {
        self.cache.effects(|| compute_effects(self))
    }

    fn preprocess(&self, game: &Arc<GameMetadata>) {
        preprocess_node(self, &self.cache, game);
    }
}

impl Fold for IntArrayFunction {
    fn is_constant(&self) -> bool {
        matches!(self.kind, IntArrayKind::Constant(_))
    }

    fn cached_value(&self) -> Option<&IntArray> {
        self.cache.value()
    }

    fn constant(value: IntArray) -> Option<Self> {
        Some(Self::new(IntArrayKind::Constant(value)))
    }

    fn fold_children(&mut self, folder: &mut ConstantFolder) {
        match &mut self.kind {
            IntArrayKind::Constant(_) | IntArrayKind::Scores => {}
            IntArrayKind::Values(items) => {
                for item in items {
                    folder.visit(item);
                }
            }
            IntArrayKind::SitesOf(region) => folder.visit(region.as_mut()),
            IntArrayKind::Sorted(array) => folder.visit(array.as_mut()),
        }
    }
}
