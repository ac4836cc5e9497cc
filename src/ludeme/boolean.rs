//! Boolean ludemes: logic, comparisons, site tests and quantifiers.
//!
//! Quantifiers bind a register for each element they range over and
//! restore it on every exit path, short-circuits included.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::array::IntArrayFunction;
use super::cache::NodeCache;
use super::flags::{ConceptSet, GameFlags};
use super::int::IntFunction;
use super::moves::MovesFunction;
use super::region::RegionFunction;
use super::traits::{compute_effects, compute_static, preprocess_node, Function, Ludeme};
use super::value::{ValueKind, UNDEFINED};
use super::{require_hints, require_regions};
use crate::analysis::Diagnostics;
use crate::context::{Context, Register, RegisterEffects};
use crate::core::{GameMetadata, PlayerId};
use crate::optimiser::{ConstantFolder, Fold};

/// A boolean ludeme.
#[derive(Clone, Debug)]
pub struct BooleanFunction {
    kind: BooleanKind,
    cache: NodeCache<bool>,
}

/// Integer comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// Compare two values.
    #[must_use]
    pub fn apply(self, a: i32, b: i32) -> bool {
        match self {
            Comparison::Eq => a == b,
            Comparison::Ne => a != b,
            Comparison::Lt => a < b,
            Comparison::Le => a <= b,
            Comparison::Gt => a > b,
            Comparison::Ge => a >= b,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

/// Boolean node kinds.
#[derive(Clone, Debug)]
pub enum BooleanKind {
    Constant(bool),
    Not(Box<BooleanFunction>),
    /// True if every operand is; stops at the first false.
    And(Vec<BooleanFunction>),
    /// True if any operand is; stops at the first true.
    Or(Vec<BooleanFunction>),
    Compare {
        op: Comparison,
        left: Box<IntFunction>,
        right: Box<IntFunction>,
    },

    // === Site tests ===
    IsEmpty(Box<IntFunction>),
    /// Site holds a piece of the mover.
    IsFriend(Box<IntFunction>),
    /// Site holds a piece of another player.
    IsEnemy(Box<IntFunction>),
    IsIn {
        site: Box<IntFunction>,
        region: Box<RegionFunction>,
    },
    /// A player number is the mover.
    IsMover(Box<IntFunction>),
    IsHidden {
        site: Box<IntFunction>,
        player: Box<IntFunction>,
    },
    /// The mover owns `length` aligned sites.
    IsLine {
        length: Box<IntFunction>,
        who: Box<IntFunction>,
    },
    /// A move generator yields at least one move.
    CanMove(Box<MovesFunction>),

    // === Quantifiers ===
    /// Some site of `region`, bound to `site`, satisfies `condition`.
    Exists {
        region: Box<RegionFunction>,
        condition: Box<BooleanFunction>,
    },
    /// Every site of `region`, bound to `site`, satisfies `condition`.
    ForAll {
        region: Box<RegionFunction>,
        condition: Box<BooleanFunction>,
    },
    /// `condition` holds with `to` bound to `site`.
    Destination {
        site: Box<IntFunction>,
        condition: Box<BooleanFunction>,
    },
    /// Every site strictly between two aligned sites, bound to `between`,
    /// satisfies `condition`. False when the sites are not aligned.
    AllBetween {
        from: Box<IntFunction>,
        to: Box<IntFunction>,
        condition: Box<BooleanFunction>,
    },
    /// Some stack level of `site`, bound to `level`, satisfies `condition`.
    AnyLevel {
        site: Box<IntFunction>,
        condition: Box<BooleanFunction>,
    },
    /// Every puzzle hint, bound to `hint`, satisfies `condition`.
    AllHints(Box<BooleanFunction>),
    /// Some element of `array`, bound to `value`, satisfies `condition`.
    AnyValue {
        array: Box<IntArrayFunction>,
        condition: Box<BooleanFunction>,
    },
    /// Some named region, bound to `region`, satisfies `condition`.
    AnyRegion(Box<BooleanFunction>),
    /// Some edge touching `site`, bound to `edge`, satisfies `condition`.
    AnyEdge {
        site: Box<IntFunction>,
        condition: Box<BooleanFunction>,
    },
}

#[allow(clippy::should_implement_trait)]
impl BooleanFunction {
    /// Wrap a node kind.
    #[must_use]
    pub fn new(kind: BooleanKind) -> Self {
        Self {
            kind,
            cache: NodeCache::new(),
        }
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> &BooleanKind {
        &self.kind
    }

    /// Literal value, or the cached value of a preprocessed static node.
    #[must_use]
    pub fn static_value(&self) -> Option<bool> {
        match self.kind {
            BooleanKind::Constant(value) => Some(value),
            _ => self.cache.value().copied(),
        }
    }

    pub fn constant(value: bool) -> Self {
        Self::new(BooleanKind::Constant(value))
    }

    pub fn not(a: BooleanFunction) -> Self {
        Self::new(BooleanKind::Not(Box::new(a)))
    }

    pub fn and(items: impl IntoIterator<Item = BooleanFunction>) -> Self {
        Self::new(BooleanKind::And(items.into_iter().collect()))
    }

    pub fn or(items: impl IntoIterator<Item = BooleanFunction>) -> Self {
        Self::new(BooleanKind::Or(items.into_iter().collect()))
    }

    pub fn compare(op: Comparison, left: IntFunction, right: IntFunction) -> Self {
        Self::new(BooleanKind::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn eq(left: IntFunction, right: IntFunction) -> Self {
        Self::compare(Comparison::Eq, left, right)
    }

    pub fn ne(left: IntFunction, right: IntFunction) -> Self {
        Self::compare(Comparison::Ne, left, right)
    }

    pub fn lt(left: IntFunction, right: IntFunction) -> Self {
        Self::compare(Comparison::Lt, left, right)
    }

    pub fn ge(left: IntFunction, right: IntFunction) -> Self {
        Self::compare(Comparison::Ge, left, right)
    }

    pub fn is_empty(site: IntFunction) -> Self {
        Self::new(BooleanKind::IsEmpty(Box::new(site)))
    }

    pub fn is_friend(site: IntFunction) -> Self {
        Self::new(BooleanKind::IsFriend(Box::new(site)))
    }

    pub fn is_enemy(site: IntFunction) -> Self {
        Self::new(BooleanKind::IsEnemy(Box::new(site)))
    }

    pub fn is_in(site: IntFunction, region: RegionFunction) -> Self {
        Self::new(BooleanKind::IsIn {
            site: Box::new(site),
            region: Box::new(region),
        })
    }

    pub fn is_mover(player: IntFunction) -> Self {
        Self::new(BooleanKind::IsMover(Box::new(player)))
    }

    pub fn is_hidden(site: IntFunction, player: IntFunction) -> Self {
        Self::new(BooleanKind::IsHidden {
            site: Box::new(site),
            player: Box::new(player),
        })
    }

    /// Line of `length` pieces owned by `who` (the mover by default).
    pub fn is_line(length: IntFunction, who: Option<IntFunction>) -> Self {
        Self::new(BooleanKind::IsLine {
            length: Box::new(length),
            who: Box::new(who.unwrap_or_else(IntFunction::mover)),
        })
    }

    pub fn can_move(moves: MovesFunction) -> Self {
        Self::new(BooleanKind::CanMove(Box::new(moves)))
    }

    pub fn exists(region: RegionFunction, condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::Exists {
            region: Box::new(region),
            condition: Box::new(condition),
        })
    }

    pub fn for_all(region: RegionFunction, condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::ForAll {
            region: Box::new(region),
            condition: Box::new(condition),
        })
    }

    pub fn destination(site: IntFunction, condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::Destination {
            site: Box::new(site),
            condition: Box::new(condition),
        })
    }

    pub fn all_between(from: IntFunction, to: IntFunction, condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::AllBetween {
            from: Box::new(from),
            to: Box::new(to),
            condition: Box::new(condition),
        })
    }

    pub fn any_level(site: IntFunction, condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::AnyLevel {
            site: Box::new(site),
            condition: Box::new(condition),
        })
    }

    pub fn all_hints(condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::AllHints(Box::new(condition)))
    }

    pub fn any_value(array: IntArrayFunction, condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::AnyValue {
            array: Box::new(array),
            condition: Box::new(condition),
        })
    }

    pub fn any_region(condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::AnyRegion(Box::new(condition)))
    }

    pub fn any_edge(site: IntFunction, condition: BooleanFunction) -> Self {
        Self::new(BooleanKind::AnyEdge {
            site: Box::new(site),
            condition: Box::new(condition),
        })
    }
}

impl Function for BooleanFunction {
    type Output = bool;

    fn eval(&self, ctx: &mut Context) -> bool {
        if let Some(&value) = self.cache.value() {
            return value;
        }

        match &self.kind {
            BooleanKind::Constant(value) => *value,
            BooleanKind::Not(a) => !a.eval(ctx),
            BooleanKind::And(items) => items.iter().all(|item| item.eval(ctx)),
            BooleanKind::Or(items) => items.iter().any(|item| item.eval(ctx)),
            BooleanKind::Compare { op, left, right } => {
                let (a, b) = (left.eval(ctx), right.eval(ctx));
                op.apply(a, b)
            }

            BooleanKind::IsEmpty(site) => {
                let site = site.eval(ctx);
                ctx.state().is_empty(site)
            }
            BooleanKind::IsFriend(site) => {
                let site = site.eval(ctx);
                ctx.state().who(site) == ctx.mover().number()
            }
            BooleanKind::IsEnemy(site) => {
                let who = {
                    let site = site.eval(ctx);
                    ctx.state().who(site)
                };
                who > 0 && who != ctx.mover().number()
            }
            BooleanKind::IsIn { site, region } => {
                let site = site.eval(ctx);
                region.eval(ctx).contains(site)
            }
            BooleanKind::IsMover(player) => player.eval(ctx) == ctx.mover().number(),
            BooleanKind::IsHidden { site, player } => {
                let (site, number) = (site.eval(ctx), player.eval(ctx));
                PlayerId::from_number(number, ctx.game().player_count())
                    .is_some_and(|p| ctx.state().is_hidden(site, p))
            }
            BooleanKind::IsLine { length, who } => {
                let (length, who) = (length.eval(ctx), who.eval(ctx));
                if length <= 0 || who <= 0 {
                    return false;
                }
                let (board, state) = (ctx.game().board(), ctx.state());
                board
                    .lines(length as usize)
                    .any(|line| line.iter().all(|&site| state.who(site) == who))
            }
            BooleanKind::CanMove(moves) => !moves.eval(ctx).is_empty(),

            BooleanKind::Exists { region, condition } => {
                let sites = region.eval(ctx);
                let mut scope = ctx.scoped(Register::Site, UNDEFINED);
                let found = sites.iter().any(|site| {
                    scope.rebind(site);
                    condition.eval(&mut scope)
                });
                found
            }
            BooleanKind::ForAll { region, condition } => {
                let sites = region.eval(ctx);
                let mut scope = ctx.scoped(Register::Site, UNDEFINED);
                let holds = sites.iter().all(|site| {
                    scope.rebind(site);
                    condition.eval(&mut scope)
                });
                holds
            }
            BooleanKind::Destination { site, condition } => {
                let site = site.eval(ctx);
                let mut scope = ctx.scoped(Register::To, site);
                condition.eval(&mut scope)
            }
            BooleanKind::AllBetween {
                from,
                to,
                condition,
            } => {
                let (from, to) = (from.eval(ctx), to.eval(ctx));
                let Some(between) = ctx.game().board().between(from, to) else {
                    return false;
                };
                let mut scope = ctx.scoped(Register::Between, UNDEFINED);
                let holds = between.iter().all(|&site| {
                    scope.rebind(site);
                    condition.eval(&mut scope)
                });
                holds
            }
            BooleanKind::AnyLevel { site, condition } => {
                let height = {
                    let site = site.eval(ctx);
                    ctx.state().count(site)
                };
                let mut scope = ctx.scoped(Register::Level, UNDEFINED);
                (0..height).any(|level| {
                    scope.rebind(level);
                    condition.eval(&mut scope)
                })
            }
            BooleanKind::AllHints(condition) => {
                let hints = ctx.game().hints().len() as i32;
                let mut scope = ctx.scoped(Register::Hint, UNDEFINED);
                (0..hints).all(|hint| {
                    scope.rebind(hint);
                    condition.eval(&mut scope)
                })
            }
            BooleanKind::AnyValue { array, condition } => {
                let values = array.eval(ctx);
                let mut scope = ctx.scoped(Register::Value, UNDEFINED);
                let found = values.iter().any(|&value| {
                    scope.rebind(value);
                    condition.eval(&mut scope)
                });
                found
            }
            BooleanKind::AnyRegion(condition) => {
                let regions = ctx.game().regions().len() as i32;
                let mut scope = ctx.scoped(Register::Region, UNDEFINED);
                (0..regions).any(|region| {
                    scope.rebind(region);
                    condition.eval(&mut scope)
                })
            }
            BooleanKind::AnyEdge { site, condition } => {
                let site = site.eval(ctx);
                let game = Arc::clone(ctx.game_handle());
                let mut scope = ctx.scoped(Register::Edge, UNDEFINED);
                let found = game.board().edges_of(site).iter().any(|&edge| {
                    scope.rebind(edge);
                    condition.eval(&mut scope)
                });
                found
            }
        }
    }
}

impl Ludeme for BooleanFunction {
    fn name(&self) -> &'static str {
        match &self.kind {
            BooleanKind::Constant(_) => "boolean",
            BooleanKind::Not(_) => "not",
            BooleanKind::And(_) => "and",
            BooleanKind::Or(_) => "or",
            BooleanKind::Compare { op, .. } => op.keyword(),
            BooleanKind::IsEmpty(_) => "is Empty",
            BooleanKind::IsFriend(_) => "is Friend",
            BooleanKind::IsEnemy(_) => "is Enemy",
            BooleanKind::IsIn { .. } => "is In",
            BooleanKind::IsMover(_) => "is Mover",
            BooleanKind::IsHidden { .. } => "is Hidden",
            BooleanKind::IsLine { .. } => "is Line",
            BooleanKind::CanMove(_) => "can Move",
            BooleanKind::Exists { .. } => "exists",
            BooleanKind::ForAll { .. } => "forAll",
            BooleanKind::Destination { .. } => "destination",
            BooleanKind::AllBetween { .. } => "allBetween",
            BooleanKind::AnyLevel { .. } => "anyLevel",
            BooleanKind::AllHints(_) => "allHints",
            BooleanKind::AnyValue { .. } => "anyValue",
            BooleanKind::AnyRegion(_) => "anyRegion",
            BooleanKind::AnyEdge { .. } => "anyEdge",
        }
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Boolean
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn Ludeme)) {
        match &self.kind {
            BooleanKind::Constant(_) => {}
            BooleanKind::Not(a) | BooleanKind::AllHints(a) | BooleanKind::AnyRegion(a) => {
                visit(a.as_ref());
            }
            BooleanKind::And(items) | BooleanKind::Or(items) => {
                for item in items {
                    visit(item);
                }
            }
            BooleanKind::Compare { left, right, .. } => {
                visit(left.as_ref());
                visit(right.as_ref());
            }
            BooleanKind::IsEmpty(site)
            | BooleanKind::IsFriend(site)
            | BooleanKind::IsEnemy(site)
            | BooleanKind::IsMover(site) => visit(site.as_ref()),
            BooleanKind::IsIn { site, region } => {
                visit(site.as_ref());
                visit(region.as_ref());
            }
            BooleanKind::IsHidden { site: a, player: b } | BooleanKind::IsLine { length: a, who: b } => {
                visit(a.as_ref());
                visit(b.as_ref());
            }
            BooleanKind::CanMove(moves) => visit(moves.as_ref()),
            BooleanKind::Exists { region, condition } | BooleanKind::ForAll { region, condition } => {
                visit(region.as_ref());
                visit(condition.as_ref());
            }
            BooleanKind::Destination { site, condition }
            | BooleanKind::AnyLevel { site, condition }
            | BooleanKind::AnyEdge { site, condition } => {
                visit(site.as_ref());
                visit(condition.as_ref());
            }
            BooleanKind::AllBetween {
                from,
                to,
                condition,
            } => {
                visit(from.as_ref());
                visit(to.as_ref());
                visit(condition.as_ref());
            }
            BooleanKind::AnyValue { array, condition } => {
                visit(array.as_ref());
                visit(condition.as_ref());
            }
        }
    }

    fn own_static(&self) -> bool {
        !matches!(
            self.kind,
            BooleanKind::IsEmpty(_)
                | BooleanKind::IsFriend(_)
                | BooleanKind::IsEnemy(_)
                | BooleanKind::IsMover(_)
                | BooleanKind::IsHidden { .. }
                | BooleanKind::IsLine { .. }
                | BooleanKind::CanMove(_)
                | BooleanKind::AnyLevel { .. }
        )
    }

    fn own_flags(&self, _game: &GameMetadata) -> GameFlags {
        match &self.kind {
            BooleanKind::IsHidden { .. } => GameFlags::HIDDEN_INFO,
            BooleanKind::AnyLevel { .. } => GameFlags::STACKING,
            BooleanKind::AllHints(_) => GameFlags::DEDUCTION_PUZZLE,
            BooleanKind::AnyRegion(_) => GameFlags::NAMED_REGIONS,
            BooleanKind::AnyEdge { .. } => GameFlags::EDGES,
            _ => GameFlags::empty(),
        }
    }

    fn own_concepts(&self, _game: &GameMetadata) -> ConceptSet {
        match &self.kind {
            BooleanKind::Constant(_) => ConceptSet::empty(),
            BooleanKind::Not(_) => ConceptSet::BOOLEAN_LOGIC | ConceptSet::NEGATION,
            BooleanKind::And(_) => ConceptSet::BOOLEAN_LOGIC | ConceptSet::CONJUNCTION,
            BooleanKind::Or(_) => ConceptSet::BOOLEAN_LOGIC | ConceptSet::DISJUNCTION,
            BooleanKind::Compare {
                op: Comparison::Eq | Comparison::Ne,
                ..
            } => ConceptSet::EQUALITY,
            BooleanKind::Compare { .. } => ConceptSet::COMPARISON,
            BooleanKind::IsEmpty(_) | BooleanKind::IsFriend(_) | BooleanKind::IsEnemy(_) => {
                ConceptSet::SITE_QUERY
            }
            BooleanKind::IsIn { .. } => ConceptSet::REGION_SET,
            BooleanKind::IsMover(_) => ConceptSet::PLAYER_QUERY,
            BooleanKind::IsHidden { .. } => ConceptSet::HIDDEN_INFO,
            BooleanKind::IsLine { .. } => ConceptSet::LINE,
            BooleanKind::CanMove(_) => ConceptSet::MOBILITY,
            BooleanKind::Exists { .. } | BooleanKind::ForAll { .. } => ConceptSet::ITERATION,
            BooleanKind::Destination { .. } => ConceptSet::SITE_QUERY,
            BooleanKind::AllBetween { .. } => ConceptSet::BETWEEN | ConceptSet::ITERATION,
            BooleanKind::AnyLevel { .. } => ConceptSet::STACKING | ConceptSet::ITERATION,
            BooleanKind::AllHints(_) => ConceptSet::DEDUCTION_PUZZLE | ConceptSet::ITERATION,
            BooleanKind::AnyValue { .. } => ConceptSet::VALUE_ITERATION,
            BooleanKind::AnyRegion(_) => ConceptSet::NAMED_REGION | ConceptSet::ITERATION,
            BooleanKind::AnyEdge { .. } => ConceptSet::EDGE | ConceptSet::ITERATION,
        }
    }

    fn own_effects(&self) -> RegisterEffects {
        let bound = match &self.kind {
            BooleanKind::Exists { .. } | BooleanKind::ForAll { .. } => Register::Site,
            BooleanKind::Destination { .. } => Register::To,
            BooleanKind::AllBetween { .. } => Register::Between,
            BooleanKind::AnyLevel { .. } => Register::Level,
            BooleanKind::AllHints(_) => Register::Hint,
            BooleanKind::AnyValue { .. } => Register::Value,
            BooleanKind::AnyRegion(_) => Register::Region,
            BooleanKind::AnyEdge { .. } => Register::Edge,
            _ => return RegisterEffects::NONE,
        };
        RegisterEffects::writing(bound)
    }

    fn own_missing_requirement(&self, game: &GameMetadata, report: &mut Diagnostics) -> bool {
        match &self.kind {
            BooleanKind::AllHints(_) => require_hints(self.name(), game, report),
            BooleanKind::AnyRegion(_) => require_regions(self.name(), game, report),
            _ => false,
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

impl Fold for BooleanFunction {
    fn is_constant(&self) -> bool {
        matches!(self.kind, BooleanKind::Constant(_))
    }

    fn cached_value(&self) -> Option<&bool> {
        self.cache.value()
    }

    fn constant(value: bool) -> Option<Self> {
        Some(Self::constant(value))
    }

    fn fold_children(&mut self, folder: &mut ConstantFolder) {
        match &mut self.kind {
            BooleanKind::Constant(_) => {}
            BooleanKind::Not(a) | BooleanKind::AllHints(a) | BooleanKind::AnyRegion(a) => {
                folder.visit(a.as_mut());
            }
            BooleanKind::And(items) | BooleanKind::Or(items) => {
                for item in items {
                    folder.visit(item);
                }
            }
            BooleanKind::Compare { left, right, .. } => {
                folder.visit(left.as_mut());
                folder.visit(right.as_mut());
            }
            BooleanKind::IsEmpty(site)
            | BooleanKind::IsFriend(site)
            | BooleanKind::IsEnemy(site)
            | BooleanKind::IsMover(site) => folder.visit(site.as_mut()),
            BooleanKind::IsIn { site, region } => {
                folder.visit(site.as_mut());
                folder.visit(region.as_mut());
            }
            BooleanKind::IsHidden { site: a, player: b } | BooleanKind::IsLine { length: a, who: b } => {
                folder.visit(a.as_mut());
                folder.visit(b.as_mut());
            }
            BooleanKind::CanMove(moves) => folder.visit(moves.as_mut()),
            BooleanKind::Exists { region, condition } | BooleanKind::ForAll { region, condition } => {
                folder.visit(region.as_mut());
                folder.visit(condition.as_mut());
            }
            BooleanKind::Destination { site, condition }
            | BooleanKind::AnyLevel { site, condition }
            | BooleanKind::AnyEdge { site, condition } => {
                folder.visit(site.as_mut());
                folder.visit(condition.as_mut());
            }
            BooleanKind::AllBetween {
                from,
                to,
                condition,
            } => {
                folder.visit(from.as_mut());
                folder.visit(to.as_mut());
                folder.visit(condition.as_mut());
            }
            BooleanKind::AnyValue { array, condition } => {
                folder.visit(array.as_mut());
                folder.visit(condition.as_mut());
            }
        }
    }
}
