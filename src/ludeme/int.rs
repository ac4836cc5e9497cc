//! Integer-valued ludemes.

use std::sync::Arc;

use super::array::IntArrayFunction;
use super::boolean::BooleanFunction;
use super::cache::NodeCache;
use super::flags::{ConceptSet, GameFlags};
use super::region::RegionFunction;
use super::traits::{compute_effects, compute_static, preprocess_node, Function, Ludeme};
use super::value::{ValueKind, UNDEFINED};
use super::{require_hints, require_track};
use crate::analysis::Diagnostics;
use crate::context::{Context, Register, RegisterEffects};
use crate::core::{GameMetadata, PlayerId};
use crate::error::{Error, Result};
use crate::optimiser::{ConstantFolder, Fold};

/// An integer ludeme.
#[derive(Clone, Debug)]
pub struct IntFunction {
    kind: IntKind,
    cache: NodeCache<i32>,
}

/// What `count` counts.
#[derive(Clone, Debug)]
pub enum CountTarget {
    /// Pieces on one site.
    Site(Box<IntFunction>),
    /// Pieces over a region.
    Region(Box<RegionFunction>),
}

/// Integer node kinds.
#[derive(Clone, Debug)]
pub enum IntKind {
    // === Values ===
    Constant(i32),
    /// Current value of a register.
    Register(Register),

    // === Arithmetic ===
    Add(Vec<IntFunction>),
    Sub(Box<IntFunction>, Box<IntFunction>),
    Mul(Vec<IntFunction>),
    /// Truncating division; [`UNDEFINED`] on a zero divisor.
    Div(Box<IntFunction>, Box<IntFunction>),
    /// Euclidean remainder; [`UNDEFINED`] on a zero divisor.
    Mod(Box<IntFunction>, Box<IntFunction>),
    Abs(Box<IntFunction>),
    /// Largest operand, [`UNDEFINED`] if none.
    Max(Vec<IntFunction>),
    /// Smallest operand, [`UNDEFINED`] if none.
    Min(Vec<IntFunction>),
    If {
        condition: Box<BooleanFunction>,
        then: Box<IntFunction>,
        otherwise: Box<IntFunction>,
    },

    // === Players ===
    /// Number of the player to move.
    Mover,
    /// Number of the player after the mover.
    NextPlayer,
    NumPlayers,

    // === Board ===
    BoardSize,
    /// Owner number at a site (0 = empty).
    Who(Box<IntFunction>),
    /// Component number at a site (0 = empty).
    What(Box<IntFunction>),
    Count(CountTarget),
    /// Index of the top level of a stack, [`UNDEFINED`] if empty.
    TopLevel(Box<IntFunction>),
    Row(Box<IntFunction>),
    Column(Box<IntFunction>),

    // === Game resources ===
    /// Score of a player number.
    Score(Box<IntFunction>),
    TrackLength(String),
    TrackSite {
        track: String,
        index: Box<IntFunction>,
    },
    /// Target value of the hint in the `hint` register.
    HintValue,

    // === Iteration ===
    /// Sum of `value` with `site` bound to each site of `region`.
    Sum {
        region: Box<RegionFunction>,
        value: Box<IntFunction>,
    },
    /// Sum of `value` with `player` bound to each player number.
    SumPlayers(Box<IntFunction>),
    RegionSize(Box<RegionFunction>),
    ArrayLength(Box<IntArrayFunction>),
    ArrayAt {
        array: Box<IntArrayFunction>,
        index: Box<IntFunction>,
    },

    // === Dynamic ===
    /// Uniform draw from the random channel, bounds inclusive.
    Random {
        min: Box<IntFunction>,
        max: Box<IntFunction>,
    },
    LastFrom,
    LastTo,
    /// Number of moves played.
    MoveNumber,
}

impl IntFunction {
    /// Wrap a node kind.
    #[must_use]
    pub fn new(kind: IntKind) -> Self {
        Self {
            kind,
            cache: NodeCache::new(),
        }
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> &IntKind {
        &self.kind
    }

    /// Literal value, or the cached value of a preprocessed static node.
    #[must_use]
    pub fn static_value(&self) -> Option<i32> {
        match self.kind {
            IntKind::Constant(value) => Some(value),
            _ => self.cache.value().copied(),
        }
    }

    pub fn constant(value: i32) -> Self {
        Self::new(IntKind::Constant(value))
    }

    pub fn register(register: Register) -> Self {
        Self::new(IntKind::Register(register))
    }

    pub fn from() -> Self {
        Self::register(Register::From)
    }

    pub fn to() -> Self {
        Self::register(Register::To)
    }

    pub fn site() -> Self {
        Self::register(Register::Site)
    }

    pub fn add(items: impl IntoIterator<Item = IntFunction>) -> Self {
        Self::new(IntKind::Add(items.into_iter().collect()))
    }

    pub fn sub(a: IntFunction, b: IntFunction) -> Self {
        Self::new(IntKind::Sub(Box::new(a), Box::new(b)))
    }

    pub fn mul(items: impl IntoIterator<Item = IntFunction>) -> Self {
        Self::new(IntKind::Mul(items.into_iter().collect()))
    }

    pub fn div(a: IntFunction, b: IntFunction) -> Self {
        Self::new(IntKind::Div(Box::new(a), Box::new(b)))
    }

    pub fn modulo(a: IntFunction, b: IntFunction) -> Self {
        Self::new(IntKind::Mod(Box::new(a), Box::new(b)))
    }

    pub fn abs(a: IntFunction) -> Self {
        Self::new(IntKind::Abs(Box::new(a)))
    }

    pub fn max(items: impl IntoIterator<Item = IntFunction>) -> Self {
        Self::new(IntKind::Max(items.into_iter().collect()))
    }

    pub fn min(items: impl IntoIterator<Item = IntFunction>) -> Self {
        Self::new(IntKind::Min(items.into_iter().collect()))
    }

    pub fn if_then_else(condition: BooleanFunction, then: IntFunction, otherwise: IntFunction) -> Self {
        Self::new(IntKind::If {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    pub fn mover() -> Self {
        Self::new(IntKind::Mover)
    }

    pub fn next_player() -> Self {
        Self::new(IntKind::NextPlayer)
    }

    pub fn num_players() -> Self {
        Self::new(IntKind::NumPlayers)
    }

    pub fn board_size() -> Self {
        Self::new(IntKind::BoardSize)
    }

    pub fn who(site: IntFunction) -> Self {
        Self::new(IntKind::Who(Box::new(site)))
    }

    pub fn what(site: IntFunction) -> Self {
        Self::new(IntKind::What(Box::new(site)))
    }

    /// `count` with its two optional arguments; exactly one must be given.
    pub fn count(site: Option<IntFunction>, region: Option<RegionFunction>) -> Result<Self> {
        match (site, region) {
            (Some(site), None) => Ok(Self::count_at(site)),
            (None, Some(region)) => Ok(Self::count_in(region)),
            (Some(_), Some(_)) => Err(Error::ConflictingArguments {
                ludeme: "count",
                message: "only one of `at` and `in` may be given".into(),
            }),
            (None, None) => Err(Error::MissingArgument {
                ludeme: "count",
                message: "one of `at` and `in` is required".into(),
            }),
        }
    }

    pub fn count_at(site: IntFunction) -> Self {
        Self::new(IntKind::Count(CountTarget::Site(Box::new(site))))
    }

    pub fn count_in(region: RegionFunction) -> Self {
        Self::new(IntKind::Count(CountTarget::Region(Box::new(region))))
    }

    pub fn top_level(site: IntFunction) -> Self {
        Self::new(IntKind::TopLevel(Box::new(site)))
    }

    pub fn row(site: IntFunction) -> Self {
        Self::new(IntKind::Row(Box::new(site)))
    }

    pub fn column(site: IntFunction) -> Self {
        Self::new(IntKind::Column(Box::new(site)))
    }

    pub fn score(player: IntFunction) -> Self {
        Self::new(IntKind::Score(Box::new(player)))
    }

    pub fn track_length(track: impl Into<String>) -> Self {
        Self::new(IntKind::TrackLength(track.into()))
    }

    pub fn track_site(track: impl Into<String>, index: IntFunction) -> Self {
        Self::new(IntKind::TrackSite {
            track: track.into(),
            index: Box::new(index),
        })
    }

    pub fn hint_value() -> Self {
        Self::new(IntKind::HintValue)
    }

    pub fn sum(region: RegionFunction, value: IntFunction) -> Self {
        Self::new(IntKind::Sum {
            region: Box::new(region),
            value: Box::new(value),
        })
    }

    pub fn sum_players(value: IntFunction) -> Self {
        Self::new(IntKind::SumPlayers(Box::new(value)))
    }

    pub fn region_size(region: RegionFunction) -> Self {
        Self::new(IntKind::RegionSize(Box::new(region)))
    }

    pub fn array_length(array: IntArrayFunction) -> Self {
        Self::new(IntKind::ArrayLength(Box::new(array)))
    }

    pub fn array_at(array: IntArrayFunction, index: IntFunction) -> Self {
        Self::new(IntKind::ArrayAt {
            array: Box::new(array),
            index: Box::new(index),
        })
    }

    /// Random draw in `[min, max]`. Literal bounds must be ordered.
    pub fn random(min: IntFunction, max: IntFunction) -> Result<Self> {
        if let (IntKind::Constant(lo), IntKind::Constant(hi)) = (&min.kind, &max.kind) {
            if lo > hi {
                return Err(Error::ConflictingArguments {
                    ludeme: "random",
                    message: format!("min {lo} exceeds max {hi}"),
                });
            }
        }
        Ok(Self::new(IntKind::Random {
            min: Box::new(min),
            max: Box::new(max),
        }))
    }

    pub fn last_from() -> Self {
        Self::new(IntKind::LastFrom)
    }

    pub fn last_to() -> Self {
        Self::new(IntKind::LastTo)
    }

    pub fn move_number() -> Self {
        Self::new(IntKind::MoveNumber)
    }
}

/// Score, board or track lookups index with this.
fn index(value: i32) -> Option<usize> {
    usize::try_from(value).ok()
}

impl Function for IntFunction {
    type Output = i32;

    fn eval(&self, ctx: &mut Context) -> i32 {
        if let Some(&value) = self.cache.value() {
            return value;
        }

        match &self.kind {
            IntKind::Constant(value) => *value,
            IntKind::Register(register) => ctx.get(*register),

            IntKind::Add(items) => items
                .iter()
                .fold(0i32, |acc, item| acc.wrapping_add(item.eval(ctx))),
            IntKind::Sub(a, b) => a.eval(ctx).wrapping_sub(b.eval(ctx)),
            IntKind::Mul(items) => items
                .iter()
                .fold(1i32, |acc, item| acc.wrapping_mul(item.eval(ctx))),
            IntKind::Div(a, b) => {
                let (a, b) = (a.eval(ctx), b.eval(ctx));
                a.checked_div(b).unwrap_or(UNDEFINED)
            }
            IntKind::Mod(a, b) => {
                let (a, b) = (a.eval(ctx), b.eval(ctx));
                a.checked_rem_euclid(b).unwrap_or(UNDEFINED)
            }
            IntKind::Abs(a) => a.eval(ctx).wrapping_abs(),
            IntKind::Max(items) => items
                .iter()
                .map(|item| item.eval(ctx))
                .max()
                .unwrap_or(UNDEFINED),
            IntKind::Min(items) => items
                .iter()
                .map(|item| item.eval(ctx))
                .min()
                .unwrap_or(UNDEFINED),
            IntKind::If {
                condition,
                then,
                otherwise,
            } => {
                if condition.eval(ctx) {
                    then.eval(ctx)
                } else {
                    otherwise.eval(ctx)
                }
            }

            IntKind::Mover => ctx.mover().number(),
            IntKind::NextPlayer => ctx.mover().next(ctx.game().player_count()).number(),
            IntKind::NumPlayers => ctx.game().player_count() as i32,

            IntKind::BoardSize => ctx.game().board().num_sites() as i32,
            IntKind::Who(site) => {
                let site = site.eval(ctx);
                ctx.state().who(site)
            }
            IntKind::What(site) => {
                let site = site.eval(ctx);
                ctx.state().what(site)
            }
            IntKind::Count(CountTarget::Site(site)) => {
                let site = site.eval(ctx);
                ctx.state().count(site)
            }
            IntKind::Count(CountTarget::Region(region)) => {
                let region = region.eval(ctx);
                let state = ctx.state();
                region.iter().map(|site| state.count(site)).sum()
            }
            IntKind::TopLevel(site) => {
                let site = site.eval(ctx);
                match ctx.state().count(site) {
                    0 => UNDEFINED,
                    height => height - 1,
                }
            }
            IntKind::Row(site) => {
                let site = site.eval(ctx);
                let board = ctx.game().board();
                if board.contains(site) {
                    board.row(site)
                } else {
                    UNDEFINED
                }
            }
            IntKind::Column(site) => {
                let site = site.eval(ctx);
                let board = ctx.game().board();
                if board.contains(site) {
                    board.column(site)
                } else {
                    UNDEFINED
                }
            }

            IntKind::Score(player) => {
                let number = player.eval(ctx);
                PlayerId::from_number(number, ctx.game().player_count())
                    .map_or(UNDEFINED, |p| ctx.state().score(p))
            }
            IntKind::TrackLength(track) => ctx
                .game()
                .track(track)
                .map_or(UNDEFINED, |t| t.sites.len() as i32),
            IntKind::TrackSite { track, index: i } => {
                let i = i.eval(ctx);
                ctx.game()
                    .track(track)
                    .and_then(|t| index(i).and_then(|i| t.sites.get(i).copied()))
                    .unwrap_or(UNDEFINED)
            }
            IntKind::HintValue => {
                let hint = ctx.get(Register::Hint);
                ctx.game().hint_at(hint).map_or(UNDEFINED, |h| h.value)
            }

            IntKind::Sum { region, value } => {
                let sites = region.eval(ctx);
                let mut scope = ctx.scoped(Register::Site, UNDEFINED);
                let mut total = 0i32;
                for site in sites.iter() {
                    scope.rebind(site);
                    total = total.wrapping_add(value.eval(&mut scope));
                }
                total
            }
            IntKind::SumPlayers(value) => {
                let players = ctx.game().player_count() as i32;
                let mut scope = ctx.scoped(Register::Player, UNDEFINED);
                let mut total = 0i32;
                for number in 1..=players {
                    scope.rebind(number);
                    total = total.wrapping_add(value.eval(&mut scope));
                }
                total
            }
            IntKind::RegionSize(region) => region.eval(ctx).len() as i32,
            IntKind::ArrayLength(array) => array.eval(ctx).len() as i32,
            IntKind::ArrayAt { array, index: i } => {
                let values = array.eval(ctx);
                let i = i.eval(ctx);
                index(i)
                    .and_then(|i| values.get(i).copied())
                    .unwrap_or(UNDEFINED)
            }

            IntKind::Random { min, max } => {
                let (min, max) = (min.eval(ctx), max.eval(ctx));
                ctx.rng().gen_inclusive(min, max)
            }
            IntKind::LastFrom => ctx.trial().last().map_or(UNDEFINED, |m| m.from),
            IntKind::LastTo => ctx.trial().last().map_or(UNDEFINED, |m| m.to),
            IntKind::MoveNumber => ctx.trial().len() as i32,
        }
    }
}

impl Ludeme for IntFunction {
    fn name(&self) -> &'static str {
        match &self.kind {
            IntKind::Constant(_) => "int",
            IntKind::Register(register) => register.keyword(),
            IntKind::Add(_) => "add",
            IntKind::Sub(..) => "sub",
            IntKind::Mul(_) => "mul",
            IntKind::Div(..) => "div",
            IntKind::Mod(..) => "mod",
            IntKind::Abs(_) => "abs",
            IntKind::Max(_) => "max",
            IntKind::Min(_) => "min",
            IntKind::If { .. } => "if",
            IntKind::Mover => "mover",
            IntKind::NextPlayer => "next",
            IntKind::NumPlayers => "numPlayers",
            IntKind::BoardSize => "boardSize",
            IntKind::Who(_) => "who",
            IntKind::What(_) => "what",
            IntKind::Count(_) => "count",
            IntKind::TopLevel(_) => "topLevel",
            IntKind::Row(_) => "row",
            IntKind::Column(_) => "column",
            IntKind::Score(_) => "score",
            IntKind::TrackLength(_) => "trackLength",
            IntKind::TrackSite { .. } => "trackSite",
            IntKind::HintValue => "hintValue",
            IntKind::Sum { .. } => "sum",
            IntKind::SumPlayers(_) => "sumPlayers",
            IntKind::RegionSize(_) => "size",
            IntKind::ArrayLength(_) => "length",
            IntKind::ArrayAt { .. } => "arrayValue",
            IntKind::Random { .. } => "random",
            IntKind::LastFrom => "lastFrom",
            IntKind::LastTo => "lastTo",
            IntKind::MoveNumber => "moveNumber",
        }
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Int
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn Ludeme)) {
        match &self.kind {
            IntKind::Constant(_)
            | IntKind::Register(_)
            | IntKind::Mover
            | IntKind::NextPlayer
            | IntKind::NumPlayers
            | IntKind::BoardSize
            | IntKind::TrackLength(_)
            | IntKind::HintValue
            | IntKind::LastFrom
            | IntKind::LastTo
            | IntKind::MoveNumber => {}
            IntKind::Add(items) | IntKind::Mul(items) | IntKind::Max(items) | IntKind::Min(items) => {
                for item in items {
                    visit(item);
                }
            }
            IntKind::Sub(a, b)
            | IntKind::Div(a, b)
            | IntKind::Mod(a, b)
            | IntKind::Random { min: a, max: b } => {
                visit(a.as_ref());
                visit(b.as_ref());
            }
            IntKind::Abs(a)
            | IntKind::Who(a)
            | IntKind::What(a)
            | IntKind::Count(CountTarget::Site(a))
            | IntKind::TopLevel(a)
            | IntKind::Row(a)
            | IntKind::Column(a)
            | IntKind::Score(a)
            | IntKind::TrackSite { index: a, .. }
            | IntKind::SumPlayers(a) => visit(a.as_ref()),
            IntKind::Count(CountTarget::Region(region)) | IntKind::RegionSize(region) => {
                visit(region.as_ref());
            }
            IntKind::If {
                condition,
                then,
                otherwise,
            } => {
                visit(condition.as_ref());
                visit(then.as_ref());
                visit(otherwise.as_ref());
            }
            IntKind::Sum { region, value } => {
                visit(region.as_ref());
                visit(value.as_ref());
            }
            IntKind::ArrayLength(array) => visit(array.as_ref()),
            IntKind::ArrayAt { array, index } => {
                visit(array.as_ref());
                visit(index.as_ref());
            }
        }
    }

    fn own_static(&self) -> bool {
        !matches!(
            self.kind,
            IntKind::Register(_)
                | IntKind::Mover
                | IntKind::NextPlayer
                | IntKind::Who(_)
                | IntKind::What(_)
                | IntKind::Count(_)
                | IntKind::TopLevel(_)
                | IntKind::Score(_)
                | IntKind::HintValue
                | IntKind::Random { .. }
                | IntKind::LastFrom
                | IntKind::LastTo
                | IntKind::MoveNumber
        )
    }

    fn own_flags(&self, _game: &GameMetadata) -> GameFlags {
        match &self.kind {
            IntKind::Register(Register::Level) | IntKind::TopLevel(_) => GameFlags::STACKING,
            IntKind::Register(Register::Hint) | IntKind::HintValue => GameFlags::DEDUCTION_PUZZLE,
            IntKind::Register(Register::Region) => GameFlags::NAMED_REGIONS,
            IntKind::Register(Register::Edge) => GameFlags::EDGES,
            IntKind::Score(_) => GameFlags::SCORE,
            IntKind::TrackLength(_) | IntKind::TrackSite { .. } => GameFlags::TRACKS,
            IntKind::Random { .. } => GameFlags::STOCHASTIC,
            IntKind::LastFrom | IntKind::LastTo | IntKind::MoveNumber => GameFlags::HISTORY,
            _ => GameFlags::empty(),
        }
    }

    fn own_concepts(&self, _game: &GameMetadata) -> ConceptSet {
        match &self.kind {
            IntKind::Add(_)
            | IntKind::Sub(..)
            | IntKind::Mul(_)
            | IntKind::Abs(_)
            | IntKind::Max(_)
            | IntKind::Min(_) => ConceptSet::ARITHMETIC,
            IntKind::Div(..) | IntKind::Mod(..) => ConceptSet::ARITHMETIC | ConceptSet::DIVISION,
            IntKind::If { .. } => ConceptSet::CONDITIONAL,
            IntKind::Mover | IntKind::NextPlayer | IntKind::NumPlayers => ConceptSet::PLAYER_QUERY,
            IntKind::BoardSize | IntKind::Row(_) | IntKind::Column(_) => ConceptSet::BOARD_GEOMETRY,
            IntKind::Who(_) | IntKind::What(_) => ConceptSet::SITE_QUERY,
            IntKind::Count(_) => ConceptSet::PIECE_COUNT,
            IntKind::TopLevel(_) => ConceptSet::STACKING,
            IntKind::Score(_) => ConceptSet::SCORING,
            IntKind::TrackLength(_) | IntKind::TrackSite { .. } => ConceptSet::TRACK,
            IntKind::HintValue => ConceptSet::DEDUCTION_PUZZLE,
            IntKind::Sum { .. } => ConceptSet::ITERATION | ConceptSet::ARITHMETIC,
            IntKind::SumPlayers(_) => ConceptSet::PLAYER_ITERATION | ConceptSet::ARITHMETIC,
            IntKind::RegionSize(_) => ConceptSet::REGION_SET,
            IntKind::Random { .. } => ConceptSet::STOCHASTIC,
            IntKind::LastFrom | IntKind::LastTo | IntKind::MoveNumber => ConceptSet::HISTORY,
            _ => ConceptSet::empty(),
        }
    }

    fn own_effects(&self) -> RegisterEffects {
        match &self.kind {
            IntKind::Register(register) => RegisterEffects::reading(*register),
            IntKind::HintValue => RegisterEffects::reading(Register::Hint),
            IntKind::Sum { .. } => RegisterEffects::writing(Register::Site),
            IntKind::SumPlayers(_) => RegisterEffects::writing(Register::Player),
            _ => RegisterEffects::NONE,
        }
    }

    fn own_missing_requirement(&self, game: &GameMetadata, report: &mut Diagnostics) -> bool {
        match &self.kind {
            IntKind::TrackLength(track) | IntKind::TrackSite { track, .. } => {
                require_track(self.name(), track, game, report)
            }
            IntKind::HintValue | IntKind::Register(Register::Hint) => {
                require_hints(self.name(), game, report)
            }
            _ => false,
        }
    }

    fn own_will_crash(&self, _game: &GameMetadata, report: &mut Diagnostics) -> bool {
        match &self.kind {
            IntKind::Div(_, divisor) | IntKind::Mod(_, divisor) if divisor.static_value() == Some(0) => {
                report.add_crash(format!("`{}` by a constant zero", self.name()));
                true
            }
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

impl Fold for IntFunction {
    fn is_constant(&self) -> bool {
        matches!(self.kind, IntKind::Constant(_))
    }

    fn cached_value(&self) -> Option<&i32> {
        self.cache.value()
    }

    fn constant(value: i32) -> Option<Self> {
        Some(Self::constant(value))
    }

    fn fold_children(&mut self, folder: &mut ConstantFolder) {
        match &mut self.kind {
            IntKind::Constant(_)
            | IntKind::Register(_)
            | IntKind::Mover
            | IntKind::NextPlayer
            | IntKind::NumPlayers
            | IntKind::BoardSize
            | IntKind::TrackLength(_)
            | IntKind::HintValue
            | IntKind::LastFrom
            | IntKind::LastTo
            | IntKind::MoveNumber => {}
            IntKind::Add(items) | IntKind::Mul(items) | IntKind::Max(items) | IntKind::Min(items) => {
                for item in items {
                    folder.visit(item);
                }
            }
            IntKind::Sub(a, b)
            | IntKind::Div(a, b)
            | IntKind::Mod(a, b)
            | IntKind::Random { min: a, max: b } => {
                folder.visit(a.as_mut());
                folder.visit(b.as_mut());
            }
            IntKind::Abs(a)
            | IntKind::Who(a)
            | IntKind::What(a)
            | IntKind::Count(CountTarget::Site(a))
            | IntKind::TopLevel(a)
            | IntKind::Row(a)
            | IntKind::Column(a)
            | IntKind::Score(a)
            | IntKind::TrackSite { index: a, .. }
            | IntKind::SumPlayers(a) => folder.visit(a.as_mut()),
            IntKind::Count(CountTarget::Region(region)) | IntKind::RegionSize(region) => {
                folder.visit(region.as_mut());
            }
            IntKind::If {
                condition,
                then,
                otherwise,
            } => {
                folder.visit(condition.as_mut());
                folder.visit(then.as_mut());
                folder.visit(otherwise.as_mut());
            }
            IntKind::Sum { region, value } => {
                folder.visit(region.as_mut());
                folder.visit(value.as_mut());
            }
            IntKind::ArrayLength(array) => folder.visit(array.as_mut()),
            IntKind::ArrayAt { array, index } => {
                folder.visit(array.as_mut());
                folder.visit(index.as_mut());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Move, MetadataBuilder};
    use crate::ludeme::{IntArrayFunction, RegionFunction};

    fn game() -> Arc<GameMetadata> {
        Arc::new(
            MetadataBuilder::new("Test", 2)
                .board(3, 3)
                .component_per_player("Disc")
                .track("Main", vec![0, 1, 2, 5, 8], None)
                .build()
                .unwrap(),
        )
    }

    fn eval(node: &IntFunction) -> i32 {
        let mut ctx = Context::new(game(), 1);
        node.eval(&mut ctx)
    }

    fn c(value: i32) -> IntFunction {
        IntFunction::constant(value)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval(&IntFunction::add([c(2), c(3), c(4)])), 9);
        assert_eq!(eval(&IntFunction::sub(c(2), c(5))), -3);
        assert_eq!(eval(&IntFunction::mul([c(2), c(3)])), 6);
        assert_eq!(eval(&IntFunction::div(c(7), c(2))), 3);
        assert_eq!(eval(&IntFunction::modulo(c(-1), c(3))), 2);
        assert_eq!(eval(&IntFunction::abs(c(-4))), 4);
        assert_eq!(eval(&IntFunction::max([c(1), c(9), c(4)])), 9);
        assert_eq!(eval(&IntFunction::min([c(1), c(9), c(4)])), 1);
    }

    #[test]
    fn test_undefined_results() {
        assert_eq!(eval(&IntFunction::div(c(7), c(0))), UNDEFINED);
        assert_eq!(eval(&IntFunction::modulo(c(7), c(0))), UNDEFINED);
        assert_eq!(eval(&IntFunction::max(Vec::new())), UNDEFINED);
        assert_eq!(eval(&IntFunction::who(c(99))), UNDEFINED);
        assert_eq!(eval(&IntFunction::track_length("Missing")), UNDEFINED);
        assert_eq!(eval(&IntFunction::track_site("Main", c(5))), UNDEFINED);
        assert_eq!(eval(&IntFunction::last_to()), UNDEFINED);
        assert_eq!(eval(&IntFunction::site()), UNDEFINED);
    }

    #[test]
    fn test_board_and_players() {
        assert_eq!(eval(&IntFunction::board_size()), 9);
        assert_eq!(eval(&IntFunction::num_players()), 2);
        assert_eq!(eval(&IntFunction::mover()), 1);
        assert_eq!(eval(&IntFunction::next_player()), 2);
        assert_eq!(eval(&IntFunction::row(c(7))), 2);
        assert_eq!(eval(&IntFunction::column(c(7))), 1);
        assert_eq!(eval(&IntFunction::track_length("Main")), 5);
        assert_eq!(eval(&IntFunction::track_site("Main", c(3))), 5);
    }

    #[test]
    fn test_state_queries() {
        let mut ctx = Context::new(game(), 1);
        ctx.apply(&Move::add(PlayerId::new(0), 4, 1));
        ctx.apply(&Move::add(PlayerId::new(1), 0, 2));

        assert_eq!(IntFunction::who(c(4)).eval(&mut ctx), 1);
        assert_eq!(IntFunction::what(c(0)).eval(&mut ctx), 2);
        assert_eq!(IntFunction::count_at(c(4)).eval(&mut ctx), 1);
        assert_eq!(IntFunction::count_in(RegionFunction::all()).eval(&mut ctx), 2);
        assert_eq!(IntFunction::top_level(c(4)).eval(&mut ctx), 0);
        assert_eq!(IntFunction::top_level(c(5)).eval(&mut ctx), UNDEFINED);
        assert_eq!(IntFunction::last_to().eval(&mut ctx), 0);
        assert_eq!(IntFunction::move_number().eval(&mut ctx), 2);
    }

    #[test]
    fn test_count_arguments() {
        let both = IntFunction::count(Some(c(0)), Some(RegionFunction::all()));
        assert!(matches!(both, Err(Error::ConflictingArguments { ludeme: "count", .. })));

        let neither = IntFunction::count(None, None);
        assert!(matches!(neither, Err(Error::MissingArgument { .. })));

        assert!(IntFunction::count(Some(c(0)), None).is_ok());
    }

    #[test]
    fn test_random_bounds() {
        assert!(IntFunction::random(c(6), c(1)).is_err());

        let node = IntFunction::random(c(1), c(6)).unwrap();
        let mut ctx = Context::new(game(), 9);
        for _ in 0..50 {
            let roll = node.eval(&mut ctx);
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn test_sum_binds_and_restores_site() {
        let node = IntFunction::sum(RegionFunction::sites([1, 2, 3]), IntFunction::site());
        let mut ctx = Context::new(game(), 1);
        ctx.set(Register::Site, 40);

        assert_eq!(node.eval(&mut ctx), 6);
        assert_eq!(ctx.get(Register::Site), 40);
    }

    #[test]
    fn test_sum_players() {
        let node = IntFunction::sum_players(IntFunction::register(Register::Player));
        assert_eq!(eval(&node), 3);
        assert!(node.writes_effects().contains(Register::Player.bit()));
    }

    #[test]
    fn test_array_access() {
        let array = IntArrayFunction::values([c(4), c(5)]);
        assert_eq!(eval(&IntFunction::array_length(array.clone())), 2);
        assert_eq!(eval(&IntFunction::array_at(array.clone(), c(1))), 5);
        assert_eq!(eval(&IntFunction::array_at(array, c(2))), UNDEFINED);
    }

    #[test]
    fn test_static_flags() {
        assert!(IntFunction::add([c(1), IntFunction::board_size()]).is_static());
        assert!(!IntFunction::add([c(1), IntFunction::mover()]).is_static());
        assert!(!IntFunction::random(c(1), c(2)).unwrap().is_static());
        // Sum over a constant region of a register bound by the sum itself
        // still reads a register, so it is not treated as static.
        assert!(!IntFunction::sum(RegionFunction::all(), IntFunction::site()).is_static());
    }

    #[test]
    fn test_preprocess_caches_static_value() {
        let game = game();
        let node = IntFunction::mul([c(6), c(7)]);
        node.preprocess(&game);
        assert_eq!(node.static_value(), Some(42));

        let dynamic = IntFunction::add([c(1), IntFunction::mover()]);
        dynamic.preprocess(&game);
        assert_eq!(dynamic.static_value(), None);
    }

    #[test]
    fn test_flags_and_concepts() {
        let game = game();
        let node = IntFunction::add([IntFunction::score(IntFunction::mover()), IntFunction::track_length("Main")]);
        let flags = node.game_flags(&game);
        assert!(flags.contains(GameFlags::SCORE | GameFlags::TRACKS));
        assert!(node.concepts(&game).contains(ConceptSet::ARITHMETIC | ConceptSet::SCORING));
    }

    #[test]
    fn test_missing_track_reported() {
        let game = MetadataBuilder::new("NoTracks", 2).build().unwrap();
        let node = IntFunction::track_length("Main");
        let mut report = Diagnostics::new();

        assert!(node.missing_requirement(&game, &mut report));
        assert!(report.missing_report().contains("track"));
    }

    #[test]
    fn test_division_by_static_zero_will_crash() {
        let game = game();
        let node = IntFunction::div(IntFunction::mover(), IntFunction::sub(c(2), c(2)));
        node.preprocess(&game);

        let mut report = Diagnostics::new();
        assert!(node.will_crash(&game, &mut report));
        assert!(report.crash_report().contains("div"));

        let safe = IntFunction::div(IntFunction::mover(), c(2));
        assert!(!safe.will_crash(&game, &mut Diagnostics::new()));
    }
}
