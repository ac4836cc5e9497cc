//! Region ludemes: sets of sites.

use std::sync::{Arc, OnceLock};

use super::boolean::BooleanFunction;
use super::cache::NodeCache;
use super::flags::{ConceptSet, GameFlags};
use super::int::IntFunction;
use super::traits::{compute_effects, compute_static, preprocess_node, Function, Ludeme};
use super::value::{Region, ValueKind, UNDEFINED};
use super::{require_hints, require_regions, require_track};
use crate::analysis::Diagnostics;
use crate::context::{Context, Register, RegisterEffects};
use crate::core::{GameMetadata, Relation};
use crate::optimiser::{ConstantFolder, Fold};

/// A region ludeme.
#[derive(Clone, Debug)]
pub struct RegionFunction {
    kind: RegionKind,
    cache: NodeCache<Region>,
}

/// Region node kinds.
#[derive(Clone, Debug)]
pub enum RegionKind {
    /// Literal list of sites.
    Sites(Region),
    /// Every site of the board.
    All,
    Empty,
    /// Sites owned by a player number.
    Occupied(Box<IntFunction>),
    /// A region declared in the metadata.
    Named(String),
    /// Named region whose index is in the `region` register.
    Current,
    /// Neighbours of a site. Without an explicit relation the board's
    /// default is used, resolved once during preprocessing.
    Adjacent {
        site: Box<IntFunction>,
        relation: Option<Relation>,
        resolved: OnceLock<Relation>,
    },
    Union(Vec<RegionFunction>),
    Intersection(Vec<RegionFunction>),
    Difference(Box<RegionFunction>, Box<RegionFunction>),
    /// Sites of `region` that satisfy `condition`, with `site` bound.
    Filter {
        region: Box<RegionFunction>,
        condition: Box<BooleanFunction>,
    },
    /// Sites of a named track.
    Track(String),
    Row(Box<IntFunction>),
    Column(Box<IntFunction>),
    /// Sites of the hint in the `hint` register.
    HintRegion,
    /// Both ends of the edge in the `edge` register.
    EdgeEnds,
}

impl RegionFunction {
    /// Wrap a node kind.
    #[must_use]
    pub fn new(kind: RegionKind) -> Self {
        Self {
            kind,
            cache: NodeCache::new(),
        }
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> &RegionKind {
        &self.kind
    }

    /// Literal value, or the cached value of a preprocessed static node.
    #[must_use]
    pub fn static_value(&self) -> Option<&Region> {
        match &self.kind {
            RegionKind::Sites(region) => Some(region),
            _ => self.cache.value(),
        }
    }

    /// Relation used by an adjacency node once preprocessed.
    #[must_use]
    pub fn resolved_relation(&self) -> Option<Relation> {
        match &self.kind {
            RegionKind::Adjacent { resolved, .. } => resolved.get().copied(),
            _ => None,
        }
    }

    pub fn sites(sites: impl IntoIterator<Item = i32>) -> Self {
        Self::new(RegionKind::Sites(Region::from_sites(sites)))
    }

    pub fn all() -> Self {
        Self::new(RegionKind::All)
    }

    pub fn empty() -> Self {
        Self::new(RegionKind::Empty)
    }

    pub fn occupied(who: IntFunction) -> Self {
        Self::new(RegionKind::Occupied(Box::new(who)))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(RegionKind::Named(name.into()))
    }

    pub fn current() -> Self {
        Self::new(RegionKind::Current)
    }

    pub fn adjacent(site: IntFunction, relation: Option<Relation>) -> Self {
        Self::new(RegionKind::Adjacent {
            site: Box::new(site),
            relation,
            resolved: OnceLock::new(),
        })
    }

    pub fn union(items: impl IntoIterator<Item = RegionFunction>) -> Self {
        Self::new(RegionKind::Union(items.into_iter().collect()))
    }

    pub fn intersection(items: impl IntoIterator<Item = RegionFunction>) -> Self {
        Self::new(RegionKind::Intersection(items.into_iter().collect()))
    }

    pub fn difference(a: RegionFunction, b: RegionFunction) -> Self {
        Self::new(RegionKind::Difference(Box::new(a), Box::new(b)))
    }

    pub fn filter(region: RegionFunction, condition: BooleanFunction) -> Self {
        Self::new(RegionKind::Filter {
            region: Box::new(region),
            condition: Box::new(condition),
        })
    }

    pub fn track(name: impl Into<String>) -> Self {
        Self::new(RegionKind::Track(name.into()))
    }

    pub fn row(row: IntFunction) -> Self {
        Self::new(RegionKind::Row(Box::new(row)))
    }

    pub fn column(column: IntFunction) -> Self {
        Self::new(RegionKind::Column(Box::new(column)))
    }

    pub fn hint_region() -> Self {
        Self::new(RegionKind::HintRegion)
    }

    pub fn edge_ends() -> Self {
        Self::new(RegionKind::EdgeEnds)
    }
}

impl Function for RegionFunction {
    type Output = Region;

    fn eval(&self, ctx: &mut Context) -> Region {
        if let Some(value) = self.cache.value() {
            return value.clone();
        }

        match &self.kind {
            RegionKind::Sites(region) => region.clone(),
            RegionKind::All => (0..ctx.game().board().num_sites() as i32).collect(),
            RegionKind::Empty => ctx.state().sites_of(0).collect(),
            RegionKind::Occupied(who) => {
                let who = who.eval(ctx);
                if who <= 0 {
                    return Region::new();
                }
                ctx.state().sites_of(who).collect()
            }
            RegionKind::Named(name) => ctx
                .game()
                .region(name)
                .map(|r| Region::from_sites(r.sites.iter().copied()))
                .unwrap_or_default(),
            RegionKind::Current => {
                let index = ctx.get(Register::Region);
                ctx.game()
                    .region_at(index)
                    .map(|r| Region::from_sites(r.sites.iter().copied()))
                    .unwrap_or_default()
            }
            RegionKind::Adjacent {
                site,
                relation,
                resolved,
            } => {
                let site = site.eval(ctx);
                let board = ctx.game().board();
                if !board.contains(site) {
                    return Region::new();
                }
                let relation = resolved
                    .get()
                    .copied()
                    .or(*relation)
                    .unwrap_or_else(|| ctx.game().default_relation());
                Region::from_sites(board.adjacent(site, relation).iter().copied())
            }
            RegionKind::Union(items) => items
                .iter()
                .fold(Region::new(), |acc, item| acc.union(&item.eval(ctx))),
            RegionKind::Intersection(items) => {
                let mut items = items.iter();
                let Some(first) = items.next() else {
                    return Region::new();
                };
                let first = first.eval(ctx);
                items.fold(first, |acc, item| acc.intersection(&item.eval(ctx)))
            }
            RegionKind::Difference(a, b) => {
                let a = a.eval(ctx);
                a.difference(&b.eval(ctx))
            }
            RegionKind::Filter { region, condition } => {
                let sites = region.eval(ctx);
                let mut scope = ctx.scoped(Register::Site, UNDEFINED);
                sites
                    .iter()
                    .filter(|&site| {
                        scope.rebind(site);
                        condition.eval(&mut scope)
                    })
                    .collect()
            }
            RegionKind::Track(name) => ctx
                .game()
                .track(name)
                .map(|t| Region::from_sites(t.sites.iter().copied()))
                .unwrap_or_default(),
            RegionKind::Row(row) => {
                let row = row.eval(ctx);
                let board = ctx.game().board();
                (0..board.cols() as i32)
                    .filter_map(|col| board.site_at(row, col))
                    .collect()
            }
            RegionKind::Column(col) => {
                let col = col.eval(ctx);
                let board = ctx.game().board();
                (0..board.rows() as i32)
                    .filter_map(|row| board.site_at(row, col))
                    .collect()
            }
            RegionKind::HintRegion => {
                let hint = ctx.get(Register::Hint);
                ctx.game()
                    .hint_at(hint)
                    .map(|h| Region::from_sites(h.sites.iter().copied()))
                    .unwrap_or_default()
            }
            RegionKind::EdgeEnds => {
                let edge = ctx.get(Register::Edge);
                ctx.game()
                    .board()
                    .edge(edge)
                    .map(|(a, b)| Region::from_sites([a, b]))
                    .unwrap_or_default()
            }
        }
    }
}

impl Ludeme for RegionFunction {
    fn name(&self) -> &'static str {
        match &self.kind {
            RegionKind::Sites(_) => "sites",
            RegionKind::All => "sites Board",
            RegionKind::Empty => "sites Empty",
            RegionKind::Occupied(_) => "sites Occupied",
            RegionKind::Named(_) => "sites Named",
            RegionKind::Current => "sites Current",
            RegionKind::Adjacent { .. } => "sites Around",
            RegionKind::Union(_) => "union",
            RegionKind::Intersection(_) => "intersection",
            RegionKind::Difference(..) => "difference",
            RegionKind::Filter { .. } => "forEach",
            RegionKind::Track(_) => "sites Track",
            RegionKind::Row(_) => "sites Row",
            RegionKind::Column(_) => "sites Column",
            RegionKind::HintRegion => "sites Hint",
            RegionKind::EdgeEnds => "sites Edge",
        }
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Region
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn Ludeme)) {
        match &self.kind {
            RegionKind::Sites(_)
            | RegionKind::All
            | RegionKind::Empty
            | RegionKind::Named(_)
            | RegionKind::Current
            | RegionKind::Track(_)
            | RegionKind::HintRegion
            | RegionKind::EdgeEnds => {}
            RegionKind::Occupied(a) | RegionKind::Row(a) | RegionKind::Column(a) => visit(a.as_ref()),
            RegionKind::Adjacent { site, .. } => visit(site.as_ref()),
            RegionKind::Union(items) | RegionKind::Intersection(items) => {
                for item in items {
                    visit(item);
                }
            }
            RegionKind::Difference(a, b) => {
                visit(a.as_ref());
                visit(b.as_ref());
            }
            RegionKind::Filter { region, condition } => {
                visit(region.as_ref());
                visit(condition.as_ref());
            }
        }
    }

    fn own_static(&self) -> bool {
        !matches!(
            self.kind,
            RegionKind::Empty
                | RegionKind::Occupied(_)
                | RegionKind::Current
                | RegionKind::HintRegion
                | RegionKind::EdgeEnds
        )
    }

    fn own_flags(&self, _game: &GameMetadata) -> GameFlags {
        match &self.kind {
            RegionKind::Named(_) | RegionKind::Current => GameFlags::NAMED_REGIONS,
            RegionKind::Track(_) => GameFlags::TRACKS,
            RegionKind::HintRegion => GameFlags::DEDUCTION_PUZZLE,
            RegionKind::EdgeEnds => GameFlags::EDGES,
            _ => GameFlags::empty(),
        }
    }

    fn own_concepts(&self, _game: &GameMetadata) -> ConceptSet {
        match &self.kind {
            RegionKind::Sites(_) | RegionKind::All => ConceptSet::REGION_SET,
            RegionKind::Empty | RegionKind::Occupied(_) => ConceptSet::SITE_QUERY | ConceptSet::REGION_SET,
            RegionKind::Named(_) | RegionKind::Current => ConceptSet::NAMED_REGION,
            RegionKind::Adjacent { .. } => ConceptSet::ADJACENCY,
            RegionKind::Union(_) | RegionKind::Intersection(_) | RegionKind::Difference(..) => {
                ConceptSet::SET_ALGEBRA
            }
            RegionKind::Filter { .. } => ConceptSet::ITERATION | ConceptSet::REGION_SET,
            RegionKind::Track(_) => ConceptSet::TRACK,
            RegionKind::Row(_) | RegionKind::Column(_) => ConceptSet::BOARD_GEOMETRY,
            RegionKind::HintRegion => ConceptSet::DEDUCTION_PUZZLE,
            RegionKind::EdgeEnds => ConceptSet::EDGE,
        }
    }

    fn own_effects(&self) -> RegisterEffects {
        match &self.kind {
            RegionKind::Current => RegisterEffects::reading(Register::Region),
            RegionKind::HintRegion => RegisterEffects::reading(Register::Hint),
            RegionKind::EdgeEnds => RegisterEffects::reading(Register::Edge),
            RegionKind::Filter { .. } => RegisterEffects::writing(Register::Site),
            _ => RegisterEffects::NONE,
        }
    }

    fn own_missing_requirement(&self, game: &GameMetadata, report: &mut Diagnostics) -> bool {
        match &self.kind {
            RegionKind::Named(name) => {
                if require_regions(self.name(), game, report) {
                    return true;
                }
                if game.region(name).is_none() {
                    report.add_missing(format!("`{}` refers to undeclared region `{name}`", self.name()));
                    return true;
                }
                false
            }
            RegionKind::Current => require_regions(self.name(), game, report),
            RegionKind::Track(track) => require_track(self.name(), track, game, report),
            RegionKind::HintRegion => require_hints(self.name(), game, report),
            _ => false,
        }
    }

    fn own_will_crash(&self, game: &GameMetadata, report: &mut Diagnostics) -> bool {
        let RegionKind::Sites(region) = &self.kind else {
            return false;
        };
        let board = game.board();
        let mut crash = false;
        for site in region.iter().filter(|&s| !board.contains(s)) {
            report.add_crash(format!(
                "`sites` lists site {site} but the board has {} sites",
                board.num_sites()
            ));
            crash = true;
        }
        crash
    }

    fn resolve_defaults(&self, game: &GameMetadata) {
        if let RegionKind::Adjacent {
            relation, resolved, ..
        } = &self.kind
        {
            resolved.get_or_init(|| relation.unwrap_or(game.default_relation()));
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

impl Fold for RegionFunction {
    fn is_constant(&self) -> bool {
        matches!(self.kind, RegionKind::Sites(_))
    }

    fn cached_value(&self) -> Option<&Region> {
        self.cache.value()
    }

    fn constant(value: Region) -> Option<Self> {
        Some(Self::new(RegionKind::Sites(value)))
    }

    fn fold_children(&mut self, folder: &mut ConstantFolder) {
        match &mut self.kind {
            RegionKind::Sites(_)
            | RegionKind::All
            | RegionKind::Empty
            | RegionKind::Named(_)
            | RegionKind::Current
            | RegionKind::Track(_)
            | RegionKind::HintRegion
            | RegionKind::EdgeEnds => {}
            RegionKind::Occupied(a) | RegionKind::Row(a) | RegionKind::Column(a) => {
                folder.visit(a.as_mut());
            }
            RegionKind::Adjacent { site, .. } => folder.visit(site.as_mut()),
            RegionKind::Union(items) | RegionKind::Intersection(items) => {
                for item in items {
                    folder.visit(item);
                }
            }
            RegionKind::Difference(a, b) => {
                folder.visit(a.as_mut());
                folder.visit(b.as_mut());
            }
            RegionKind::Filter { region, condition } => {
                folder.visit(region.as_mut());
                folder.visit(condition.as_mut());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Move, PlayerId};

    fn game() -> Arc<GameMetadata> {
        Arc::new(
            GameMetadata::builder("Test", 2)
                .board(3, 3)
                .default_relation(Relation::All)
                .component_per_player("Disc")
                .region("Centre", vec![4], None)
                .track("Main", vec![0, 1, 2], None)
                .hint(vec![6, 7], 3)
                .build()
                .unwrap(),
        )
    }

    fn sites(region: Region) -> Vec<i32> {
        region.iter().collect()
    }

    #[test]
    fn test_board_regions() {
        let mut ctx = Context::new(game(), 1);
        assert_eq!(RegionFunction::all().eval(&mut ctx).len(), 9);
        assert_eq!(sites(RegionFunction::row(IntFunction::constant(1)).eval(&mut ctx)), vec![3, 4, 5]);
        assert_eq!(sites(RegionFunction::column(IntFunction::constant(2)).eval(&mut ctx)), vec![2, 5, 8]);
        assert!(RegionFunction::row(IntFunction::constant(5)).eval(&mut ctx).is_empty());
        assert_eq!(sites(RegionFunction::named("Centre").eval(&mut ctx)), vec![4]);
        assert_eq!(sites(RegionFunction::track("Main").eval(&mut ctx)), vec![0, 1, 2]);
    }

    #[test]
    fn test_occupancy() {
        let mut ctx = Context::new(game(), 1);
        ctx.apply(&Move::add(PlayerId::new(0), 4, 1));

        assert_eq!(RegionFunction::empty().eval(&mut ctx).len(), 8);
        assert_eq!(sites(RegionFunction::occupied(IntFunction::mover()).eval(&mut ctx)), Vec::<i32>::new());
        assert_eq!(sites(RegionFunction::occupied(IntFunction::constant(1)).eval(&mut ctx)), vec![4]);
    }

    #[test]
    fn test_set_algebra() {
        let mut ctx = Context::new(game(), 1);
        let a = || RegionFunction::sites([0, 1, 2]);
        let b = || RegionFunction::sites([2, 3]);

        assert_eq!(sites(RegionFunction::union([a(), b()]).eval(&mut ctx)), vec![0, 1, 2, 3]);
        assert_eq!(sites(RegionFunction::intersection([a(), b()]).eval(&mut ctx)), vec![2]);
        assert_eq!(sites(RegionFunction::difference(a(), b()).eval(&mut ctx)), vec![0, 1]);
        assert!(RegionFunction::intersection(Vec::new()).eval(&mut ctx).is_empty());
    }

    #[test]
    fn test_filter_binds_site() {
        let mut ctx = Context::new(game(), 1);
        let odd = BooleanFunction::eq(
            IntFunction::modulo(IntFunction::site(), IntFunction::constant(2)),
            IntFunction::constant(1),
        );
        let region = RegionFunction::filter(RegionFunction::all(), odd);
        assert_eq!(sites(region.eval(&mut ctx)), vec![1, 3, 5, 7]);
        assert_eq!(ctx.get(Register::Site), UNDEFINED);
    }

    #[test]
    fn test_adjacent_default_resolved_on_preprocess() {
        let game = game();
        let around = RegionFunction::adjacent(IntFunction::constant(0), None);
        assert_eq!(around.resolved_relation(), None);

        around.preprocess(&game);
        assert_eq!(around.resolved_relation(), Some(Relation::All));
        assert_eq!(around.static_value().map(Region::len), Some(3));

        let explicit = RegionFunction::adjacent(IntFunction::constant(0), Some(Relation::Orthogonal));
        explicit.preprocess(&game);
        assert_eq!(explicit.resolved_relation(), Some(Relation::Orthogonal));
        assert_eq!(explicit.static_value().map(Region::len), Some(2));
    }

    #[test]
    fn test_register_driven_regions() {
        let mut ctx = Context::new(game(), 1);
        ctx.set(Register::Hint, 0);
        ctx.set(Register::Region, 0);
        ctx.set(Register::Edge, 0);

        assert_eq!(sites(RegionFunction::hint_region().eval(&mut ctx)), vec![6, 7]);
        assert_eq!(sites(RegionFunction::current().eval(&mut ctx)), vec![4]);
        assert_eq!(RegionFunction::edge_ends().eval(&mut ctx).len(), 2);

        ctx.set(Register::Hint, 5);
        assert!(RegionFunction::hint_region().eval(&mut ctx).is_empty());
    }

    #[test]
    fn test_static_region_cached() {
        let game = game();
        let node = RegionFunction::union([RegionFunction::row(IntFunction::constant(0)), RegionFunction::named("Centre")]);
        node.preprocess(&game);
        assert!(node.is_static());
        assert_eq!(node.static_value().map(Region::len), Some(4));

        let dynamic = RegionFunction::union([RegionFunction::empty(), RegionFunction::named("Centre")]);
        dynamic.preprocess(&game);
        assert!(!dynamic.is_static());
        assert!(dynamic.static_value().is_none());
    }

    #[test]
    fn test_missing_region_and_off_board_sites() {
        let game = game();
        let mut report = Diagnostics::new();
        assert!(RegionFunction::named("Home").missing_requirement(&game, &mut report));
        assert!(report.missing_report().contains("Home"));

        assert!(RegionFunction::sites([2, 9]).will_crash(&game, &mut report));
        assert!(report.crash_report().contains("site 9"));
    }
}
