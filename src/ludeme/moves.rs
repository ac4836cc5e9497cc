//! Move-generating ludemes.
//!
//! Generators read the mover and the board, so none of them is static and
//! their results are never cached.

use std::sync::{Arc, OnceLock};

use super::boolean::BooleanFunction;
use super::cache::NodeCache;
use super::flags::{ConceptSet, GameFlags};
use super::int::IntFunction;
use super::region::RegionFunction;
use super::require_track;
use super::traits::{compute_effects, compute_static, preprocess_node, Function, Ludeme};
use super::value::{ValueKind, UNDEFINED};
use crate::analysis::Diagnostics;
use crate::context::{Context, Register, RegisterEffects, RegisterSet};
use crate::core::{GameMetadata, Move, Moves, Relation};
use crate::optimiser::{ConstantFolder, Fold};

/// A move generator.
#[derive(Clone, Debug)]
pub struct MovesFunction {
    kind: MovesKind,
    cache: NodeCache<Moves>,
}

/// Move generator kinds.
#[derive(Clone, Debug)]
pub enum MovesKind {
    Pass,
    /// Place a piece on each site of `to`, bound to `to`, that passes
    /// `condition` (default: the site is empty). Without `piece` the
    /// mover's first component is placed.
    Add {
        to: Box<RegionFunction>,
        piece: Option<Box<IntFunction>>,
        condition: Option<Box<BooleanFunction>>,
    },
    /// Step each of the mover's pieces on `from` to an adjacent site.
    /// `from` and `to` are bound while `condition` is checked (default: the
    /// destination is not friendly).
    Step {
        from: Box<RegionFunction>,
        relation: Option<Relation>,
        resolved: OnceLock<Relation>,
        condition: Option<Box<BooleanFunction>>,
    },
    /// Remove the piece on each occupied site of a region.
    Remove(Box<RegionFunction>),
    Union(Vec<MovesFunction>),
    If {
        condition: Box<BooleanFunction>,
        then: Box<MovesFunction>,
        otherwise: Option<Box<MovesFunction>>,
    },
    /// Advance each of the mover's pieces on a track by `steps` sites.
    /// `steps` is evaluated per piece with `from` bound to its site.
    TrackStep {
        track: String,
        steps: Box<IntFunction>,
    },
}

impl MovesFunction {
    #[must_use]
    pub fn new(kind: MovesKind) -> Self {
        Self {
            kind,
            cache: NodeCache::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &MovesKind {
        &self.kind
    }

    /// Relation a step generator uses once preprocessed.
    #[must_use]
    pub fn resolved_relation(&self) -> Option<Relation> {
        match &self.kind {
            MovesKind::Step { resolved, .. } => resolved.get().copied(),
            _ => None,
        }
    }

    pub fn pass() -> Self {
        Self::new(MovesKind::Pass)
    }

    pub fn add(to: RegionFunction, piece: Option<IntFunction>, condition: Option<BooleanFunction>) -> Self {
        Self::new(MovesKind::Add {
            to: Box::new(to),
            piece: piece.map(Box::new),
            condition: condition.map(Box::new),
        })
    }

    pub fn step(from: RegionFunction, relation: Option<Relation>, condition: Option<BooleanFunction>) -> Self {
        Self::new(MovesKind::Step {
            from: Box::new(from),
            relation,
            resolved: OnceLock::new(),
            condition: condition.map(Box::new),
        })
    }

    pub fn remove(region: RegionFunction) -> Self {
        Self::new(MovesKind::Remove(Box::new(region)))
    }

    pub fn union(items: impl IntoIterator<Item = MovesFunction>) -> Self {
        Self::new(MovesKind::Union(items.into_iter().collect()))
    }

    pub fn if_then_else(condition: BooleanFunction, then: MovesFunction, otherwise: Option<MovesFunction>) -> Self {
        Self::new(MovesKind::If {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        })
    }

    pub fn track_step(track: impl Into<String>, steps: IntFunction) -> Self {
        Self::new(MovesKind::TrackStep {
            track: track.into(),
            steps: Box::new(steps),
        })
    }
}

impl Function for MovesFunction {
    type Output = Moves;

    fn eval(&self, ctx: &mut Context) -> Moves {
        let mover = ctx.mover();
        let who = mover.number();
        let mut moves = Moves::new();

        match &self.kind {
            MovesKind::Pass => moves.push(Move::pass(mover)),
            MovesKind::Add {
                to,
                piece,
                condition,
            } => {
                let sites = to.eval(ctx);
                let default_piece = ctx.game().default_component(mover).unwrap_or(0);
                let mut scope = ctx.scoped(Register::To, UNDEFINED);
                for site in sites.iter() {
                    scope.rebind(site);
                    let legal = match condition {
                        Some(condition) => condition.eval(&mut scope),
                        None => scope.state().is_empty(site),
                    };
                    if legal {
                        let what = piece.as_ref().map_or(default_piece, |p| p.eval(&mut scope));
                        moves.push(Move::add(mover, site, what));
                    }
                }
            }
            MovesKind::Step {
                from,
                relation,
                resolved,
                condition,
            } => {
                let sources = from.eval(ctx);
                let game = Arc::clone(ctx.game_handle());
                let relation = resolved
                    .get()
                    .copied()
                    .or(*relation)
                    .unwrap_or(game.default_relation());
                let mut from_scope = ctx.scoped(Register::From, UNDEFINED);
                for site in sources.iter() {
                    if from_scope.state().who(site) != who {
                        continue;
                    }
                    from_scope.rebind(site);
                    let what = from_scope.state().what(site);
                    let mut to_scope = from_scope.scoped(Register::To, UNDEFINED);
                    for &target in game.board().adjacent(site, relation) {
                        to_scope.rebind(target);
                        let legal = match condition {
                            Some(condition) => condition.eval(&mut to_scope),
                            None => to_scope.state().who(target) != who,
                        };
                        if legal {
                            moves.push(Move::step(mover, site, target, what));
                        }
                    }
                }
            }
            MovesKind::Remove(region) => {
                let sites = region.eval(ctx);
                let state = ctx.state();
                moves = sites
                    .iter()
                    .filter(|&site| state.who(site) > 0)
                    .map(|site| Move::remove(mover, site))
                    .collect();
            }
            MovesKind::Union(items) => {
                for item in items {
                    moves.extend(item.eval(ctx));
                }
            }
            MovesKind::If {
                condition,
                then,
                otherwise,
            } => {
                if condition.eval(ctx) {
                    moves = then.eval(ctx);
                } else if let Some(otherwise) = otherwise {
                    moves = otherwise.eval(ctx);
                }
            }
            MovesKind::TrackStep { track, steps } => {
                let game = Arc::clone(ctx.game_handle());
                let Some(track) = game.track(track) else {
                    return moves;
                };
                let mut scope = ctx.scoped(Register::From, UNDEFINED);
                for (i, &site) in track.sites.iter().enumerate() {
                    if scope.state().who(site) != who {
                        continue;
                    }
                    scope.rebind(site);
                    let Ok(n) = usize::try_from(steps.eval(&mut scope)) else {
                        continue;
                    };
                    let Some(&target) = track.sites.get(i + n).filter(|_| n > 0) else {
                        continue;
                    };
                    if scope.state().who(target) != who {
                        moves.push(Move::step(mover, site, target, scope.state().what(site)));
                    }
                }
            }
        }
        moves
    }
}

impl Ludeme for MovesFunction {
    fn name(&self) -> &'static str {
        match &self.kind {
            MovesKind::Pass => "pass",
            MovesKind::Add { .. } => "move Add",
            MovesKind::Step { .. } => "move Step",
            MovesKind::Remove(_) => "move Remove",
            MovesKind::Union(_) => "or",
            MovesKind::If { .. } => "if",
            MovesKind::TrackStep { .. } => "move Track",
        }
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Moves
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn Ludeme)) {
        match &self.kind {
            MovesKind::Pass => {}
            MovesKind::Add {
                to,
                piece,
                condition,
            } => {
                visit(to.as_ref());
                if let Some(piece) = piece {
                    visit(piece.as_ref());
                }
                if let Some(condition) = condition {
                    visit(condition.as_ref());
                }
            }
            MovesKind::Step { from, condition, .. } => {
                visit(from.as_ref());
                if let Some(condition) = condition {
                    visit(condition.as_ref());
                }
            }
            MovesKind::Remove(region) => visit(region.as_ref()),
            MovesKind::Union(items) => {
                for item in items {
                    visit(item);
                }
            }
            MovesKind::If {
                condition,
                then,
                otherwise,
            } => {
                visit(condition.as_ref());
                visit(then.as_ref());
                if let Some(otherwise) = otherwise {
                    visit(otherwise.as_ref());
                }
            }
            MovesKind::TrackStep { steps, .. } => visit(steps.as_ref()),
        }
    }

    fn own_static(&self) -> bool {
        false
    }

    fn own_flags(&self, _game: &GameMetadata) -> GameFlags {
        match self.kind {
            MovesKind::TrackStep { .. } => GameFlags::TRACKS,
            _ => GameFlags::empty(),
        }
    }

    fn own_concepts(&self, _game: &GameMetadata) -> ConceptSet {
        match self.kind {
            MovesKind::Pass => ConceptSet::PASS_MOVE,
            MovesKind::Add { .. } => ConceptSet::PLACEMENT,
            MovesKind::Step { .. } => ConceptSet::STEP_MOVE | ConceptSet::ADJACENCY,
            MovesKind::Remove(_) => ConceptSet::REMOVAL,
            MovesKind::Union(_) => ConceptSet::empty(),
            MovesKind::If { .. } => ConceptSet::CONDITIONAL,
            MovesKind::TrackStep { .. } => ConceptSet::TRACK_MOVE | ConceptSet::TRACK,
        }
    }

    fn own_effects(&self) -> RegisterEffects {
        let writes = match self.kind {
            MovesKind::Add { .. } => RegisterSet::TO,
            MovesKind::Step { .. } => RegisterSet::FROM | RegisterSet::TO,
            MovesKind::TrackStep { .. } => RegisterSet::FROM,
            _ => RegisterSet::empty(),
        };
        RegisterEffects {
            reads: RegisterSet::empty(),
            writes,
        }
    }

    fn own_missing_requirement(&self, game: &GameMetadata, report: &mut Diagnostics) -> bool {
        match &self.kind {
            MovesKind::Add { piece: None, .. } if game.components().is_empty() => {
                report.add_missing(format!(
                    "`{}` places the mover's default piece but the game declares no components",
                    self.name()
                ));
                true
            }
            MovesKind::TrackStep { track, .. } => require_track(self.name(), track, game, report),
            _ => false,
        }
    }

    fn own_will_crash(&self, game: &GameMetadata, report: &mut Diagnostics) -> bool {
        let MovesKind::Add { piece: Some(piece), .. } = &self.kind else {
            return false;
        };
        match piece.static_value() {
            Some(what) if game.component(what).is_none() => {
                report.add_crash(format!("`{}` places unknown component {what}", self.name()));
                true
            }
            _ => false,
        }
    }

    fn resolve_defaults(&self, game: &GameMetadata) {
        if let MovesKind::Step {
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

impl Fold for MovesFunction {
    fn is_constant(&self) -> bool {
        false
    }

    fn cached_value(&self) -> Option<&Moves> {
        self.cache.value()
    }

    fn constant(_value: Moves) -> Option<Self> {
        None
    }

    fn fold_children(&mut self, folder: &mut ConstantFolder) {
        match &mut self.kind {
            MovesKind::Pass => {}
            MovesKind::Add {
                to,
                piece,
                condition,
            } => {
                folder.visit(to.as_mut());
                if let Some(piece) = piece {
                    folder.visit(piece.as_mut());
                }
                if let Some(condition) = condition {
                    folder.visit(condition.as_mut());
                }
            }
            MovesKind::Step { from, condition, .. } => {
                folder.visit(from.as_mut());
                if let Some(condition) = condition {
                    folder.visit(condition.as_mut());
                }
            }
            MovesKind::Remove(region) => folder.visit(region.as_mut()),
            MovesKind::Union(items) => {
                for item in items {
                    folder.visit(item);
                }
            }
            MovesKind::If {
                condition,
                then,
                otherwise,
            } => {
                folder.visit(condition.as_mut());
                folder.visit(then.as_mut());
                if let Some(otherwise) = otherwise {
                    folder.visit(otherwise.as_mut());
                }
            }
            MovesKind::TrackStep { steps, .. } => folder.visit(steps.as_mut()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MoveKind, PlayerId};

    fn game() -> Arc<GameMetadata> {
        Arc::new(
            GameMetadata::builder("Test", 2)
                .board(3, 3)
                .component_per_player("Disc")
                .track("Main", vec![0, 1, 2, 5, 8], None)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_add_on_empty_sites() {
        let mut ctx = Context::new(game(), 1);
        ctx.apply(&Move::add(PlayerId::new(0), 4, 1));

        let moves = MovesFunction::add(RegionFunction::all(), None, None).eval(&mut ctx);
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.kind == MoveKind::Add && m.to != 4));
        // Player 2 places their own component by default.
        assert!(moves.iter().all(|m| m.what == 2 && m.mover == PlayerId::new(1)));
        assert_eq!(ctx.get(Register::To), UNDEFINED);
    }

    #[test]
    fn test_add_with_condition_reads_to() {
        let mut ctx = Context::new(game(), 1);
        let corner = BooleanFunction::is_in(IntFunction::to(), RegionFunction::sites([0, 8]));
        let moves = MovesFunction::add(RegionFunction::all(), None, Some(corner)).eval(&mut ctx);
        assert_eq!(moves.iter().map(|m| m.to).collect::<Vec<_>>(), vec![0, 8]);
    }

    #[test]
    fn test_step_uses_adjacency() {
        let mut ctx = Context::new(game(), 1);
        let p1 = PlayerId::new(0);
        ctx.apply(&Move::add(p1, 0, 1));
        ctx.state_mut().set_mover(p1);

        let step = MovesFunction::step(RegionFunction::occupied(IntFunction::mover()), None, None);
        step.preprocess(ctx.game_handle());
        assert_eq!(step.resolved_relation(), Some(Relation::Orthogonal));

        let moves = step.eval(&mut ctx);
        let mut targets: Vec<_> = moves.iter().map(|m| m.to).collect();
        targets.sort_unstable();
        assert_eq!(targets, vec![1, 3]);
        assert!(moves.iter().all(|m| m.from == 0));
        assert_eq!(ctx.registers(), Default::default());
    }

    #[test]
    fn test_track_step() {
        let mut ctx = Context::new(game(), 1);
        let p1 = PlayerId::new(0);
        ctx.apply(&Move::add(p1, 1, 1));
        ctx.state_mut().set_mover(p1);

        let moves = MovesFunction::track_step("Main", IntFunction::constant(2)).eval(&mut ctx);
        assert_eq!(moves.as_slice(), &[Move::step(p1, 1, 5, 1)]);

        let overshoot = MovesFunction::track_step("Main", IntFunction::constant(4)).eval(&mut ctx);
        assert!(overshoot.is_empty());
    }

    #[test]
    fn test_union_if_remove() {
        let mut ctx = Context::new(game(), 1);
        ctx.apply(&Move::add(PlayerId::new(0), 2, 1));

        let remove = MovesFunction::remove(RegionFunction::all());
        let union = MovesFunction::union([MovesFunction::pass(), remove.clone()]);
        assert_eq!(union.eval(&mut ctx).len(), 2);

        let guarded = MovesFunction::if_then_else(BooleanFunction::constant(false), remove, None);
        assert!(guarded.eval(&mut ctx).is_empty());
    }

    #[test]
    fn test_never_static() {
        let game = game();
        let pass = MovesFunction::pass();
        pass.preprocess(&game);
        assert!(!pass.is_static());
        assert!(pass.cached_value().is_none());
    }

    #[test]
    fn test_requirements() {
        let bare = GameMetadata::builder("Bare", 2).build().unwrap();
        let mut report = Diagnostics::new();
        assert!(MovesFunction::add(RegionFunction::all(), None, None).missing_requirement(&bare, &mut report));
        assert!(MovesFunction::track_step("Main", IntFunction::constant(1)).missing_requirement(&bare, &mut report));
        assert_eq!(report.missing().len(), 2);

        let game = game();
        let add = MovesFunction::add(RegionFunction::all(), Some(IntFunction::constant(7)), None);
        assert!(add.will_crash(&game, &mut report));
        assert!(report.crash_report().contains("unknown component 7"));
    }
}
