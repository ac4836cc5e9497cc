//! A compiled game: metadata plus rule trees.
//!
//! [`Game::preprocess`] runs once. It prepares every rule tree against the
//! metadata (deferred defaults, static caches) and stores the static
//! analysis. After that the game is immutable during play and can be
//! shared between any number of contexts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::engine::{GameResult, RulesEngine};
use crate::analysis::{analyse, AnalysisReport};
use crate::context::Context;
use crate::core::{GameMetadata, Move, Moves, PlayerId};
use crate::error::Result;
use crate::ludeme::{BooleanFunction, ConceptSet, Function, GameFlags, Ludeme, MovesFunction};

/// What happens when an end condition holds, from the point of view of the
/// player who just moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    MoverWins,
    MoverLoses,
    Draw,
}

impl Outcome {
    /// Game result when `mover` triggered this outcome.
    #[must_use]
    pub fn result(self, mover: PlayerId, player_count: usize) -> GameResult {
        match self {
            Outcome::MoverWins => GameResult::Winner(mover),
            Outcome::MoverLoses => {
                let mut others: Vec<_> = PlayerId::all(player_count).filter(|&p| p != mover).collect();
                if others.len() == 1 {
                    GameResult::Winner(others.remove(0))
                } else {
                    GameResult::Winners(others)
                }
            }
            Outcome::Draw => GameResult::Draw,
        }
    }
}

/// An end condition and its outcome.
#[derive(Clone, Debug)]
pub struct EndRule {
    pub condition: BooleanFunction,
    pub outcome: Outcome,
}

/// The rule trees of a game.
#[derive(Clone, Debug)]
pub struct Rules {
    /// Move generator for the player to move.
    pub play: MovesFunction,
    /// End conditions, checked in order after every move.
    pub end: Vec<EndRule>,
}

impl Rules {
    /// Rules with a move generator and no end conditions.
    #[must_use]
    pub fn new(play: MovesFunction) -> Self {
        Self {
            play,
            end: Vec::new(),
        }
    }

    /// Add an end condition.
    #[must_use]
    pub fn end(mut self, condition: BooleanFunction, outcome: Outcome) -> Self {
        self.end.push(EndRule { condition, outcome });
        self
    }

    /// Root of every rule tree.
    #[must_use]
    pub fn roots(&self) -> Vec<&dyn Ludeme> {
        std::iter::once(&self.play as &dyn Ludeme)
            .chain(self.end.iter().map(|rule| &rule.condition as &dyn Ludeme))
            .collect()
    }
}

/// A game ready for analysis and play.
#[derive(Clone, Debug)]
pub struct Game {
    metadata: Arc<GameMetadata>,
    rules: Rules,
    analysis: Option<AnalysisReport>,
}

impl Game {
    /// Pair metadata with rules. Nothing is checked until [`Game::preprocess`].
    #[must_use]
    pub fn new(metadata: GameMetadata, rules: Rules) -> Self {
        Self {
            metadata: Arc::new(metadata),
            rules,
            analysis: None,
        }
    }

    /// Build, preprocess and reject games that cannot be played.
    pub fn compile(metadata: GameMetadata, rules: Rules) -> Result<Self> {
        let mut game = Self::new(metadata, rules);
        game.preprocess().ensure_playable()?;
        Ok(game)
    }

    #[must_use]
    pub fn metadata_handle(&self) -> &Arc<GameMetadata> {
        &self.metadata
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub(crate) fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }

    /// Prepare every rule tree and run static analysis.
    ///
    /// Only the first call does any work; later calls return the stored report.
    pub fn preprocess(&mut self) -> &AnalysisReport {
        if self.analysis.is_some() {
            debug!(game = self.metadata.name(), "already preprocessed");
        }
        let (metadata, rules) = (&self.metadata, &self.rules);
        self.analysis.get_or_insert_with(|| {
            let roots = rules.roots();
            for root in &roots {
                root.preprocess(metadata);
            }
            info!(game = metadata.name(), roots = roots.len(), "preprocessed rule trees");
            analyse(metadata, &roots)
        })
    }

    #[must_use]
    pub fn is_preprocessed(&self) -> bool {
        self.analysis.is_some()
    }

    /// Static analysis, available once preprocessed.
    #[must_use]
    pub fn analysis(&self) -> Option<&AnalysisReport> {
        self.analysis.as_ref()
    }

    /// Capabilities the rules need.
    ///
    /// Once preprocessed this is the stored analysis, so folding static
    /// subtrees away does not change it.
    #[must_use]
    pub fn flags(&self) -> GameFlags {
        match &self.analysis {
            Some(report) => report.flags,
            None => self
                .rules
                .roots()
                .iter()
                .fold(GameFlags::empty(), |flags, root| flags | root.game_flags(&self.metadata)),
        }
    }

    /// Concepts the rules express. Stored after preprocessing, like [`Game::flags`].
    #[must_use]
    pub fn concepts(&self) -> ConceptSet {
        match &self.analysis {
            Some(report) => report.concepts,
            None => self
                .rules
                .roots()
                .iter()
                .fold(ConceptSet::empty(), |concepts, root| concepts | root.concepts(&self.metadata)),
        }
    }

    /// Missing-requirement report; empty if not preprocessed or nothing is missing.
    #[must_use]
    pub fn missing_requirement_report(&self) -> String {
        self.analysis
            .as_ref()
            .map(AnalysisReport::missing_requirement_report)
            .unwrap_or_default()
    }

    /// Will-crash report; empty if not preprocessed or no crash is predicted.
    #[must_use]
    pub fn will_crash_report(&self) -> String {
        self.analysis
            .as_ref()
            .map(AnalysisReport::will_crash_report)
            .unwrap_or_default()
    }

    /// Legal moves for the player to move in `ctx`.
    pub fn moves(&self, ctx: &mut Context) -> Moves {
        self.rules.play.eval(ctx)
    }

    /// Fresh context at the initial position.
    #[must_use]
    pub fn new_context(&self, seed: u64) -> Context {
        Context::new(Arc::clone(&self.metadata), seed)
    }
}

impl RulesEngine for Game {
    fn metadata(&self) -> &GameMetadata {
        &self.metadata
    }

    fn legal_moves(&self, ctx: &mut Context) -> Moves {
        self.moves(ctx)
    }

    fn apply_move(&self, ctx: &mut Context, mv: &Move) {
        ctx.apply(mv);
    }

    /// End conditions are evaluated as seen by the player who made the last
    /// move; the turn has already passed when this is called.
    fn is_terminal(&self, ctx: &mut Context) -> Option<GameResult> {
        let last = ctx.trial().last()?.mover;
        let current = ctx.mover();

        ctx.state_mut().set_mover(last);
        let outcome = self
            .rules
            .end
            .iter()
            .find(|rule| rule.condition.eval(ctx))
            .map(|rule| rule.outcome);
        ctx.state_mut().set_mover(current);

        outcome.map(|o| o.result(last, self.metadata.player_count()))
    }
}
