//! Random playouts.
//!
//! A playout picks uniformly among the legal moves until the game ends or
//! a move cap is reached. All randomness comes from the context's RNG, so a
//! playout is reproducible from its seed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::{GameResult, RulesEngine};
use super::game::Game;
use crate::context::Context;
use crate::core::Move;

/// Playout parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayoutConfig {
    /// Moves after which an unfinished playout stops (no result).
    pub max_moves: u32,

    /// Random seed for the playout context.
    /// Same seed produces the same playout.
    pub seed: u64,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            max_moves: 500,
            seed: 42,
        }
    }
}

impl PlayoutConfig {
    /// Create a new config with custom move cap.
    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = max_moves;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Everything observable about one playout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutRecord {
    /// Moves played, in order.
    pub moves: Vec<Move>,
    /// Number of legal moves offered before each move.
    pub legal_counts: Vec<usize>,
    /// Final result; `None` if the move cap was hit.
    pub result: Option<GameResult>,
}

impl PlayoutRecord {
    /// Number of moves played.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Play random moves from the context's current state.
///
/// A player left without legal moves ends the game in a draw.
pub fn playout<E: RulesEngine + ?Sized>(engine: &E, ctx: &mut Context, max_moves: u32) -> PlayoutRecord {
    let mut record = PlayoutRecord::default();

    while record.moves.len() < max_moves as usize {
        if let Some(result) = engine.is_terminal(ctx) {
            record.result = Some(result);
            return record;
        }
        let moves = engine.legal_moves(ctx);
        record.legal_counts.push(moves.len());
        let Some(&mv) = ctx.rng().choose(moves.as_slice()) else {
            record.result = Some(GameResult::Draw);
            return record;
        };
        engine.apply_move(ctx, &mv);
        record.moves.push(mv);
    }

    record.result = engine.is_terminal(ctx);
    record
}

impl Game {
    /// Run one playout from the initial position.
    pub fn playout(&self, config: &PlayoutConfig) -> PlayoutRecord {
        let mut ctx = self.new_context(config.seed);
        let record = playout(self, &mut ctx, config.max_moves);
        debug!(seed = config.seed, moves = record.len(), result = ?record.result, "playout finished");
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameMetadata;
    use crate::ludeme::{MovesFunction, RegionFunction};
    use crate::rules::Rules;

    fn filler() -> Game {
        let meta = GameMetadata::builder("Filler", 2)
            .board(2, 2)
            .component_per_player("Disc")
            .build()
            .unwrap();
        Game::compile(meta, Rules::new(MovesFunction::add(RegionFunction::empty(), None, None))).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = PlayoutConfig::default();
        assert_eq!(config.max_moves, 500);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PlayoutConfig::default().with_max_moves(10).with_seed(7);
        assert_eq!(config.max_moves, 10);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_no_moves_is_draw() {
        let record = filler().playout(&PlayoutConfig::default());
        assert_eq!(record.len(), 4);
        assert_eq!(record.legal_counts, vec![4, 3, 2, 1, 0]);
        assert_eq!(record.result, Some(GameResult::Draw));
    }

    #[test]
    fn test_move_cap() {
        let record = filler().playout(&PlayoutConfig::default().with_max_moves(2));
        assert_eq!(record.len(), 2);
        assert_eq!(record.result, None);
    }

    #[test]
    fn test_same_seed_same_playout() {
        let game = filler();
        let config = PlayoutConfig::default().with_seed(99);
        assert_eq!(game.playout(&config), game.playout(&config));
    }
}
