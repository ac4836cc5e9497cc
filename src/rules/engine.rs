//! Rules engine trait for playing compiled games.
//!
//! The engine owns no state: every call takes the [`Context`] of one
//! simulation, so one engine can drive many contexts.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::core::{GameMetadata, Move, Moves, PlayerId};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (every opponent of a losing player).
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_moves`: Return empty if the mover cannot act
/// - `apply_move`: Must be deterministic given the context's RNG
/// - `is_terminal`: Return None if the game continues
pub trait RulesEngine {
    /// Get the game metadata.
    fn metadata(&self) -> &GameMetadata;

    /// Legal moves for the player to move.
    fn legal_moves(&self, ctx: &mut Context) -> Moves;

    /// Apply a move to the context's state.
    fn apply_move(&self, ctx: &mut Context, mv: &Move);

    /// Check if the game is over.
    ///
    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn is_terminal(&self, ctx: &mut Context) -> Option<GameResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(result.is_winner(PlayerId::new(1)));
        assert!(!result.is_winner(PlayerId::new(0)));
    }

    #[test]
    fn test_game_result_draw() {
        let result = GameResult::Draw;
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(!result.is_winner(PlayerId::new(1)));
    }

    #[test]
    fn test_game_result_winners() {
        let result = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(result.is_winner(PlayerId::new(0)));
        assert!(!result.is_winner(PlayerId::new(1)));
        assert!(result.is_winner(PlayerId::new(2)));
    }
}
