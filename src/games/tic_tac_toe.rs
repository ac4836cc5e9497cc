use crate::core::GameMetadata;
use crate::error::Result;
use crate::ludeme::{BooleanFunction, IntFunction, MovesFunction, RegionFunction};
use crate::rules::{Game, Outcome, Rules};

/// Tic-tac-toe: three in a row wins, a full board is a draw.
///
/// The line length is written as `1 + 2` so the optimiser has a static
/// subtree to fold.
pub fn tic_tac_toe() -> Result<Game> {
    let metadata = GameMetadata::builder("Tic-Tac-Toe", 2)
        .board(3, 3)
        .component_per_player("Disc")
        .build()?;

    let line = IntFunction::add([IntFunction::constant(1), IntFunction::constant(2)]);
    let rules = Rules::new(MovesFunction::add(RegionFunction::empty(), None, None))
        .end(BooleanFunction::is_line(line, None), Outcome::MoverWins)
        .end(
            BooleanFunction::eq(IntFunction::region_size(RegionFunction::empty()), IntFunction::constant(0)),
            Outcome::Draw,
        );

    Game::compile(metadata, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Move, PlayerId};
    use crate::ludeme::{ConceptSet, GameFlags};
    use crate::rules::{GameResult, PlayoutConfig, RulesEngine};

    #[test]
    fn test_compiles_cleanly() {
        let game = tic_tac_toe().unwrap();
        let report = game.analysis().unwrap();
        assert!(!report.missing_requirement());
        assert!(!report.will_crash());
        assert_eq!(game.flags(), GameFlags::empty());
        assert!(game.concepts().contains(ConceptSet::PLACEMENT | ConceptSet::LINE));
    }

    #[test]
    fn test_opening_has_nine_moves() {
        let game = tic_tac_toe().unwrap();
        let mut ctx = game.new_context(0);
        assert_eq!(game.legal_moves(&mut ctx).len(), 9);
    }

    #[test]
    fn test_full_board_is_draw() {
        let game = tic_tac_toe().unwrap();
        let mut ctx = game.new_context(0);
        let (p1, p2) = (PlayerId::new(0), PlayerId::new(1));
        // X O X / X O O / O X X
        let order = [(p1, 0), (p2, 1), (p1, 2), (p2, 4), (p1, 3), (p2, 5), (p1, 7), (p2, 6), (p1, 8)];
        for (player, site) in order {
            assert_eq!(game.is_terminal(&mut ctx), None);
            game.apply_move(&mut ctx, &Move::add(player, site, player.number()));
        }
        assert_eq!(game.is_terminal(&mut ctx), Some(GameResult::Draw));
    }

    #[test]
    fn test_playouts_finish() {
        let game = tic_tac_toe().unwrap();
        for seed in 0..20 {
            let record = game.playout(&PlayoutConfig::default().with_seed(seed));
            assert!(record.result.is_some());
            assert!(record.len() >= 5 && record.len() <= 9);
        }
    }
}
