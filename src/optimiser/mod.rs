//! Constant folding over a preprocessed game.
//!
//! Every static subtree whose value was cached during preprocessing is
//! replaced by a literal of the same family. Folding changes the shape of
//! the rule trees, never what they evaluate to.
//!
//! ```
//! use ludeme_engine::games::tic_tac_toe;
//! use ludeme_engine::optimiser::optimise_game;
//!
//! let mut game = tic_tac_toe()?;
//! let report = optimise_game(&mut game);
//! assert!(report.replaced > 0);
//! # Ok::<(), ludeme_engine::Error>(())
//! ```

pub mod config;
pub mod fold;

pub use config::OptimiserConfig;
pub use fold::{ConstantFolder, Fold, FoldReport};

use tracing::{debug, info};

use crate::rules::Game;

/// Folds the rule trees of a game.
#[derive(Clone, Debug, Default)]
pub struct Optimiser {
    config: OptimiserConfig,
}

impl Optimiser {
    #[must_use]
    pub fn new(config: OptimiserConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &OptimiserConfig {
        &self.config
    }

    /// Fold every rule tree of `game`, preprocessing it first if needed.
    pub fn optimise_game(&self, game: &mut Game) -> FoldReport {
        game.preprocess();

        let mut report = FoldReport::default();
        let rules = game.rules_mut();

        let mut folder = ConstantFolder::new(self.config.clone());
        folder.visit(&mut rules.play);
        let play = folder.finish();
        debug!(root = "play", replaced = play.replaced, "folded rule tree");
        report.merge(play);

        for (index, rule) in rules.end.iter_mut().enumerate() {
            let mut folder = ConstantFolder::new(self.config.clone());
            folder.visit(&mut rule.condition);
            let end = folder.finish();
            debug!(root = "end", index, replaced = end.replaced, "folded rule tree");
            report.merge(end);
        }

        info!(
            game = game.metadata_handle().name(),
            replaced = report.replaced,
            uncached = report.uncached,
            violations = report.violations.len(),
            "optimised game"
        );
        report
    }
}

/// Fold `game` with the default configuration.
pub fn optimise_game(game: &mut Game) -> FoldReport {
    Optimiser::default().optimise_game(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameMetadata;
    use crate::ludeme::{BooleanFunction, BooleanKind, IntFunction, IntKind, MovesFunction, RegionFunction};
    use crate::rules::{Outcome, Rules};

    fn game() -> Game {
        let meta = GameMetadata::builder("Test", 2)
            .board(3, 3)
            .component_per_player("Disc")
            .build()
            .unwrap();
        let rules = Rules::new(MovesFunction::add(RegionFunction::empty(), None, None)).end(
            BooleanFunction::is_line(IntFunction::add([IntFunction::constant(1), IntFunction::constant(2)]), None),
            Outcome::MoverWins,
        );
        Game::new(meta, rules)
    }

    #[test]
    fn test_optimise_preprocesses_first() {
        let mut game = game();
        assert!(!game.is_preprocessed());
        let report = optimise_game(&mut game);
        assert!(game.is_preprocessed());
        assert_eq!(report.replaced, 1);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_end_condition_is_folded() {
        let mut game = game();
        optimise_game(&mut game);

        let BooleanKind::IsLine { length, .. } = game.rules().end[0].condition.kind() else {
            panic!("end condition should stay a line test");
        };
        assert!(matches!(length.kind(), IntKind::Constant(3)));
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let mut game = game();
        optimise_game(&mut game);
        let again = Optimiser::new(OptimiserConfig::default().with_logging(true)).optimise_game(&mut game);
        assert!(again.is_unchanged());
    }
}
