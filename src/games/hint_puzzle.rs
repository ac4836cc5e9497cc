use crate::core::{GameMetadata, PlayerId};
use crate::error::Result;
use crate::ludeme::{BooleanFunction, IntFunction, MovesFunction, RegionFunction};
use crate::rules::{Game, Outcome, Rules};

/// A 2x2 sum puzzle for one player.
///
/// Each cell takes a 1 or a 2. Every row and column must sum to 3 and the
/// main diagonal to 2, which leaves exactly one solution:
///
/// ```text
/// 1 2
/// 2 1
/// ```
pub fn hint_puzzle() -> Result<Game> {
    let solver = PlayerId::new(0);
    let metadata = GameMetadata::builder("Hint Puzzle", 1)
        .board(2, 2)
        .component("One", solver)
        .component("Two", solver)
        .hint(vec![0, 1], 3)
        .hint(vec![2, 3], 3)
        .hint(vec![0, 2], 3)
        .hint(vec![1, 3], 3)
        .hint(vec![0, 3], 2)
        .build()?;

    let place = |value| MovesFunction::add(RegionFunction::empty(), Some(IntFunction::constant(value)), None);
    let satisfied = BooleanFunction::eq(
        IntFunction::sum(RegionFunction::hint_region(), IntFunction::what(IntFunction::site())),
        IntFunction::hint_value(),
    );
    let rules = Rules::new(MovesFunction::union([place(1), place(2)]))
        .end(BooleanFunction::all_hints(satisfied), Outcome::MoverWins);

    Game::compile(metadata, rules)
}
