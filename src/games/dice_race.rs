use crate::core::GameMetadata;
use crate::error::Result;
use crate::ludeme::{BooleanFunction, IntFunction, MovesFunction, RegionFunction};
use crate::rules::{Game, Outcome, Rules};

const TRACK: &str = "Main";
const LENGTH: i32 = 12;

/// Two players race along a shared twelve-site track.
///
/// A player enters a piece on the first site or advances one of theirs by a
/// random 1 to 3 sites. Landing on an opponent captures it for a point.
/// Reaching the last site or scoring three points wins. A player with
/// nothing to do passes.
pub fn dice_race() -> Result<Game> {
    let metadata = GameMetadata::builder("Dice Race", 2)
        .board(1, LENGTH as usize)
        .component_per_player("Runner")
        .track(TRACK, (0..LENGTH).collect(), None)
        .build()?;

    let roll = IntFunction::random(IntFunction::constant(1), IntFunction::constant(3))?;
    let turn = MovesFunction::union([
        MovesFunction::add(RegionFunction::sites([0]), None, None),
        MovesFunction::track_step(TRACK, roll),
    ]);
    let play = MovesFunction::if_then_else(
        BooleanFunction::can_move(turn.clone()),
        turn,
        Some(MovesFunction::pass()),
    );

    let last_site = IntFunction::track_site(
        TRACK,
        IntFunction::sub(IntFunction::track_length(TRACK), IntFunction::constant(1)),
    );
    let rules = Rules::new(play)
        .end(
            BooleanFunction::eq(IntFunction::who(last_site), IntFunction::mover()),
            Outcome::MoverWins,
        )
        .end(
            BooleanFunction::ge(IntFunction::score(IntFunction::mover()), IntFunction::constant(3)),
            Outcome::MoverWins,
        );

    Game::compile(metadata, rules)
}
