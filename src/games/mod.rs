//! Small games built from ludemes.
//!
//! They exercise the engine end to end: each is compiled (preprocessed and
//! checked) on construction and can be played, analysed and optimised.
//!
//! - [`tic_tac_toe`]: placement and lines on a 3x3 board
//! - [`dice_race`]: a shared track, random steps and captures for score
//! - [`hint_puzzle`]: a one-player deduction puzzle driven by hints

mod dice_race;
mod hint_puzzle;
mod tic_tac_toe;

pub use dice_race::dice_race;
pub use hint_puzzle::hint_puzzle;
pub use tic_tac_toe::tic_tac_toe;
