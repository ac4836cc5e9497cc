//! Playing compiled games.
//!
//! [`Game`] couples metadata with rule trees and owns the preprocess and
//! analysis lifecycle. [`RulesEngine`] is the interface a search or a
//! playout drives; `Game` is its implementation for ludeme-defined rules.

pub mod engine;
pub mod game;
pub mod playout;

pub use engine::{GameResult, RulesEngine};
pub use game::{EndRule, Game, Outcome, Rules};
pub use playout::{playout, PlayoutConfig, PlayoutRecord};
