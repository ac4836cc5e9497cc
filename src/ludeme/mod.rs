//! Rule nodes ("ludemes").
//!
//! A game's rules are a tree of ludemes. Each node kind belongs to one
//! family, selected by what it evaluates to:
//!
//! | Family | Output |
//! |--------|--------|
//! | [`BooleanFunction`] | `bool` |
//! | [`IntFunction`] | `i32` |
//! | [`RegionFunction`] | [`Region`] |
//! | [`IntArrayFunction`] | [`IntArray`] |
//! | [`MovesFunction`] | [`Moves`](crate::core::Moves) |
//!
//! A family is a struct holding a kind enum and a [`NodeCache`]. All of them
//! implement [`Ludeme`] for analysis and [`Function`] for evaluation.
//!
//! ## Lifecycle
//!
//! 1. Build the tree (fallible constructors reject conflicting arguments).
//! 2. [`Ludeme::preprocess`] once against the game metadata: resolves
//!    deferred defaults and caches the value of every static subtree.
//! 3. Run the analyses (flags, concepts, missing requirements, crashes).
//! 4. Optionally fold static subtrees into constants.
//! 5. [`Function::eval`] any number of times, from any number of contexts.

mod array;
mod boolean;
mod cache;
mod flags;
mod int;
mod moves;
mod region;
mod traits;
mod value;

pub use array::{IntArrayFunction, IntArrayKind};
pub use boolean::{BooleanFunction, BooleanKind, Comparison};
pub use cache::NodeCache;
pub use flags::{ConceptSet, GameFlags};
pub use int::{CountTarget, IntFunction, IntKind};
pub use moves::{MovesFunction, MovesKind};
pub use region::{RegionFunction, RegionKind};
pub use traits::{node_count, Function, Ludeme};
pub use value::{IntArray, Region, ValueKind, UNDEFINED};

use crate::analysis::Diagnostics;
use crate::core::GameMetadata;

/// Report a missing track. Returns whether it is missing.
pub(crate) fn require_track(
    ludeme: &str,
    track: &str,
    game: &GameMetadata,
    report: &mut Diagnostics,
) -> bool {
    if game.tracks().is_empty() {
        report.add_missing(format!(
            "`{ludeme}` uses track `{track}` but the game declares no tracks"
        ));
        true
    } else if game.track(track).is_none() {
        report.add_missing(format!(
            "`{ludeme}` uses track `{track}` but the game has no track of that name"
        ));
        true
    } else {
        false
    }
}

/// Report missing puzzle hints.
pub(crate) fn require_hints(ludeme: &str, game: &GameMetadata, report: &mut Diagnostics) -> bool {
    if game.hints().is_empty() {
        report.add_missing(format!("`{ludeme}` needs puzzle hints but the game declares none"));
        return true;
    }
    false
}

/// Report missing named regions.
pub(crate) fn require_regions(ludeme: &str, game: &GameMetadata, report: &mut Diagnostics) -> bool {
    if game.regions().is_empty() {
        report.add_missing(format!("`{ludeme}` needs named regions but the game declares none"));
        return true;
    }
    false
}
