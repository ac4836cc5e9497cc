//! # ludeme-engine
//!
//! An evaluation engine for games described as trees of rule nodes
//! ("ludemes").
//!
//! ## Design Principles
//!
//! 1. **One Contract**: Every rule node evaluates against a [`Context`] and
//!    answers the same static questions: is it constant, which capabilities
//!    and concepts does it need, what is missing, what would crash, which
//!    registers does it read and write.
//!
//! 2. **Preprocess Once**: Deferred defaults and the values of constant
//!    subtrees are computed a single time into write-once caches. After that
//!    the rule trees are immutable and shared across threads.
//!
//! 3. **Scoped Registers**: Iterating nodes bind context registers through
//!    an RAII guard, so every early exit restores the caller's value.
//!
//! 4. **N-Player First**: Nothing assumes two players.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) state cloning via `im-rs`, so
//!   contexts fork cheaply for search.
//!
//! - **Deterministic Randomness**: All chance goes through the context's
//!   seeded ChaCha RNG. Same seed, same playout.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, board topology, game metadata, state, moves
//! - `context`: Evaluation context and scoped registers
//! - `ludeme`: Rule-node families and the shared node contract
//! - `analysis`: Static analysis over preprocessed rule trees
//! - `optimiser`: Constant folding of static subtrees
//! - `rules`: Compiled games, the rules engine trait and playouts
//! - `games`: Small games built from ludemes

pub mod analysis;
pub mod context;
pub mod core;
pub mod error;
pub mod games;
pub mod ludeme;
pub mod optimiser;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Board, BoardState, GameMetadata, GameRng, MetadataBuilder, Move, MoveKind, Moves, PlayerId, PlayerMap,
    Relation, Trial,
};

pub use crate::context::{Context, Register, RegisterEffects, RegisterGuard, RegisterSet};

pub use crate::error::{Error, Result};

pub use crate::ludeme::{
    BooleanFunction, ConceptSet, Function, GameFlags, IntArrayFunction, IntFunction, Ludeme, MovesFunction,
    Region, RegionFunction, UNDEFINED,
};

pub use crate::analysis::{analyse, AnalysisReport, Diagnostics};

pub use crate::optimiser::{optimise_game, FoldReport, Optimiser, OptimiserConfig};

pub use crate::rules::{EndRule, Game, GameResult, Outcome, PlayoutConfig, PlayoutRecord, Rules, RulesEngine};
