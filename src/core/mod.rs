//! Core engine types: players, RNG, metadata, board topology, state, moves.
//!
//! Everything here is ludeme-agnostic: the rule tree reads these types but
//! they know nothing about rule nodes.

pub mod player;
pub mod rng;
pub mod board;
pub mod config;
pub mod action;
pub mod state;

pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use board::{Board, Relation};
pub use config::{Component, GameMetadata, Hint, MetadataBuilder, NamedRegion, Track};
pub use action::{Move, MoveKind, Moves};
pub use state::{BoardState, Trial};
