//! Static analysis of compiled rule trees.
//!
//! Analysis runs after preprocessing and before play. It never evaluates
//! anything against a live game: every result depends only on the tree and
//! the game metadata.

mod diagnostics;
mod invariant;
mod report;

pub use diagnostics::Diagnostics;
pub use invariant::{all_descendants_static, static_violations};
pub use report::{analyse, AnalysisReport};
