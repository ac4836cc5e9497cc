//! Evaluation context and scratch registers.
//!
//! - [`Register`], [`RegisterSet`], [`RegisterEffects`]: the register
//!   enumeration and the bit-vectors used for effect declarations
//! - [`RegisterFile`]: the fixed-size slot array on each context
//! - [`Context`]: per-simulation state plus registers
//! - [`RegisterGuard`]: RAII scoped register binding

mod context;
mod register;

pub use context::{Context, RegisterGuard, StateSnapshot};
pub use register::{Register, RegisterEffects, RegisterFile, RegisterSet};
