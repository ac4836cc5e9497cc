//! The evaluation context threaded through every `eval` call.
//!
//! A context owns one simulation's mutable state (board, trial, RNG) and
//! the scratch register file, and holds a shared handle to the immutable
//! game metadata. Contexts are never shared between threads; a search
//! worker [`fork`](Context::fork)s its own.
//!
//! ## Scoped register writes
//!
//! Ludemes bind registers through [`Context::scoped`], which returns a
//! [`RegisterGuard`]. The guard dereferences to the context, so children are
//! evaluated through it, and it restores the previous value when dropped.
//! Early returns and short-circuits therefore cannot leak a binding.
//!
//! ```
//! use std::sync::Arc;
//! use ludeme_engine::context::{Context, Register};
//! use ludeme_engine::core::GameMetadata;
//!
//! let meta = Arc::new(GameMetadata::builder("Demo", 2).build().unwrap());
//! let mut ctx = Context::new(meta, 42);
//! let before = ctx.get(Register::To);
//! {
//!     let scope = ctx.scoped(Register::To, 4);
//!     assert_eq!(scope.get(Register::To), 4);
//! }
//! assert_eq!(ctx.get(Register::To), before);
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use super::register::{Register, RegisterFile};
use crate::core::{BoardState, GameMetadata, GameRng, Move, PlayerId, Trial};
use crate::ludeme::GameFlags;

/// Per-simulation evaluation state.
#[derive(Debug)]
pub struct Context {
    game: Arc<GameMetadata>,
    state: BoardState,
    trial: Trial,
    registers: RegisterFile,
    rng: GameRng,
}

/// Saved board state, trial and RNG for simulate-then-undo.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    state: BoardState,
    trial: Trial,
    rng: GameRng,
}

impl Context {
    /// Fresh context at the initial position.
    #[must_use]
    pub fn new(game: Arc<GameMetadata>, seed: u64) -> Self {
        let state = BoardState::new(&game);
        Self {
            game,
            state,
            trial: Trial::new(),
            registers: RegisterFile::default(),
            rng: GameRng::new(seed),
        }
    }

    // === Metadata and state ===

    /// Immutable game metadata.
    #[must_use]
    pub fn game(&self) -> &GameMetadata {
        &self.game
    }

    /// Shared handle to the metadata.
    #[must_use]
    pub fn game_handle(&self) -> &Arc<GameMetadata> {
        &self.game
    }

    /// Current board and player state.
    #[must_use]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Mutable board and player state.
    pub fn state_mut(&mut self) -> &mut BoardState {
        &mut self.state
    }

    /// Moves played so far.
    #[must_use]
    pub fn trial(&self) -> &Trial {
        &self.trial
    }

    /// Player to move.
    #[must_use]
    pub fn mover(&self) -> PlayerId {
        self.state.mover()
    }

    /// Random channel for stochastic ludemes.
    pub fn rng(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // === Registers ===

    /// Read a register.
    #[inline]
    #[must_use]
    pub fn get(&self, register: Register) -> i32 {
        self.registers.get(register)
    }

    /// Write a register, returning the previous value so the caller can restore it.
    #[inline]
    pub fn set(&mut self, register: Register, value: i32) -> i32 {
        self.registers.set(register, value)
    }

    /// Copy of the whole register file.
    #[must_use]
    pub fn registers(&self) -> RegisterFile {
        self.registers
    }

    /// Bind a register for the lifetime of the returned guard.
    #[inline]
    pub fn scoped(&mut self, register: Register, value: i32) -> RegisterGuard<'_> {
        let previous = self.registers.set(register, value);
        RegisterGuard {
            ctx: self,
            register,
            previous,
        }
    }

    // === Simulation ===

    /// Capture board state, trial and RNG.
    #[must_use]
    pub fn snapshot_state(&self) -> StateSnapshot {
        StateSnapshot {
            state: self.state.clone(),
            trial: self.trial.clone(),
            rng: self.rng.clone(),
        }
    }

    /// Return to a captured state. Registers are left untouched.
    pub fn restore_state(&mut self, snapshot: StateSnapshot) {
        self.state = snapshot.state;
        self.trial = snapshot.trial;
        self.rng = snapshot.rng;
    }

    /// Independent context for another simulated line of play.
    ///
    /// Shares the metadata, copies the state and trial, forks the RNG and
    /// starts with unbound registers.
    #[must_use]
    pub fn fork(&mut self) -> Context {
        Context {
            game: Arc::clone(&self.game),
            state: self.state.clone(),
            trial: self.trial.clone(),
            registers: RegisterFile::default(),
            rng: self.rng.fork(),
        }
    }

    /// Apply a move to the owned state and record it in the trial.
    pub fn apply(&mut self, mv: &Move) {
        let stacking = self.game.supports(GameFlags::STACKING);
        self.state.apply(mv, stacking);
        self.trial.push(*mv);
    }
}

/// Scoped register binding; restores the previous value on drop.
pub struct RegisterGuard<'a> {
    ctx: &'a mut Context,
    register: Register,
    previous: i32,
}

impl RegisterGuard<'_> {
    /// Rebind the guarded register without changing what is restored.
    #[inline]
    pub fn rebind(&mut self, value: i32) {
        self.ctx.registers.set(self.register, value);
    }

    /// Value the register will be restored to.
    #[must_use]
    pub fn previous(&self) -> i32 {
        self.previous
    }
}

impl Deref for RegisterGuard<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.ctx
    }
}

impl DerefMut for RegisterGuard<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.ctx
    }
}

impl Drop for RegisterGuard<'_> {
    fn drop(&mut self) {
        self.ctx.registers.set(self.register, self.previous);
    }
}
