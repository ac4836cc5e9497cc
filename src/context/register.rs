//! Scratch registers.
//!
//! Registers are dynamically scoped implicit parameters: a ludeme binds a
//! register, evaluates a child that may read it, and restores the previous
//! value before returning. Every register holds an `i32`; an unbound
//! register reads as [`UNDEFINED`].
//!
//! [`RegisterSet`] is the bit-vector used for effect declarations.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::ludeme::UNDEFINED;

/// Named register slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    /// Current source site.
    From = 0,
    /// Current destination site.
    To = 1,
    /// Current site being iterated.
    Site = 2,
    /// Current stack level.
    Level = 3,
    /// Current puzzle hint index.
    Hint = 4,
    /// Current named-region index.
    Region = 5,
    /// Current site between two others.
    Between = 6,
    /// Current edge index.
    Edge = 7,
    /// Current iterated value.
    Value = 8,
    /// Current iterated player number.
    Player = 9,
}

impl Register {
    /// Number of registers.
    pub const COUNT: usize = 10;

    /// All registers in slot order.
    pub const ALL: [Register; Register::COUNT] = [
        Register::From,
        Register::To,
        Register::Site,
        Register::Level,
        Register::Hint,
        Register::Region,
        Register::Between,
        Register::Edge,
        Register::Value,
        Register::Player,
    ];

    /// Slot index in the register file.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rule-language keyword that reads this register.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Register::From => "from",
            Register::To => "to",
            Register::Site => "site",
            Register::Level => "level",
            Register::Hint => "hint",
            Register::Region => "region",
            Register::Between => "between",
            Register::Edge => "edge",
            Register::Value => "value",
            Register::Player => "player",
        }
    }

    /// Singleton set for this register.
    #[must_use]
    pub const fn bit(self) -> RegisterSet {
        RegisterSet::from_bits_retain(1 << self as u16)
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

bitflags! {
    /// Set of registers, used for read/write effect declarations.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RegisterSet: u16 {
        const FROM = 1 << 0;
        const TO = 1 << 1;
        const SITE = 1 << 2;
        const LEVEL = 1 << 3;
        const HINT = 1 << 4;
        const REGION = 1 << 5;
        const BETWEEN = 1 << 6;
        const EDGE = 1 << 7;
        const VALUE = 1 << 8;
        const PLAYER = 1 << 9;
    }
}

impl RegisterSet {
    /// Registers contained in this set, in slot order.
    pub fn registers(self) -> impl Iterator<Item = Register> {
        Register::ALL.into_iter().filter(move |r| self.contains(r.bit()))
    }
}

/// Read and write sets of a ludeme subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterEffects {
    pub reads: RegisterSet,
    pub writes: RegisterSet,
}

impl RegisterEffects {
    /// No reads, no writes.
    pub const NONE: RegisterEffects = RegisterEffects {
        reads: RegisterSet::empty(),
        writes: RegisterSet::empty(),
    };

    /// Effect of reading one register.
    #[must_use]
    pub const fn reading(register: Register) -> Self {
        Self {
            reads: register.bit(),
            writes: RegisterSet::empty(),
        }
    }

    /// Effect of writing one register.
    #[must_use]
    pub const fn writing(register: Register) -> Self {
        Self {
            reads: RegisterSet::empty(),
            writes: register.bit(),
        }
    }

    /// Union of two effects.
    #[must_use]
    pub fn union(self, other: RegisterEffects) -> Self {
        Self {
            reads: self.reads | other.reads,
            writes: self.writes | other.writes,
        }
    }
}

/// Fixed-size register file living on the context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegisterFile {
    slots: [i32; Register::COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            slots: [UNDEFINED; Register::COUNT],
        }
    }
}

impl RegisterFile {
    /// Read a register.
    #[inline]
    #[must_use]
    pub fn get(&self, register: Register) -> i32 {
        self.slots[register.index()]
    }

    /// Write a register, returning its previous value.
    #[inline]
    pub fn set(&mut self, register: Register, value: i32) -> i32 {
        std::mem::replace(&mut self.slots[register.index()], value)
    }

    /// Registers whose values differ between two files.
    #[must_use]
    pub fn diff(&self, other: &RegisterFile) -> RegisterSet {
        Register::ALL
            .into_iter()
            .filter(|r| self.get(*r) != other.get(*r))
            .fold(RegisterSet::empty(), |set, r| set | r.bit())
    }
}
