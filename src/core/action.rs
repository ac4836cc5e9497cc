//! Moves produced by move-generating ludemes.
//!
//! A move is small and `Copy`: the kind of change, the sites involved, the
//! component placed or moved, and the player making it. [`Moves`] is the
//! mutable collection a generator returns; callers may filter or extend it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::ludeme::UNDEFINED;

/// What a move does to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Place a component on an empty site (`to`).
    Add,
    /// Move the piece at `from` to `to`, capturing whatever is there.
    Step,
    /// Remove the piece at `to`.
    Remove,
    /// Do nothing.
    Pass,
}

/// A single candidate move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,
    /// Source site, [`UNDEFINED`] for placements and passes.
    pub from: i32,
    /// Destination site, [`UNDEFINED`] for passes.
    pub to: i32,
    /// Component number placed or moved, 0 if none.
    pub what: i32,
    pub mover: PlayerId,
}

impl Move {
    /// A pass move.
    #[must_use]
    pub const fn pass(mover: PlayerId) -> Self {
        Self {
            kind: MoveKind::Pass,
            from: UNDEFINED,
            to: UNDEFINED,
            what: 0,
            mover,
        }
    }

    /// Place `what` on `to`.
    #[must_use]
    pub const fn add(mover: PlayerId, to: i32, what: i32) -> Self {
        Self {
            kind: MoveKind::Add,
            from: UNDEFINED,
            to,
            what,
            mover,
        }
    }

    /// Move a piece from `from` to `to`.
    #[must_use]
    pub const fn step(mover: PlayerId, from: i32, to: i32, what: i32) -> Self {
        Self {
            kind: MoveKind::Step,
            from,
            to,
            what,
            mover,
        }
    }

    /// Remove the piece at `site`.
    #[must_use]
    pub const fn remove(mover: PlayerId, site: i32) -> Self {
        Self {
            kind: MoveKind::Remove,
            from: UNDEFINED,
            to: site,
            what: 0,
            mover,
        }
    }

    /// Whether this is a pass.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.kind == MoveKind::Pass
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            MoveKind::Pass => write!(f, "{} pass", self.mover),
            MoveKind::Add => write!(f, "{} add {} @{}", self.mover, self.what, self.to),
            MoveKind::Step => write!(f, "{} {}-{}", self.mover, self.from, self.to),
            MoveKind::Remove => write!(f, "{} remove @{}", self.mover, self.to),
        }
    }
}

/// Mutable list of candidate moves.
///
/// Most generators yield a handful of moves, so the first eight live inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moves {
    moves: SmallVec<[Move; 8]>,
}

impl Moves {
    /// Empty move list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move.
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Append all moves of another list.
    pub fn extend(&mut self, other: Moves) {
        self.moves.extend(other.moves);
    }

    /// Keep only moves matching a predicate.
    pub fn retain(&mut self, f: impl FnMut(&mut Move) -> bool) {
        self.moves.retain(f);
    }

    /// Number of moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether there are no moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Iterate over moves.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }
}

impl FromIterator<Move> for Moves {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Moves {
    type Item = Move;
    type IntoIter = smallvec::IntoIter<[Move; 8]>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let p = PlayerId::new(0);
        assert!(Move::pass(p).is_pass());
        assert_eq!(Move::add(p, 4, 1).from, UNDEFINED);
        assert_eq!(Move::step(p, 1, 2, 1).kind, MoveKind::Step);
        assert_eq!(Move::remove(p, 3).to, 3);
    }

    #[test]
    fn test_display() {
        let p = PlayerId::new(1);
        assert_eq!(Move::step(p, 1, 2, 2).to_string(), "P2 1-2");
        assert_eq!(Move::pass(p).to_string(), "P2 pass");
    }

    #[test]
    fn test_moves_collection() {
        let p = PlayerId::new(0);
        let mut moves: Moves = (0..3).map(|s| Move::add(p, s, 1)).collect();
        moves.extend(Moves::from_iter([Move::pass(p)]));
        assert_eq!(moves.len(), 4);

        moves.retain(|m| !m.is_pass());
        assert_eq!(moves.len(), 3);
        assert_eq!(moves.as_slice()[2].to, 2);
    }

    #[test]
    fn test_move_serialization() {
        let mv = Move::step(PlayerId::new(0), 3, 4, 1);
        let json = serde_json::to_string(&mv).unwrap();
        let deserialized: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(mv, deserialized);
    }
}
