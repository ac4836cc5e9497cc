//! Static summaries: capability flags and concept tags.
//!
//! Both are plain bitsets unioned bottom-up over the rule tree. They depend
//! only on the compiled tree and the game metadata, never on runtime state.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Engine subsystems a compiled game needs.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GameFlags: u64 {
        /// Pieces can be stacked on a site.
        const STACKING = 1 << 0;
        /// Some information is hidden from some players.
        const HIDDEN_INFO = 1 << 1;
        /// The game is a deduction puzzle driven by hints.
        const DEDUCTION_PUZZLE = 1 << 2;
        /// Rules read the random channel.
        const STOCHASTIC = 1 << 3;
        /// Rules use named tracks.
        const TRACKS = 1 << 4;
        /// Rules read or rank by score.
        const SCORE = 1 << 5;
        /// Rules use named regions.
        const NAMED_REGIONS = 1 << 6;
        /// Rules inspect the move history.
        const HISTORY = 1 << 7;
        /// Rules iterate over board edges.
        const EDGES = 1 << 8;
    }
}

impl GameFlags {
    /// Capabilities a game must declare explicitly in its metadata.
    pub const DECLARED: GameFlags = GameFlags::STACKING
        .union(GameFlags::HIDDEN_INFO)
        .union(GameFlags::DEDUCTION_PUZZLE);

    /// Human-readable name of a single flag.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            f if f == Self::STACKING => "stacking",
            f if f == Self::HIDDEN_INFO => "hidden information",
            f if f == Self::DEDUCTION_PUZZLE => "deduction puzzle",
            f if f == Self::STOCHASTIC => "stochastic",
            f if f == Self::TRACKS => "tracks",
            f if f == Self::SCORE => "score",
            f if f == Self::NAMED_REGIONS => "named regions",
            f if f == Self::HISTORY => "history",
            f if f == Self::EDGES => "edges",
            _ => "combined flags",
        }
    }
}

bitflags! {
    /// Semantic tags describing what a rule tree does.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ConceptSet: u128 {
        const BOOLEAN_LOGIC = 1 << 0;
        const CONJUNCTION = 1 << 1;
        const DISJUNCTION = 1 << 2;
        const NEGATION = 1 << 3;
        const COMPARISON = 1 << 4;
        const EQUALITY = 1 << 5;
        const ARITHMETIC = 1 << 6;
        const DIVISION = 1 << 7;
        const CONDITIONAL = 1 << 8;
        const ITERATION = 1 << 9;
        const SITE_QUERY = 1 << 10;
        const PIECE_COUNT = 1 << 11;
        const REGION_SET = 1 << 12;
        const SET_ALGEBRA = 1 << 13;
        const ADJACENCY = 1 << 14;
        const LINE = 1 << 15;
        const BETWEEN = 1 << 16;
        const TRACK = 1 << 17;
        const STACKING = 1 << 18;
        const HIDDEN_INFO = 1 << 19;
        const DEDUCTION_PUZZLE = 1 << 20;
        const STOCHASTIC = 1 << 21;
        const SCORING = 1 << 22;
        const NAMED_REGION = 1 << 23;
        const HISTORY = 1 << 24;
        const EDGE = 1 << 25;
        const PLAYER_QUERY = 1 << 26;
        const PLAYER_ITERATION = 1 << 27;
        const VALUE_ITERATION = 1 << 28;
        const SORTING = 1 << 29;
        const PLACEMENT = 1 << 30;
        const STEP_MOVE = 1 << 31;
        const REMOVAL = 1 << 32;
        const PASS_MOVE = 1 << 33;
        const TRACK_MOVE = 1 << 34;
        const MOBILITY = 1 << 35;
        const BOARD_GEOMETRY = 1 << 36;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_capabilities() {
        assert!(GameFlags::DECLARED.contains(GameFlags::STACKING));
        assert!(!GameFlags::DECLARED.contains(GameFlags::TRACKS));
    }

    #[test]
    fn test_labels() {
        assert_eq!(GameFlags::TRACKS.label(), "tracks");
        assert_eq!((GameFlags::TRACKS | GameFlags::SCORE).label(), "combined flags");
    }

    #[test]
    fn test_concepts_union() {
        let a = ConceptSet::ARITHMETIC | ConceptSet::REMOVAL;
        let b = ConceptSet::TRACK;
        assert!((a | b).contains(ConceptSet::REMOVAL | ConceptSet::TRACK));
    }

    #[test]
    fn test_flags_serialization() {
        let flags = GameFlags::STACKING | GameFlags::SCORE;
        let json = serde_json::to_string(&flags).unwrap();
        let deserialized: GameFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(flags, deserialized);
    }
}
