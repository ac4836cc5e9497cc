//! Mutable game state: board contents, scores, mover, and move history.
//!
//! ## BoardState
//!
//! Per-site owner, component, stack height and hidden mask, plus per-player
//! scores and the player to move. Site vectors use `im` persistent vectors
//! so a context can snapshot or fork its state in O(1).
//!
//! ## Trial
//!
//! The sequence of moves applied so far.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{Move, MoveKind};
use super::config::GameMetadata;
use super::player::{PlayerId, PlayerMap};
use crate::ludeme::UNDEFINED;

/// Board and player state owned by one context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    player_count: usize,
    /// Owner number per site (0 = empty).
    who: Vector<u8>,
    /// Component number per site (0 = empty).
    what: Vector<u16>,
    /// Stack height per site.
    count: Vector<u32>,
    /// Bitmask of players a site is hidden from.
    hidden: Vector<u32>,
    scores: PlayerMap<i32>,
    mover: PlayerId,
}

impl BoardState {
    /// Empty board with player 1 to move.
    #[must_use]
    pub fn new(meta: &GameMetadata) -> Self {
        let sites = meta.board().num_sites();
        Self {
            player_count: meta.player_count(),
            who: Vector::from(vec![0; sites]),
            what: Vector::from(vec![0; sites]),
            count: Vector::from(vec![0; sites]),
            hidden: Vector::from(vec![0; sites]),
            scores: PlayerMap::with_value(meta.player_count(), 0),
            mover: PlayerId::new(0),
        }
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Number of sites.
    #[must_use]
    pub fn num_sites(&self) -> usize {
        self.who.len()
    }

    fn slot(&self, site: i32) -> Option<usize> {
        usize::try_from(site).ok().filter(|&s| s < self.who.len())
    }

    // === Site queries ===

    /// Owner number at a site; 0 if empty, [`UNDEFINED`] if off the board.
    #[must_use]
    pub fn who(&self, site: i32) -> i32 {
        self.slot(site).map_or(UNDEFINED, |s| self.who[s] as i32)
    }

    /// Component number at a site; 0 if empty, [`UNDEFINED`] if off the board.
    #[must_use]
    pub fn what(&self, site: i32) -> i32 {
        self.slot(site).map_or(UNDEFINED, |s| self.what[s] as i32)
    }

    /// Stack height at a site; 0 if empty or off the board.
    #[must_use]
    pub fn count(&self, site: i32) -> i32 {
        self.slot(site).map_or(0, |s| self.count[s] as i32)
    }

    /// Whether a site is on the board and empty.
    #[must_use]
    pub fn is_empty(&self, site: i32) -> bool {
        self.who(site) == 0
    }

    /// Whether a site is hidden from a player.
    #[must_use]
    pub fn is_hidden(&self, site: i32, player: PlayerId) -> bool {
        let bit = 1u32.checked_shl(player.index() as u32).unwrap_or(0);
        self.slot(site).is_some_and(|s| self.hidden[s] & bit != 0)
    }

    /// Hide or reveal a site for a player.
    pub fn set_hidden(&mut self, site: i32, player: PlayerId, hidden: bool) {
        if let Some(s) = self.slot(site) {
            let bit = 1u32.checked_shl(player.index() as u32).unwrap_or(0);
            let mask = self.hidden[s];
            self.hidden.set(s, if hidden { mask | bit } else { mask & !bit });
        }
    }

    /// Sites owned by a player number, in ascending order.
    pub fn sites_of(&self, who: i32) -> impl Iterator<Item = i32> + '_ {
        self.who
            .iter()
            .enumerate()
            .filter(move |&(_, &w)| w as i32 == who)
            .map(|(s, _)| s as i32)
    }

    // === Site mutation ===

    /// Put a piece on a site, replacing whatever is there.
    pub fn place(&mut self, site: i32, who: i32, what: i32, count: i32) {
        if let Some(s) = self.slot(site) {
            self.who.set(s, who.clamp(0, u8::MAX as i32) as u8);
            self.what.set(s, what.clamp(0, u16::MAX as i32) as u16);
            self.count.set(s, count.max(0) as u32);
        }
    }

    /// Empty a site.
    pub fn clear(&mut self, site: i32) {
        self.place(site, 0, 0, 0);
    }

    // === Players ===

    /// Player to move.
    #[must_use]
    pub fn mover(&self) -> PlayerId {
        self.mover
    }

    /// Set the player to move.
    pub fn set_mover(&mut self, player: PlayerId) {
        self.mover = player;
    }

    /// Score of a player.
    #[must_use]
    pub fn score(&self, player: PlayerId) -> i32 {
        self.scores[player]
    }

    /// All scores in player order.
    #[must_use]
    pub fn scores(&self) -> &PlayerMap<i32> {
        &self.scores
    }

    /// Add to a player's score.
    pub fn add_score(&mut self, player: PlayerId, delta: i32) {
        self.scores[player] = self.scores[player].saturating_add(delta);
    }

    /// Apply a move's board effect and hand the turn to the next player.
    ///
    /// With `stacking`, adding onto a friendly stack of the same component
    /// grows the stack. A step onto an enemy piece captures it and scores a
    /// point for the mover.
    pub fn apply(&mut self, mv: &Move, stacking: bool) {
        let who = mv.mover.number();
        match mv.kind {
            MoveKind::Add => {
                if stacking && self.who(mv.to) == who && self.what(mv.to) == mv.what {
                    let height = self.count(mv.to) + 1;
                    self.place(mv.to, who, mv.what, height);
                } else {
                    self.place(mv.to, who, mv.what, 1);
                }
            }
            MoveKind::Step => {
                let (what, height) = (self.what(mv.from), self.count(mv.from));
                let target = self.who(mv.to);
                if target > 0 && target != who {
                    self.add_score(mv.mover, 1);
                }
                self.clear(mv.from);
                self.place(mv.to, who, what, height.max(1));
            }
            MoveKind::Remove => self.clear(mv.to),
            MoveKind::Pass => {}
        }
        self.mover = mv.mover.next(self.player_count);
    }
}

/// History of applied moves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    moves: Vector<Move>,
}

impl Trial {
    /// Empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a move.
    pub fn push(&mut self, mv: Move) {
        self.moves.push_back(mv);
    }

    /// Number of moves played.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether no move was played yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Last move played.
    #[must_use]
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Iterate over played moves.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    /// Drop moves beyond `len`.
    pub fn truncate(&mut self, len: usize) {
        self.moves.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> GameMetadata {
        GameMetadata::builder("Test", 2)
            .board(3, 3)
            .component_per_player("Disc")
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = BoardState::new(&meta());

        assert_eq!(state.num_sites(), 9);
        assert!((0..9).all(|s| state.is_empty(s)));
        assert_eq!(state.mover(), PlayerId::new(0));
        assert_eq!(state.who(-1), UNDEFINED);
        assert_eq!(state.what(9), UNDEFINED);
        assert!(!state.is_empty(9));
    }

    #[test]
    fn test_apply_add_and_turn() {
        let mut state = BoardState::new(&meta());
        state.apply(&Move::add(PlayerId::new(0), 4, 1), false);

        assert_eq!(state.who(4), 1);
        assert_eq!(state.what(4), 1);
        assert_eq!(state.count(4), 1);
        assert_eq!(state.mover(), PlayerId::new(1));
    }

    #[test]
    fn test_apply_add_stacks() {
        let mut state = BoardState::new(&meta());
        let p = PlayerId::new(0);
        state.apply(&Move::add(p, 0, 1), true);
        state.apply(&Move::add(p, 0, 1), true);
        assert_eq!(state.count(0), 2);

        state.apply(&Move::add(p, 1, 1), false);
        state.apply(&Move::add(p, 1, 1), false);
        assert_eq!(state.count(1), 1);
    }

    #[test]
    fn test_apply_step_captures() {
        let mut state = BoardState::new(&meta());
        state.apply(&Move::add(PlayerId::new(0), 0, 1), false);
        state.apply(&Move::add(PlayerId::new(1), 1, 2), false);
        state.apply(&Move::step(PlayerId::new(0), 0, 1, 1), false);

        assert!(state.is_empty(0));
        assert_eq!(state.who(1), 1);
        assert_eq!(state.score(PlayerId::new(0)), 1);
        assert_eq!(state.sites_of(1).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_hidden_mask() {
        let mut state = BoardState::new(&meta());
        state.set_hidden(2, PlayerId::new(1), true);

        assert!(state.is_hidden(2, PlayerId::new(1)));
        assert!(!state.is_hidden(2, PlayerId::new(0)));

        state.set_hidden(2, PlayerId::new(1), false);
        assert!(!state.is_hidden(2, PlayerId::new(1)));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = BoardState::new(&meta());
        let snapshot = state.clone();
        state.apply(&Move::add(PlayerId::new(0), 3, 1), false);

        assert!(snapshot.is_empty(3));
        assert_ne!(snapshot, state);
    }

    #[test]
    fn test_trial() {
        let mut trial = Trial::new();
        assert!(trial.is_empty());

        trial.push(Move::add(PlayerId::new(0), 1, 1));
        trial.push(Move::add(PlayerId::new(1), 2, 2));
        assert_eq!(trial.len(), 2);
        assert_eq!(trial.last().unwrap().to, 2);

        trial.truncate(1);
        assert_eq!(trial.last().unwrap().to, 1);
    }
}
