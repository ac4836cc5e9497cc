//! Compiled game metadata.
//!
//! `GameMetadata` is everything the rule tree may consult that never changes
//! during play: players, board topology, equipment, tracks, named regions
//! and puzzle hints, plus the capabilities the game declares. It is built
//! once with [`MetadataBuilder`] and shared read-only (`Arc`) by every
//! context, on every thread.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::board::{Board, Relation};
use super::player::PlayerId;
use crate::context::RegisterSet;
use crate::error::{Error, Result};
use crate::ludeme::GameFlags;

/// A piece type. Component indices start at 1; 0 means "no component".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Human-readable name.
    pub name: String,
    /// Owning player.
    pub owner: PlayerId,
}

/// A named sequence of sites pieces move along.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub sites: Vec<i32>,
    /// Player the track belongs to, `None` for shared tracks.
    pub owner: Option<PlayerId>,
}

/// A named set of sites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    pub sites: Vec<i32>,
    pub owner: Option<PlayerId>,
}

/// A deduction-puzzle constraint: the sites it covers and its target value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub sites: Vec<i32>,
    pub value: i32,
}

/// Immutable compiled metadata.
#[derive(Clone, Debug)]
pub struct GameMetadata {
    name: String,
    player_count: usize,
    board: Board,
    default_relation: Relation,
    components: Vec<Component>,
    tracks: Vec<Track>,
    track_index: FxHashMap<String, usize>,
    regions: Vec<NamedRegion>,
    region_index: FxHashMap<String, usize>,
    hints: Vec<Hint>,
    capabilities: GameFlags,
    provided_registers: RegisterSet,
}

impl GameMetadata {
    /// Start building metadata for a game.
    pub fn builder(name: impl Into<String>, player_count: usize) -> MetadataBuilder {
        MetadataBuilder::new(name, player_count)
    }

    /// Game name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Board topology.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Relation used when an adjacency ludeme does not name one.
    #[must_use]
    pub fn default_relation(&self) -> Relation {
        self.default_relation
    }

    /// All components; index `i` has component number `i + 1`.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Component by number.
    #[must_use]
    pub fn component(&self, number: i32) -> Option<&Component> {
        usize::try_from(number - 1).ok().and_then(|i| self.components.get(i))
    }

    /// First component owned by a player, as a component number.
    #[must_use]
    pub fn default_component(&self, player: PlayerId) -> Option<i32> {
        self.components
            .iter()
            .position(|c| c.owner == player)
            .map(|i| i as i32 + 1)
    }

    /// All tracks.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track by name.
    #[must_use]
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.track_index.get(name).map(|&i| &self.tracks[i])
    }

    /// All named regions.
    #[must_use]
    pub fn regions(&self) -> &[NamedRegion] {
        &self.regions
    }

    /// Named region by name.
    #[must_use]
    pub fn region(&self, name: &str) -> Option<&NamedRegion> {
        self.region_index.get(name).map(|&i| &self.regions[i])
    }

    /// Named region by index.
    #[must_use]
    pub fn region_at(&self, index: i32) -> Option<&NamedRegion> {
        usize::try_from(index).ok().and_then(|i| self.regions.get(i))
    }

    /// Puzzle hints.
    #[must_use]
    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    /// Hint by index.
    #[must_use]
    pub fn hint_at(&self, index: i32) -> Option<&Hint> {
        usize::try_from(index).ok().and_then(|i| self.hints.get(i))
    }

    /// Capabilities this game declares (stacking, hidden information, puzzle).
    #[must_use]
    pub fn capabilities(&self) -> GameFlags {
        self.capabilities
    }

    /// Whether the game declares a capability.
    #[must_use]
    pub fn supports(&self, flags: GameFlags) -> bool {
        self.capabilities.contains(flags)
    }

    /// Registers the engine provides to this game's ludemes.
    #[must_use]
    pub fn provided_registers(&self) -> RegisterSet {
        self.provided_registers
    }
}

/// Builder for [`GameMetadata`].
///
/// ```
/// use ludeme_engine::core::{GameMetadata, PlayerId};
///
/// let meta = GameMetadata::builder("Race", 2)
///     .board(1, 10)
///     .component("Disc1", PlayerId::new(0))
///     .component("Disc2", PlayerId::new(1))
///     .track("Main", (0..10).collect(), None)
///     .build()
///     .unwrap();
///
/// assert_eq!(meta.track("Main").unwrap().sites.len(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct MetadataBuilder {
    name: String,
    player_count: usize,
    rows: usize,
    cols: usize,
    default_relation: Relation,
    components: Vec<Component>,
    tracks: Vec<Track>,
    regions: Vec<NamedRegion>,
    hints: Vec<Hint>,
    capabilities: GameFlags,
    provided_registers: RegisterSet,
}

impl MetadataBuilder {
    /// Create a builder. Defaults to a 3x3 board with orthogonal adjacency.
    pub fn new(name: impl Into<String>, player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            name: name.into(),
            player_count,
            rows: 3,
            cols: 3,
            default_relation: Relation::Orthogonal,
            components: Vec::new(),
            tracks: Vec::new(),
            regions: Vec::new(),
            hints: Vec::new(),
            capabilities: GameFlags::empty(),
            provided_registers: RegisterSet::all(),
        }
    }

    /// Set the board dimensions.
    #[must_use]
    pub fn board(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Set the default adjacency relation.
    #[must_use]
    pub fn default_relation(mut self, relation: Relation) -> Self {
        self.default_relation = relation;
        self
    }

    /// Add a component.
    #[must_use]
    pub fn component(mut self, name: impl Into<String>, owner: PlayerId) -> Self {
        self.components.push(Component {
            name: name.into(),
            owner,
        });
        self
    }

    /// Add one component per player, named `{prefix}{number}`.
    #[must_use]
    pub fn component_per_player(mut self, prefix: &str) -> Self {
        for player in PlayerId::all(self.player_count) {
            self.components.push(Component {
                name: format!("{prefix}{}", player.number()),
                owner: player,
            });
        }
        self
    }

    /// Add a track.
    #[must_use]
    pub fn track(mut self, name: impl Into<String>, sites: Vec<i32>, owner: Option<PlayerId>) -> Self {
        self.tracks.push(Track {
            name: name.into(),
            sites,
            owner,
        });
        self
    }

    /// Add a named region.
    #[must_use]
    pub fn region(mut self, name: impl Into<String>, sites: Vec<i32>, owner: Option<PlayerId>) -> Self {
        self.regions.push(NamedRegion {
            name: name.into(),
            sites,
            owner,
        });
        self
    }

    /// Add a puzzle hint. Declares the deduction-puzzle capability.
    #[must_use]
    pub fn hint(mut self, sites: Vec<i32>, value: i32) -> Self {
        self.hints.push(Hint { sites, value });
        self.capabilities |= GameFlags::DEDUCTION_PUZZLE;
        self
    }

    /// Declare stacking support.
    #[must_use]
    pub fn with_stacking(mut self) -> Self {
        self.capabilities |= GameFlags::STACKING;
        self
    }

    /// Declare hidden information.
    #[must_use]
    pub fn with_hidden_information(mut self) -> Self {
        self.capabilities |= GameFlags::HIDDEN_INFO;
        self
    }

    /// Declare the game a deduction puzzle.
    #[must_use]
    pub fn with_deduction_puzzle(mut self) -> Self {
        self.capabilities |= GameFlags::DEDUCTION_PUZZLE;
        self
    }

    /// Restrict the registers the engine provides.
    #[must_use]
    pub fn provided_registers(mut self, registers: RegisterSet) -> Self {
        self.provided_registers = registers;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<GameMetadata> {
        let board = Board::new(self.rows, self.cols)?;
        let size = board.num_sites();

        let check_sites = |sites: &[i32]| -> Result<()> {
            match sites.iter().find(|&&s| !board.contains(s)) {
                Some(&site) => Err(Error::SiteOutOfRange { site, size }),
                None => Ok(()),
            }
        };

        let mut track_index = FxHashMap::default();
        for (i, track) in self.tracks.iter().enumerate() {
            check_sites(&track.sites)?;
            if track_index.insert(track.name.clone(), i).is_some() {
                return Err(Error::DuplicateName {
                    kind: "track",
                    name: track.name.clone(),
                });
            }
        }

        let mut region_index = FxHashMap::default();
        for (i, region) in self.regions.iter().enumerate() {
            check_sites(&region.sites)?;
            if region_index.insert(region.name.clone(), i).is_some() {
                return Err(Error::DuplicateName {
                    kind: "region",
                    name: region.name.clone(),
                });
            }
        }

        for hint in &self.hints {
            check_sites(&hint.sites)?;
        }

        Ok(GameMetadata {
            name: self.name,
            player_count: self.player_count,
            board,
            default_relation: self.default_relation,
            components: self.components,
            tracks: self.tracks,
            track_index,
            regions: self.regions,
            region_index,
            hints: self.hints,
            capabilities: self.capabilities,
            provided_registers: self.provided_registers,
        })
    }
}
