//! Value types produced by ludemes.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};

/// Sentinel for "no meaningful answer" (off-board site, unbound register,
/// division by zero, unknown player...). Callers check for it before using
/// a result as an index.
pub const UNDEFINED: i32 = -1;

/// Value kind of a ludeme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Boolean,
    Int,
    Region,
    IntArray,
    Moves,
}

/// Integer array value. Persistent, so cached arrays clone in O(1).
pub type IntArray = Vector<i32>;

/// A set of sites, kept sorted.
///
/// Backed by a persistent ordered set: returning a cached region from a
/// static ludeme is a pointer copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    sites: OrdSet<i32>,
}

impl Region {
    /// Empty region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Region holding the given sites.
    pub fn from_sites(sites: impl IntoIterator<Item = i32>) -> Self {
        Self {
            sites: sites.into_iter().collect(),
        }
    }

    /// Add a site.
    pub fn insert(&mut self, site: i32) {
        self.sites.insert(site);
    }

    /// Whether a site is in the region.
    #[must_use]
    pub fn contains(&self, site: i32) -> bool {
        self.sites.contains(&site)
    }

    /// Number of sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the region has no sites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Sites in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.sites.iter().copied()
    }

    /// Sites of either region.
    #[must_use]
    pub fn union(&self, other: &Region) -> Region {
        Region {
            sites: self.sites.clone().union(other.sites.clone()),
        }
    }

    /// Sites of both regions.
    #[must_use]
    pub fn intersection(&self, other: &Region) -> Region {
        self.iter().filter(|&s| other.contains(s)).collect()
    }

    /// Sites of `self` not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Region) -> Region {
        self.iter().filter(|&s| !other.contains(s)).collect()
    }
}

impl FromIterator<i32> for Region {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self::from_sites(iter)
    }
}
