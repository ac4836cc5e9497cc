//! Board topology.
//!
//! Boards are rectangular grids. Sites are numbered row-major from 0.
//! Adjacency for every [`Relation`] and the list of orthogonal edges are
//! computed once when the board is built; ludemes only read them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Neighbourhood relation used by adjacency ludemes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// Shares a side.
    #[default]
    Orthogonal,
    /// Shares only a corner.
    Diagonal,
    /// Orthogonal or diagonal.
    All,
}

/// Line directions as (row delta, column delta).
const LINE_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Rectangular board with precomputed topology.
#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    orthogonal: Vec<SmallVec<[i32; 8]>>,
    diagonal: Vec<SmallVec<[i32; 8]>>,
    all: Vec<SmallVec<[i32; 8]>>,
    edges: Vec<(i32, i32)>,
    site_edges: Vec<SmallVec<[i32; 4]>>,
}

impl Board {
    /// Build a `rows` x `cols` board.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidBoard(format!("{rows}x{cols} has no sites")));
        }
        if rows * cols > i32::MAX as usize {
            return Err(Error::InvalidBoard(format!("{rows}x{cols} is too large")));
        }

        let mut board = Self {
            rows,
            cols,
            orthogonal: Vec::with_capacity(rows * cols),
            diagonal: Vec::with_capacity(rows * cols),
            all: Vec::with_capacity(rows * cols),
            edges: Vec::new(),
            site_edges: vec![SmallVec::new(); rows * cols],
        };

        for site in 0..(rows * cols) as i32 {
            let (r, c) = (board.row(site), board.column(site));
            let mut orth = SmallVec::new();
            let mut diag = SmallVec::new();
            for dr in -1..=1 {
                for dc in -1..=1 {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    if let Some(n) = board.site_at(r + dr, c + dc) {
                        if dr == 0 || dc == 0 {
                            orth.push(n);
                        } else {
                            diag.push(n);
                        }
                    }
                }
            }
            let mut all: SmallVec<[i32; 8]> = orth.iter().chain(diag.iter()).copied().collect();
            all.sort_unstable();
            board.orthogonal.push(orth);
            board.diagonal.push(diag);
            board.all.push(all);
        }

        for site in 0..(rows * cols) as i32 {
            for &n in &board.orthogonal[site as usize] {
                if n > site {
                    let index = board.edges.len() as i32;
                    board.edges.push((site, n));
                    board.site_edges[site as usize].push(index);
                    board.site_edges[n as usize].push(index);
                }
            }
        }

        Ok(board)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of sites.
    #[must_use]
    pub fn num_sites(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether `site` is on the board.
    #[must_use]
    pub fn contains(&self, site: i32) -> bool {
        site >= 0 && (site as usize) < self.num_sites()
    }

    /// Row of a site (caller guarantees the site is on the board).
    #[must_use]
    pub fn row(&self, site: i32) -> i32 {
        site / self.cols as i32
    }

    /// Column of a site (caller guarantees the site is on the board).
    #[must_use]
    pub fn column(&self, site: i32) -> i32 {
        site % self.cols as i32
    }

    /// Site at a coordinate, if on the board.
    #[must_use]
    pub fn site_at(&self, row: i32, col: i32) -> Option<i32> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            None
        } else {
            Some(row * self.cols as i32 + col)
        }
    }

    /// Neighbours of `site` under `relation`. Empty for off-board sites.
    #[must_use]
    pub fn adjacent(&self, site: i32, relation: Relation) -> &[i32] {
        if !self.contains(site) {
            return &[];
        }
        let table = match relation {
            Relation::Orthogonal => &self.orthogonal,
            Relation::Diagonal => &self.diagonal,
            Relation::All => &self.all,
        };
        &table[site as usize]
    }

    /// Number of orthogonal edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// End sites of an edge.
    #[must_use]
    pub fn edge(&self, index: i32) -> Option<(i32, i32)> {
        usize::try_from(index).ok().and_then(|i| self.edges.get(i)).copied()
    }

    /// Edge indices incident to a site.
    #[must_use]
    pub fn edges_of(&self, site: i32) -> &[i32] {
        if !self.contains(site) {
            return &[];
        }
        &self.site_edges[site as usize]
    }

    /// Sites strictly between two sites on a common row, column or diagonal.
    ///
    /// Returns `None` when the sites are not aligned.
    #[must_use]
    pub fn between(&self, from: i32, to: i32) -> Option<SmallVec<[i32; 8]>> {
        if !self.contains(from) || !self.contains(to) || from == to {
            return None;
        }
        let (dr, dc) = (self.row(to) - self.row(from), self.column(to) - self.column(from));
        if dr != 0 && dc != 0 && dr.abs() != dc.abs() {
            return None;
        }
        let steps = dr.abs().max(dc.abs());
        let (sr, sc) = (dr.signum(), dc.signum());
        let (r, c) = (self.row(from), self.column(from));
        Some(
            (1..steps)
                .filter_map(|k| self.site_at(r + sr * k, c + sc * k))
                .collect(),
        )
    }

    /// Every straight line of `length` sites on the board.
    pub fn lines(&self, length: usize) -> impl Iterator<Item = SmallVec<[i32; 8]>> + '_ {
        let len = length as i32;
        (0..self.num_sites() as i32).flat_map(move |site| {
            let (r, c) = (self.row(site), self.column(site));
            LINE_DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
                (0..len)
                    .map(|k| self.site_at(r + dr * k, c + dc * k))
                    .collect::<Option<SmallVec<[i32; 8]>>>()
            })
        })
    }
}
