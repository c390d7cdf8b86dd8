//! Piece catalog: the seven fixed shapes, their colours, rotation, and the piece draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Square matrix of cell values. 0 = empty, otherwise the 1-based catalog index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<u8>>,
}

/// Rotation direction for [`Shape::rotated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    pub fn inverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

impl Shape {
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        Self {
            rows: rows.iter().map(|r| r.as_ref().to_vec()).collect(),
        }
    }

    /// Side length (number of rows).
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_square(&self) -> bool {
        self.rows.iter().all(|r| r.len() == self.rows.len())
    }

    /// Occupied cells as (row, col, value).
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.rows.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0)
                .map(move |(j, &v)| (i, j, v))
        })
    }

    /// New matrix rotated 90 degrees. Only square shapes can rotate.
    pub fn rotated(&self, dir: Rotation) -> Self {
        assert!(self.is_square(), "cannot rotate a non-square shape");
        let n = self.size();
        let mut rows = vec![vec![0u8; n]; n];
        for (i, row) in self.rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                match dir {
                    Rotation::Clockwise => rows[j][n - 1 - i] = v,
                    Rotation::CounterClockwise => rows[n - 1 - j][i] = v,
                }
            }
        }
        Self { rows }
    }
}

/// Shape plus display colour (`#RRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub cells: &'static [&'static [u8]],
    pub color: &'static str,
}

impl CatalogEntry {
    /// Mutable copy of the stored shape; the catalog itself is never rotated.
    pub fn shape(&self) -> Shape {
        Shape::from_rows(self.cells)
    }
}

pub const CATALOG_LEN: usize = 7;

pub static CATALOG: [CatalogEntry; CATALOG_LEN] = [
    CatalogEntry {
        cells: &[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]],
        color: "#9518E2",
    },
    CatalogEntry {
        cells: &[&[2, 2, 2], &[0, 0, 2], &[0, 0, 2]],
        color: "#F0692F",
    },
    CatalogEntry {
        cells: &[&[3, 3, 3], &[0, 3, 0], &[0, 3, 0]],
        color: "#F5D949",
    },
    CatalogEntry {
        cells: &[&[0, 4, 0], &[0, 4, 0], &[0, 4, 0]],
        color: "#26AA10",
    },
    CatalogEntry {
        cells: &[&[5, 0], &[0, 0]],
        color: "#E91E1E",
    },
    CatalogEntry {
        cells: &[&[6, 0], &[0, 6]],
        color: "#D70FC3",
    },
    CatalogEntry {
        cells: &[&[7, 0, 0], &[0, 7, 7], &[0, 0, 0]],
        color: "#1EBB95",
    },
];

#[inline]
pub fn catalog() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Source of catalog indices for spawning. Must return a value in `0..len`.
pub trait PieceSource {
    fn next_index(&mut self, len: usize) -> usize;
}

/// Uniform draw backed by `rand`.
#[derive(Debug)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl PieceSource for RandomSource {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Scripted indices, cycled. Out-of-range values wrap into `0..len`.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone)]
pub struct SequenceSource {
    queue: VecDeque<usize>,
}

#[cfg_attr(not(test), allow(dead_code))]
impl SequenceSource {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        let queue: VecDeque<usize> = indices.into_iter().collect();
        assert!(!queue.is_empty(), "sequence source needs at least one index");
        Self { queue }
    }
}

impl PieceSource for SequenceSource {
    fn next_index(&mut self, len: usize) -> usize {
        let i = self.queue.pop_front().unwrap_or(0);
        self.queue.push_back(i);
        i % len
    }
}

/// Uniform pick from the catalog.
pub fn random_entry(source: &mut dyn PieceSource) -> (usize, &'static CatalogEntry) {
    let entries = catalog();
    let index = source.next_index(entries.len());
    (index, &entries[index])
}
