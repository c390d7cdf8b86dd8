//! Player state: the active piece, where it is, and the score.

use crate::catalog::{CatalogEntry, PieceSource, Rotation, Shape, random_entry};

/// Spawn column (interior coordinates).
pub const SPAWN_X: i32 = 4;
/// Spawn row (interior coordinates).
pub const SPAWN_Y: i32 = 0;

/// Top-left of the piece's matrix, in interior coordinates (no border offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const SPAWN: Self = Self {
        x: SPAWN_X,
        y: SPAWN_Y,
    };
}

/// Current piece: a rotatable copy of its catalog shape. `index` picks the colour.
#[derive(Debug, Clone)]
pub struct ActivePiece {
    pub shape: Shape,
    pub index: usize,
}

impl ActivePiece {
    pub fn new(index: usize, entry: &CatalogEntry) -> Self {
        Self {
            shape: entry.shape(),
            index,
        }
    }

    pub fn rotate(&mut self, dir: Rotation) {
        self.shape = self.shape.rotated(dir);
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub piece: ActivePiece,
    pub pos: Position,
    pub score: u32,
}

impl Player {
    pub fn new(source: &mut dyn PieceSource) -> Self {
        let (index, entry) = random_entry(source);
        Self {
            piece: ActivePiece::new(index, entry),
            pos: Position::SPAWN,
            score: 0,
        }
    }

    /// Back to the spawn point with a freshly drawn piece. Score is kept.
    pub fn respawn(&mut self, source: &mut dyn PieceSource) {
        let (index, entry) = random_entry(source);
        self.piece = ActivePiece::new(index, entry);
        self.pos = Position::SPAWN;
    }
}
