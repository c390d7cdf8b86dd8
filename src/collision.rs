//! Collision test and merge of a piece into the arena.
//!
//! Piece positions are interior-relative; the +1 maps them onto the
//! border-inclusive arena.

use crate::arena::Arena;
use crate::catalog::Shape;
use crate::player::Position;

/// True if any occupied cell of `shape` at `pos` lands on a wall or settled block.
pub fn collides(shape: &Shape, pos: Position, arena: &Arena) -> bool {
    shape
        .occupied()
        .any(|(i, j, _)| arena.cell_at(pos.x + j as i32 + 1, pos.y + i as i32 + 1) != 0)
}

/// Commits the occupied cells of `shape` at (`x`, `y`). Never overwrites a non-empty cell.
pub fn merge(shape: &Shape, x: i32, y: i32, arena: &mut Arena) {
    for (i, j, value) in shape.occupied() {
        let (ax, ay) = (x + j as i32 + 1, y + i as i32 + 1);
        if arena.get(ax, ay) == Some(0) {
            arena.set_cell(ax, ay, value);
        }
    }
}
