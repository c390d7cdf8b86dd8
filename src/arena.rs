//! Arena: settled blocks inside a permanent wall border.
//!
//! Coordinates are border-inclusive: row 0 is the top wall, column 0 the left
//! wall. Rows `height + 1` and `height + 2` are both walls, so the bottom has
//! one spare wall row below the floor.

use std::collections::VecDeque;

/// Playfield columns (interior).
pub const WIDTH: usize = 10;
/// Playfield rows (interior).
pub const HEIGHT: usize = 20;

/// Value stored in every border cell.
pub const WALL: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    width: usize,
    height: usize,
    /// rows[y][x]; rows[0] is the top wall.
    rows: VecDeque<Vec<u8>>,
}

impl Arena {
    pub fn new(width: usize, height: usize) -> Self {
        let full = vec![WALL; width + 2];
        let mut rows = VecDeque::with_capacity(height + 3);
        rows.push_back(full.clone());
        for _ in 0..height {
            rows.push_back(Self::empty_row(width));
        }
        rows.push_back(full.clone());
        rows.push_back(full);
        Self {
            width,
            height,
            rows,
        }
    }

    fn empty_row(width: usize) -> Vec<u8> {
        let mut row = vec![0; width + 2];
        row[0] = WALL;
        row[width + 1] = WALL;
        row
    }

    /// Interior width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Interior height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total rows including walls (always `height + 3`).
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Border-inclusive read. `None` outside the allocated grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Border-inclusive read; anything outside the grid reads as wall.
    #[inline]
    pub fn cell_at(&self, x: i32, y: i32) -> u8 {
        self.get(x, y).unwrap_or(WALL)
    }

    /// Writes interior cells only; border and out-of-range writes are dropped.
    #[inline]
    pub fn set_cell(&mut self, x: i32, y: i32, value: u8) {
        if self.is_interior(x, y) {
            if let Some(row) = self.rows.get_mut(y as usize) {
                row[x as usize] = value;
            }
        }
    }

    pub fn is_interior(&self, x: i32, y: i32) -> bool {
        x >= 1 && x <= self.width as i32 && y >= 1 && y <= self.height as i32
    }

    /// Every interior cell of the row is non-empty.
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|r| r[1..=self.width].iter().all(|&c| c != 0))
    }

    /// Any interior cell of the row is non-empty.
    pub fn is_row_occupied(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|r| r[1..=self.width].iter().any(|&c| c != 0))
    }

    /// Drops an interior row. Pair with [`Self::insert_empty_row_at_top`].
    pub fn remove_row(&mut self, row: usize) {
        if (1..=self.height).contains(&row) {
            self.rows.remove(row);
        }
    }

    /// Inserts a bordered empty row just below the top wall.
    pub fn insert_empty_row_at_top(&mut self) {
        self.rows.insert(1, Self::empty_row(self.width));
    }

    /// Interior rows with their 1-based row index.
    pub fn interior_rows(&self) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .take(self.height)
            .map(|(y, row)| (y, &row[1..=self.width]))
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_has_walls_and_empty_interior() {
        let arena = Arena::new(WIDTH, HEIGHT);
        assert_eq!(arena.row_count(), HEIGHT + 3);
        let (w, h) = (WIDTH as i32, HEIGHT as i32);
        for y in 0..h + 3 {
            for x in 0..w + 2 {
                let border = y == 0 || y >= h + 1 || x == 0 || x == w + 1;
                let cell = arena.cell_at(x, y);
                if border {
                    assert_ne!(cell, 0, "border ({x},{y}) empty");
                } else {
                    assert_eq!(cell, 0, "interior ({x},{y}) not empty");
                }
            }
        }
    }

    #[test]
    fn border_writes_are_ignored() {
        let mut arena = Arena::new(4, 4);
        arena.set_cell(0, 2, 0);
        arena.set_cell(2, 0, 0);
        arena.set_cell(2, 6, 0);
        arena.set_cell(99, 99, 3);
        assert_eq!(arena, Arena::new(4, 4));
        arena.set_cell(2, 2, 3);
        assert_eq!(arena.cell_at(2, 2), 3);
    }

    #[test]
    fn out_of_range_reads_as_wall() {
        let arena = Arena::new(4, 4);
        assert_eq!(arena.get(-1, 2), None);
        assert_eq!(arena.cell_at(-1, 2), WALL);
        assert_eq!(arena.cell_at(2, 7), WALL);
    }

    #[test]
    fn row_full_ignores_border_columns() {
        let mut arena = Arena::new(3, 4);
        assert!(!arena.is_row_full(2));
        for x in 1..=3 {
            arena.set_cell(x, 2, 1);
        }
        assert!(arena.is_row_full(2));
        assert!(!arena.is_row_full(1));
    }

    #[test]
    fn remove_and_insert_keeps_row_count_and_walls() {
        let mut arena = Arena::new(3, 4);
        arena.set_cell(1, 4, 5);
        arena.set_cell(2, 3, 6);
        arena.remove_row(4);
        arena.insert_empty_row_at_top();
        assert_eq!(arena.row_count(), 7);
        assert_eq!(arena.cell_at(2, 4), 6);
        assert!(!arena.is_row_occupied(1));
        assert!((0..5).all(|x| arena.cell_at(x, 0) == WALL));
        assert!((0..5).all(|x| arena.cell_at(x, 5) == WALL && arena.cell_at(x, 6) == WALL));
    }

    #[test]
    fn remove_row_refuses_walls() {
        let mut arena = Arena::new(3, 4);
        arena.remove_row(0);
        arena.remove_row(5);
        assert_eq!(arena.row_count(), 7);
    }
}
