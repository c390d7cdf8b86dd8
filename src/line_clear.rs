//! Removal of completed rows.

use crate::arena::Arena;
use crate::player::Player;
use tracing::info;

/// Clears every full interior row, scanning top to bottom. Each cleared row adds
/// one point and calls `on_score` with the new total. Returns the arena row
/// indices that were cleared, in clear order.
pub fn clear_completed_rows(
    arena: &mut Arena,
    player: &mut Player,
    mut on_score: impl FnMut(u32),
) -> Vec<usize> {
    let mut cleared = Vec::new();
    let last = arena.row_count() - 3;
    let mut row = 1;
    while row <= last {
        if arena.is_row_full(row) {
            arena.remove_row(row);
            arena.insert_empty_row_at_top();
            player.score += 1;
            on_score(player.score);
            cleared.push(row);
            // The row above has shifted into this index; look again.
            continue;
        }
        row += 1;
    }
    if !cleared.is_empty() {
        info!(rows = cleared.len(), score = player.score, "rows cleared");
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{HEIGHT, WIDTH};
    use crate::catalog::SequenceSource;

    fn fill_row(arena: &mut Arena, row: i32) {
        for x in 1..=WIDTH as i32 {
            arena.set_cell(x, row, 2);
        }
    }

    fn player() -> Player {
        Player::new(&mut SequenceSource::new([0]))
    }

    #[test]
    fn single_full_row_is_cleared() {
        let mut arena = Arena::default();
        let mut player = player();
        let bottom = HEIGHT as i32;
        fill_row(&mut arena, bottom);
        arena.set_cell(3, bottom - 1, 5);
        let rows_before = arena.row_count();
        let mut shown = Vec::new();

        let cleared = clear_completed_rows(&mut arena, &mut player, |s| shown.push(s.to_string()));

        assert_eq!(cleared, vec![HEIGHT]);
        assert_eq!(arena.row_count(), rows_before);
        assert_eq!(player.score, 1);
        assert_eq!(shown, vec!["1"]);
        // Block above dropped into the cleared row; top row is fresh.
        assert_eq!(arena.cell_at(3, bottom), 5);
        assert!(!arena.is_row_occupied(1));
    }

    #[test]
    fn adjacent_full_rows_are_all_cleared() {
        let mut arena = Arena::default();
        let mut player = player();
        let bottom = HEIGHT as i32;
        fill_row(&mut arena, bottom);
        fill_row(&mut arena, bottom - 1);
        fill_row(&mut arena, bottom - 3);
        arena.set_cell(1, bottom - 2, 4);

        let mut calls = 0;
        let cleared = clear_completed_rows(&mut arena, &mut player, |_| calls += 1);

        assert_eq!(cleared.len(), 3);
        assert_eq!(calls, 3);
        assert_eq!(player.score, 3);
        assert_eq!(arena.cell_at(1, bottom), 4);
        assert!(arena.interior_rows().filter(|(y, _)| arena.is_row_occupied(*y)).count() == 1);
    }

    #[test]
    fn partial_rows_are_kept() {
        let mut arena = Arena::default();
        let mut player = player();
        for x in 1..WIDTH as i32 {
            arena.set_cell(x, HEIGHT as i32, 2);
        }
        let before = arena.clone();
        let cleared = clear_completed_rows(&mut arena, &mut player, |_| {});
        assert!(cleared.is_empty());
        assert_eq!(arena, before);
        assert_eq!(player.score, 0);
    }
}
