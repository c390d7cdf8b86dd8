//! Draw commands for one frame, in grid units (one cell = 1x1).
//!
//! The simulation only talks to a [`Surface`]; the terminal host maps the
//! colour tokens through the theme.

use crate::arena::Arena;
use crate::catalog::CATALOG_LEN;
use crate::player::Player;

/// Colour token passed to [`Surface::set_fill_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    Background,
    /// Catalog index (0-based).
    Piece(usize),
}

/// 2D fill-rectangle drawing surface.
pub trait Surface {
    fn set_fill_color(&mut self, paint: Paint);
    fn fill_rect(&mut self, x: i32, y: i32, width: u16, height: u16);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    SetFillColor(Paint),
    FillRect { x: i32, y: i32, width: u16, height: u16 },
}

/// Recorded frame. Replay it onto any [`Surface`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderCommands {
    commands: Vec<DrawCommand>,
}

impl RenderCommands {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn replay(&self, surface: &mut impl Surface) {
        for cmd in &self.commands {
            match *cmd {
                DrawCommand::SetFillColor(paint) => surface.set_fill_color(paint),
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                } => surface.fill_rect(x, y, width, height),
            }
        }
    }

    /// Unit cells filled with each paint, in draw order. Later fills win.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn filled_cells(&self) -> Vec<(i32, i32, Paint)> {
        let mut out = Vec::new();
        let mut paint = Paint::Background;
        for cmd in &self.commands {
            match *cmd {
                DrawCommand::SetFillColor(p) => paint = p,
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                } => {
                    for dy in 0..i32::from(height) {
                        for dx in 0..i32::from(width) {
                            out.push((x + dx, y + dy, paint));
                        }
                    }
                }
            }
        }
        out
    }
}

impl Surface for RenderCommands {
    fn set_fill_color(&mut self, paint: Paint) {
        self.commands.push(DrawCommand::SetFillColor(paint));
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u16, height: u16) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }
}

/// Background, then settled cells, then the active piece on top.
pub fn paint_scene(arena: &Arena, player: &Player, surface: &mut impl Surface) {
    surface.set_fill_color(Paint::Background);
    surface.fill_rect(0, 0, arena.width() as u16, arena.height() as u16);

    for (y, row) in arena.interior_rows() {
        for (x, &cell) in row.iter().enumerate() {
            if cell == 0 {
                continue;
            }
            let index = usize::from(cell - 1) % CATALOG_LEN;
            surface.set_fill_color(Paint::Piece(index));
            surface.fill_rect(x as i32, y as i32 - 1, 1, 1);
        }
    }

    surface.set_fill_color(Paint::Piece(player.piece.index));
    for (i, j, _) in player.piece.shape.occupied() {
        surface.fill_rect(player.pos.x + j as i32, player.pos.y + i as i32, 1, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{HEIGHT, WIDTH};
    use crate::catalog::SequenceSource;

    #[test]
    fn empty_board_draws_background_and_piece() {
        let arena = Arena::default();
        let player = Player::new(&mut SequenceSource::new([4]));
        let mut frame = RenderCommands::new();
        paint_scene(&arena, &player, &mut frame);

        assert_eq!(
            frame.commands(),
            &[
                DrawCommand::SetFillColor(Paint::Background),
                DrawCommand::FillRect {
                    x: 0,
                    y: 0,
                    width: WIDTH as u16,
                    height: HEIGHT as u16
                },
                DrawCommand::SetFillColor(Paint::Piece(4)),
                DrawCommand::FillRect {
                    x: 4,
                    y: 0,
                    width: 1,
                    height: 1
                },
            ]
        );
    }

    #[test]
    fn settled_cells_use_catalog_colour_of_value_minus_one() {
        let mut arena = Arena::default();
        arena.set_cell(1, HEIGHT as i32, 3);
        let player = Player::new(&mut SequenceSource::new([0]));
        let mut frame = RenderCommands::new();
        paint_scene(&arena, &player, &mut frame);

        let cells = frame.filled_cells();
        assert!(cells.contains(&(0, HEIGHT as i32 - 1, Paint::Piece(2))));
    }

    #[test]
    fn replay_reproduces_commands() {
        let arena = Arena::default();
        let player = Player::new(&mut SequenceSource::new([1]));
        let mut frame = RenderCommands::new();
        paint_scene(&arena, &player, &mut frame);
        let mut copy = RenderCommands::new();
        frame.replay(&mut copy);
        assert_eq!(copy, frame);
    }
}
