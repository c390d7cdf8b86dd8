//! Layout and drawing: playfield from recorded draw commands, score sidebar, flash effects.

use crate::arena::{HEIGHT, WIDTH};
use crate::render::{Paint, RenderCommands, Surface};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Terminal columns per grid cell (cells are roughly square this way).
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 22;
const ROW_FLASH_MS: u32 = 250;
const RESET_FLASH_MS: u32 = 600;

/// Board size in terminal cells, border included.
fn board_outer_size() -> (u16, u16) {
    (WIDTH as u16 * CELL_WIDTH + 2, HEIGHT as u16 + 2)
}

/// Smallest terminal that shows the board and sidebar uncropped.
pub fn min_terminal_size() -> (u16, u16) {
    let (w, h) = board_outer_size();
    (w + SIDEBAR_WIDTH, h)
}

/// What to flash on the next draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    /// Arena row indices (1-based interior rows) that were just cleared.
    Rows(Vec<usize>),
    /// Whole board after a reset.
    Board,
}

/// TachyonFX flash: queued by the host, built against the board rect on draw.
#[derive(Default)]
pub struct FlashState {
    pending: Option<Flash>,
    effect: Option<Effect>,
    last_process: Option<Instant>,
}

impl FlashState {
    pub fn trigger(&mut self, flash: Flash) {
        // A board reset outranks a row flash queued in the same frame.
        if self.pending == Some(Flash::Board) {
            return;
        }
        self.pending = Some(flash);
        self.effect = None;
        self.last_process = None;
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some() || self.effect.is_some()
    }
}

/// Replays draw commands onto a ratatui buffer, clipped to `area`.
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    theme: &'a Theme,
    color: Color,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, theme: &'a Theme) -> Self {
        Self {
            buf,
            area,
            theme,
            color: theme.bg,
        }
    }
}

impl Surface for BufferSurface<'_> {
    fn set_fill_color(&mut self, paint: Paint) {
        self.color = self.theme.paint(paint);
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u16, height: u16) {
        let style = Style::default().fg(self.color).bg(self.color);
        for gy in y..y + i32::from(height) {
            for gx in x..x + i32::from(width) {
                if gx < 0 || gy < 0 {
                    continue;
                }
                let ry = i32::from(self.area.y) + gy;
                for dx in 0..i32::from(CELL_WIDTH) {
                    let rx = i32::from(self.area.x) + gx * i32::from(CELL_WIDTH) + dx;
                    let (Ok(rx), Ok(ry)) = (u16::try_from(rx), u16::try_from(ry)) else {
                        continue;
                    };
                    if self.area.contains(Position::new(rx, ry)) {
                        self.buf[(rx, ry)].set_symbol("█").set_style(style);
                    }
                }
            }
        }
    }
}

/// Centered board + sidebar rects for the whole screen.
fn layout(area: Rect) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size();
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bw),
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Fill(1),
        ])
        .split(area);
    let center = |r: Rect| {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(bh),
                Constraint::Fill(1),
            ])
            .split(r)[1]
    };
    (center(horiz[1]), center(horiz[2]))
}

/// Bordered playfield; returns the inner rect the grid was drawn into.
pub fn draw_board(buf: &mut Buffer, area: Rect, commands: &RenderCommands, theme: &Theme) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border).bg(theme.bg))
        .title(Span::styled(" Blocktris ", theme.title));
    let inner = block.inner(area);
    block.render(area, buf);
    commands.replay(&mut BufferSurface::new(buf, inner, theme));
    inner
}

/// Score panel and key help.
pub fn draw_sidebar(buf: &mut Buffer, area: Rect, score_text: &str, theme: &Theme) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.text);
    let border_style = Style::default().fg(theme.border);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score
            Constraint::Length(1), // gap
            Constraint::Length(8), // Keys
        ])
        .split(area);

    let score_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let score_inner = score_block.inner(chunks[0]);
    score_block.render(chunks[0], buf);
    Paragraph::new(Line::from(vec![
        Span::styled("Score: ", title_style),
        Span::styled(score_text, fg_style),
    ]))
    .render(score_inner, buf);

    let keys_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled("Keys", title_style));
    let keys_inner = keys_block.inner(chunks[2]);
    keys_block.render(chunks[2], buf);
    let help = [
        ("←/→ h/l", "move"),
        ("↑ k", "rotate"),
        ("↓ j", "soft drop"),
        ("Space", "fast drop"),
        ("q Esc", "quit"),
    ];
    let lines: Vec<Line> = help
        .iter()
        .map(|(k, what)| {
            Line::from(vec![
                Span::styled(format!("{k:<8}"), title_style),
                Span::styled(*what, fg_style),
            ])
        })
        .collect();
    Paragraph::new(Text::from(lines)).render(keys_inner, buf);
}

/// Build the queued flash (if any) for `board` and advance it by the time since the last draw.
fn apply_flash(frame: &mut Frame, board: Rect, theme: &Theme, flash: &mut FlashState, now: Instant) {
    let delta = flash
        .last_process
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    flash.last_process = Some(now);

    if let Some(pending) = flash.pending.take() {
        let effect = match pending {
            Flash::Rows(rows) => {
                let screen_rows: HashSet<u16> = rows
                    .iter()
                    .map(|&r| board.y + r.saturating_sub(1) as u16)
                    .collect();
                let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
                    screen_rows.contains(&pos.y)
                }));
                fx::fade_from(Color::White, Color::White, (ROW_FLASH_MS, Interpolation::Linear))
                    .with_filter(filter)
                    .with_area(board)
            }
            Flash::Board => {
                fx::fade_from(theme.title, theme.title, (RESET_FLASH_MS, Interpolation::QuadOut))
                    .with_area(board)
            }
        };
        flash.effect = Some(effect);
    }

    let done = match flash.effect.as_mut() {
        Some(effect) => {
            frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
            effect.done()
        }
        None => false,
    };
    if done {
        flash.effect = None;
        flash.last_process = None;
    }
}

/// Draw one frame: playfield, sidebar, and any running flash.
pub fn draw(
    frame: &mut Frame,
    commands: &RenderCommands,
    score_text: &str,
    theme: &Theme,
    flash: &mut FlashState,
    now: Instant,
) {
    let (board_area, sidebar_area) = layout(frame.area());
    let board = draw_board(frame.buffer_mut(), board_area, commands, theme);
    draw_sidebar(frame.buffer_mut(), sidebar_area, score_text, theme);
    if flash.is_active() {
        apply_flash(frame, board, theme, flash, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::catalog::SequenceSource;
    use crate::player::Player;
    use crate::render::paint_scene;

    fn scene(piece: usize) -> RenderCommands {
        let arena = Arena::default();
        let player = Player::new(&mut SequenceSource::new([piece]));
        let mut commands = RenderCommands::new();
        paint_scene(&arena, &player, &mut commands);
        commands
    }

    #[test]
    fn board_fills_background_and_piece() {
        let theme = Theme::default();
        let (w, h) = board_outer_size();
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        let inner = draw_board(&mut buf, area, &scene(4), &theme);

        assert_eq!(inner, Rect::new(1, 1, WIDTH as u16 * 2, HEIGHT as u16));
        // Single block of catalog entry 4 at grid (4, 0): two terminal columns.
        let piece = theme.pieces[4];
        assert_eq!(buf[(9, 1)].bg, piece);
        assert_eq!(buf[(10, 1)].bg, piece);
        assert_eq!(buf[(11, 1)].bg, theme.bg);
        assert_eq!(buf[(1, HEIGHT as u16)].bg, theme.bg);
    }

    #[test]
    fn surface_clips_outside_area() {
        let theme = Theme::default();
        let area = Rect::new(2, 2, 4, 2);
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 10));
        let mut surface = BufferSurface::new(&mut buf, area, &theme);
        surface.set_fill_color(Paint::Piece(0));
        surface.fill_rect(-1, 0, 1, 1);
        surface.fill_rect(5, 5, 1, 1);
        surface.fill_rect(1, 1, 1, 1);
        let piece = theme.pieces[0];
        assert_eq!(buf[(4, 3)].bg, piece);
        assert_eq!(buf[(5, 3)].bg, piece);
        let painted = buf.content().iter().filter(|c| c.bg == piece).count();
        assert_eq!(painted, 2);
    }

    #[test]
    fn sidebar_shows_score_text() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, SIDEBAR_WIDTH, 12);
        let mut buf = Buffer::empty(area);
        draw_sidebar(&mut buf, area, "42", &theme);
        let row: String = (0..area.width).map(|x| buf[(x, 1)].symbol()).collect();
        assert!(row.contains("Score: 42"), "{row}");
    }

    #[test]
    fn board_flash_is_not_replaced_by_rows() {
        let mut flash = FlashState::default();
        flash.trigger(Flash::Board);
        flash.trigger(Flash::Rows(vec![3]));
        assert_eq!(flash.pending, Some(Flash::Board));
        assert!(flash.is_active());
    }

    #[test]
    fn layout_fits_minimum_terminal() {
        let (w, h) = min_terminal_size();
        let (board, sidebar) = layout(Rect::new(0, 0, w, h));
        assert_eq!((board.width, board.height), board_outer_size());
        assert_eq!(sidebar.x, board.x + board.width);
    }
}
