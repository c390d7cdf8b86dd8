//! Game session: arena, player, gravity timing, and the piece draw in one place.
//!
//! The host calls [`Session::frame`] once per display frame with a monotonic
//! timestamp and feeds key actions to [`Session::handle_action`]. Both run on
//! the same thread, so no locking is involved.

use crate::GameConfig;
use crate::arena::Arena;
use crate::catalog::{PieceSource, Rotation};
use crate::collision::{collides, merge};
use crate::input::Action;
use crate::line_clear::clear_completed_rows;
use crate::player::Player;
use crate::render::{RenderCommands, paint_scene};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Gravity step at rest.
pub const DEFAULT_FALL_INTERVAL: Duration = Duration::from_millis(1000);
/// Gravity step while the fast drop is engaged (a step every frame).
pub const FAST_DROP_INTERVAL: Duration = Duration::from_millis(1);

/// What happened during a frame, for the host (score text, effects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Piece committed to the arena; `index` is its catalog index.
    Locked { index: usize, x: i32, y: i32 },
    /// Arena row indices removed, in clear order.
    RowsCleared(Vec<usize>),
    /// New score total.
    ScoreChanged(u32),
    /// Top row was occupied after a lock; the arena was wiped.
    BoardReset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOutput {
    pub commands: RenderCommands,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    last_timestamp: Duration,
    accumulated: Duration,
    fall_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            last_timestamp: Duration::ZERO,
            accumulated: Duration::ZERO,
            fall_interval: DEFAULT_FALL_INTERVAL,
        }
    }
}

pub struct Session {
    pub arena: Arena,
    pub player: Player,
    timing: Timing,
    source: Box<dyn PieceSource>,
    reset_score_on_game_over: bool,
}

impl Session {
    pub fn new(config: &GameConfig, mut source: Box<dyn PieceSource>) -> Self {
        let player = Player::new(source.as_mut());
        info!(piece = player.piece.index, "session started");
        Self {
            arena: Arena::default(),
            player,
            timing: Timing::default(),
            source,
            reset_score_on_game_over: config.reset_score_on_game_over,
        }
    }

    #[inline]
    pub fn fall_interval(&self) -> Duration {
        self.timing.fall_interval
    }

    #[inline]
    pub fn is_fast_dropping(&self) -> bool {
        self.timing.fall_interval <= FAST_DROP_INTERVAL
    }

    /// Host entry point: `timestamp` is time since start (0 on the first call).
    pub fn frame(&mut self, timestamp: Duration) -> FrameOutput {
        let dt = timestamp.saturating_sub(self.timing.last_timestamp);
        self.timing.last_timestamp = timestamp;
        self.advance(dt)
    }

    /// One simulation step of `dt`, then the scene to draw.
    pub fn advance(&mut self, dt: Duration) -> FrameOutput {
        let mut events = Vec::new();

        self.timing.accumulated += dt;
        if self.timing.accumulated >= self.timing.fall_interval {
            self.player.pos.y += 1;
            self.timing.accumulated = Duration::ZERO;
        }

        if collides(&self.player.piece.shape, self.player.pos, &self.arena) {
            self.lock_piece(&mut events);
        }

        let mut commands = RenderCommands::new();
        paint_scene(&self.arena, &self.player, &mut commands);
        FrameOutput { commands, events }
    }

    /// Collision was detected one row ahead, so the piece rests at `y - 1`.
    fn lock_piece(&mut self, events: &mut Vec<GameEvent>) {
        let index = self.player.piece.index;
        let (x, y) = (self.player.pos.x, self.player.pos.y - 1);
        merge(&self.player.piece.shape, x, y, &mut self.arena);
        debug!(piece = index, x, y, "piece locked");
        events.push(GameEvent::Locked { index, x, y });

        let cleared = clear_completed_rows(&mut self.arena, &mut self.player, |score| {
            events.push(GameEvent::ScoreChanged(score));
        });
        if !cleared.is_empty() {
            events.push(GameEvent::RowsCleared(cleared));
        }

        if self.arena.is_row_occupied(1) {
            info!(score = self.player.score, "stack reached the top, resetting board");
            self.arena = Arena::new(self.arena.width(), self.arena.height());
            events.push(GameEvent::BoardReset);
            if self.reset_score_on_game_over {
                self.player.score = 0;
                events.push(GameEvent::ScoreChanged(0));
            }
        }

        self.player.respawn(self.source.as_mut());
        self.timing.fall_interval = DEFAULT_FALL_INTERVAL;
        debug!(piece = self.player.piece.index, "piece spawned");
    }

    /// Applies one key action. Moves that would collide are rolled back.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.shift(-1),
            Action::MoveRight => self.shift(1),
            Action::SoftDrop => {
                // Landing is picked up by the next frame's collision test.
                self.player.pos.y += 1;
                self.timing.accumulated = Duration::ZERO;
            }
            Action::Rotate => {
                let dir = Rotation::Clockwise;
                self.player.piece.rotate(dir);
                if collides(&self.player.piece.shape, self.player.pos, &self.arena) {
                    self.player.piece.rotate(dir.inverse());
                    trace!("rotation rejected");
                }
            }
            Action::FastDrop => self.timing.fall_interval = FAST_DROP_INTERVAL,
            Action::Quit | Action::None => {}
        }
    }

    fn shift(&mut self, dx: i32) {
        // Steering is locked while the fast drop runs.
        if self.is_fast_dropping() {
            return;
        }
        self.player.pos.x += dx;
        if collides(&self.player.piece.shape, self.player.pos, &self.arena) {
            self.player.pos.x -= dx;
            trace!(dx, "move rejected");
        }
    }
}
