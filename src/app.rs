//! App: terminal init, frame loop, key dispatch, score display.

use crate::catalog::RandomSource;
use crate::input::{Action, key_to_action};
use crate::session::{FrameOutput, GameEvent, Session};
use crate::theme::Theme;
use crate::ui::{self, Flash, FlashState};
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

pub struct App {
    theme: Theme,
    session: Session,
    /// Score sink: rewritten only when the session reports a new score.
    score_text: String,
    flash: FlashState,
    frame_interval: Duration,
}

impl App {
    pub fn new(args: &Args, config: &GameConfig, theme: Theme) -> Self {
        let source = RandomSource::new(config.seed);
        let session = Session::new(config, Box::new(source));
        let score_text = session.player.score.to_string();
        Self {
            theme,
            session,
            score_text,
            flash: FlashState::default(),
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(args.frame_rate)),
        }
    }

    /// Host side of the frame events: score text and flashes.
    fn apply_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::ScoreChanged(score) => self.score_text = score.to_string(),
                GameEvent::RowsCleared(rows) => self.flash.trigger(Flash::Rows(rows.clone())),
                GameEvent::BoardReset => self.flash.trigger(Flash::Board),
                GameEvent::Locked { index, x, y } => trace!(index, x, y, "lock reported"),
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let (cols, rows) = size()?;
        let (min_cols, min_rows) = ui::min_terminal_size();
        if cols < min_cols || rows < min_rows {
            warn!(cols, rows, min_cols, min_rows, "terminal smaller than the board, drawing cropped");
        }

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let started = Instant::now();
        let mut output: FrameOutput = self.session.frame(Duration::ZERO);
        info!(frame_interval = ?self.frame_interval, "frame loop started");

        loop {
            self.apply_events(&output.events);

            let now = Instant::now();
            terminal.draw(|f| {
                ui::draw(
                    f,
                    &output.commands,
                    &self.score_text,
                    &self.theme,
                    &mut self.flash,
                    now,
                );
            })?;

            // Keys are handled as they arrive until the next frame is due.
            let next_frame = now + self.frame_interval;
            loop {
                let timeout = next_frame.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                if let Event::Key(key) = event::read()? {
                    match key_to_action(key) {
                        Action::Quit => {
                            info!(score = self.session.player.score, "quit");
                            return Ok(());
                        }
                        Action::None => {}
                        action => {
                            self.session.handle_action(action);
                            debug!(?action, fall_interval = ?self.session.fall_interval(), "key");
                        }
                    }
                }
            }

            output = self.session.frame(started.elapsed());
        }
    }
}
