use std::{thread::sleep, time::{Duration, Instant}};

use crossterm::event::Event;
use log::{debug, warn};

use crate::Coords;
use crate::config::Config;
use crate::error::Result;
use crate::game::{Game, GameOver};
use crate::input::{InputManager, Key, is_ctrl_c};
use crate::render::Frame;
use crate::term::TermManager;

enum Flow {
    Continue,
    Quit,
}

/// Owns the terminal and drives the game frame by frame.
pub struct Engine {
    config: Config,
    term: TermManager,
    input: InputManager,
    game: Game,
    frame: Frame,
    paused: bool,
    shown_score: Option<u32>,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self> {
        let term = TermManager::new()?;
        let size = term.get_terminal_size();

        let mut game = Game::new(config.clone());
        game.camera_mut().fit_to(size)?;

        Ok(Engine {
            config,
            term,
            input: InputManager::new(),
            game,
            frame: Frame::new(size),
            paused: false,
            shown_score: None,
        })
    }

    /// Runs until the player quits. The terminal is restored on the way out,
    /// whether the game ended normally or with an error.
    pub fn run(&mut self) -> Result<()> {
        with_terminal(
            self,
            |engine| Ok(engine.term.setup()?),
            Self::run_loop,
            |engine| Ok(engine.term.restore()?),
        )
    }

    ///////////////////////////////////////////////////////////////////////////

    fn run_loop(&mut self) -> Result<()> {
        self.term.clear()?;
        self.render()?;

        if let Flow::Quit = self.show_intro()? {
            return Ok(());
        }

        let frame_interval = Duration::from_millis(self.config.frame_interval_ms);
        let mut last_frame = Instant::now();

        loop {
            sleep(frame_interval);

            self.input.begin_frame();
            for ev in self.term.read_events_queue()? {
                match ev {
                    Event::Key(key_ev) => match self.input.handle_key(&key_ev) {
                        Some(Key::Quit) => return Ok(()),
                        Some(Key::Pause) => self.toggle_pause()?,
                        _ => {}
                    },
                    Event::Resize(w, h) => self.handle_resize((w, h))?,
                    _ => {}
                }
            }

            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f32().min(self.config.max_frame_dt);
            last_frame = now;

            if self.paused { continue; }

            if let Some(over) = self.game.update(dt, &self.input) {
                if let Flow::Quit = self.game_over(&over)? {
                    return Ok(());
                }
                // The prompt blocked; don't feed the wait into the next dt
                last_frame = Instant::now();
                continue;
            }

            self.render()?;
        }
    }

    fn render(&mut self) -> Result<()> {
        self.game.draw(&mut self.frame);
        self.term.present(&self.frame)?;

        let score = self.game.score();
        if self.shown_score != Some(score) {
            self.term.set_title(&self.game.title())?;
            self.shown_score = Some(score);
        }

        Ok(())
    }

    fn show_intro(&mut self) -> Result<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    fn game_over(&mut self, over: &GameOver) -> Result<Flow> {
        self.game.draw(&mut self.frame);
        self.game.draw_wreck(&mut self.frame, over);
        self.term.present(&self.frame)?;

        self.term.show_message(&[
            "Game over!",
            &*format!("Score: {}", over.score),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        self.game.resume();
        self.render()?;
        Ok(Flow::Continue)
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }

    fn handle_resize(&mut self, size: Coords) -> Result<()> {
        debug!("Terminal resized to {}x{}", size.0, size.1);

        if let Err(err) = self.game.camera_mut().fit_to(size) {
            warn!("Keeping previous layout: {}", err);
        }

        self.term.resize(size)?;
        self.frame = Frame::new(size);

        if self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.render()?;
        }
        Ok(())
    }
}

/// Runs `body` once `setup` succeeded and `restore` in every case, so a setup
/// that fails halfway still hands the terminal back. The first error wins.
fn with_terminal<T>(
    owner: &mut T,
    setup: impl FnOnce(&mut T) -> Result<()>,
    body: impl FnOnce(&mut T) -> Result<()>,
    restore: impl FnOnce(&mut T) -> Result<()>,
) -> Result<()> {
    let res = setup(owner).and_then(|_| body(owner));
    let restored = restore(owner);
    res?;
    restored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[derive(Default)]
    struct Calls {
        log: Vec<&'static str>,
    }

    fn fail(msg: &str) -> Result<()> {
        Err(GameError::InvalidConfig(msg.to_string()))
    }

    #[test]
    fn restores_after_normal_run() {
        let mut calls = Calls::default();
        let res = with_terminal(
            &mut calls,
            |c| { c.log.push("setup"); Ok(()) },
            |c| { c.log.push("body"); Ok(()) },
            |c| { c.log.push("restore"); Ok(()) },
        );

        assert!(res.is_ok());
        assert_eq!(calls.log, vec!["setup", "body", "restore"]);
    }

    #[test]
    fn restores_when_setup_fails() {
        let mut calls = Calls::default();
        let res = with_terminal(
            &mut calls,
            |c| { c.log.push("setup"); fail("raw mode") },
            |c| { c.log.push("body"); Ok(()) },
            |c| { c.log.push("restore"); Ok(()) },
        );

        assert!(matches!(res, Err(GameError::InvalidConfig(msg)) if msg == "raw mode"));
        assert_eq!(calls.log, vec!["setup", "restore"]);
    }

    #[test]
    fn body_error_wins_over_restore_error() {
        let mut calls = Calls::default();
        let res = with_terminal(
            &mut calls,
            |_| Ok(()),
            |_| fail("body"),
            |c| { c.log.push("restore"); fail("restore") },
        );

        assert!(matches!(res, Err(GameError::InvalidConfig(msg)) if msg == "body"));
        assert_eq!(calls.log, vec!["restore"]);
    }

    #[test]
    fn restore_error_surfaces_after_clean_run() {
        let mut calls = Calls::default();
        let res = with_terminal(&mut calls, |_| Ok(()), |_| Ok(()), |_| fail("restore"));

        assert!(matches!(res, Err(GameError::InvalidConfig(msg)) if msg == "restore"));
    }
}
