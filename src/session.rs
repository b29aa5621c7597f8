//! Engine adapter
//!
//! Owns the current game, routes the play button to start or restart, and runs
//! ticks on a fixed timestep so health drains at the same rate on any display.

use glam::Vec2;

use crate::command::Command;
use crate::consts::*;
use crate::scene::{Scene, SceneError};
use crate::sim::{ButtonBinding, GameController};

pub struct Session {
    game: GameController,
    accumulator: f32,
    restarts: u32,
}

impl Session {
    pub fn new(scene: Scene, seed: u64) -> Result<Self, SceneError> {
        Ok(Self {
            game: GameController::new(scene, seed)?,
            accumulator: 0.0,
            restarts: 0,
        })
    }

    /// Session on the built-in layout
    pub fn standard(seed: u64) -> Result<Self, SceneError> {
        Self::new(Scene::standard()?, seed)
    }

    pub fn game(&self) -> &GameController {
        &self.game
    }

    /// Number of times the game has been replaced
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn press_play_button(&mut self) {
        match self.game.play_button {
            ButtonBinding::Start => self.game.on_start(),
            ButtonBinding::Restart => {
                if let Some(next) = self.game.on_restart() {
                    let dropped = self.game.commands().len();
                    if dropped > 0 {
                        log::debug!("Dropping {} commands for the old scene", dropped);
                    }
                    self.game = next;
                    self.accumulator = 0.0;
                    self.restarts += 1;
                }
            }
        }
    }

    /// Forward a touch event
    pub fn touch(&mut self, points: &[Vec2]) {
        self.game.on_touches(points);
    }

    /// Advance by a frame's worth of time. Returns the number of ticks run.
    /// A non-finite `frame_dt` counts as no time at all.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() {
            self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        } else {
            log::warn!("Ignoring non-finite frame time {}", frame_dt);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.game.on_tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Take all pending commands for the engine
    pub fn drain_commands(&mut self) -> Vec<Command> {
        self.game.drain_commands()
    }
}
