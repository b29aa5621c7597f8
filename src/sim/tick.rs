//! Input and per-tick handling
//!
//! The host engine calls these in order, one at a time. Touches resolve punches;
//! ticks drain health. Game over is only ever decided here.

use glam::Vec2;
use rand::RngCore;

use super::state::{ButtonBinding, GameController, GamePhase, Side};
use crate::command::{Action, Color, Command};
use crate::consts::*;

impl GameController {
    /// Play button pressed while bound to "start"
    pub fn on_start(&mut self) {
        match self.phase {
            GamePhase::Title => {
                self.phase = GamePhase::Ready;
                log::info!("Ready, waiting for first tap");
            }
            GamePhase::Ready | GamePhase::Playing | GamePhase::GameOver => {
                log::debug!("Start ignored in {:?}", self.phase);
            }
        }
    }

    /// Advance one tick. Only drains health while playing.
    pub fn on_tick(&mut self, _dt: f32) {
        match self.phase {
            GamePhase::Playing => {}
            GamePhase::Title | GamePhase::Ready | GamePhase::GameOver => return,
        }

        self.time_ticks += 1;
        self.set_health(self.health - HEALTH_DECAY_PER_TICK);

        if self.health < 0.0 {
            self.game_over();
        }
    }

    /// A multi-touch event; only the first point is used
    pub fn on_touches(&mut self, points: &[Vec2]) {
        if points.len() > 1 {
            log::debug!("{} simultaneous touches, using the first", points.len());
        }
        if let Some(&point) = points.first() {
            self.on_touch(point);
        }
    }

    /// A tap at `point` (scene coordinates)
    pub fn on_touch(&mut self, point: Vec2) {
        match self.phase {
            GamePhase::Title | GamePhase::GameOver => return,
            GamePhase::Ready => {
                // First tap starts the game and also counts as a punch
                self.phase = GamePhase::Playing;
                log::info!("Game started (seed {})", self.seed);
            }
            GamePhase::Playing => {}
        }

        let side = Side::from_touch(point.x, self.scene.size().x);
        self.character.set_side(side, &mut self.commands);

        let Some(head_side) = self.tower.head().map(|p| p.side) else {
            log::error!("Tower is empty, nothing to punch");
            return;
        };

        // Punching on the chopstick side is fatal
        if self.character.side == head_side {
            self.lower_tower(false);
            self.game_over();
            return;
        }

        self.set_health(self.health + PUNCH_HEALTH_BONUS);
        self.set_score(self.score + 1);

        if let Some(punched) = self.tower.pop_head() {
            punched.flip(self.character.side, &mut self.commands);
            self.scene.remove_subtree(punched.node);
        }

        self.add_random_pieces(1);
        self.lower_tower(true);
    }

    /// Play button pressed while bound to "restart".
    ///
    /// Returns the replacement game (already asking the engine to present a new
    /// scene), or `None` if the button is not bound to restart.
    pub fn on_restart(&mut self) -> Option<GameController> {
        if self.play_button != ButtonBinding::Restart {
            log::debug!("Restart ignored in {:?}", self.phase);
            return None;
        }

        let seed = self.rng.next_u64();
        let mut next = GameController::assemble(
            self.pristine.clone(),
            self.wiring.clone(),
            self.base_piece.clone(),
            seed,
        );
        next.commands.insert(0, Command::PresentNewScene);
        log::info!("Restarting (final score {})", self.score);
        Some(next)
    }

    /// Drop every piece one slot. After a successful punch the stack order also
    /// drops so z-positions stay below the UI.
    fn lower_tower(&mut self, restack: bool) {
        let delta = Vec2::new(0.0, -STACK_OFFSET);
        for piece in self.tower.iter_mut() {
            piece.position += delta;
            self.commands.push(Command::run(
                piece.node,
                Action::MoveBy {
                    delta,
                    duration: STACK_DROP_DURATION,
                },
            ));

            if restack {
                piece.stack_order -= 1;
                self.commands.push(Command::run(
                    piece.node,
                    Action::SetZPosition(piece.stack_order as f32),
                ));
            }
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;

        let tint = Action::Colorize {
            color: Color::RED,
            blend_factor: 1.0,
            duration: GAME_OVER_TINT_DURATION,
        };
        for piece in self.tower.iter() {
            self.commands.push(Command::run(piece.node, tint.clone()));
        }
        self.commands.push(Command::run(self.character.node, tint));

        self.play_button = ButtonBinding::Restart;
        log::info!(
            "Game over: score {} after {} ticks",
            self.score,
            self.time_ticks
        );
    }
}
