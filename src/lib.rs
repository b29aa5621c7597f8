//! Sushi Neko - punch the sushi tower from the safe side
//!
//! Core modules:
//! - `sim`: Deterministic gameplay (tower generation, punches, health, phases)
//! - `scene`: Named scene graph bookkeeping and wiring lookups
//! - `command`: Fire-and-forget commands for the host engine
//! - `session`: Engine adapter (button routing, fixed timestep, restarts)

pub mod command;
pub mod scene;
pub mod session;
pub mod sim;

pub use command::{Action, Animation, Color, Command};
pub use scene::{NodeId, NodeKind, Scene, SceneError};
pub use session::Session;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one health decay step per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the session will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Vertical distance between stacked pieces
    pub const STACK_OFFSET: f32 = 55.0;
    /// Duration of the tower drop after a punch (seconds)
    pub const STACK_DROP_DURATION: f32 = 0.10;

    /// Health gained per successful punch
    pub const PUNCH_HEALTH_BONUS: f32 = 0.1;
    /// Health lost every tick while playing
    pub const HEALTH_DECAY_PER_TICK: f32 = 0.01;
    /// Health at the start of a run (also the cap)
    pub const MAX_HEALTH: f32 = 1.0;

    /// Random draw below this is a left piece
    pub const LEFT_THRESHOLD: f32 = 0.45;
    /// Random draw below this (and above LEFT_THRESHOLD) is a right piece
    pub const RIGHT_THRESHOLD: f32 = 0.90;
    /// Pieces generated on top of the fixed opening pieces
    pub const INITIAL_RANDOM_PIECES: usize = 10;

    /// Character x position when standing on the left
    pub const CHARACTER_LEFT_X: f32 = 70.0;
    /// Character x position when standing on the right (sprite mirrored)
    pub const CHARACTER_RIGHT_X: f32 = 252.0;

    /// Game over colorize duration (seconds)
    pub const GAME_OVER_TINT_DURATION: f32 = 0.50;
}
