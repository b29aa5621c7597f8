//! Deterministic gameplay module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Input arrives as explicit method calls
//! - Output is a command list, never direct engine calls

pub mod autopilot;
pub mod state;
pub mod tick;
pub mod tower;

pub use state::{ButtonBinding, Character, GameController, GamePhase, Side, TowerPiece, Wiring};
pub use tower::{Tower, next_side, side_for_roll};
