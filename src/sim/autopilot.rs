//! Idle/demo mode player
//!
//! Always punches from the side without chopsticks. On a plain head it stays
//! where it is.

use glam::Vec2;

use super::state::{GameController, Side};

/// Side that safely punches the current head
pub fn safe_side(game: &GameController) -> Side {
    match game.tower.head().map(|p| p.side) {
        Some(side @ (Side::Left | Side::Right)) => side.opposite(),
        Some(Side::None) | None => game.character.side,
    }
}

/// Tap point (scene coordinates) for the safe side
pub fn choose_touch(game: &GameController) -> Vec2 {
    let size = game.scene().size();
    let x = match safe_side(game) {
        Side::Right => size.x * 0.75,
        Side::Left | Side::None => size.x * 0.25,
    };
    Vec2::new(x, size.y * 0.25)
}
