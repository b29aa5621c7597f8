//! Commands sent to the host engine
//!
//! The simulation never waits on these: it pushes them and moves on. The only
//! ordering it relies on is inside a single `Action::Sequence`, which the engine
//! must run step by step on one node.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Named animations authored in the engine's action library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    /// Character punch
    Punch,
    /// Punched piece flies off toward the left
    FlipLeft,
    /// Punched piece flies off toward the right
    FlipRight,
}

/// RGB tint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const RED: Color = Color {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
}

/// Something a single node should do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    PlayAnimation(Animation),
    /// Relative move, animated over `duration` seconds
    MoveBy { delta: Vec2, duration: f32 },
    SetVisible(bool),
    Colorize {
        color: Color,
        blend_factor: f32,
        duration: f32,
    },
    RemoveFromScene,
    SetPosition(Vec2),
    /// Horizontal scale (-1 mirrors the sprite)
    SetXScale(f32),
    SetZPosition(f32),
    SetText(String),
    /// Steps run one after another; each waits for the previous to finish
    Sequence(Vec<Action>),
}

/// A command for the host engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Run an action on a node
    Run { node: NodeId, action: Action },
    /// Copy `source` (with its children) into a new node `node`.
    /// `children` maps each source child to its copy.
    Clone {
        source: NodeId,
        node: NodeId,
        children: Vec<(NodeId, NodeId)>,
    },
    /// Tear down the current scene and show a freshly loaded one
    PresentNewScene,
}

impl Command {
    pub fn run(node: NodeId, action: Action) -> Self {
        Command::Run { node, action }
    }

    /// Returns the action if this command runs `action` on `node`
    pub fn action_for(&self, target: NodeId) -> Option<&Action> {
        match self {
            Command::Run { node, action } if *node == target => Some(action),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_for_filters_by_node() {
        let cmd = Command::run(NodeId(3), Action::SetVisible(true));
        assert_eq!(cmd.action_for(NodeId(3)), Some(&Action::SetVisible(true)));
        assert_eq!(cmd.action_for(NodeId(4)), None);
        assert_eq!(Command::PresentNewScene.action_for(NodeId(3)), None);
    }

    #[test]
    fn test_command_json_shape() {
        let cmd = Command::run(
            NodeId(7),
            Action::Sequence(vec![
                Action::PlayAnimation(Animation::FlipLeft),
                Action::RemoveFromScene,
            ]),
        );
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("FlipLeft"));
        assert!(json.contains("RemoveFromScene"));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
