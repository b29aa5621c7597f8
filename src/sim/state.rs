//! Game state and core entity types
//!
//! Everything the controller tracks between callbacks lives here. Entities carry
//! their own position/z bookkeeping and emit engine commands when they change.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::tower::{Tower, next_side};
use crate::command::{Action, Animation, Command};
use crate::consts::*;
use crate::scene::{NodeId, NodeKind, Scene, SceneError};

/// Which side a piece carries chopsticks on, or which side the player stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    /// Plain piece (no chopsticks). Never valid for the character.
    #[default]
    None,
}

impl Side {
    /// Side of the play area a touch at `x` falls on
    pub fn from_touch(x: f32, play_width: f32) -> Side {
        if x > play_width / 2.0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::None => Side::None,
        }
    }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the play button
    Title,
    /// Play button pressed, waiting for the first tap
    Ready,
    /// Active gameplay, health decaying
    Playing,
    /// Run ended; only a restart leaves this phase
    GameOver,
}

/// What the play button does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonBinding {
    Start,
    Restart,
}

/// One piece of the sushi tower
#[derive(Debug, Clone)]
pub struct TowerPiece {
    pub node: NodeId,
    pub left_chopstick: NodeId,
    pub right_chopstick: NodeId,
    pub side: Side,
    pub position: Vec2,
    /// Z-order; each piece sits one unit above the one below it
    pub stack_order: i32,
}

impl TowerPiece {
    /// Wire up a piece node and its two chopstick children
    pub fn connect(scene: &Scene, node: NodeId) -> Result<Self, SceneError> {
        let left_chopstick = scene.find_child(node, "leftChopstick", NodeKind::Sprite)?;
        let right_chopstick = scene.find_child(node, "rightChopstick", NodeKind::Sprite)?;
        let template = &scene[node];
        let z = template.z_position;
        if !z.is_finite() || z.fract() != 0.0 {
            return Err(SceneError::NonIntegralZ {
                name: template.name.clone(),
                z,
            });
        }
        Ok(Self {
            node,
            left_chopstick,
            right_chopstick,
            side: Side::None,
            position: template.position,
            stack_order: z as i32,
        })
    }

    /// Clone this piece (and its chopsticks) into a new scene node.
    ///
    /// The copy starts at this piece's position and order with side `None`;
    /// the caller places it. Returns `None` if this piece is not in `scene`.
    pub fn spawn_copy(&self, scene: &mut Scene) -> Option<(TowerPiece, Command)> {
        let (node, children) = scene.clone_subtree(self.node)?;
        let copy_of = |source: NodeId| {
            children
                .iter()
                .find(|(from, _)| *from == source)
                .map(|(_, to)| *to)
        };
        let left_chopstick = copy_of(self.left_chopstick)?;
        let right_chopstick = copy_of(self.right_chopstick)?;

        let piece = TowerPiece {
            node,
            left_chopstick,
            right_chopstick,
            side: Side::None,
            position: self.position,
            stack_order: self.stack_order,
        };
        let clone = Command::Clone {
            source: self.node,
            node,
            children,
        };
        Some((piece, clone))
    }

    /// Set the side and show only the matching chopstick
    pub fn set_side(&mut self, side: Side, out: &mut Vec<Command>) {
        self.side = side;
        let (left, right) = match side {
            Side::Left => (true, false),
            Side::Right => (false, true),
            Side::None => (false, false),
        };
        out.push(Command::run(self.left_chopstick, Action::SetVisible(left)));
        out.push(Command::run(self.right_chopstick, Action::SetVisible(right)));
    }

    /// Knock the piece off screen away from `direction`, then remove it
    pub fn flip(&self, direction: Side, out: &mut Vec<Command>) {
        let exit = match direction {
            Side::Left => Some(Animation::FlipRight),
            Side::Right => Some(Animation::FlipLeft),
            Side::None => None,
        };

        let steps = match exit {
            Some(animation) => vec![Action::PlayAnimation(animation), Action::RemoveFromScene],
            None => {
                log::warn!("Flip without a direction, removing piece {:?}", self.node);
                vec![Action::RemoveFromScene]
            }
        };
        out.push(Command::run(self.node, Action::Sequence(steps)));
    }
}

/// The player's cat
#[derive(Debug, Clone)]
pub struct Character {
    pub node: NodeId,
    pub side: Side,
    pub position: Vec2,
    /// 1 facing right from the left side, -1 mirrored on the right side
    pub x_scale: f32,
}

impl Character {
    pub fn new(node: NodeId, position: Vec2) -> Self {
        Self {
            node,
            side: Side::Left,
            position,
            x_scale: 1.0,
        }
    }

    /// Move to `side` and punch. Punches again even if already on that side.
    pub fn set_side(&mut self, side: Side, out: &mut Vec<Command>) {
        let (x_scale, x) = match side {
            Side::Left => (1.0, CHARACTER_LEFT_X),
            Side::Right => (-1.0, CHARACTER_RIGHT_X),
            Side::None => {
                log::warn!("Character cannot stand on side None");
                return;
            }
        };

        self.side = side;
        self.x_scale = x_scale;
        self.position.x = x;
        out.push(Command::run(self.node, Action::SetXScale(x_scale)));
        out.push(Command::run(self.node, Action::SetPosition(self.position)));
        out.push(Command::run(self.node, Action::PlayAnimation(Animation::Punch)));
    }
}

/// Typed handles to the named nodes the game needs
#[derive(Debug, Clone)]
pub struct Wiring {
    pub base_piece: NodeId,
    pub character: NodeId,
    pub play_button: NodeId,
    pub health_bar: NodeId,
    pub score_label: NodeId,
}

impl Wiring {
    /// Resolve every required node. Any failure is fatal for the game.
    pub fn connect(scene: &Scene) -> Result<Self, SceneError> {
        Ok(Self {
            base_piece: scene.find("sushiBasePiece", NodeKind::SushiPiece)?,
            character: scene.find("character", NodeKind::Character)?,
            play_button: scene.find("playButton", NodeKind::Button)?,
            health_bar: scene.find("healthBar", NodeKind::Sprite)?,
            score_label: scene.find("scoreLabel", NodeKind::Label)?,
        })
    }
}

/// Scene controller: owns the tower, the character, and the phase machine
#[derive(Debug, Clone)]
pub struct GameController {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Live scene bookkeeping (grows as pieces are cloned)
    pub(crate) scene: Scene,
    /// Scene as loaded, used to build the next game on restart
    pub(crate) pristine: Scene,
    pub(crate) wiring: Wiring,
    /// Current phase
    pub phase: GamePhase,
    pub score: u32,
    /// 1.0 is full. Briefly negative on the tick that ends the game.
    pub health: f32,
    /// Template piece the tower stands on; never punched
    pub base_piece: TowerPiece,
    pub tower: Tower,
    pub character: Character,
    pub play_button: ButtonBinding,
    /// Ticks spent in Playing
    pub time_ticks: u64,
    pub(crate) commands: Vec<Command>,
}

impl GameController {
    /// Wire up the scene and stack the opening tower
    pub fn new(scene: Scene, seed: u64) -> Result<Self, SceneError> {
        let wiring = Wiring::connect(&scene)?;
        let base_piece = TowerPiece::connect(&scene, wiring.base_piece)?;
        Ok(Self::assemble(scene, wiring, base_piece, seed))
    }

    pub(crate) fn assemble(scene: Scene, wiring: Wiring, base_piece: TowerPiece, seed: u64) -> Self {
        let character_position = scene[wiring.character].position;
        let mut controller = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            pristine: scene.clone(),
            scene,
            character: Character::new(wiring.character, character_position),
            wiring,
            phase: GamePhase::Title,
            score: 0,
            health: MAX_HEALTH,
            base_piece,
            tower: Tower::new(),
            play_button: ButtonBinding::Start,
            time_ticks: 0,
            commands: Vec::new(),
        };

        controller.base_piece.set_side(Side::None, &mut controller.commands);
        controller.set_health(MAX_HEALTH);
        controller.set_score(0);

        // Opening pieces are fixed so the first tap is always safe
        controller.add_tower_piece(Side::None);
        controller.add_tower_piece(Side::Right);
        controller.add_random_pieces(INITIAL_RANDOM_PIECES);

        log::info!(
            "New game (seed {}), tower of {} pieces",
            seed,
            controller.tower.len()
        );
        controller
    }

    /// Stack a new piece on top of the tower
    pub fn add_tower_piece(&mut self, side: Side) {
        let last = self.tower.tail().unwrap_or(&self.base_piece);
        let position = last.position + Vec2::new(0.0, STACK_OFFSET);
        let stack_order = last.stack_order + 1;

        let Some((mut piece, clone)) = self.base_piece.spawn_copy(&mut self.scene) else {
            log::error!("Base piece {:?} missing from scene", self.base_piece.node);
            return;
        };
        self.commands.push(clone);

        piece.position = position;
        piece.stack_order = stack_order;
        self.commands
            .push(Command::run(piece.node, Action::SetPosition(position)));
        self.commands.push(Command::run(
            piece.node,
            Action::SetZPosition(stack_order as f32),
        ));
        piece.set_side(side, &mut self.commands);

        self.tower.push(piece);
    }

    /// Grow the tower by `total` pieces using the generation rule
    pub fn add_random_pieces(&mut self, total: usize) {
        for _ in 0..total {
            let last_side = self.tower.tail().unwrap_or(&self.base_piece).side;
            let side = next_side(last_side, &mut self.rng);
            log::debug!("Generated {:?} piece after {:?}", side, last_side);
            self.add_tower_piece(side);
        }
    }

    /// Set health (capped at full) and resize the health bar
    pub(crate) fn set_health(&mut self, health: f32) {
        self.health = health.min(MAX_HEALTH);
        self.commands.push(Command::run(
            self.wiring.health_bar,
            Action::SetXScale(self.health.clamp(0.0, MAX_HEALTH)),
        ));
    }

    /// Set score and update the label
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
        self.commands.push(Command::run(
            self.wiring.score_label,
            Action::SetText(score.to_string()),
        ));
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    /// Commands issued since the last drain
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Take all pending commands for the engine
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(seed: u64) -> GameController {
        GameController::new(Scene::standard().unwrap(), seed).unwrap()
    }

    fn visibility(commands: &[Command], node: NodeId) -> Option<bool> {
        commands.iter().rev().find_map(|c| match c.action_for(node) {
            Some(Action::SetVisible(v)) => Some(*v),
            _ => None,
        })
    }

    fn punch_count(commands: &[Command], node: NodeId) -> usize {
        commands
            .iter()
            .filter(|c| c.action_for(node) == Some(&Action::PlayAnimation(Animation::Punch)))
            .count()
    }

    #[test]
    fn test_side_from_touch() {
        assert_eq!(Side::from_touch(200.0, 320.0), Side::Right);
        assert_eq!(Side::from_touch(100.0, 320.0), Side::Left);
        // Exactly on the midline counts as left
        assert_eq!(Side::from_touch(160.0, 320.0), Side::Left);
    }

    #[test]
    fn test_new_game_tower() {
        let game = controller(42);
        assert_eq!(game.phase, GamePhase::Title);
        assert_eq!(game.play_button, ButtonBinding::Start);
        assert_eq!(game.tower.len(), 2 + INITIAL_RANDOM_PIECES);
        assert_eq!(game.score, 0);
        assert_eq!(game.health, MAX_HEALTH);

        let sides = game.tower.sides();
        assert_eq!(sides[0], Side::None);
        assert_eq!(sides[1], Side::Right);
        assert_eq!(sides[2], Side::None);
    }

    #[test]
    fn test_tower_stacking_geometry() {
        let game = controller(7);
        let mut below = &game.base_piece;
        for piece in game.tower.iter() {
            assert_eq!(piece.position.y, below.position.y + STACK_OFFSET);
            assert_eq!(piece.position.x, below.position.x);
            assert_eq!(piece.stack_order, below.stack_order + 1);
            below = piece;
        }
    }

    #[test]
    fn test_pieces_have_distinct_nodes() {
        let game = controller(7);
        let mut nodes: Vec<NodeId> = game.tower.iter().map(|p| p.node).collect();
        nodes.push(game.base_piece.node);
        let count = nodes.len();
        nodes.sort();
        nodes.dedup();
        assert_eq!(nodes.len(), count);
    }

    #[test]
    fn test_piece_set_side_visibility() {
        let game = controller(1);
        let mut piece = game.base_piece.clone();
        let mut out = Vec::new();

        piece.set_side(Side::Left, &mut out);
        assert_eq!(visibility(&out, piece.left_chopstick), Some(true));
        assert_eq!(visibility(&out, piece.right_chopstick), Some(false));

        piece.set_side(Side::Right, &mut out);
        assert_eq!(visibility(&out, piece.left_chopstick), Some(false));
        assert_eq!(visibility(&out, piece.right_chopstick), Some(true));
    }

    #[test]
    fn test_piece_set_side_none_is_idempotent() {
        let game = controller(1);
        let mut piece = game.base_piece.clone();

        for _ in 0..2 {
            let mut out = Vec::new();
            piece.set_side(Side::None, &mut out);
            assert_eq!(piece.side, Side::None);
            assert_eq!(visibility(&out, piece.left_chopstick), Some(false));
            assert_eq!(visibility(&out, piece.right_chopstick), Some(false));
        }
    }

    #[test]
    fn test_flip_sequences_animation_then_removal() {
        let game = controller(1);
        let piece = &game.base_piece;

        let mut out = Vec::new();
        piece.flip(Side::Left, &mut out);
        assert_eq!(
            out[0].action_for(piece.node),
            Some(&Action::Sequence(vec![
                Action::PlayAnimation(Animation::FlipRight),
                Action::RemoveFromScene,
            ]))
        );

        let mut out = Vec::new();
        piece.flip(Side::Right, &mut out);
        assert_eq!(
            out[0].action_for(piece.node),
            Some(&Action::Sequence(vec![
                Action::PlayAnimation(Animation::FlipLeft),
                Action::RemoveFromScene,
            ]))
        );
    }

    #[test]
    fn test_character_set_side() {
        let game = controller(1);
        let mut character = game.character.clone();
        let mut out = Vec::new();

        character.set_side(Side::Right, &mut out);
        assert_eq!(character.side, Side::Right);
        assert_eq!(character.x_scale, -1.0);
        assert_eq!(character.position.x, CHARACTER_RIGHT_X);

        character.set_side(Side::Left, &mut out);
        assert_eq!(character.x_scale, 1.0);
        assert_eq!(character.position.x, CHARACTER_LEFT_X);
        assert_eq!(punch_count(&out, character.node), 2);
    }

    #[test]
    fn test_character_repeat_side_punches_again() {
        let game = controller(1);
        let mut character = game.character.clone();
        let mut out = Vec::new();

        character.set_side(Side::Right, &mut out);
        let (position, scale) = (character.position, character.x_scale);
        character.set_side(Side::Right, &mut out);

        assert_eq!(punch_count(&out, character.node), 2);
        assert_eq!(character.position, position);
        assert_eq!(character.x_scale, scale);
    }

    #[test]
    fn test_character_rejects_none() {
        let game = controller(1);
        let mut character = game.character.clone();
        let mut out = Vec::new();

        character.set_side(Side::None, &mut out);
        assert_eq!(character.side, Side::Left);
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_wiring_is_an_error() {
        let json = r#"{ "size": [320.0, 568.0], "nodes": [
            { "name": "character", "kind": "Character" }
        ] }"#;
        let scene = Scene::from_json(json).unwrap();
        let err = GameController::new(scene, 1).unwrap_err();
        assert!(matches!(err, SceneError::MissingNode { ref name } if name == "sushiBasePiece"));
    }

    #[test]
    fn test_fractional_piece_z_is_rejected() {
        let json = crate::scene::STANDARD_SCENE_JSON
            .replacen("\"z_position\": 1.0", "\"z_position\": 1.5", 1);
        let scene = Scene::from_json(&json).unwrap();
        let err = GameController::new(scene, 1).unwrap_err();
        assert!(matches!(
            err,
            SceneError::NonIntegralZ { ref name, z } if name == "sushiBasePiece" && z == 1.5
        ));
    }

    #[test]
    fn test_same_seed_same_tower() {
        assert_eq!(controller(99).tower.sides(), controller(99).tower.sides());
    }
}
