//! Scene graph bookkeeping
//!
//! The host engine owns the real sprites. This is the controller's own record of
//! which named nodes exist, what kind they are, and where they started, so that
//! wiring can be checked once at startup and template pieces can be cloned with
//! stable ids.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard SushiNeko layout (portrait, 320x568 points)
pub const STANDARD_SCENE_JSON: &str = r#"{
    "size": [320.0, 568.0],
    "nodes": [
        {
            "name": "sushiBasePiece",
            "kind": "SushiPiece",
            "position": [160.0, 110.0],
            "z_position": 1.0,
            "children": [
                { "name": "leftChopstick", "kind": "Sprite", "position": [-62.0, 4.0] },
                { "name": "rightChopstick", "kind": "Sprite", "position": [62.0, 4.0] }
            ]
        },
        { "name": "character", "kind": "Character", "position": [70.0, 92.0], "z_position": 50.0 },
        { "name": "playButton", "kind": "Button", "position": [160.0, 284.0], "z_position": 100.0 },
        { "name": "healthBar", "kind": "Sprite", "position": [60.0, 520.0], "z_position": 100.0 },
        { "name": "scoreLabel", "kind": "Label", "position": [160.0, 440.0], "z_position": 100.0 }
    ]
}"#;

/// Handle to a node in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// What a node is, as far as wiring cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Sprite,
    SushiPiece,
    Character,
    Button,
    Label,
}

/// Wiring failures. All of these are fatal: the game cannot run without its
/// fixed scene graph.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene description is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scene has no node named `{name}`")]
    MissingNode { name: String },
    #[error("node `{name}` has z-position {z}, stacked pieces need a whole number")]
    NonIntegralZ { name: String, z: f32 },
    #[error("node `{name}` is a {found:?}, expected a {expected:?}")]
    WrongKind {
        name: String,
        expected: NodeKind,
        found: NodeKind,
    },
}

/// Serialized form of a node and its children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub z_position: f32,
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

/// Serialized scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    pub size: Vec2,
    pub nodes: Vec<NodeDescription>,
}

/// A node as tracked by the scene
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub position: Vec2,
    pub z_position: f32,
}

/// Live nodes keyed by id. Ids are never reused, so a node the engine is
/// still animating out cannot be confused with a newer one.
#[derive(Debug, Clone)]
pub struct Scene {
    size: Vec2,
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u32,
}

impl Scene {
    pub fn from_description(desc: &SceneDescription) -> Self {
        let mut scene = Self {
            size: desc.size,
            nodes: BTreeMap::new(),
            next_id: 0,
        };
        for node in &desc.nodes {
            scene.insert_description(node, None);
        }
        scene
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let desc: SceneDescription = serde_json::from_str(json)?;
        Ok(Self::from_description(&desc))
    }

    /// The built-in layout
    pub fn standard() -> Result<Self, SceneError> {
        Self::from_json(STANDARD_SCENE_JSON)
    }

    fn insert_description(&mut self, desc: &NodeDescription, parent: Option<NodeId>) {
        let id = self.push(SceneNode {
            name: desc.name.clone(),
            kind: desc.kind,
            parent,
            children: Vec::new(),
            position: desc.position,
            z_position: desc.z_position,
        });
        for child in &desc.children {
            self.insert_description(child, Some(id));
        }
    }

    /// Add a node under `node.parent`. Any `children` it carries are ignored.
    fn push(&mut self, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        node.children.clear();
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        self.nodes.insert(id, node);
        id
    }

    /// Play area size in points
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Look up a top-level node by name and check its kind.
    /// Nodes loaded from the description win over later copies.
    pub fn find(&self, name: &str, kind: NodeKind) -> Result<NodeId, SceneError> {
        let found = self
            .nodes
            .iter()
            .find(|(_, n)| n.parent.is_none() && n.name == name)
            .map(|(id, _)| *id);
        self.check_kind(found, name, kind)
    }

    /// Look up a direct child of `parent` by name and check its kind
    pub fn find_child(
        &self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
    ) -> Result<NodeId, SceneError> {
        let found = self.node(parent).and_then(|p| {
            p.children
                .iter()
                .copied()
                .find(|c| self.node(*c).is_some_and(|n| n.name == name))
        });
        self.check_kind(found, name, kind)
    }

    fn check_kind(
        &self,
        found: Option<NodeId>,
        name: &str,
        kind: NodeKind,
    ) -> Result<NodeId, SceneError> {
        let (id, node) = found
            .and_then(|id| self.node(id).map(|n| (id, n)))
            .ok_or_else(|| SceneError::MissingNode {
                name: name.to_string(),
            })?;

        if node.kind != kind {
            return Err(SceneError::WrongKind {
                name: name.to_string(),
                expected: kind,
                found: node.kind,
            });
        }
        Ok(id)
    }

    /// Copy `source` and all of its descendants. The copy has no parent.
    ///
    /// Returns the new node and a (source, copy) pair for every descendant.
    /// Returns `None` if `source` is not in this scene.
    pub fn clone_subtree(&mut self, source: NodeId) -> Option<(NodeId, Vec<(NodeId, NodeId)>)> {
        let mut root = self.node(source)?.clone();
        root.parent = None;
        let copy = self.push(root);

        let mut mapping = Vec::new();
        let mut pending = vec![(source, copy)];
        while let Some((from, to)) = pending.pop() {
            let children = self
                .nodes
                .get(&from)
                .map(|n| n.children.clone())
                .unwrap_or_default();
            for child in children {
                let Some(mut node) = self.nodes.get(&child).cloned() else {
                    continue;
                };
                node.parent = Some(to);
                let child_copy = self.push(node);
                mapping.push((child, child_copy));
                pending.push((child, child_copy));
            }
        }

        Some((copy, mapping))
    }

    /// Forget `id` and all of its descendants. Returns how many nodes went.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.remove(&id) else {
            return 0;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }

        let mut removed = 1;
        let mut pending = node.children;
        while let Some(child) = pending.pop() {
            if let Some(node) = self.nodes.remove(&child) {
                removed += 1;
                pending.extend(node.children);
            }
        }
        removed
    }
}

impl std::ops::Index<NodeId> for Scene {
    type Output = SceneNode;

    /// Panics on a handle that is not (or no longer) in this scene
    fn index(&self, id: NodeId) -> &SceneNode {
        match self.nodes.get(&id) {
            Some(node) => node,
            None => panic!("node {:?} is not in the scene", id),
        }
    }
}
