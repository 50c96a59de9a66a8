use glam::Affine3A;

use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeHandle};

/// A scene node: hierarchy links, a transform, and optional renderable state.
///
/// Nodes form a tree through parent/child handles. The mesh, when present,
/// lives in the scene's mesh arena and is referenced by key.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub name: String,
    pub transform: Transform,
    pub visible: bool,

    /// Renderable mesh attached to this node, if any.
    pub mesh: Option<MeshKey>,
    /// Whether this node's mesh is rendered into the shadow map.
    pub cast_shadow: bool,
    /// Whether this node's mesh samples the shadow map when shaded.
    pub receive_shadow: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            name: name.into(),
            transform: Transform::new(),
            visible: true,
            mesh: None,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// True when the node carries a renderable mesh. This is the predicate
    /// used by hierarchy walks that visit mesh nodes only.
    #[inline]
    #[must_use]
    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// World transformation matrix, updated by the scene each frame.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
