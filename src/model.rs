//! The consumed model asset.
//!
//! The widget never parses asset formats itself: a loader (outside this
//! crate) produces a [`ModelAsset`], a flat node table with parent/child
//! indices, optional per-node meshes and skins, and the named animation
//! clips, and hands it over exactly once, before the stage is built.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::animation::AnimationClip;
use crate::geometry::Geometry;

/// Skin for one mesh: joint node indices (into [`ModelAsset::nodes`]) plus
/// the inverse bind matrices, ordered to match the vertex joint attributes.
#[derive(Debug, Clone)]
pub struct ModelSkin {
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Vec<Mat4>,
}

#[derive(Debug, Clone)]
pub struct ModelMesh {
    pub geometry: Geometry,
    pub skin: Option<ModelSkin>,
}

/// One node of the asset hierarchy. `children` hold indices into
/// [`ModelAsset::nodes`].
#[derive(Debug, Clone)]
pub struct ModelNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mesh: Option<ModelMesh>,
    pub children: Vec<usize>,
}

impl ModelNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mesh(mut self, geometry: Geometry) -> Self {
        self.mesh = Some(ModelMesh {
            geometry,
            skin: None,
        });
        self
    }

    #[must_use]
    pub fn with_skinned_mesh(mut self, geometry: Geometry, skin: ModelSkin) -> Self {
        self.mesh = Some(ModelMesh {
            geometry,
            skin: Some(skin),
        });
        self
    }
}

/// A fully loaded model: scene hierarchy plus named animation clips.
#[derive(Debug, Clone, Default)]
pub struct ModelAsset {
    pub nodes: Vec<ModelNode>,
    /// Indices of the top-level nodes.
    pub roots: Vec<usize>,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl ModelAsset {
    #[must_use]
    pub fn new(nodes: Vec<ModelNode>, roots: Vec<usize>, clips: Vec<AnimationClip>) -> Self {
        Self {
            nodes,
            roots,
            clips: clips.into_iter().map(Arc::new).collect(),
        }
    }
}
