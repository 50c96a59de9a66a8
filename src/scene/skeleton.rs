use glam::{Affine3A, Mat4};

use crate::scene::NodeHandle;

/// Skin data for a skinned mesh: an ordered bone list plus the static
/// inverse bind matrices loaded with the asset.
///
/// `bones[i]` pairs with `inverse_bind_matrices[i]` and with joint index `i`
/// in the vertex joint attributes.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub bones: Vec<NodeHandle>,
    pub(crate) inverse_bind_matrices: Vec<Affine3A>,
}

impl Skeleton {
    #[must_use]
    pub fn new(bones: Vec<NodeHandle>, inverse_bind_matrices: Vec<Mat4>) -> Self {
        assert_eq!(
            bones.len(),
            inverse_bind_matrices.len(),
            "skeleton bone/inverse-bind-matrix count mismatch"
        );
        Self {
            bones,
            inverse_bind_matrices: inverse_bind_matrices
                .into_iter()
                .map(Affine3A::from_mat4)
                .collect(),
        }
    }

    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub(crate) fn inverse_bind_matrix(&self, index: usize) -> Affine3A {
        self.inverse_bind_matrices[index]
    }
}
