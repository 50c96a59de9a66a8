//! Perspective camera.

use glam::{Mat4, Vec3};

use crate::scene::Transform;

/// Perspective camera with a cached projection matrix.
///
/// The projection is recomputed by [`set_aspect`](Self::set_aspect) /
/// [`update_projection_matrix`](Self::update_projection_matrix); callers
/// mutating `fov_degrees`/`near`/`far` directly must call the latter
/// themselves.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub transform: Transform,

    aspect: f32,
    projection_matrix: Mat4,
}

impl PerspectiveCamera {
    #[must_use]
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            near,
            far,
            transform: Transform::new(),
            aspect,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Sets the aspect ratio and recomputes the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Recomputes the cached projection matrix from the current parameters.
    /// glam's `perspective_rh` targets wgpu's `[0, 1]` NDC depth range.
    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// View matrix: the inverse of the camera's world transform. The camera
    /// is not part of the scene hierarchy, so local and world coincide and
    /// the matrix is computed straight from the TRS state.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from(glam::Affine3A::from_scale_rotation_translation(
            self.transform.scale,
            self.transform.rotation,
            self.transform.position,
        ))
        .inverse()
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }

    /// Points the camera at `target` (world space, +Y up).
    pub fn look_at(&mut self, target: Vec3) {
        self.transform.look_at(target, Vec3::Y);
    }
}
