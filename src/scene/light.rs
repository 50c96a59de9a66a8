use glam::{Mat4, Vec3};

/// Orthographic shadow frustum and map configuration for the directional
/// light. The box is fixed: this widget frames a single actor near the
/// origin, so no cascade or fitting logic is needed.
#[derive(Debug, Clone)]
pub struct ShadowConfig {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub map_size: u32,
    pub bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            left: -20.0,
            right: 20.0,
            top: 20.0,
            bottom: -20.0,
            near: 1.0,
            far: 100.0,
            map_size: 512,
            bias: 0.0025,
        }
    }
}

/// Sun-style light: parallel rays from `position` toward `target`.
///
/// Invariant: the light always casts shadows; `cast_shadow` exists so the
/// renderer reads a flag rather than assuming one, but the scene never
/// clears it.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowConfig,
}

impl DirectionalLight {
    #[must_use]
    pub fn new(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            position: Vec3::new(15.0, 15.0, 10.0),
            target: Vec3::ZERO,
            cast_shadow: true,
            shadow: ShadowConfig::default(),
        }
    }

    /// Normalized direction the light shines in.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// View-projection matrix of the shadow frustum, used both to render the
    /// shadow map and to sample it.
    #[must_use]
    pub fn shadow_view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let proj = Mat4::orthographic_rh(
            self.shadow.left,
            self.shadow.right,
            self.shadow.bottom,
            self.shadow.top,
            self.shadow.near,
            self.shadow.far,
        );
        proj * view
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::ONE, 1.0)
    }
}
