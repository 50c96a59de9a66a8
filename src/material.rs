//! Materials: the uniform actor override and the floor's shadow catcher.

use glam::Vec3;

/// Shading model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Unlit flat color, optionally dimmed where shadowed.
    Basic,
    /// Invisible except where shadowed: renders the shadow term only.
    /// Used by the ground plane so the widget background stays transparent.
    Shadow,
}

#[derive(Debug, Clone)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Vec3,
    pub opacity: f32,
    pub transparent: bool,
    /// Whether this material deforms with a skeleton. Kept on the material
    /// (not derived from geometry) so the override applied to every actor
    /// sub-mesh carries the skinning contract explicitly.
    pub skinning: bool,
}

impl Material {
    /// The alpha actually sent to the renderer. Opacity only takes effect
    /// when the material is marked transparent; opaque materials render at
    /// full coverage regardless of the stored opacity.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if self.transparent { self.opacity } else { 1.0 }
    }

    /// The actor's uniform override: transparent, fully invisible at
    /// construction (opacity is ramped externally), skinning enabled.
    #[must_use]
    pub fn overlay_basic(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::Basic,
            color,
            opacity: 0.0,
            transparent: true,
            skinning: true,
        }
    }

    /// Opaque flat color.
    #[must_use]
    pub fn basic(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::Basic,
            color,
            opacity: 1.0,
            transparent: false,
            skinning: false,
        }
    }

    /// Shadow-catcher material for the ground plane.
    #[must_use]
    pub fn shadow(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::Shadow,
            color,
            opacity: 1.0,
            transparent: true,
            skinning: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_only_applies_to_transparent_materials() {
        let mut overlay = Material::overlay_basic(Vec3::ONE);
        assert_eq!(overlay.alpha(), 0.0);
        overlay.opacity = 0.3;
        assert_eq!(overlay.alpha(), 0.3);

        let mut opaque = Material::basic(Vec3::ONE);
        opaque.opacity = 0.3;
        assert_eq!(opaque.alpha(), 1.0);
    }
}
