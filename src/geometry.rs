//! Mesh geometry: CPU-side vertex data consumed by the renderer.

/// Indexed triangle geometry. `joints`/`weights`, when present, run parallel
/// to `positions` and enable GPU skinning.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub joints: Option<Vec<[u16; 4]>>,
    pub weights: Option<Vec<[f32; 4]>>,
}

impl Geometry {
    #[must_use]
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            joints: None,
            weights: None,
        }
    }

    /// Attaches per-vertex joint indices and weights.
    #[must_use]
    pub fn with_skin(mut self, joints: Vec<[u16; 4]>, weights: Vec<[f32; 4]>) -> Self {
        assert_eq!(joints.len(), self.positions.len(), "joint count mismatch");
        assert_eq!(weights.len(), self.positions.len(), "weight count mismatch");
        self.joints = Some(joints);
        self.weights = Some(weights);
        self
    }

    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// A flat plane in the XY plane, centered at the origin, two triangles.
    /// Rotate -90 degrees about X to lay it on the ground.
    #[must_use]
    pub fn plane(width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(
            vec![
                [-hw, -hh, 0.0],
                [hw, -hh, 0.0],
                [hw, hh, 0.0],
                [-hw, hh, 0.0],
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }
}
