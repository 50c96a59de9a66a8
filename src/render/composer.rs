//! The post-process pipeline: an ordered pass list, the outline selection
//! set, and the logical viewport size.

use crate::render::node::RenderNode;
use crate::scene::NodeHandle;

/// Ordered execution list for the composited pipeline.
///
/// Invariants held by construction and enforced by the stage:
/// - the base scene pass always precedes the outline pass;
/// - once the stage finishes wiring, the selection set is exactly the
///   actor's mesh nodes, never the whole scene and never the floor.
pub struct Composer {
    passes: Vec<Box<dyn RenderNode>>,
    selection: Vec<NodeHandle>,
    size: (u32, u32),
}

impl Composer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            passes: Vec::new(),
            selection: Vec::new(),
            size: (width, height),
        }
    }

    /// Appends a pass at the end of the execution order.
    pub fn add_pass(&mut self, pass: Box<dyn RenderNode>) {
        self.passes.push(pass);
    }

    /// Replaces the outline pass's highlighted-object set.
    pub fn set_selection(&mut self, targets: Vec<NodeHandle>) {
        self.selection = targets;
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &[NodeHandle] {
        &self.selection
    }

    /// Records the new viewport size. Size-dependent pass targets are
    /// reallocated lazily the next time the passes run.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Pass names in execution order.
    #[must_use]
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Splits the composer into the mutable pass list plus the read-only
    /// state the frame context borrows while the passes execute.
    pub(crate) fn split_for_render(
        &mut self,
    ) -> (&mut [Box<dyn RenderNode>], &[NodeHandle], (u32, u32)) {
        (&mut self.passes, &self.selection, self.size)
    }
}
