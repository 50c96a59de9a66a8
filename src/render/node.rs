//! The render-graph node abstraction the composer executes.

use crate::render::resources::RenderResources;
use crate::scene::{NodeHandle, Scene};

/// Everything a pass needs for one frame. Later passes read the offscreen
/// targets earlier passes wrote (composited pipeline, not independent
/// renders).
pub struct FrameContext<'a> {
    pub(crate) device: &'a wgpu::Device,
    pub(crate) queue: &'a wgpu::Queue,
    pub(crate) scene: &'a Scene,
    /// Highlighted-object set for the outline stage.
    pub(crate) selection: &'a [NodeHandle],
    /// Logical viewport size recorded on the composer.
    pub(crate) size: (u32, u32),
    pub(crate) clear_color: wgpu::Color,
    pub(crate) depth_view: &'a wgpu::TextureView,
    /// Offscreen color target the base pass writes and later passes read.
    pub(crate) scene_color_view: &'a wgpu::TextureView,
    /// The final presentation target.
    pub(crate) surface_view: &'a wgpu::TextureView,
    pub(crate) resources: &'a RenderResources,
}

/// One stage of the composited pipeline. Passes run strictly in the order
/// the composer holds them; a pass (re)allocates its own size-dependent
/// targets lazily when the frame size changes.
pub trait RenderNode {
    fn name(&self) -> &str;

    fn run(&mut self, ctx: &FrameContext<'_>, encoder: &mut wgpu::CommandEncoder);
}
