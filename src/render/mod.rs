//! Rendering: the wgpu backend and the composited post-process pipeline.

pub mod composer;
pub mod context;
pub mod node;
pub mod outline_pass;
pub(crate) mod resources;
pub mod scene_pass;

pub use composer::Composer;
pub use context::{RenderSettings, WgpuContext};
pub use node::{FrameContext, RenderNode};
pub use outline_pass::OutlinePass;
pub use scene_pass::ScenePass;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::camera::PerspectiveCamera;
use crate::errors::Result;
use crate::render::resources::RenderResources;
use crate::scene::Scene;

/// The seam between the stage and a rendering backend.
///
/// The stage only needs the composer (selection, size, pass order), surface
/// resizing, and a per-frame render call; everything GPU-specific stays
/// behind this trait so the loop logic runs headless in tests.
pub trait SceneRenderer {
    fn composer(&self) -> &Composer;

    fn composer_mut(&mut self) -> &mut Composer;

    /// Resizes the presentation surface. The composer's logical size is
    /// updated separately by the stage, after the camera.
    fn resize_surface(&mut self, width: u32, height: u32);

    /// Renders one frame: every composer pass, strictly in insertion order.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
}

/// The wgpu implementation of [`SceneRenderer`].
pub struct Renderer {
    context: WgpuContext,
    resources: RenderResources,
    composer: Composer,
    /// Offscreen target the base pass renders into and the outline pass
    /// reads back. Recreated on surface resize.
    scene_color_view: wgpu::TextureView,
}

impl Renderer {
    /// Initializes the GPU context and wires the composited pipeline:
    /// base scene pass first, outline pass second.
    pub async fn new<W>(
        window: W,
        settings: &RenderSettings,
        width: u32,
        height: u32,
    ) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let context = WgpuContext::new(window, settings, width, height).await?;
        let resources = RenderResources::new(
            &context.device,
            settings.shadow_map_size,
            settings.shadow_bias,
        );

        let mut composer = Composer::new(width, height);
        composer.add_pass(Box::new(ScenePass::new(
            &context.device,
            &resources,
            context.color_format(),
            context.depth_format,
        )));
        composer.add_pass(Box::new(OutlinePass::new(
            &context.device,
            &resources,
            context.color_format(),
        )));

        let scene_color_view = Self::create_scene_color(&context);

        log::info!("Renderer ready ({width}x{height}, {:?})", context.color_format());

        Ok(Self {
            context,
            resources,
            composer,
            scene_color_view,
        })
    }

    fn create_scene_color(context: &WgpuContext) -> wgpu::TextureView {
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Color Target"),
            size: wgpu::Extent3d {
                width: context.config.width,
                height: context.config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: context.color_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> &WgpuContext {
        &self.context
    }
}

impl SceneRenderer for Renderer {
    fn composer(&self) -> &Composer {
        &self.composer
    }

    fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        if (width, height) == self.context.size() {
            return;
        }
        self.context.resize(width, height);
        self.scene_color_view = Self::create_scene_color(&self.context);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        let (width, height) = self.context.size();
        if width == 0 || height == 0 {
            return;
        }

        self.resources
            .prepare(&self.context.device, &self.context.queue, scene, camera);

        let frame = match self.context.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(frame)
            | wgpu::CurrentSurfaceTexture::Suboptimal(frame) => frame,
            _ => {
                // A lost or outdated surface is transient; skip the frame
                // and let the next resize/tick recover it.
                log::warn!("Surface unavailable, skipping frame");
                return;
            }
        };
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let (passes, selection, size) = self.composer.split_for_render();
        let frame_ctx = FrameContext {
            device: &self.context.device,
            queue: &self.context.queue,
            scene,
            selection,
            size,
            clear_color: self.context.clear_color,
            depth_view: &self.context.depth_texture_view,
            scene_color_view: &self.scene_color_view,
            surface_view: &surface_view,
            resources: &self.resources,
        };
        for pass in passes.iter_mut() {
            pass.run(&frame_ctx, &mut encoder);
        }
        drop(frame_ctx);

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();
    }
}

/// Stands in for a real pass in the headless pipeline so the execution
/// order stays observable.
struct MarkerPass {
    name: &'static str,
}

impl RenderNode for MarkerPass {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&mut self, _ctx: &FrameContext<'_>, _encoder: &mut wgpu::CommandEncoder) {}
}

/// GPU-free [`SceneRenderer`] for tests and headless embedding. Carries the
/// same composer wiring as [`Renderer`] (scene pass before outline pass) and
/// counts rendered frames instead of drawing them.
pub struct HeadlessRenderer {
    composer: Composer,
    surface_size: (u32, u32),
    frames_rendered: u64,
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut composer = Composer::new(width, height);
        composer.add_pass(Box::new(MarkerPass { name: "scene" }));
        composer.add_pass(Box::new(MarkerPass { name: "outline" }));
        Self {
            composer,
            surface_size: (width, height),
            frames_rendered: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    #[inline]
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn composer(&self) -> &Composer {
        &self.composer
    }

    fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        self.surface_size = (width, height);
    }

    fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) {
        self.frames_rendered += 1;
    }
}
