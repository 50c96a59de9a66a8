//! The base scene pass: shadow-map depth pre-render, then a forward pass of
//! every visible mesh into the offscreen color target.

use crate::render::node::{FrameContext, RenderNode};
use crate::render::resources::{RenderResources, SHADOW_FORMAT, VERTEX_LAYOUT};

pub struct ScenePass {
    shadow_pipeline: wgpu::RenderPipeline,
    forward_pipeline: wgpu::RenderPipeline,
}

impl ScenePass {
    #[must_use]
    pub(crate) fn new(
        device: &wgpu::Device,
        resources: &RenderResources,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        log::debug!("Compiling scene pipelines ({color_format:?}, {depth_format:?})");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[Some(&resources.global_layout), Some(&resources.object_layout)],
            immediate_size: 0,
        });

        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                buffers: &[VERTEX_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // Depth-only: no fragment stage, no color targets.
            fragment: None,
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: SHADOW_FORMAT,
                depth_write_enabled: Some(true),
                depth_compare: Some(wgpu::CompareFunction::Less),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let forward_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Forward Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VERTEX_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    // The shader emits premultiplied color, so the pass can
                    // composite transparent materials over the clear color.
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: Some(true),
                depth_compare: Some(wgpu::CompareFunction::Less),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            shadow_pipeline,
            forward_pipeline,
        }
    }

    /// Visible mesh nodes in hierarchy order.
    fn draw_list(ctx: &FrameContext<'_>) -> Vec<crate::scene::NodeHandle> {
        ctx.scene
            .descendants(ctx.scene.root())
            .into_iter()
            .filter(|&handle| {
                ctx.scene.get_node(handle).is_some_and(|node| {
                    node.visible
                        && node
                            .mesh
                            .and_then(|key| ctx.scene.meshes.get(key))
                            .is_some_and(|mesh| mesh.visible)
                })
            })
            .collect()
    }
}

impl RenderNode for ScenePass {
    fn name(&self) -> &str {
        "scene"
    }

    fn run(&mut self, ctx: &FrameContext<'_>, encoder: &mut wgpu::CommandEncoder) {
        let draw_list = Self::draw_list(ctx);

        // Shadow map pre-pass: casters only, from the light's frustum.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.resources.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &ctx.resources.global_bind_group, &[]);

            for &handle in &draw_list {
                let casts = ctx
                    .scene
                    .get_node(handle)
                    .is_some_and(|node| node.cast_shadow);
                if !casts {
                    continue;
                }
                let Some(gpu) = ctx.resources.mesh(handle) else {
                    continue;
                };
                pass.set_bind_group(1, &gpu.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }

        // Forward pass into the offscreen scene color target.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: ctx.scene_color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.forward_pipeline);
            pass.set_bind_group(0, &ctx.resources.global_bind_group, &[]);

            for &handle in &draw_list {
                let Some(gpu) = ctx.resources.mesh(handle) else {
                    continue;
                };
                pass.set_bind_group(1, &gpu.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }
    }
}
