//! Shared GPU state: frame-global uniforms, the shadow map, and per-mesh
//! vertex/uniform/joint buffers, cached by node and refreshed every frame.

use glam::Mat4;
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::camera::PerspectiveCamera;
use crate::material::MaterialKind;
use crate::scene::{NodeHandle, Scene};

pub(crate) const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Interleaved vertex layout shared by every pipeline: position, joint
/// indices, joint weights. Non-skinned geometry carries zero weights and the
/// shader ignores the skin attributes.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    position: [f32; 3],
    joints: [u16; 4],
    weights: [f32; 4],
}

pub(crate) const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Uint16x4,
            offset: 12,
            shader_location: 1,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 20,
            shader_location: 2,
        },
    ],
};

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    /// x: shadow depth bias, y: shadow map texel size.
    shadow_params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    /// rgb + opacity.
    color: [f32; 4],
    /// x: skinned flag, y: material kind (0 basic, 1 shadow catcher),
    /// z: receive-shadow flag.
    params: [f32; 4],
}

/// GPU-side state for one mesh node.
pub(crate) struct MeshGpu {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    uniform_buffer: wgpu::Buffer,
    joint_buffer: Option<wgpu::Buffer>,
    pub bind_group: wgpu::BindGroup,
}

pub(crate) struct RenderResources {
    global_buffer: wgpu::Buffer,
    pub global_layout: wgpu::BindGroupLayout,
    pub global_bind_group: wgpu::BindGroup,
    pub object_layout: wgpu::BindGroupLayout,
    pub shadow_view: wgpu::TextureView,
    shadow_map_size: u32,
    shadow_bias: f32,
    /// Identity joint palette bound by meshes without a skin, keeping the
    /// object bind group layout uniform.
    dummy_joints: wgpu::Buffer,
    meshes: FxHashMap<NodeHandle, MeshGpu>,
}

impl RenderResources {
    pub fn new(device: &wgpu::Device, shadow_map_size: u32, shadow_bias: f32) -> Self {
        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Global Uniforms"),
            size: std::mem::size_of::<GlobalUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shadow_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width: shadow_map_size,
                height: shadow_map_size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let shadow_view = shadow_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global BindGroup Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global BindGroup"),
            layout: &global_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: global_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object BindGroup Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let identity = [Mat4::IDENTITY.to_cols_array_2d()];
        let dummy_joints = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Dummy Joint Palette"),
            contents: bytemuck::cast_slice(&identity),
            usage: wgpu::BufferUsages::STORAGE,
        });

        Self {
            global_buffer,
            global_layout,
            global_bind_group,
            object_layout,
            shadow_view,
            shadow_map_size,
            shadow_bias,
            dummy_joints,
            meshes: FxHashMap::default(),
        }
    }

    /// Uploads this frame's uniforms: camera/light globals, per-node model
    /// matrices and material state, and joint palettes for skinned meshes.
    /// Creates GPU buffers for meshes seen for the first time.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) {
        let globals = GlobalUniform {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            light_view_proj: scene.light.shadow_view_projection().to_cols_array_2d(),
            shadow_params: [
                self.shadow_bias,
                1.0 / self.shadow_map_size as f32,
                0.0,
                0.0,
            ],
        };
        queue.write_buffer(&self.global_buffer, 0, bytemuck::bytes_of(&globals));

        for (handle, node) in &scene.nodes {
            let Some(mesh) = node.mesh.and_then(|key| scene.meshes.get(key)) else {
                continue;
            };
            if !node.visible || !mesh.visible {
                continue;
            }

            if !self.meshes.contains_key(&handle) {
                let joint_count = mesh
                    .skin
                    .and_then(|key| scene.skins.get(key))
                    .map_or(0, crate::scene::Skeleton::joint_count);
                let gpu = Self::create_mesh(
                    device,
                    &self.object_layout,
                    &self.dummy_joints,
                    &mesh.geometry,
                    joint_count,
                );
                self.meshes.insert(handle, gpu);
            }
            let gpu = &self.meshes[&handle];

            let skinned = mesh.material.skinning && mesh.skin.is_some();
            let kind = match mesh.material.kind {
                MaterialKind::Basic => 0.0,
                MaterialKind::Shadow => 1.0,
            };
            let object = ObjectUniform {
                model: node.transform.world_matrix_as_mat4().to_cols_array_2d(),
                color: [
                    mesh.material.color.x,
                    mesh.material.color.y,
                    mesh.material.color.z,
                    mesh.material.alpha(),
                ],
                params: [
                    f32::from(u8::from(skinned)),
                    kind,
                    f32::from(u8::from(node.receive_shadow)),
                    0.0,
                ],
            };
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&object));

            if let (Some(joint_buffer), Some(skeleton)) = (
                gpu.joint_buffer.as_ref(),
                mesh.skin.and_then(|key| scene.skins.get(key)),
            ) {
                let inverse_mesh_world = node.transform.world_matrix.inverse();
                let palette: Vec<[[f32; 4]; 4]> = skeleton
                    .bones
                    .iter()
                    .enumerate()
                    .map(|(i, &bone)| {
                        let bone_world = scene
                            .get_node(bone)
                            .map_or(glam::Affine3A::IDENTITY, |b| b.transform.world_matrix);
                        Mat4::from(
                            inverse_mesh_world * bone_world * skeleton.inverse_bind_matrix(i),
                        )
                        .to_cols_array_2d()
                    })
                    .collect();
                queue.write_buffer(joint_buffer, 0, bytemuck::cast_slice(&palette));
            }
        }
    }

    #[inline]
    pub fn mesh(&self, handle: NodeHandle) -> Option<&MeshGpu> {
        self.meshes.get(&handle)
    }

    fn create_mesh(
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        dummy_joints: &wgpu::Buffer,
        geometry: &crate::geometry::Geometry,
        joint_count: usize,
    ) -> MeshGpu {
        let vertices: Vec<Vertex> = geometry
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                joints: geometry.joints.as_ref().map_or([0; 4], |j| j[i]),
                weights: geometry.weights.as_ref().map_or([0.0; 4], |w| w[i]),
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniforms"),
            size: std::mem::size_of::<ObjectUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let joint_buffer = (joint_count > 0).then(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Joint Palette"),
                size: (joint_count * std::mem::size_of::<[[f32; 4]; 4]>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object BindGroup"),
            layout: object_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: joint_buffer
                        .as_ref()
                        .unwrap_or(dummy_joints)
                        .as_entire_binding(),
                },
            ],
        });

        MeshGpu {
            vertex_buffer,
            index_buffer,
            index_count: geometry.index_count(),
            uniform_buffer,
            joint_buffer,
            bind_group,
        }
    }
}
