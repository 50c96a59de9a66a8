//! The actor: the one animated humanoid the widget exists to show.

use glam::Vec3;

use crate::animation::{AnimationMixer, LoopMode};
use crate::material::Material;
use crate::model::ModelAsset;
use crate::scene::{Mesh, Node, NodeHandle, Scene, Skeleton};

/// Clip the actor fades into at construction, so it is already moving when
/// the first frame renders.
const LOCOMOTION_CLIP: &str = "Run";
const INITIAL_FADE: f32 = 0.75;

pub struct Human {
    root: NodeHandle,
    mesh_nodes: Vec<NodeHandle>,
    mixer: AnimationMixer,
}

impl Human {
    /// Instantiates the asset hierarchy under the scene root, applies the
    /// uniform transparent override material to every mesh node, binds one
    /// action per unique clip name, and starts the locomotion cross-fade.
    ///
    /// # Panics
    ///
    /// Panics if the asset references a node index out of range, or if it
    /// carries no clip named `"Run"`. Both are asset-time contract
    /// violations, not recoverable conditions.
    #[must_use]
    pub fn new(scene: &mut Scene, asset: &ModelAsset) -> Self {
        let root = scene.add_child(scene.root(), Node::new("human"));

        // Pass 1: one scene node per asset node, flat.
        let handles: Vec<NodeHandle> = asset
            .nodes
            .iter()
            .map(|model_node| {
                let mut node = Node::new(model_node.name.clone());
                node.transform.position = model_node.translation;
                node.transform.rotation = model_node.rotation;
                node.transform.scale = model_node.scale;
                scene.add_node(node)
            })
            .collect();

        // Pass 2: hierarchy. Asset roots hang under the actor root.
        for (index, model_node) in asset.nodes.iter().enumerate() {
            for &child in &model_node.children {
                assert!(child < handles.len(), "asset child index out of range");
                scene.attach(handles[index], handles[child]);
            }
        }
        for &asset_root in &asset.roots {
            assert!(asset_root < handles.len(), "asset root index out of range");
            scene.attach(root, handles[asset_root]);
        }

        // Pass 3: meshes and skins, now that every joint has a handle.
        for (index, model_node) in asset.nodes.iter().enumerate() {
            let Some(model_mesh) = &model_node.mesh else {
                continue;
            };

            let skin = model_mesh.skin.as_ref().map(|model_skin| {
                let bones = model_skin
                    .joints
                    .iter()
                    .map(|&joint| {
                        assert!(joint < handles.len(), "asset joint index out of range");
                        handles[joint]
                    })
                    .collect();
                scene.add_skin(Skeleton::new(
                    bones,
                    model_skin.inverse_bind_matrices.clone(),
                ))
            });

            let mut mesh = Mesh::new(
                model_mesh.geometry.clone(),
                Material::basic(Vec3::splat(0.9)),
            );
            mesh.skin = skin;
            let mesh_key = scene.add_mesh(mesh);

            if let Some(node) = scene.get_node_mut(handles[index]) {
                node.mesh = Some(mesh_key);
            }
        }

        // The override walk: every mesh node in the hierarchy gets the same
        // transparent skinned material and full shadow participation,
        // whatever materials the asset carried.
        let mesh_nodes: Vec<NodeHandle> = scene
            .descendants(root)
            .into_iter()
            .filter(|&handle| scene.get_node(handle).is_some_and(Node::is_mesh))
            .collect();
        for &handle in &mesh_nodes {
            let Some(node) = scene.get_node_mut(handle) else {
                continue;
            };
            node.cast_shadow = true;
            node.receive_shadow = true;
            let mesh_key = node.mesh;
            if let Some(mesh) = mesh_key.and_then(|key| scene.meshes.get_mut(key)) {
                let skinned = mesh.skin.is_some();
                mesh.material = Material::overlay_basic(Vec3::splat(0.9));
                mesh.material.skinning = skinned;
            }
        }

        let mut mixer = AnimationMixer::bind(scene, root, &asset.clips);
        mixer.cross_fade(
            LOCOMOTION_CLIP,
            INITIAL_FADE,
            LoopMode::Repeat,
            1.0,
            1.0,
            true,
        );

        Self {
            root,
            mesh_nodes,
            mixer,
        }
    }

    /// Advances playback by `delta` seconds. `elapsed` is accepted as a
    /// stable contract slot but playback does not consume it.
    pub fn update(&mut self, scene: &mut Scene, delta: f32, _elapsed: f32) {
        self.mixer.update(delta, scene);
    }

    /// Ramps the override material's opacity on every actor mesh. The actor
    /// is constructed fully transparent; the embedder fades it in.
    pub fn set_opacity(&self, scene: &mut Scene, opacity: f32) {
        for &handle in &self.mesh_nodes {
            let mesh_key = scene.get_node(handle).and_then(|node| node.mesh);
            if let Some(mesh) = mesh_key.and_then(|key| scene.meshes.get_mut(key)) {
                mesh.material.opacity = opacity.clamp(0.0, 1.0);
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// The actor's mesh nodes, in hierarchy order. This is the outline
    /// pass's selection set.
    #[inline]
    #[must_use]
    pub fn mesh_nodes(&self) -> &[NodeHandle] {
        &self.mesh_nodes
    }

    #[inline]
    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }
}
