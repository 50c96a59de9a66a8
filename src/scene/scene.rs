use glam::Affine3A;
use slotmap::SlotMap;

use crate::geometry::Geometry;
use crate::material::Material;
use crate::scene::light::DirectionalLight;
use crate::scene::node::Node;
use crate::scene::skeleton::Skeleton;
use crate::scene::{MeshKey, NodeHandle, SkinKey};

/// A renderable attached to a node: geometry, material, optional skin.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    pub skin: Option<SkinKey>,
    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            skin: None,
            visible: true,
        }
    }
}

/// The scene graph: node hierarchy, mesh/skin arenas, and the single
/// directional light.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub skins: SlotMap<SkinKey, Skeleton>,
    pub light: DirectionalLight,
    root: NodeHandle,
}

impl Scene {
    /// Creates an empty scene with a world-root node and a default
    /// shadow-casting directional light.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("root"));
        Self {
            nodes,
            meshes: SlotMap::with_key(),
            skins: SlotMap::with_key(),
            light: DirectionalLight::default(),
            root,
        }
    }

    /// The world-root node every scene object hangs under.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Inserts a node without a parent. Parentless nodes other than the
    /// world root are ignored by transform propagation until attached.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        self.nodes.insert(node)
    }

    /// Inserts `node` as a child of `parent`.
    pub fn add_child(&mut self, parent: NodeHandle, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.attach(parent, handle);
        handle
    }

    /// Links `child` under `parent`, keeping both ends of the relation in
    /// sync.
    pub fn attach(&mut self, parent: NodeHandle, child: NodeHandle) {
        assert!(self.nodes.contains_key(parent), "attach: missing parent");
        assert!(self.nodes.contains_key(child), "attach: missing child");
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn add_skin(&mut self, skeleton: Skeleton) -> SkinKey {
        self.skins.insert(skeleton)
    }

    /// Collects `root` and all of its descendants in depth-first order.
    ///
    /// This is the explicit tree-walk used wherever a subtree needs a
    /// predicate + visitor pass (such as the actor's material override).
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            // Reverse keeps depth-first order left-to-right.
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Visits `root` and all of its descendants.
    pub fn traverse<F: FnMut(NodeHandle, &Node)>(&self, root: NodeHandle, mut visitor: F) {
        for handle in self.descendants(root) {
            if let Some(node) = self.nodes.get(handle) {
                visitor(handle, node);
            }
        }
    }

    /// Propagates local transforms down the hierarchy, refreshing every
    /// node's world matrix. Called once per tick, after animation and before
    /// rendering.
    pub fn update_world_transforms(&mut self) {
        let roots: Vec<NodeHandle> = self
            .nodes
            .iter()
            .filter_map(|(handle, node)| node.parent.is_none().then_some(handle))
            .collect();

        let mut stack: Vec<(NodeHandle, Affine3A)> = roots
            .into_iter()
            .map(|handle| (handle, Affine3A::IDENTITY))
            .collect();

        while let Some((handle, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            node.transform.update_local_matrix();
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);

            for &child in &node.children {
                stack.push((child, world));
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
