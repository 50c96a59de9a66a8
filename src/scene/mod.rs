//! Scene graph: node hierarchy, transforms, meshes, skins, and the light.

pub mod light;
pub mod node;
pub mod scene;
pub mod skeleton;
pub mod transform;

pub use light::{DirectionalLight, ShadowConfig};
pub use node::Node;
pub use scene::{Mesh, Scene};
pub use skeleton::Skeleton;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct SkinKey;
}
