use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves a clip's track node names against the subtree under
    /// `root`, producing one binding per track whose target node exists.
    /// Tracks naming nodes outside the subtree are skipped.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_idx, track) in clip.tracks.iter().enumerate() {
            if let Some(node) = find_node_by_name(scene, root, &track.meta.node_name) {
                bindings.push(PropertyBinding {
                    track_index: track_idx,
                    node,
                    target: track.meta.target,
                });
            }
        }

        bindings
    }
}

fn find_node_by_name(scene: &Scene, current: NodeHandle, name: &str) -> Option<NodeHandle> {
    let node = scene.get_node(current)?;
    if node.name == name {
        return Some(current);
    }
    for &child in node.children() {
        if let Some(found) = find_node_by_name(scene, child, name) {
            return Some(found);
        }
    }
    None
}
