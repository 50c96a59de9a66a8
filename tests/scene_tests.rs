//! Scene Graph Tests
//!
//! Tests for:
//! - transform propagation through the hierarchy
//! - depth-first traversal order
//! - track-name binding against a node subtree
//! - skeleton construction invariants

use glam::{Mat4, Quat, Vec3};

use vitrine::animation::{
    AnimationClip, Binder, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData,
    TrackMeta,
};
use vitrine::scene::{Node, Scene, Skeleton};

const EPSILON: f32 = 1e-5;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

// ============================================================================
// Transform propagation
// ============================================================================

#[test]
fn world_transforms_compose_down_the_hierarchy() {
    let mut scene = Scene::new();

    let mut parent = Node::new("parent");
    parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
    let parent = scene.add_child(scene.root(), parent);

    let mut child = Node::new("child");
    child.transform.position = Vec3::new(0.0, 1.0, 0.0);
    let child = scene.add_child(parent, child);

    scene.update_world_transforms();

    let world = scene.get_node(child).expect("child").world_matrix();
    assert!(approx_vec(world.translation.into(), Vec3::new(1.0, 1.0, 0.0)));
}

#[test]
fn root_rotation_carries_into_descendants() {
    let mut scene = Scene::new();
    if let Some(root) = scene.get_node_mut(scene.root()) {
        root.transform.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    }

    let mut child = Node::new("child");
    child.transform.position = Vec3::new(1.0, 0.0, 0.0);
    let child = scene.add_child(scene.root(), child);

    scene.update_world_transforms();

    let world: Vec3 = scene
        .get_node(child)
        .expect("child")
        .world_matrix()
        .translation
        .into();
    assert!(approx_vec(world, Vec3::new(0.0, 0.0, -1.0)), "got {world}");
}

#[test]
fn detached_nodes_are_not_visited() {
    let mut scene = Scene::new();
    scene.add_node(Node::new("orphan"));
    let attached = scene.add_child(scene.root(), Node::new("attached"));

    let visited = scene.descendants(scene.root());
    assert_eq!(visited.len(), 2); // root + attached
    assert!(visited.contains(&attached));
}

#[test]
fn descendants_walk_is_depth_first() {
    let mut scene = Scene::new();
    let a = scene.add_child(scene.root(), Node::new("a"));
    let a1 = scene.add_child(a, Node::new("a1"));
    let b = scene.add_child(scene.root(), Node::new("b"));

    let order = scene.descendants(scene.root());
    assert_eq!(order, vec![scene.root(), a, a1, b]);
}

// ============================================================================
// Track binding
// ============================================================================

fn rotation_clip(node_name: &str) -> AnimationClip {
    AnimationClip::new(
        "clip",
        vec![Track {
            meta: TrackMeta {
                node_name: node_name.to_string(),
                target: TargetPath::Rotation,
            },
            data: TrackData::Quaternion(KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![Quat::IDENTITY, Quat::from_rotation_x(1.0)],
                InterpolationMode::Linear,
            )),
        }],
    )
}

#[test]
fn binder_resolves_names_inside_the_subtree() {
    let mut scene = Scene::new();
    let arm = scene.add_child(scene.root(), Node::new("Arm"));
    let hand = scene.add_child(arm, Node::new("Hand"));

    let bindings = Binder::bind(&scene, arm, &rotation_clip("Hand"));
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].node, hand);
    assert_eq!(bindings[0].target, TargetPath::Rotation);
}

#[test]
fn binder_skips_names_outside_the_subtree() {
    let mut scene = Scene::new();
    let arm = scene.add_child(scene.root(), Node::new("Arm"));
    scene.add_child(scene.root(), Node::new("Leg"));

    let bindings = Binder::bind(&scene, arm, &rotation_clip("Leg"));
    assert!(bindings.is_empty());
}

// ============================================================================
// Skeleton
// ============================================================================

#[test]
fn skeleton_pairs_bones_with_inverse_binds() {
    let mut scene = Scene::new();
    let bone = scene.add_child(scene.root(), Node::new("bone"));

    let skeleton = Skeleton::new(vec![bone], vec![Mat4::from_translation(Vec3::Y)]);
    assert_eq!(skeleton.joint_count(), 1);
}

#[test]
#[should_panic(expected = "count mismatch")]
fn skeleton_rejects_mismatched_lengths() {
    let mut scene = Scene::new();
    let bone = scene.add_child(scene.root(), Node::new("bone"));
    let _ = Skeleton::new(vec![bone], vec![Mat4::IDENTITY, Mat4::IDENTITY]);
}
