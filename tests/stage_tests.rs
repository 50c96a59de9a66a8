//! Stage Tests
//!
//! End-to-end checks over the headless renderer:
//! - construction wiring (outline selection, pass order, floor/light flags)
//! - resize propagation (renderer → camera aspect → composer size)
//! - the tick ordering contract and the frame scheduler
//! - the mock-asset scenario: one "Run" clip, one mesh node

use glam::Vec3;

use vitrine::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use vitrine::{
    FrameBudget, Geometry, HeadlessRenderer, Input, MaterialKind, ModelAsset, ModelNode,
    SceneRenderer, SignalScheduler, Stage,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Mock asset: a single mesh node "Torso" and one clip named "Run" with a
/// duration of 2.0 seconds.
fn mock_asset() -> ModelAsset {
    let geometry = Geometry::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![0, 1, 2],
    );
    let node = ModelNode::new("Torso").with_mesh(geometry);

    let clip = AnimationClip::new(
        "Run",
        vec![Track {
            meta: TrackMeta {
                node_name: "Torso".to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, 1.0, 2.0],
                vec![Vec3::ZERO, Vec3::Y, Vec3::ZERO],
                InterpolationMode::Linear,
            )),
        }],
    );
    assert!(approx(clip.duration, 2.0));

    ModelAsset::new(vec![node], vec![0], vec![clip])
}

fn mock_stage() -> Stage<HeadlessRenderer> {
    Stage::new(HeadlessRenderer::new(640, 480), (640, 480), &mock_asset())
}

// ============================================================================
// Construction wiring
// ============================================================================

#[test]
fn base_pass_precedes_outline_pass() {
    let stage = mock_stage();
    assert_eq!(stage.renderer().composer().pass_names(), vec!["scene", "outline"]);
}

#[test]
fn selection_is_exactly_the_actor_meshes() {
    let stage = mock_stage();
    let selection = stage.renderer().composer().selection();

    assert!(!selection.is_empty());
    assert_eq!(selection, stage.human().mesh_nodes());

    // The floor is never part of the highlighted set.
    let scene = stage.scene();
    for handle in scene.descendants(scene.root()) {
        let node = scene.get_node(handle).expect("node");
        if node.name == "floor" {
            assert!(!selection.contains(&handle));
        }
    }
}

#[test]
fn floor_receives_but_never_casts_shadows() {
    let stage = mock_stage();
    let scene = stage.scene();
    let floor = scene
        .descendants(scene.root())
        .into_iter()
        .find(|&h| scene.get_node(h).is_some_and(|n| n.name == "floor"))
        .expect("floor node");

    let node = scene.get_node(floor).expect("floor node");
    assert!(node.receive_shadow);
    assert!(!node.cast_shadow);

    let mesh = node
        .mesh
        .and_then(|key| scene.meshes.get(key))
        .expect("floor mesh");
    assert_eq!(mesh.material.kind, MaterialKind::Shadow);
    assert!(scene.light.cast_shadow);
}

#[test]
fn actor_meshes_start_transparent_with_shadows_enabled() {
    let stage = mock_stage();
    let scene = stage.scene();

    for &handle in stage.human().mesh_nodes() {
        let node = scene.get_node(handle).expect("actor node");
        assert!(node.cast_shadow);
        assert!(node.receive_shadow);

        let mesh = node
            .mesh
            .and_then(|key| scene.meshes.get(key))
            .expect("actor mesh");
        assert_eq!(mesh.material.kind, MaterialKind::Basic);
        assert!(mesh.material.transparent);
        assert!(approx(mesh.material.opacity, 0.0));
    }
}

#[test]
fn set_opacity_ramps_every_actor_mesh() {
    let mut stage = mock_stage();
    stage.set_actor_opacity(0.5);

    let scene = stage.scene();
    for &handle in stage.human().mesh_nodes() {
        let opacity = scene
            .get_node(handle)
            .and_then(|n| n.mesh)
            .and_then(|key| scene.meshes.get(key))
            .expect("actor mesh")
            .material
            .opacity;
        assert!(approx(opacity, 0.5));
    }
}

#[test]
fn actor_starts_cross_fading_into_run() {
    let stage = mock_stage();
    let mixer = stage.human().mixer();
    assert_eq!(mixer.active_action(), Some("Run"));
    assert!(mixer.previous_action().is_none());
    assert!(mixer.action("Run").expect("action").playing);
}

// ============================================================================
// Resize propagation
// ============================================================================

#[test]
fn resize_updates_camera_aspect_and_composer_size() {
    let mut stage = mock_stage();
    stage.resize(800, 600);

    assert!(approx(stage.camera().aspect(), 800.0 / 600.0));
    assert_eq!(stage.renderer().composer().size(), (800, 600));
    assert_eq!(stage.renderer().surface_size(), (800, 600));
}

// ============================================================================
// Ticking and scheduling
// ============================================================================

#[test]
fn first_tick_advances_the_run_action() {
    let mut stage = mock_stage();
    stage.tick_with_delta(0.016, &Input::new());

    let action = stage.human().mixer().action("Run").expect("action");
    assert!(action.effective_weight() > 0.0, "weight must ramp up during fade-in");
    assert!(action.time > 0.0, "playback time must advance");
    assert_eq!(stage.renderer().frames_rendered(), 1);
}

#[test]
fn tick_renders_the_current_pose() {
    let mut stage = mock_stage();
    // Past the 0.75 s fade: the Run action is at full weight and the torso
    // follows the clip's translation ramp.
    for _ in 0..10 {
        stage.tick_with_delta(0.1, &Input::new());
    }
    let action = stage.human().mixer().action("Run").expect("action");
    assert!(approx(action.effective_weight(), 1.0));
    assert!(approx(action.time, 1.0));

    let scene = stage.scene();
    let torso = scene
        .descendants(scene.root())
        .into_iter()
        .find(|&h| scene.get_node(h).is_some_and(|n| n.name == "Torso"))
        .expect("torso node");
    let position = scene.get_node(torso).expect("torso").transform.position;
    assert!(approx(position.y, 1.0), "expected clip midpoint, got {}", position.y);
}

#[test]
fn clock_clamps_runaway_deltas() {
    let mut stage = mock_stage();
    stage.tick_with_delta(30.0, &Input::new());
    assert!(approx(stage.clock().delta(), 1.0));
    stage.tick_with_delta(-5.0, &Input::new());
    assert!(approx(stage.clock().delta(), 0.0));
    assert!(approx(stage.clock().elapsed(), 1.0));
}

#[test]
fn frame_budget_grants_exactly_n_frames() {
    let mut stage = mock_stage();
    let mut input = Input::new();
    stage.run(&mut FrameBudget::new(5), &mut input);
    assert_eq!(stage.renderer().frames_rendered(), 5);
}

#[test]
fn cleared_signal_stops_the_loop() {
    let mut stage = mock_stage();
    let mut input = Input::new();

    let (mut scheduler, running) = SignalScheduler::new();
    running.store(false, std::sync::atomic::Ordering::Relaxed);

    stage.run(&mut scheduler, &mut input);
    assert_eq!(stage.renderer().frames_rendered(), 0);
}

#[test]
fn end_to_end_mock_scenario() {
    let mut stage = mock_stage();

    stage.tick_with_delta(0.016, &Input::new());
    let action = stage.human().mixer().action("Run").expect("action");
    assert!(action.effective_weight() > 0.0);
    assert!(action.time > 0.0);

    stage.resize(800, 600);
    assert!(approx(stage.camera().aspect(), 800.0 / 600.0));
}
