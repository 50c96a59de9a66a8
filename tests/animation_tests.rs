//! Animation System Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step interpolation and cursor sampling
//! - AnimationAction loop modes (Once with/without clamp, Repeat)
//! - AnimationMixer binding (first write wins) and cross-fading

use glam::{Quat, Vec3};

use vitrine::animation::{
    AnimationClip, AnimationMixer, InterpolationMode, KeyframeCursor, KeyframeTrack, LoopMode,
    TargetPath, Track, TrackData, TrackMeta,
};
use vitrine::scene::{Node, Scene};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Scene with one animatable node named "Torso" under the root.
fn test_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_child(scene.root(), Node::new("Torso"));
    scene
}

/// Clip with a 2-second translation ramp on "Torso": (0,0,0) → (0,2,0) →
/// back to (0,0,0).
fn translation_clip(name: &str) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![Track {
            meta: TrackMeta {
                node_name: "Torso".to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, 1.0, 2.0],
                vec![Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO],
                InterpolationMode::Linear,
            )),
        }],
    )
}

fn torso_position(scene: &Scene) -> Vec3 {
    let handle = scene
        .descendants(scene.root())
        .into_iter()
        .find(|&h| scene.get_node(h).is_some_and(|n| n.name == "Torso"))
        .expect("Torso node");
    scene.get_node(handle).expect("Torso node").transform.position
}

// ============================================================================
// KeyframeTrack sampling
// ============================================================================

#[test]
fn track_linear_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
        InterpolationMode::Linear,
    );
    let val = track.sample(0.5);
    assert!(approx(val.x, 5.0), "Expected 5.0, got {}", val.x);
}

#[test]
fn track_clamps_outside_range() {
    let track = KeyframeTrack::new(
        vec![1.0, 2.0],
        vec![10.0_f32, 20.0],
        InterpolationMode::Linear,
    );
    assert!(approx(track.sample(0.0), 10.0));
    assert!(approx(track.sample(5.0), 20.0));
}

#[test]
fn track_step_holds_previous_keyframe() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Step);
    assert!(approx(track.sample(0.9), 0.0));
    assert!(approx(track.sample(1.0), 10.0));
}

#[test]
fn cursor_sampling_matches_direct_sampling() {
    let track = KeyframeTrack::new(
        vec![0.0, 0.5, 1.0, 1.5, 2.0],
        vec![0.0_f32, 1.0, 4.0, 9.0, 16.0],
        InterpolationMode::Linear,
    );
    let mut cursor = KeyframeCursor::default();
    // Sequential forward playback, then a loop wrap back to the start.
    for &t in &[0.1, 0.4, 0.6, 1.1, 1.9, 0.2] {
        let with_cursor = track.sample_with_cursor(t, &mut cursor);
        assert!(approx(with_cursor, track.sample(t)), "diverged at t={t}");
    }
}

#[test]
fn quaternion_track_slerps_between_keys() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)],
        InterpolationMode::Linear,
    );
    let mid = track.sample(0.5);
    let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2 / 2.0);
    assert!(mid.dot(expected).abs() > 1.0 - EPSILON);
}

// ============================================================================
// Mixer binding
// ============================================================================

#[test]
fn duplicate_clip_names_first_write_wins() {
    let scene = test_scene();
    let mut first = translation_clip("Walk");
    first.duration = 2.0;
    let mut second = translation_clip("Walk");
    second.duration = 99.0;

    let clips = vec![std::sync::Arc::new(first), std::sync::Arc::new(second)];
    let mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    assert_eq!(mixer.action_count(), 1);
    let action = mixer.action("Walk").expect("bound action");
    assert!(approx(action.clip().duration, 2.0));
}

#[test]
fn unbound_actions_contribute_no_weight() {
    let scene = test_scene();
    let clips = vec![std::sync::Arc::new(translation_clip("Run"))];
    let mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    // Bound but never cross-faded: must not contribute its start pose.
    assert!(approx(mixer.action("Run").expect("action").effective_weight(), 0.0));
    assert!(mixer.active_action().is_none());
}

#[test]
#[should_panic(expected = "no animation clip named")]
fn cross_fade_to_unknown_clip_panics() {
    let scene = test_scene();
    let clips = vec![std::sync::Arc::new(translation_clip("Run"))];
    let mut mixer = AnimationMixer::bind(&scene, scene.root(), &clips);
    mixer.cross_fade("Moonwalk", 0.5, LoopMode::Repeat, 1.0, 1.0, true);
}

// ============================================================================
// Cross-fading
// ============================================================================

#[test]
fn cross_fade_weights_are_monotonic_and_complete() {
    let mut scene = test_scene();
    let clips = vec![
        std::sync::Arc::new(translation_clip("Idle")),
        std::sync::Arc::new(translation_clip("Run")),
    ];
    let mut mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    mixer.cross_fade("Idle", 0.0, LoopMode::Repeat, 1.0, 1.0, true);
    mixer.update(0.1, &mut scene);
    assert!(approx(mixer.action("Idle").expect("action").effective_weight(), 1.0));

    mixer.cross_fade("Run", 1.0, LoopMode::Repeat, 1.0, 1.0, true);
    assert_eq!(mixer.active_action(), Some("Run"));
    assert_eq!(mixer.previous_action(), Some("Idle"));

    // During the fade window both weights stay strictly inside (0, 1) and
    // move monotonically in opposite directions.
    let mut last_idle = 1.0;
    let mut last_run = 0.0;
    for _ in 0..3 {
        mixer.update(0.25, &mut scene);
        let idle = mixer.action("Idle").expect("action").effective_weight();
        let run = mixer.action("Run").expect("action").effective_weight();
        assert!(idle > 0.0 && idle < 1.0, "idle weight {idle} out of (0,1)");
        assert!(run > 0.0 && run < 1.0, "run weight {run} out of (0,1)");
        assert!(idle < last_idle, "idle weight not decreasing");
        assert!(run > last_run, "run weight not increasing");
        last_idle = idle;
        last_run = run;
    }

    // At the fade duration the old action is fully out and discarded.
    mixer.update(0.25, &mut scene);
    assert!(approx(mixer.action("Idle").expect("action").effective_weight(), 0.0));
    assert!(approx(mixer.action("Run").expect("action").effective_weight(), 1.0));
    assert!(mixer.previous_action().is_none());
}

#[test]
fn cross_fade_to_self_retires_nothing() {
    let mut scene = test_scene();
    let clips = vec![std::sync::Arc::new(translation_clip("Run"))];
    let mut mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    mixer.cross_fade("Run", 0.0, LoopMode::Repeat, 1.0, 1.0, true);
    mixer.update(0.5, &mut scene);

    mixer.cross_fade("Run", 0.75, LoopMode::Repeat, 1.0, 1.0, true);
    assert_eq!(mixer.active_action(), Some("Run"));
    assert!(mixer.previous_action().is_none());
    assert!(mixer.action("Run").expect("action").playing);
}

// ============================================================================
// Loop modes
// ============================================================================

#[test]
fn once_with_clamp_holds_final_pose() {
    let mut scene = test_scene();
    let clips = vec![std::sync::Arc::new(translation_clip("Jump"))];
    let mut mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    mixer.cross_fade("Jump", 0.0, LoopMode::Once, 1.0, 1.0, true);
    mixer.update(5.0, &mut scene);
    let held = torso_position(&scene);

    // Further advances leave the sampled pose unchanged.
    mixer.update(1.0, &mut scene);
    assert!(torso_position(&scene).abs_diff_eq(held, EPSILON));

    let action = mixer.action("Jump").expect("action");
    assert!(!action.playing);
    assert!(action.enabled);
    assert!(approx(action.time, action.clip().duration));
}

#[test]
fn once_without_clamp_stops_contributing() {
    let mut scene = test_scene();
    let clips = vec![std::sync::Arc::new(translation_clip("Jump"))];
    let mut mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    mixer.cross_fade("Jump", 0.0, LoopMode::Once, 1.0, 1.0, false);
    mixer.update(5.0, &mut scene);

    let action = mixer.action("Jump").expect("action");
    assert!(!action.playing);
    assert!(!action.enabled);
    assert!(approx(action.effective_weight(), 0.0));
}

#[test]
fn repeat_returns_to_start_pose_after_one_duration() {
    let mut scene = test_scene();
    let clips = vec![std::sync::Arc::new(translation_clip("Run"))];
    let mut mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    mixer.cross_fade("Run", 0.0, LoopMode::Repeat, 1.0, 1.0, true);
    mixer.update(0.0, &mut scene);
    let start = torso_position(&scene);

    // Exactly one clip duration later the cyclic pose matches the start.
    mixer.update(2.0, &mut scene);
    assert!(torso_position(&scene).abs_diff_eq(start, EPSILON));
}

#[test]
fn repeat_wraps_playback_time() {
    let mut scene = test_scene();
    let clips = vec![std::sync::Arc::new(translation_clip("Run"))];
    let mut mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    mixer.cross_fade("Run", 0.0, LoopMode::Repeat, 1.0, 1.0, true);
    mixer.update(2.5, &mut scene);
    let action = mixer.action("Run").expect("action");
    assert!(approx(action.time, 0.5), "expected wrap to 0.5, got {}", action.time);
    assert!(action.playing);
}

#[test]
fn time_scale_speeds_up_playback() {
    let mut scene = test_scene();
    let clips = vec![std::sync::Arc::new(translation_clip("Run"))];
    let mut mixer = AnimationMixer::bind(&scene, scene.root(), &clips);

    mixer.cross_fade("Run", 0.0, LoopMode::Repeat, 2.0, 1.0, true);
    mixer.update(0.5, &mut scene);
    assert!(approx(mixer.action("Run").expect("action").time, 1.0));
}
