//! Orbit Controls Tests
//!
//! Tests for the damped orbit controller's clamps: zoom distance, polar
//! angle, and the per-frame damping decay without input.

use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use vitrine::scene::Transform;
use vitrine::{Input, OrbitControls};

const EPSILON: f32 = 1e-4;

fn frame_input() -> Input {
    let mut input = Input::new();
    input.screen_size = Vec2::new(640.0, 480.0);
    input
}

#[test]
fn from_position_matches_the_camera_pose() {
    let position = Vec3::new(0.0, 2.0, 20.0);
    let mut controls = OrbitControls::from_position(Vec3::ZERO, position);
    let mut transform = Transform::new();

    controls.update(&mut transform, &frame_input(), 40.0, 1.0 / 60.0);
    assert!(
        transform.position.abs_diff_eq(position, 1e-3),
        "update without input must hold the pose, got {}",
        transform.position
    );
}

#[test]
fn zoom_is_clamped_to_the_distance_range() {
    let mut controls = OrbitControls::from_position(Vec3::ZERO, Vec3::new(0.0, 2.0, 20.0));
    let mut transform = Transform::new();

    let mut zoom_in = frame_input();
    zoom_in.scroll_delta = Vec2::new(0.0, 500.0);
    controls.update(&mut transform, &zoom_in, 40.0, 1.0 / 60.0);
    assert!(controls.radius >= controls.min_distance - EPSILON);

    let mut zoom_out = frame_input();
    zoom_out.scroll_delta = Vec2::new(0.0, -500.0);
    controls.update(&mut transform, &zoom_out, 40.0, 1.0 / 60.0);
    assert!(controls.radius <= controls.max_distance + EPSILON);
}

#[test]
fn polar_angle_never_goes_below_the_ground_plane() {
    let mut controls = OrbitControls::from_position(Vec3::ZERO, Vec3::new(0.0, 2.0, 20.0));
    let mut transform = Transform::new();

    // Drag hard downward: the orbit must stop at the horizon.
    let mut drag = frame_input();
    drag.mouse_buttons.insert(MouseButton::Left);
    drag.cursor_delta = Vec2::new(0.0, -5000.0);
    for _ in 0..240 {
        controls.update(&mut transform, &drag, 40.0, 1.0 / 60.0);
        drag.cursor_delta = Vec2::ZERO;
        assert!(controls.phi <= std::f32::consts::FRAC_PI_2 + EPSILON);
        assert!(transform.position.y >= -EPSILON, "camera dipped below ground");
    }
}

#[test]
fn damping_decays_inertia_across_frames() {
    let mut controls = OrbitControls::from_position(Vec3::ZERO, Vec3::new(0.0, 2.0, 20.0));
    let mut transform = Transform::new();
    let start_theta = controls.theta;

    let mut drag = frame_input();
    drag.mouse_buttons.insert(MouseButton::Left);
    drag.cursor_delta = Vec2::new(100.0, 0.0);
    controls.update(&mut transform, &drag, 40.0, 1.0 / 60.0);
    let after_drag = controls.theta;
    assert!((after_drag - start_theta).abs() > 0.0);

    // No further input: inertia keeps moving the camera, less each frame.
    let idle = frame_input();
    let mut last = after_drag;
    let mut last_step = f32::MAX;
    for _ in 0..5 {
        controls.update(&mut transform, &idle, 40.0, 1.0 / 60.0);
        let step = (controls.theta - last).abs();
        assert!(step > 0.0, "inertia stopped immediately");
        assert!(step < last_step, "inertia must decay");
        last = controls.theta;
        last_step = step;
    }
}

#[test]
fn pan_moves_the_target_in_the_ground_plane_only() {
    let mut controls = OrbitControls::from_position(Vec3::ZERO, Vec3::new(0.0, 2.0, 20.0));
    let mut transform = Transform::new();

    let mut pan = frame_input();
    pan.mouse_buttons.insert(MouseButton::Right);
    pan.cursor_delta = Vec2::new(40.0, 25.0);
    controls.update(&mut transform, &pan, 40.0, 1.0 / 60.0);

    assert!(controls.center.y.abs() < EPSILON, "pan must stay in the ground plane");
    assert!(controls.center.length() > 0.0, "pan must move the target");
}
