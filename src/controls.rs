//! Damped orbit camera controls.
//!
//! Rotation and pan input accumulate into a delta that is released through
//! an exponential damping filter, so [`OrbitControls::update`] must run
//! every frame even when no input occurred: inertia keeps decaying after
//! the pointer stops.

use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::app::input::Input;
use crate::scene::Transform;

const EPS: f32 = 0.0001;

pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle ceiling. Defaults to PI/2 so the camera never dips below
    /// the ground plane.
    pub max_polar_angle: f32,

    /// Fixed look-at target captured at construction (panning shifts it).
    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    rotate_delta: Vec2,
}

impl OrbitControls {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: true,
            min_distance: 5.0,
            max_distance: 50.0,
            max_polar_angle: std::f32::consts::FRAC_PI_2,

            center,
            radius,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            rotate_delta: Vec2::ZERO,
        }
    }

    /// Builds controls whose spherical state matches an existing camera
    /// position, so taking over control causes no jump.
    #[must_use]
    pub fn from_position(center: Vec3, position: Vec3) -> Self {
        let offset = position - center;
        let radius = offset.length().max(EPS);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let theta = offset.x.atan2(offset.z);

        let mut controls = Self::new(center, radius);
        controls.phi = phi.clamp(EPS, controls.max_polar_angle);
        controls.theta = theta;
        controls
    }

    /// Consumes this frame's input, applies damping, clamps the orbit, and
    /// writes the resulting camera pose into `transform`.
    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) {
        let screen_height = input.screen_size.y.max(1.0);

        if input.is_button_pressed(MouseButton::Left) {
            let rotate_per_pixel = 2.0 * std::f32::consts::PI / screen_height;
            self.rotate_delta.x -= input.cursor_delta.x * rotate_per_pixel * self.rotate_speed;
            self.rotate_delta.y -= input.cursor_delta.y * rotate_per_pixel * self.rotate_speed;
        }

        if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            let delta_apply = self.rotate_delta * (1.0 - retention);

            self.theta += delta_apply.x;
            self.phi += delta_apply.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        self.phi = self.phi.clamp(EPS, self.max_polar_angle);

        if input.scroll_delta.y != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(input.scroll_delta.y.abs());
            if input.scroll_delta.y > 0.0 {
                self.radius *= scale;
            } else {
                self.radius /= scale;
            }
        }
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);

        if input.is_button_pressed(MouseButton::Right) {
            // Screen-space panning is disabled: dragging shifts the target in
            // the ground plane only, never vertically.
            let half_fov = fov_degrees.to_radians() / 2.0;
            let target_world_height = 2.0 * self.radius * half_fov.tan();
            let pixels_to_world = target_world_height / screen_height;

            let sin_theta = self.theta.sin();
            let cos_theta = self.theta.cos();
            let right = Vec3::new(cos_theta, 0.0, -sin_theta);
            let ground_forward = Vec3::new(-sin_theta, 0.0, -cos_theta);

            self.center += (right * -input.cursor_delta.x + ground_forward * input.cursor_delta.y)
                * pixels_to_world
                * self.pan_speed;
        }

        let sin_phi = self.phi.sin();
        let cos_phi = self.phi.cos();
        let sin_theta = self.theta.sin();
        let cos_theta = self.theta.cos();

        let offset = Vec3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        );

        transform.position = self.center + offset;
        transform.look_at(self.center, Vec3::Y);
    }
}
