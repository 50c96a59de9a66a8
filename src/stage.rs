//! The stage: top-level controller owning the scene, actor, camera,
//! controls, clock, and renderer, and driving the per-frame loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::{Quat, Vec3};

use crate::app::input::Input;
use crate::camera::PerspectiveCamera;
use crate::controls::OrbitControls;
use crate::geometry::Geometry;
use crate::human::Human;
use crate::material::Material;
use crate::model::ModelAsset;
use crate::render::SceneRenderer;
use crate::scene::{Mesh, Node, Scene};
use crate::time::Clock;

const CAMERA_FOV_DEGREES: f32 = 40.0;
const CAMERA_NEAR: f32 = 1.0;
const CAMERA_FAR: f32 = 1500.0;
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 2.0, 20.0);
const FLOOR_SIZE: f32 = 1000.0;
const FLOOR_SHADOW_COLOR: Vec3 = Vec3::new(0.0, 0.0, 0.4);

/// Gates the frame loop: [`Stage::run`] executes one tick per `true` and
/// returns on the first `false`. Pausing is simply not granting the next
/// frame.
pub trait FrameScheduler {
    fn next_frame(&mut self) -> bool;
}

/// Grants a fixed number of frames, then stops.
pub struct FrameBudget {
    remaining: u64,
}

impl FrameBudget {
    #[must_use]
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }
}

impl FrameScheduler for FrameBudget {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Grants frames while a shared flag stays set; another thread clearing the
/// flag stops the loop after the current tick.
pub struct SignalScheduler {
    running: Arc<AtomicBool>,
}

impl SignalScheduler {
    #[must_use]
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let running = Arc::new(AtomicBool::new(true));
        (
            Self {
                running: Arc::clone(&running),
            },
            running,
        )
    }
}

impl FrameScheduler for SignalScheduler {
    fn next_frame(&mut self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

pub struct Stage<R: SceneRenderer> {
    renderer: R,
    scene: Scene,
    human: Human,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    clock: Clock,
}

impl<R: SceneRenderer> Stage<R> {
    /// Wires the widget in dependency order: scene and light, the actor,
    /// the outline selection, the floor, camera placement, controls, and
    /// finally the initial resize.
    #[must_use]
    pub fn new(renderer: R, (width, height): (u32, u32), asset: &ModelAsset) -> Self {
        let mut scene = Scene::new();

        let human = Human::new(&mut scene, asset);

        // Shadow-catching floor: receives the contact shadow, never casts,
        // never outlined.
        let mut floor = Node::new("floor");
        floor.transform.rotation = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        floor.cast_shadow = false;
        floor.receive_shadow = true;
        floor.mesh = Some(scene.add_mesh(Mesh::new(
            Geometry::plane(FLOOR_SIZE, FLOOR_SIZE),
            Material::shadow(FLOOR_SHADOW_COLOR),
        )));
        scene.add_child(scene.root(), floor);

        let aspect = width as f32 / (height.max(1)) as f32;
        let mut camera = PerspectiveCamera::new(CAMERA_FOV_DEGREES, aspect, CAMERA_NEAR, CAMERA_FAR);
        camera.transform.position = CAMERA_POSITION;
        // Look-at target is the actor's position at construction time; the
        // camera does not track it afterwards.
        let actor_position = scene
            .get_node(human.root())
            .map_or(Vec3::ZERO, |node| node.transform.position);
        camera.look_at(actor_position);

        let controls = OrbitControls::from_position(actor_position, CAMERA_POSITION);

        // Reference pose of the whole scene: slight turn, dropped to stand
        // on the ground plane.
        if let Some(root) = scene.get_node_mut(scene.root()) {
            root.transform.rotation = Quat::from_rotation_y(1.0);
            root.transform.position.y = -2.0;
        }

        let mut stage = Self {
            renderer,
            scene,
            human,
            camera,
            controls,
            clock: Clock::new(),
        };

        // The steady-state outline invariant: the selection is exactly the
        // actor's mesh nodes before any frame renders.
        let selection = stage.human.mesh_nodes().to_vec();
        stage.renderer.composer_mut().set_selection(selection);

        stage.resize(width, height);
        stage
    }

    /// Propagates a new surface size, strictly in order: renderer surface,
    /// camera aspect + projection, composer size. Skipping or reordering
    /// any of these yields stretched or clipped output.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize_surface(width, height);
        self.camera.set_aspect(width as f32 / (height.max(1)) as f32);
        self.renderer.composer_mut().set_size(width, height);
    }

    /// One frame, driven by the wall clock.
    pub fn tick(&mut self, input: &Input) {
        let delta = self.clock.tick();
        self.step(delta, input);
    }

    /// One frame with an injected raw delta, for deterministic drivers.
    pub fn tick_with_delta(&mut self, raw_delta: f32, input: &Input) {
        let delta = self.clock.advance(raw_delta);
        self.step(delta, input);
    }

    /// Tick body. Ordering is a correctness contract: animation advances
    /// before rendering so the frame shows this tick's pose; the controls
    /// damping update runs last because it only affects the next frame.
    fn step(&mut self, delta: f32, input: &Input) {
        self.human.update(&mut self.scene, delta, self.clock.elapsed());
        self.scene.update_world_transforms();
        self.renderer.render(&self.scene, &self.camera);
        let fov = self.camera.fov_degrees;
        self.controls
            .update(&mut self.camera.transform, input, fov, delta);
    }

    /// Ramps the actor's fade-in opacity.
    pub fn set_actor_opacity(&mut self, opacity: f32) {
        self.human.set_opacity(&mut self.scene, opacity);
    }

    /// Runs the loop until the scheduler stops granting frames.
    pub fn run(&mut self, scheduler: &mut dyn FrameScheduler, input: &mut Input) {
        while scheduler.next_frame() {
            self.tick(input);
            input.end_frame();
        }
    }

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    #[must_use]
    pub fn human(&self) -> &Human {
        &self.human
    }

    #[inline]
    #[must_use]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    #[inline]
    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    #[inline]
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[inline]
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
