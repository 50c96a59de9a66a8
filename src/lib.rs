//! vitrine, an embeddable 3D widget.
//!
//! Renders one animated humanoid model in a continuously running loop:
//! skeletal animation with cross-fading, a selection-outline post-process
//! on the actor, a contact shadow on an invisible floor, and a damped
//! orbit camera. A host can resize the widget and pause/resume it.
//!
//! The model asset arrives pre-loaded as a [`ModelAsset`]; asset format
//! parsing, file loading and physics are out of scope.

pub mod animation;
pub mod app;
pub mod camera;
pub mod controls;
pub mod errors;
pub mod geometry;
pub mod human;
pub mod material;
pub mod model;
pub mod render;
pub mod scene;
pub mod stage;
pub mod time;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, LoopMode};
pub use app::App;
pub use app::host::{ChannelNotifier, ControlMessage, HostEvent, HostNotifier, NullNotifier};
pub use app::input::Input;
pub use camera::PerspectiveCamera;
pub use controls::OrbitControls;
pub use errors::VitrineError;
pub use geometry::Geometry;
pub use human::Human;
pub use material::{Material, MaterialKind};
pub use model::{ModelAsset, ModelMesh, ModelNode, ModelSkin};
pub use render::{
    Composer, HeadlessRenderer, RenderSettings, Renderer, SceneRenderer, WgpuContext,
};
pub use scene::{DirectionalLight, Node, Scene};
pub use stage::{FrameBudget, FrameScheduler, SignalScheduler, Stage};
pub use time::Clock;
