//! The winit embedder: window creation, event forwarding, the
//! self-rescheduling redraw loop, and host signaling.

pub mod host;
pub mod input;

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use self::host::{ControlMessage, HostEvent, HostNotifier, NullNotifier};
use self::input::Input;
use crate::errors::Result;
use crate::model::ModelAsset;
use crate::render::{RenderSettings, Renderer};
use crate::stage::Stage;

/// Fraction of the available size the widget actually uses, leaving
/// breathing room in the hosting page. An embedder convention, applied
/// before any size reaches the stage.
const CONTENT_MARGIN: f32 = 0.96;

pub struct App {
    title: String,
    asset: ModelAsset,
    settings: RenderSettings,

    window: Option<Arc<Window>>,
    stage: Option<Stage<Renderer>>,
    input: Input,

    notifier: Box<dyn HostNotifier>,
    control: Option<flume::Receiver<ControlMessage>>,
    paused: bool,
}

impl App {
    #[must_use]
    pub fn new(asset: ModelAsset) -> Self {
        Self {
            title: "vitrine".into(),
            asset,
            settings: RenderSettings::default(),
            window: None,
            stage: None,
            input: Input::new(),
            notifier: Box::new(NullNotifier),
            control: None,
            paused: false,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Installs the outbound host-notification port.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn HostNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Installs the inbound pause/play channel.
    #[must_use]
    pub fn with_control(mut self, control: flume::Receiver<ControlMessage>) -> Self {
        self.control = Some(control);
        self
    }

    /// Enters the event loop. Returns when the window closes.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn scaled(width: u32, height: u32) -> (u32, u32) {
        (
            (width as f32 * CONTENT_MARGIN) as u32,
            (height as f32 * CONTENT_MARGIN) as u32,
        )
    }

    /// Applies any pending host control messages.
    fn drain_control(&mut self) {
        let Some(control) = &self.control else {
            return;
        };
        for message in control.try_iter() {
            match message {
                ControlMessage::Pause => {
                    if !self.paused {
                        log::info!("Paused by host");
                    }
                    self.paused = true;
                }
                ControlMessage::Play => {
                    if self.paused {
                        log::info!("Resumed by host");
                    }
                    self.paused = false;
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_transparent(true);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Window creation failed: {err}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = Self::scaled(size.width, size.height);
        self.input.handle_resize(width, height);

        log::info!("Initializing renderer backend...");
        let renderer = match pollster::block_on(Renderer::new(
            Arc::clone(&window),
            &self.settings,
            width,
            height,
        )) {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("Fatal renderer error: {err}");
                event_loop.exit();
                return;
            }
        };

        self.stage = Some(Stage::new(renderer, (width, height), &self.asset));
        self.window = Some(Arc::clone(&window));

        self.notifier.try_send(HostEvent::Playing);
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let (width, height) = Self::scaled(physical_size.width, physical_size.height);
                if width == 0 || height == 0 {
                    return;
                }
                self.input.handle_resize(width, height);
                if let Some(stage) = &mut self.stage {
                    stage.resize(width, height);
                }
                self.notifier.try_send(HostEvent::Resized { width, height });
            }
            WindowEvent::RedrawRequested => {
                self.drain_control();
                if self.paused {
                    return;
                }
                if let Some(stage) = &mut self.stage {
                    stage.tick(&self.input);
                    self.input.end_frame();
                }
                // Self-rescheduling loop: each frame requests the next.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_move(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_input(state, button);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.handle_mouse_wheel(delta);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.drain_control();
        // While paused no redraw is requested; resuming re-enters the loop
        // from here.
        if !self.paused
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}
