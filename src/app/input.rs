//! Per-frame pointer state fed by the embedder's event loop.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Cursor position inside the window.
    pub cursor_position: Vec2,
    /// Cursor movement accumulated since the last frame.
    pub cursor_delta: Vec2,
    /// Wheel movement accumulated since the last frame.
    pub scroll_delta: Vec2,
    pub screen_size: Vec2,
    pub mouse_buttons: HashSet<MouseButton>,
    cursor_seen: bool,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-frame deltas. Call after every tick, otherwise the
    /// controls keep applying the last movement forever.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        // No delta on the very first sample.
        if self.cursor_seen {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.cursor_position = new_pos;
        self.cursor_seen = true;
    }

    pub fn handle_mouse_input(&mut self, state: ElementState, button: MouseButton) {
        match state {
            ElementState::Pressed => {
                self.mouse_buttons.insert(button);
            }
            ElementState::Released => {
                self.mouse_buttons.remove(&button);
            }
        }
    }

    pub fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(x, y) => {
                self.scroll_delta += Vec2::new(x, y);
            }
            MouseScrollDelta::PixelDelta(pos) => {
                // Pixel deltas come in much larger units than lines.
                self.scroll_delta += Vec2::new(pos.x as f32, pos.y as f32) * 0.1;
            }
        }
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_cursor_sample_produces_no_delta() {
        let mut input = Input::new();
        input.handle_cursor_move(120.0, 80.0);
        assert_eq!(input.cursor_delta, Vec2::ZERO);
        assert_eq!(input.cursor_position, Vec2::new(120.0, 80.0));
    }

    #[test]
    fn moving_through_the_origin_keeps_accumulating() {
        let mut input = Input::new();
        input.handle_cursor_move(5.0, 5.0);
        input.handle_cursor_move(0.0, 0.0);
        assert_eq!(input.cursor_delta, Vec2::new(-5.0, -5.0));
        input.handle_cursor_move(3.0, 4.0);
        assert_eq!(input.cursor_delta, Vec2::new(-2.0, -1.0));
    }

    #[test]
    fn end_frame_clears_deltas_but_not_the_position() {
        let mut input = Input::new();
        input.handle_cursor_move(1.0, 1.0);
        input.handle_cursor_move(2.0, 3.0);
        input.end_frame();
        assert_eq!(input.cursor_delta, Vec2::ZERO);
        assert_eq!(input.cursor_position, Vec2::new(2.0, 3.0));
        input.handle_cursor_move(4.0, 3.0);
        assert_eq!(input.cursor_delta, Vec2::new(2.0, 0.0));
    }
}
