//! Pointer gesture tracking: distinguishes a click from a camera drag.

use glam::Vec2;
use super::queue::button;

/// What a pointer event asks of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    None,
    /// Orbit by a pixel delta.
    Rotate(Vec2),
    /// Pan by a pixel delta.
    Pan(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    Rotate,
    Pan,
}

/// Tracks one pointer press at a time.
///
/// A press turns into a drag once it travels past the threshold. The click
/// the host reports after a drag is swallowed so orbiting never selects.
#[derive(Debug)]
pub struct DragTracker {
    pressed: Option<DragMode>,
    start: Vec2,
    last: Vec2,
    dragging: bool,
    swallow_click: bool,
    threshold: f32,
}

impl DragTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            pressed: None,
            start: Vec2::ZERO,
            last: Vec2::ZERO,
            dragging: false,
            swallow_click: false,
            threshold: threshold.max(0.0),
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2, button_id: u32) {
        self.pressed = Some(match button_id {
            button::SECONDARY | button::MIDDLE => DragMode::Pan,
            _ => DragMode::Rotate,
        });
        self.start = pos;
        self.last = pos;
        self.dragging = false;
        self.swallow_click = false;
    }

    pub fn pointer_move(&mut self, pos: Vec2) -> Gesture {
        let Some(mode) = self.pressed else {
            return Gesture::None;
        };
        if !self.dragging && (pos - self.start).length() > self.threshold {
            self.dragging = true;
            // Apply the travel accumulated below the threshold too.
            self.last = self.start;
        }
        if !self.dragging {
            return Gesture::None;
        }
        let delta = pos - self.last;
        self.last = pos;
        match mode {
            DragMode::Rotate => Gesture::Rotate(delta),
            DragMode::Pan => Gesture::Pan(delta),
        }
    }

    pub fn pointer_up(&mut self) {
        self.swallow_click = self.dragging;
        self.pressed = None;
        self.dragging = false;
    }

    /// Whether a click should pick. Consumes the post-drag suppression.
    pub fn accept_click(&mut self) -> bool {
        !std::mem::take(&mut self.swallow_click)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
