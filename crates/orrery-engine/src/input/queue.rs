use crate::input::listeners::ListenerKind;

/// Pointer button ids, as reported by DOM pointer events.
pub mod button {
    pub const PRIMARY: u32 = 0;
    pub const MIDDLE: u32 = 1;
    pub const SECONDARY: u32 = 2;
}

/// Input event types the engine understands.
/// Coordinates are client (CSS) pixels; the engine maps them through the
/// surface rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A button was pressed over the surface.
    PointerDown { x: f32, y: f32, button: u32 },
    /// The pointer moved.
    PointerMove { x: f32, y: f32 },
    /// A button was released.
    PointerUp { x: f32, y: f32 },
    /// A click (press + release) on the surface.
    Click { x: f32, y: f32 },
    /// Wheel scrolled; positive is away from the scene.
    Wheel { delta: f32 },
    /// The container or window changed size.
    Resize { left: f32, top: f32, width: f32, height: f32 },
}

impl InputEvent {
    /// The listener that must be bound for this event to be delivered.
    pub fn listener(&self) -> ListenerKind {
        match self {
            InputEvent::PointerDown { .. } | InputEvent::PointerMove { .. } | InputEvent::PointerUp { .. } => {
                ListenerKind::Pointer
            }
            InputEvent::Click { .. } => ListenerKind::Click,
            InputEvent::Wheel { .. } => ListenerKind::Wheel,
            InputEvent::Resize { .. } => ListenerKind::Resize,
        }
    }
}

/// A queue of input events.
/// The host pushes events as they arrive; the engine drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
