/// Event bindings a scene instance holds on its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Click on the render surface (picking).
    Click,
    /// Window / container resize.
    Resize,
    /// Pointer down/move/up on the surface (camera controls).
    Pointer,
    /// Wheel on the surface (camera zoom).
    Wheel,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 4] = [
        ListenerKind::Click,
        ListenerKind::Resize,
        ListenerKind::Pointer,
        ListenerKind::Wheel,
    ];
}

/// The set of listeners currently bound. Events for an unbound kind are
/// dropped, so a torn-down instance ignores late host events.
#[derive(Debug, Default)]
pub struct ListenerSet {
    bound: Vec<ListenerKind>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a listener. Binding twice is a no-op. Returns true if newly bound.
    pub fn bind(&mut self, kind: ListenerKind) -> bool {
        if self.bound.contains(&kind) {
            return false;
        }
        self.bound.push(kind);
        true
    }

    pub fn bind_all(&mut self) {
        for kind in ListenerKind::ALL {
            self.bind(kind);
        }
    }

    pub fn unbind(&mut self, kind: ListenerKind) -> bool {
        let before = self.bound.len();
        self.bound.retain(|k| *k != kind);
        self.bound.len() != before
    }

    /// Remove every binding. Returns how many were removed.
    pub fn unbind_all(&mut self) -> usize {
        let n = self.bound.len();
        self.bound.clear();
        n
    }

    pub fn is_bound(&self, kind: ListenerKind) -> bool {
        self.bound.contains(&kind)
    }

    pub fn count(&self) -> usize {
        self.bound.len()
    }
}
