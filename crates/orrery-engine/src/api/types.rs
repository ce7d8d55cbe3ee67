use std::fmt;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Handle to a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Stable key of a celestial body across reconciliation passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub String);

impl BodyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BodyId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Outcome of resolving a record's identity.
///
/// `Catalog` means one of the record's own identifier columns was used;
/// `Synthesized` means none was present and the id was derived from the
/// record contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedId {
    Catalog { field: &'static str, id: BodyId },
    Synthesized(BodyId),
}

impl ResolvedId {
    pub fn id(&self) -> &BodyId {
        match self {
            ResolvedId::Catalog { id, .. } => id,
            ResolvedId::Synthesized(id) => id,
        }
    }

    pub fn into_id(self) -> BodyId {
        match self {
            ResolvedId::Catalog { id, .. } => id,
            ResolvedId::Synthesized(id) => id,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, ResolvedId::Synthesized(_))
    }
}

/// Event kinds written into the event section of the wire buffer.
pub mod event_kind {
    /// `a` = sphere entity id of the picked body.
    pub const BODY_SELECTED: f32 = 1.0;
    /// `a` = bodies added, `b` = bodies removed, `c` = live body count.
    pub const BODIES_RECONCILED: f32 = 2.0;
    /// `a` = width, `b` = height.
    pub const SURFACE_RESIZED: f32 = 3.0;
}

/// A scene event communicated to the host page.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SceneEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl SceneEvent {
    pub const FLOATS: usize = 4;
}
