//! Lifetime tracking for renderer-side resources.
//!
//! The engine does not talk to a GPU itself. It hands out opaque handles for
//! every geometry, material and framebuffer a backend would allocate, and
//! keeps the set of live handles so teardown can prove it released them all.

use std::collections::HashMap;

/// What a resource handle stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    Framebuffer,
}

/// Opaque handle to one renderer resource. Never reused within an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    pub id: u32,
    pub kind: ResourceKind,
}

/// Allocation registry for one scene instance.
#[derive(Debug, Default)]
pub struct GpuResources {
    live: HashMap<u32, ResourceKind>,
    next_id: u32,
    allocated_total: u32,
}

impl GpuResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: ResourceKind) -> ResourceHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.allocated_total += 1;
        self.live.insert(id, kind);
        ResourceHandle { id, kind }
    }

    /// Release a handle. Returns false (and logs) if it was already released.
    pub fn dispose(&mut self, handle: ResourceHandle) -> bool {
        if self.live.remove(&handle.id).is_some() {
            true
        } else {
            log::warn!("resource {:?} #{} disposed twice", handle.kind, handle.id);
            false
        }
    }

    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains_key(&handle.id)
    }

    /// Number of live resources.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of live resources of one kind.
    pub fn live_count_of(&self, kind: ResourceKind) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }

    /// Handles allocated over the registry's lifetime.
    pub fn allocated_total(&self) -> u32 {
        self.allocated_total
    }

    /// Release everything still live. Returns how many were released.
    pub fn dispose_all(&mut self) -> usize {
        let n = self.live.len();
        self.live.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_dispose() {
        let mut res = GpuResources::new();
        let g = res.allocate(ResourceKind::Geometry);
        let m = res.allocate(ResourceKind::Material);
        assert_ne!(g.id, m.id);
        assert_eq!(res.live_count(), 2);
        assert!(res.dispose(g));
        assert!(!res.is_live(g));
        assert_eq!(res.live_count_of(ResourceKind::Material), 1);
    }

    #[test]
    fn double_dispose_is_a_no_op() {
        let mut res = GpuResources::new();
        let g = res.allocate(ResourceKind::Geometry);
        assert!(res.dispose(g));
        assert!(!res.dispose(g));
        assert_eq!(res.live_count(), 0);
    }

    #[test]
    fn dispose_all_empties_registry() {
        let mut res = GpuResources::new();
        for _ in 0..5 {
            res.allocate(ResourceKind::Geometry);
        }
        assert_eq!(res.dispose_all(), 5);
        assert_eq!(res.live_count(), 0);
        assert_eq!(res.allocated_total(), 5);
    }
}
