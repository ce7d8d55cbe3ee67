use glam::Vec2;
use crate::assets::resources::{GpuResources, ResourceHandle, ResourceKind};

/// Screen-space rectangle of the render surface, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Non-zero, finite area.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Client coordinates to normalized device coordinates (y up).
    /// `None` for a zero-area rectangle.
    pub fn to_ndc(&self, client: Vec2) -> Option<Vec2> {
        if !self.is_drawable() {
            return None;
        }
        Some(Vec2::new(
            (client.x - self.left) / self.width * 2.0 - 1.0,
            -((client.y - self.top) / self.height) * 2.0 + 1.0,
        ))
    }
}

/// The render target attached to the host container.
///
/// Owns exactly one framebuffer while attached and drawable. A resize
/// disposes the old framebuffer before allocating the new one.
#[derive(Debug)]
pub struct RenderSurface {
    rect: SurfaceRect,
    pixel_ratio: f32,
    framebuffer: Option<ResourceHandle>,
    attached: bool,
}

impl RenderSurface {
    pub fn new(rect: SurfaceRect, pixel_ratio: f32) -> Self {
        Self {
            rect,
            pixel_ratio: if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
            framebuffer: None,
            attached: false,
        }
    }

    /// Attach to the container and allocate the framebuffer if drawable.
    pub fn attach(&mut self, resources: &mut GpuResources) {
        self.attached = true;
        self.reallocate(resources);
    }

    /// Change the surface rectangle. Returns true if the backing size changed.
    pub fn resize(&mut self, rect: SurfaceRect, resources: &mut GpuResources) -> bool {
        let resized = rect.width != self.rect.width || rect.height != self.rect.height;
        self.rect = rect;
        if resized && self.attached {
            self.reallocate(resources);
        }
        resized
    }

    /// Release the framebuffer and detach from the container.
    pub fn detach(&mut self, resources: &mut GpuResources) {
        if let Some(fb) = self.framebuffer.take() {
            resources.dispose(fb);
        }
        self.attached = false;
    }

    fn reallocate(&mut self, resources: &mut GpuResources) {
        if let Some(fb) = self.framebuffer.take() {
            resources.dispose(fb);
        }
        if self.rect.is_drawable() {
            self.framebuffer = Some(resources.allocate(ResourceKind::Framebuffer));
        } else {
            log::debug!("surface {}x{} is not drawable, deferring framebuffer", self.rect.width, self.rect.height);
        }
    }

    pub fn rect(&self) -> SurfaceRect {
        self.rect
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Backing-store size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        if !self.rect.is_drawable() {
            return (0, 0);
        }
        (
            (self.rect.width * self.pixel_ratio).round() as u32,
            (self.rect.height * self.pixel_ratio).round() as u32,
        )
    }

    pub fn framebuffer(&self) -> Option<ResourceHandle> {
        self.framebuffer
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let rect = SurfaceRect::new(100.0, 50.0, 400.0, 200.0);
        assert_eq!(rect.to_ndc(Vec2::new(100.0, 50.0)), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(rect.to_ndc(Vec2::new(500.0, 250.0)), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(rect.to_ndc(Vec2::new(300.0, 150.0)), Some(Vec2::ZERO));
    }

    #[test]
    fn zero_area_has_no_ndc() {
        assert!(SurfaceRect::new(0.0, 0.0, 0.0, 300.0).to_ndc(Vec2::ZERO).is_none());
    }

    #[test]
    fn resize_does_not_leak_framebuffers() {
        let mut res = GpuResources::new();
        let mut surface = RenderSurface::new(SurfaceRect::new(0.0, 0.0, 800.0, 600.0), 2.0);
        surface.attach(&mut res);
        assert_eq!(surface.device_size(), (1600, 1200));
        for w in [640.0, 1024.0, 1280.0] {
            surface.resize(SurfaceRect::new(0.0, 0.0, w, 480.0), &mut res);
            assert_eq!(res.live_count_of(ResourceKind::Framebuffer), 1);
        }
        surface.detach(&mut res);
        assert_eq!(res.live_count(), 0);
        assert!(!surface.is_attached());
    }

    #[test]
    fn zero_size_defers_framebuffer() {
        let mut res = GpuResources::new();
        let mut surface = RenderSurface::new(SurfaceRect::default(), 1.0);
        surface.attach(&mut res);
        assert!(surface.framebuffer().is_none());
        assert_eq!(surface.device_size(), (0, 0));
        surface.resize(SurfaceRect::new(0.0, 0.0, 320.0, 240.0), &mut res);
        assert!(surface.framebuffer().is_some());
    }

    #[test]
    fn move_without_resize_keeps_framebuffer() {
        let mut res = GpuResources::new();
        let mut surface = RenderSurface::new(SurfaceRect::new(0.0, 0.0, 320.0, 240.0), 1.0);
        surface.attach(&mut res);
        let fb = surface.framebuffer();
        assert!(!surface.resize(SurfaceRect::new(10.0, 10.0, 320.0, 240.0), &mut res));
        assert_eq!(surface.framebuffer(), fb);
        assert_eq!(surface.rect().left, 10.0);
    }
}
