pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::config::{EngineConfig, TextureSet};
pub use api::engine::{SceneEngine, SelectionCallback};
pub use api::record::CelestialBodyRecord;
pub use api::settings::ControlSettings;
pub use api::types::{event_kind, BodyId, EntityId, ResolvedId, SceneEvent};
pub use assets::resources::{GpuResources, ResourceHandle, ResourceKind};
pub use assets::textures::{SharedTextureCache, TextureCache, TextureHandle};
pub use bridge::protocol::ProtocolLayout;
pub use components::body::{BodyState, OrbitParams};
pub use components::mesh::{mesh_flags, MeshComponent, OrbitPath};
pub use components::node::{Node, NodeKind};
pub use core::scene::SceneGraph;
pub use core::scheduler::{FrameHandle, FrameScheduler};
pub use core::time::{FixedTimestep, Playback};
pub use input::listeners::{ListenerKind, ListenerSet};
pub use input::queue::{button, InputEvent, InputQueue};
pub use renderer::camera::{CameraUniform, PerspectiveCamera};
pub use renderer::controls::OrbitControls;
pub use renderer::instance::{LineRange, LineVertex, RenderBuffer, SphereInstance};
pub use renderer::surface::{RenderSurface, SurfaceRect};
pub use systems::lighting::{LightState, PointLight};
pub use systems::reconcile::ReconcileReport;
