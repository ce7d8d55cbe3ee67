pub mod resources;
pub mod textures;
