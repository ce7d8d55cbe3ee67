pub mod node;
pub mod mesh;
pub mod body;
