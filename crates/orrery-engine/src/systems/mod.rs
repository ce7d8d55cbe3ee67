pub mod reconcile;
pub mod integrate;
pub mod picking;
pub mod pulse;
pub mod lighting;
pub mod render;
