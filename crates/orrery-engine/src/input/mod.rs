pub mod queue;
pub mod listeners;
pub mod gesture;
