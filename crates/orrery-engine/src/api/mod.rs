pub mod types;
pub mod record;
pub mod config;
pub mod settings;
pub mod engine;
