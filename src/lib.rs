pub mod api;
pub mod config;
pub mod error;
pub mod log;
pub mod store;
pub mod task;

// Decoupled game loop architecture
pub mod actors;
pub mod app;
pub mod render;
pub mod tea;
pub mod ui;

pub use error::{Error, Result};
pub use task::{SubTask, Task};
