//! CLI command handlers.

pub mod config;
pub mod log;
pub mod render;
