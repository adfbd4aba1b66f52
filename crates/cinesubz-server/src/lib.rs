//! HTTP API in front of the cinesubz.co scraper
//!
//! The binary in `main.rs` wires logging and configuration; everything
//! else lives here so the router can be driven in-process by tests.

pub mod api;
pub mod config;
pub mod state;

pub use api::create_router;
pub use config::{Config, ConfigError, load_config};
pub use state::AppState;
