//! Topologic
//!
//! Renders n-dimensional models (cubes, simplices, spheres, fractals) into
//! vector documents or raster drawing commands, and reproduces a scene from
//! the metadata embedded in its output.
//!
//! The workspace crates do the work; this crate ties them together:
//!
//! - [`config`] - application configuration (figment: TOML files + environment)
//! - [`context`] - an owned state + model registry with start/exit lifecycle
//! - [`logging`] - one-time logger setup

pub mod config;
pub mod context;
pub mod logging;

pub use config::{AppConfig, ConfigError};
pub use context::{Context, ContextError, SettingChange};
