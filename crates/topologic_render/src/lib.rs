//! Renderers and model dispatch for Topologic
//!
//! ## Key Components
//!
//! - [`models`] - mesh generators for every built-in model type
//! - [`svg::VectorRenderer`] - renders a model to self-contained SVG documents
//! - [`raster::RasterRenderer`] - renders a model to immediate-mode drawing commands
//! - [`registry::ModelRegistry`] - resolves a model request and installs a renderer
//!
//! Both renderers share the projection pipeline in [`projection`]: points are
//! carried from the render depth down through every dimension's
//! transformation and camera.

pub mod models;
pub mod projection;
pub mod svg;
pub mod raster;
pub mod registry;

pub use models::{Generation, Generator, Mesh};
pub use raster::{replay, GraphicsContext, RasterRenderer, RecordingContext};
pub use registry::{ModelEntry, ModelRegistry, ModelTraits, OutputMode};
pub use svg::VectorRenderer;
