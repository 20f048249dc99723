//! Core types for Topologic
//!
//! This crate provides the state that a scene is rendered and reproduced from:
//!
//! - [`DimensionState`] - per-dimension cameras and transformations, plus the
//!   shared options and the active [`Renderer`]
//! - [`Parameters`] - model generation parameters (precision, radius, IFS settings, ...)
//! - [`Renderer`] - interface implemented by the vector and raster renderers
//! - [`Frame`] / [`DrawCommand`] - what a renderer produces
//! - [`ModelDeclaration`] - the id/depth/render-depth/format of a bound model
//!
//! Encoding a state back to metadata lives in the [`metadata`] module; decoding
//! is done by the `topologic_codec` crate.

mod state;
mod parameters;
mod model;
mod renderer;
mod frame;
pub mod metadata;

pub use state::{DimensionState, Dimension, Camera, axis_name, CARTESIAN_AXES, MAX_DEPTH, MIN_DEPTH};
pub use parameters::Parameters;
pub use model::{CoordinateFormat, ModelDeclaration, UnknownFormat};
pub use renderer::Renderer;
pub use frame::{Frame, DrawCommand, RasterVertex, Material};
pub use metadata::TOPOLOGIC_NAMESPACE;

// Re-export commonly used types from topologic_math for convenience
pub use topologic_math::{VecN, MatN, Transformation, PerspectiveProjection, Rgba};
