//! n-dimensional Mathematics Library
//!
//! This crate provides the geometric primitives the Topologic renderers build on.
//!
//! ## Core Types
//!
//! - [`VecN`] - vector with a runtime number of components
//! - [`MatN`] - square matrix
//! - [`Transformation`] - affine transformation of d-space as a (d+1)x(d+1) matrix
//! - [`PerspectiveProjection`] - perspective projection from d-space to (d-1)-space
//! - [`Rgba`] - colour with red, green, blue and alpha in [0, 1]
//!
//! Polar (hyperspherical) coordinates are handled by the [`polar`] module.

mod vecn;
pub mod matn;
pub mod polar;
pub mod projection;
pub mod colour;

pub use vecn::VecN;
pub use matn::{MatN, Transformation};
pub use projection::PerspectiveProjection;
pub use colour::Rgba;
