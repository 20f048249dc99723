//! Metadata decoding for Topologic
//!
//! Two independent codecs restore a [`DimensionState`](topologic_core::DimensionState)
//! from saved metadata:
//!
//! - [`xml`] - the attribute tree embedded in vector documents, read through
//!   an [`XmlMetadata`] document
//! - [`json`] - the value tree produced by `DimensionState::to_json`
//!
//! Each codec has a `decode` entry point for cameras, transformations and
//! options, and a separate `decode_model` entry point that resolves the
//! declared model through a [`ModelRegistry`](topologic_render::ModelRegistry).
//! Encoding lives with the state, in `topologic_core::metadata`.

pub mod document;
pub mod json;
pub mod xml;

pub use document::{DocumentError, Element, XmlMetadata};
