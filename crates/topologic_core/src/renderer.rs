//! Renderer interface
//!
//! A renderer draws one model at a fixed depth and render depth. Renderers
//! are owned by the [`DimensionState`] they draw (see
//! [`DimensionState::install_renderer`]) and get the state handed to them for
//! every frame instead of keeping a reference to it.

use crate::{CoordinateFormat, DimensionState, Frame, ModelDeclaration};

/// A model bound to an output format
pub trait Renderer {
    /// Number of dimensions the model is defined in
    fn depth(&self) -> usize;

    /// Number of dimensions the model is carried through before flattening
    fn render_depth(&self) -> usize;

    /// Model type id, e.g. `"cube"`
    fn id(&self) -> &str;

    /// Vector format the model is generated in
    fn format(&self) -> CoordinateFormat;

    /// Human readable name, `"<depth>-<id>"`
    fn name(&self) -> String {
        format!("{}-{}", self.depth(), self.id())
    }

    /// The id/depth/render-depth/format quadruple
    fn declaration(&self) -> ModelDeclaration {
        ModelDeclaration {
            id: self.id().to_string(),
            depth: self.depth(),
            render_depth: self.render_depth(),
            format: self.format(),
        }
    }

    /// Produce a frame
    ///
    /// If `update_matrix` is set, the state's projections are refreshed first.
    fn frame(&mut self, state: &mut DimensionState, update_matrix: bool) -> Frame;
}
