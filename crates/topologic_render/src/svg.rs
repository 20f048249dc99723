//! Vector renderer
//!
//! Produces a self-contained SVG document per frame: the state's metadata
//! embedded in a `<metadata>` element, a style block derived from the state's
//! colours, one filled path per face, then a single wireframe path holding
//! every face outline.

use std::fmt::Write;

use topologic_core::metadata::escape_attribute;
use topologic_core::{
    CoordinateFormat, DimensionState, Frame, ModelDeclaration, Renderer, Rgba, VecN, TOPOLOGIC_NAMESPACE,
};

use crate::models::{BoundModel, Generator};
use crate::projection::project_mesh;

/// Half-extent of the document's view box
const VIEW_EXTENT: f64 = 1.2;

/// Renders a model to SVG documents
pub struct VectorRenderer {
    model: BoundModel,
}

impl VectorRenderer {
    pub fn new(declaration: ModelDeclaration, generate: Generator) -> Self {
        Self {
            model: BoundModel::new(declaration, generate),
        }
    }
}

/// CSS colour: channels as percentages, alpha as is
fn css_colour(colour: &Rgba) -> String {
    format!(
        "rgba({:.2}%, {:.2}%, {:.2}%, {})",
        colour.red * 100.0,
        colour.green * 100.0,
        colour.blue * 100.0,
        colour.alpha
    )
}

/// Path data for a closed polygon, y pointing up
fn polygon(out: &mut String, face: &[VecN]) {
    for (i, p) in face.iter().enumerate() {
        let _ = write!(
            out,
            "{}{:.5},{:.5} ",
            if i == 0 { "M " } else { "L " },
            p[0],
            -p[1]
        );
    }
    out.push('Z');
}

fn document(state: &DimensionState, declaration: &ModelDeclaration, faces: &[Vec<VecN>]) -> String {
    let prefix = escape_attribute(&state.id_prefix);
    let mut out = String::new();

    let _ = write!(
        out,
        "<?xml version='1.0' encoding='utf-8'?>\
         <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink' \
         version='1.1' width='100%' height='100%' viewBox='{} {} {} {}'>\
         <title>{}-{}</title>\
         <metadata xmlns:t='{}'>{}</metadata>",
        -VIEW_EXTENT,
        -VIEW_EXTENT,
        2.0 * VIEW_EXTENT,
        2.0 * VIEW_EXTENT,
        declaration.depth,
        escape_attribute(&declaration.id),
        TOPOLOGIC_NAMESPACE,
        state.describe_with(Some(declaration)),
    );

    let _ = write!(
        out,
        "<style type='text/css'>svg {{ background: {}; }} \
         path#{}wireframe {{ stroke-width: 0.002; fill: none; stroke: {}; }} \
         path {{ stroke: none; fill: {}; }}</style>",
        css_colour(&state.background),
        prefix,
        css_colour(&state.wireframe),
        css_colour(&state.surface),
    );

    for face in faces.iter().filter(|f| f.len() >= 2) {
        out.push_str("<path d='");
        polygon(&mut out, face);
        out.push_str("'/>");
    }

    let _ = write!(out, "<path id='{}wireframe' d='", prefix);
    for (i, face) in faces.iter().filter(|f| f.len() >= 2).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        polygon(&mut out, face);
    }
    out.push_str("'/></svg>\n");
    out
}

impl Renderer for VectorRenderer {
    fn depth(&self) -> usize {
        self.model.declaration().depth
    }

    fn render_depth(&self) -> usize {
        self.model.declaration().render_depth
    }

    fn id(&self) -> &str {
        &self.model.declaration().id
    }

    fn format(&self) -> CoordinateFormat {
        self.model.declaration().format
    }

    fn frame(&mut self, state: &mut DimensionState, update_matrix: bool) -> Frame {
        if update_matrix {
            state.refresh();
        }

        let declaration = self.model.declaration().clone();
        let mesh = self.model.mesh(&state.parameters, state.export_multiplier);
        let faces = project_mesh(state, mesh, declaration.render_depth, 2);
        Frame::Vector(document(state, &declaration, &faces))
    }
}
