//! Metadata encoding
//!
//! A [`DimensionState`] encodes to two vocabularies:
//!
//! - an attribute tree of elements in the [`TOPOLOGIC_NAMESPACE`] (written with
//!   the `t:` prefix), embedded in vector documents;
//! - a JSON value tree keyed by fixed field names.
//!
//! Both are read back by the `topologic_codec` crate. Per-dimension fragments are
//! written from the highest dimension down, followed by the dimension-independent
//! options.

use std::fmt::Write;

use quick_xml::escape::escape;
use serde_json::{json, Map, Value};
use topologic_math::{MatN, Rgba};

use crate::state::axis_name;
use crate::{DimensionState, ModelDeclaration};

/// Namespace URI of Topologic metadata elements
pub const TOPOLOGIC_NAMESPACE: &str = "http://ef.gy/2012/topologic";

/// Escape text for use inside a quoted attribute value
pub fn escape_attribute(raw: &str) -> String {
    escape(raw).into_owned()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn colour_element(out: &mut String, name: &str, colour: &Rgba) {
    let _ = write!(
        out,
        "<t:colour-{} red='{}' green='{}' blue='{}' alpha='{}'/>",
        name, colour.red, colour.green, colour.blue, colour.alpha
    );
}

fn colour_value(colour: &Rgba) -> Value {
    json!(["rgba", colour.red, colour.green, colour.blue, colour.alpha])
}

fn transformation_element(out: &mut String, depth: usize, matrix: &MatN) {
    // Only an exact identity is abbreviated
    if matrix.is_identity(0.0) {
        let _ = write!(out, "<t:transformation depth='{}' matrix='identity'/>", depth);
        return;
    }

    out.push_str("<t:transformation");
    for i in 0..matrix.size() {
        for j in 0..matrix.size() {
            let _ = write!(out, " e{}-{}='{}'", i, j, matrix.get(i, j));
        }
    }
    out.push_str("/>");
}

impl DimensionState {
    /// Encode the state, including the active renderer's declaration
    pub fn describe(&self) -> String {
        let declaration = self.renderer().map(|r| r.declaration());
        self.describe_with(declaration.as_ref())
    }

    /// Encode the state with an explicit model declaration
    ///
    /// Renderers use this while drawing, when they are not reachable through
    /// [`DimensionState::renderer`].
    pub fn describe_with(&self, model: Option<&ModelDeclaration>) -> String {
        let mut out = String::new();

        for dimension in self.dimensions() {
            if let Some(camera) = &dimension.camera {
                out.push_str("<t:camera");
                if self.polar_coordinates {
                    let _ = write!(out, " radius='{}'", camera.fromp[0]);
                    for i in 1..camera.depth() {
                        let _ = write!(out, " theta-{}='{}'", i, camera.fromp[i]);
                    }
                } else {
                    for i in 0..camera.depth() {
                        let _ = write!(out, " {}='{}'", axis_name(i), camera.from()[i]);
                    }
                }
                out.push_str("/>");
            }
            transformation_element(&mut out, dimension.depth(), dimension.transformation.matrix());
        }

        self.describe_base(&mut out, model);
        out
    }

    fn describe_base(&self, out: &mut String, model: Option<&ModelDeclaration>) {
        let p = &self.parameters;

        let _ = write!(
            out,
            "<t:camera mode='{}'/>",
            if self.polar_coordinates { "polar" } else { "cartesian" }
        );
        if let Some(model) = model {
            let _ = write!(
                out,
                "<t:coordinates format='{}'/><t:model type='{}' depth='{}D' render-depth='{}D'/>",
                model.format,
                escape(model.id.as_str()),
                model.depth,
                model.render_depth
            );
        }
        let _ = write!(
            out,
            "<t:options radius='{}' minor-radius='{}' constant='{}' vertex-limit='{}' id-prefix='{}'/>",
            p.radius,
            p.minor_radius,
            p.constant,
            p.vertex_limit,
            escape(self.id_prefix.as_str())
        );
        let _ = write!(
            out,
            "<t:precision polar='{}' export-multiplier='{}'/>",
            p.precision, self.export_multiplier
        );
        let _ = write!(
            out,
            "<t:ifs iterations='{}' seed='{}' functions='{}' pre-rotate='{}' post-rotate='{}'/>",
            p.iterations,
            p.seed,
            p.functions,
            yes_no(p.pre_rotate),
            yes_no(p.post_rotate)
        );
        let _ = write!(out, "<t:flame coefficients='{}'/>", p.flame_coefficients);

        colour_element(out, "background", &self.background);
        colour_element(out, "wireframe", &self.wireframe);
        colour_element(out, "surface", &self.surface);
    }

    /// Encode the state as a JSON value tree
    pub fn to_json(&self) -> Value {
        let p = &self.parameters;

        let cameras: Vec<Value> = self
            .dimensions()
            .filter_map(|d| d.camera.as_ref())
            .map(|c| {
                let coordinates = if self.polar_coordinates { &c.fromp } else { c.from() };
                json!(coordinates.as_slice())
            })
            .collect();

        let transformations: Vec<Value> = self
            .dimensions()
            .map(|d| json!(d.transformation.matrix().as_slice()))
            .collect();

        let mut map = Map::new();
        map.insert("polar".into(), json!(self.polar_coordinates));
        map.insert("camera".into(), Value::Array(cameras));
        map.insert("transformation".into(), Value::Array(transformations));
        map.insert("radius".into(), json!(p.radius));
        map.insert("minorRadius".into(), json!(p.minor_radius));
        map.insert("constant".into(), json!(p.constant));
        map.insert("precision".into(), json!(p.precision));
        map.insert("iterations".into(), json!(p.iterations));
        map.insert("seed".into(), json!(p.seed));
        map.insert("functions".into(), json!(p.functions));
        map.insert("flameCoefficients".into(), json!(p.flame_coefficients));
        map.insert("preRotate".into(), json!(p.pre_rotate));
        map.insert("postRotate".into(), json!(p.post_rotate));
        map.insert("vertexLimit".into(), json!(p.vertex_limit));
        map.insert("exportMultiplier".into(), json!(self.export_multiplier));
        map.insert("idPrefix".into(), json!(self.id_prefix));
        map.insert("background".into(), colour_value(&self.background));
        map.insert("wireframe".into(), colour_value(&self.wireframe));
        map.insert("surface".into(), colour_value(&self.surface));

        if let Some(model) = self.renderer().map(|r| r.declaration()) {
            map.insert("coordinateFormat".into(), json!(model.format.as_str()));
            map.insert("model".into(), json!(model.id));
            map.insert("depth".into(), json!(model.depth));
            map.insert("renderDepth".into(), json!(model.render_depth));
        }

        Value::Object(map)
    }
}
