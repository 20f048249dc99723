//! Decoding attribute-tree metadata
//!
//! [`decode`] walks the state's dimensions from the highest down. For each
//! dimension `d` it applies:
//!
//! - `camera` elements with exactly `d` attributes: `radius` and `theta-i`
//!   set the polar camera, axis letters (or `d-i`) set the cartesian one;
//! - `transformation` elements with `depth='d'` and `matrix='identity'`, and
//!   `transformation` elements with exactly `(d+1)²` attributes `e<i>-<j>`.
//!
//! Elements are applied in document order, so later ones win. The
//! dimension-independent options are applied once, after every dimension.
//! A value that doesn't parse is logged and skipped; everything else in the
//! document is still applied.

use topologic_core::{axis_name, CoordinateFormat, DimensionState, Rgba, Transformation, MIN_DEPTH};
use topologic_render::ModelRegistry;

use crate::document::{Element, XmlMetadata};

fn number(element: &str, attribute: &str, text: &str) -> Option<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("skipping {}/@{}: '{}' is not a number", element, attribute, text);
            None
        }
    }
}

/// Leading decimal digits, e.g. `"4D"` -> 4
fn leading_int(text: &str) -> Option<usize> {
    let text = text.trim_start();
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    text[..end].parse().ok()
}

/// Parse the first `element` carrying `attribute`
fn scalar(document: &XmlMetadata, element: &str, attribute: &str) -> Option<f64> {
    document
        .evaluate(element, attribute)
        .and_then(|text| number(element, attribute, text))
}

/// Parse the first `element` carrying `attribute` as a count or seed
///
/// Integers are read exactly; other numbers, e.g. `"4.0"`, are truncated.
fn unsigned(document: &XmlMetadata, element: &str, attribute: &str) -> Option<u64> {
    let text = document.evaluate(element, attribute)?;
    match text.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => number(element, attribute, text).map(|value| value as u64),
    }
}

fn count(document: &XmlMetadata, element: &str, attribute: &str) -> Option<u32> {
    unsigned(document, element, attribute).map(|value| u32::try_from(value).unwrap_or(u32::MAX))
}

fn flag(document: &XmlMetadata, element: &str, attribute: &str) -> Option<bool> {
    document.evaluate(element, attribute).map(|text| text == "yes")
}

fn decode_camera(state: &mut DimensionState, depth: usize, element: &Element) {
    let Some(camera) = state.camera_mut(depth) else {
        return;
    };
    for i in 0..depth {
        if i == 0 {
            if let Some(text) = element.attribute("radius") {
                if let Some(value) = number("camera", "radius", text) {
                    camera.fromp[0] = value;
                }
                continue;
            }
        }

        let theta = format!("theta-{}", i);
        if let Some(text) = element.attribute(&theta) {
            if let Some(value) = number("camera", &theta, text) {
                camera.fromp[i] = value;
            }
            continue;
        }

        let axis = axis_name(i);
        if let Some(text) = element.attribute(&axis) {
            if let Some(value) = number("camera", &axis, text) {
                camera.from_mut()[i] = value;
            }
        }
    }
}

fn decode_transformation(state: &mut DimensionState, depth: usize, element: &Element) {
    let Some(transformation) = state.transformation_mut(depth) else {
        return;
    };

    let scoped = element
        .attribute("depth")
        .map_or(false, |d| d.trim().parse::<usize>().ok() == Some(depth));
    if scoped {
        if element.attribute("matrix") == Some("identity") {
            *transformation = Transformation::identity(depth);
        }
        return;
    }

    if element.attribute_count() != (depth + 1) * (depth + 1) {
        return;
    }
    for i in 0..=depth {
        for j in 0..=depth {
            let key = format!("e{}-{}", i, j);
            if let Some(value) = element.attribute(&key).and_then(|text| number("transformation", &key, text)) {
                transformation.matrix_mut().set(i, j, value);
            }
        }
    }
}

fn decode_colour(document: &XmlMetadata, name: &str, colour: &mut Rgba) {
    let element = format!("colour-{}", name);
    if let Some(v) = scalar(document, &element, "red") {
        colour.red = v;
    }
    if let Some(v) = scalar(document, &element, "green") {
        colour.green = v;
    }
    if let Some(v) = scalar(document, &element, "blue") {
        colour.blue = v;
    }
    if let Some(v) = scalar(document, &element, "alpha") {
        colour.alpha = v;
    }
}

fn decode_options(state: &mut DimensionState, document: &XmlMetadata) {
    let p = &mut state.parameters;
    if let Some(v) = scalar(document, "precision", "polar") {
        p.precision = v;
    }
    if let Some(v) = scalar(document, "options", "radius") {
        p.radius = v;
    }
    if let Some(v) = scalar(document, "options", "minor-radius") {
        p.minor_radius = v;
    }
    if let Some(v) = scalar(document, "options", "constant") {
        p.constant = v;
    }
    if let Some(v) = unsigned(document, "options", "vertex-limit") {
        p.vertex_limit = usize::try_from(v).unwrap_or(usize::MAX);
    }
    if let Some(v) = count(document, "ifs", "iterations") {
        p.iterations = v;
    }
    if let Some(v) = unsigned(document, "ifs", "seed") {
        p.seed = v;
    }
    if let Some(v) = count(document, "ifs", "functions") {
        p.functions = v;
    }
    if let Some(v) = flag(document, "ifs", "pre-rotate") {
        p.pre_rotate = v;
    }
    if let Some(v) = flag(document, "ifs", "post-rotate") {
        p.post_rotate = v;
    }
    if let Some(v) = count(document, "flame", "coefficients") {
        p.flame_coefficients = v;
    }

    if let Some(v) = scalar(document, "precision", "export-multiplier") {
        state.export_multiplier = v;
    }
    if let Some(prefix) = document.evaluate("options", "id-prefix") {
        state.id_prefix = prefix.to_string();
    }
    if let Some(mode) = document.evaluate("camera", "mode") {
        state.polar_coordinates = mode == "polar";
    }

    decode_colour(document, "background", &mut state.background);
    decode_colour(document, "wireframe", &mut state.wireframe);
    decode_colour(document, "surface", &mut state.surface);
}

/// Apply a document's metadata to `state`
///
/// Returns false, leaving the state untouched, if the document is invalid.
pub fn decode(state: &mut DimensionState, document: &XmlMetadata) -> bool {
    if !document.is_valid() {
        return false;
    }

    for depth in (MIN_DEPTH..=state.max_depth()).rev() {
        for element in document.elements("camera") {
            if element.attribute_count() == depth {
                decode_camera(state, depth, element);
            }
        }
        for element in document.elements("transformation") {
            decode_transformation(state, depth, element);
        }
    }

    decode_options(state, document);
    true
}

/// Resolve the model a document declares and install its renderer
///
/// Reads the first `model` element with both `type` and `depth`. A missing
/// or zero `render-depth` falls back to the registry's default for the type.
pub fn decode_model(state: &mut DimensionState, document: &XmlMetadata, registry: &ModelRegistry) -> bool {
    if !document.is_valid() {
        return false;
    }

    let format = match document.evaluate("coordinates", "format") {
        Some(text) => match text.parse::<CoordinateFormat>() {
            Ok(format) => format,
            Err(e) => {
                log::warn!("{}", e);
                return false;
            }
        },
        None => CoordinateFormat::Cartesian,
    };

    let Some(model) = document
        .elements("model")
        .find(|e| e.attribute("type").is_some() && e.attribute("depth").is_some())
    else {
        return false;
    };
    let id = model.attribute("type").unwrap_or_default();
    let Some(depth) = model.attribute("depth").and_then(leading_int) else {
        log::warn!("skipping model {}: unreadable depth", id);
        return false;
    };
    let render_depth = match model.attribute("render-depth").and_then(leading_int) {
        Some(0) | None => registry.default_render_depth(id, depth),
        Some(render_depth) => render_depth,
    };

    registry.resolve(state, format, id, depth, render_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use topologic_render::OutputMode;

    const EPSILON: f64 = 1e-9;

    fn document(body: &str) -> XmlMetadata {
        XmlMetadata::parse(&format!(
            "<svg xmlns='http://www.w3.org/2000/svg'><metadata xmlns:t='http://ef.gy/2012/topologic'>{}</metadata></svg>",
            body
        ))
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("4D"), Some(4));
        assert_eq!(leading_int(" 12"), Some(12));
        assert_eq!(leading_int("D4"), None);
    }

    #[test]
    fn test_invalid_document_changes_nothing() {
        let mut state = DimensionState::new();
        let doc = XmlMetadata::parse("<options radius='4'/>");
        assert!(!decode(&mut state, &doc));
        assert_eq!(state.parameters.radius, 1.0);
    }

    #[test]
    fn test_polar_camera() {
        let mut state = DimensionState::with_max_depth(4);
        let doc = document("<t:camera radius='5' theta-1='0.5' theta-2='0.25' theta-3='0.125'/>");
        assert!(decode(&mut state, &doc));
        let camera = state.camera(4).expect("4D camera");
        assert_eq!(camera.fromp.as_slice(), &[5.0, 0.5, 0.25, 0.125]);
        // A 3D camera has three attributes, so it is untouched
        assert_eq!(state.camera(3).map(|c| c.fromp[0]), Some(3.0));
    }

    #[test]
    fn test_cartesian_camera() {
        let mut state = DimensionState::with_max_depth(4);
        let doc = document("<t:camera x='1' y='2' z='3'/>");
        assert!(decode(&mut state, &doc));
        assert_eq!(state.camera(3).map(|c| c.from().as_slice().to_vec()), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_later_camera_wins() {
        let mut state = DimensionState::with_max_depth(3);
        let doc = document("<t:camera x='1' y='2' z='3'/><t:camera x='4' y='5' z='6'/>");
        assert!(decode(&mut state, &doc));
        assert_eq!(state.camera(3).map(|c| c.from()[0]), Some(4.0));
    }

    #[test]
    fn test_identity_resets_matrix() {
        let mut state = DimensionState::with_max_depth(4);
        if let Some(t) = state.transformation_mut(4) {
            t.matrix_mut().set(0, 1, 0.5);
        }
        let doc = document("<t:transformation depth='4' matrix='identity'/>");
        assert!(decode(&mut state, &doc));
        let matrix = state.transformation(4).map(|t| t.matrix().clone()).expect("4D");
        assert_eq!(matrix.size(), 5);
        assert!(matrix.is_identity(EPSILON));
    }

    #[test]
    fn test_matrix_cells() {
        let mut state = DimensionState::with_max_depth(3);
        let mut cells = String::new();
        for i in 0..3 {
            for j in 0..3 {
                cells.push_str(&format!(" e{}-{}='{}'", i, j, i * 3 + j));
            }
        }
        let doc = document(&format!("<t:transformation{}/>", cells));
        assert!(decode(&mut state, &doc));
        let t = state.transformation(2).expect("2D");
        assert_eq!(t.matrix().get(1, 2), 5.0);
        // 9 attributes don't fit the 3D matrix
        assert!(state.transformation(3).map_or(false, |t| t.matrix().is_identity(EPSILON)));
    }

    #[test]
    fn test_malformed_value_is_isolated() {
        let mut state = DimensionState::new();
        let doc = document(
            "<t:options radius='abc' constant='0.5'/>\
             <t:colour-surface red='0.25' green='x' blue='0.75' alpha='1'/>",
        );
        assert!(decode(&mut state, &doc));
        assert_eq!(state.parameters.radius, 1.0);
        assert_eq!(state.parameters.constant, 0.5);
        assert_eq!(state.surface, Rgba::new(0.25, 1.0, 0.75, 1.0));
    }

    #[test]
    fn test_options() {
        let mut state = DimensionState::new();
        let doc = document(
            "<t:camera mode='cartesian'/>\
             <t:precision polar='20' export-multiplier='1.5'/>\
             <t:ifs iterations='6' seed='9' functions='4.0' pre-rotate='no' post-rotate='yes'/>\
             <t:flame coefficients='5'/>\
             <t:options id-prefix='p-' vertex-limit='500'/>",
        );
        assert!(decode(&mut state, &doc));
        assert!(!state.polar_coordinates);
        assert_eq!(state.parameters.precision, 20.0);
        assert_eq!(state.export_multiplier, 1.5);
        assert_eq!(state.parameters.iterations, 6);
        assert_eq!(state.parameters.seed, 9);
        assert_eq!(state.parameters.functions, 4);
        assert!(!state.parameters.pre_rotate);
        assert!(state.parameters.post_rotate);
        assert_eq!(state.parameters.flame_coefficients, 5);
        assert_eq!(state.parameters.vertex_limit, 500);
        assert_eq!(state.id_prefix, "p-");
    }

    #[test]
    fn test_integers_are_exact() {
        let mut state = DimensionState::new();
        let doc = document("<t:ifs seed='18446744073709551615' iterations='1e12' functions=' 7'/>");
        assert!(decode(&mut state, &doc));
        assert_eq!(state.parameters.seed, u64::MAX);
        assert_eq!(state.parameters.iterations, u32::MAX);
        assert_eq!(state.parameters.functions, 7);
    }

    #[test]
    fn test_decode_model() {
        let registry = ModelRegistry::standard(OutputMode::Vector);
        let mut state = DimensionState::new();
        let doc = document("<t:model type='sphere' depth='3D'/>");
        assert!(decode_model(&mut state, &doc, &registry));
        let declaration = state.renderer().map(|r| r.declaration()).expect("renderer");
        assert_eq!((declaration.depth, declaration.render_depth), (3, 4));
    }

    #[test]
    fn test_decode_model_format() {
        let registry = ModelRegistry::standard(OutputMode::Vector);
        let mut state = DimensionState::new();
        let doc = document("<t:coordinates format='polar'/><t:model type='sphere' depth='2D' render-depth='5D'/>");
        assert!(decode_model(&mut state, &doc, &registry));
        assert_eq!(state.renderer().map(|r| r.format()), Some(CoordinateFormat::Polar));
        assert_eq!(state.renderer().map(|r| r.render_depth()), Some(5));

        let doc = document("<t:coordinates format='spherical'/><t:model type='cube' depth='3'/>");
        assert!(!decode_model(&mut state, &doc, &registry));
        assert_eq!(state.renderer().map(|r| r.id().to_string()), Some("sphere".to_string()));
    }

    #[test]
    fn test_decode_model_without_model() {
        let registry = ModelRegistry::standard(OutputMode::Vector);
        let mut state = DimensionState::new();
        assert!(!decode_model(&mut state, &document("<t:model type='cube'/>"), &registry));
        assert!(state.renderer().is_none());
    }
}
