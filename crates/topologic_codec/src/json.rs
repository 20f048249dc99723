//! Decoding value-tree metadata
//!
//! The value tree is a JSON object. `camera` holds one coordinate array per
//! dimension and `transformation` one flattened row-major matrix per
//! dimension; each array is matched to a dimension by its length. `polar`
//! says whether camera arrays are polar or cartesian coordinates. Colours are
//! five-element arrays whose first element is a tag and whose remaining four
//! are red, green, blue and alpha.
//!
//! Fields of the wrong type are logged and skipped.

use serde_json::Value;
use topologic_core::{CoordinateFormat, DimensionState, Rgba, MIN_DEPTH};
use topologic_render::ModelRegistry;

const DEFAULT_MODEL: &str = "cube";
const DEFAULT_DEPTH: usize = 4;

fn number(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::Null => None,
        other => {
            log::warn!("skipping {}: {} is not a number", key, other);
            None
        }
    }
}

/// A count or seed; integers are read exactly, other numbers truncated
fn unsigned(value: &Value, key: &str) -> Option<u64> {
    match value.get(key).and_then(Value::as_u64) {
        Some(v) => Some(v),
        None => number(value, key).map(|v| v as u64),
    }
}

fn count(value: &Value, key: &str) -> Option<u32> {
    unsigned(value, key).map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

fn boolean(value: &Value, key: &str) -> Option<bool> {
    match value.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::Null => None,
        other => {
            log::warn!("skipping {}: {} is not a boolean", key, other);
            None
        }
    }
}

fn decode_colour(value: &Value, key: &str, colour: &mut Rgba) {
    let Some(channels) = value.get(key).and_then(Value::as_array) else {
        return;
    };
    let numbers: Vec<f64> = channels.iter().skip(1).take(4).filter_map(Value::as_f64).collect();
    if channels.len() < 5 || numbers.len() != 4 {
        log::warn!("skipping {}: expected a tag and four channels", key);
        return;
    }
    *colour = Rgba::new(numbers[0], numbers[1], numbers[2], numbers[3]);
}

fn decode_dimension(state: &mut DimensionState, value: &Value, depth: usize, polar: bool) {
    if let (Some(cameras), Some(camera)) = (
        value.get("camera").and_then(Value::as_array),
        state.camera_mut(depth),
    ) {
        for coordinates in cameras.iter().filter_map(Value::as_array).filter(|c| c.len() == depth) {
            for (i, c) in coordinates.iter().enumerate() {
                if let Some(c) = c.as_f64() {
                    if polar {
                        camera.fromp[i] = c;
                    } else {
                        camera.from_mut()[i] = c;
                    }
                }
            }
        }
    }

    let size = depth + 1;
    if let (Some(matrices), Some(transformation)) = (
        value.get("transformation").and_then(Value::as_array),
        state.transformation_mut(depth),
    ) {
        for cells in matrices.iter().filter_map(Value::as_array).filter(|m| m.len() == size * size) {
            for (k, cell) in cells.iter().enumerate() {
                if let Some(cell) = cell.as_f64() {
                    transformation.matrix_mut().set(k / size, k % size, cell);
                }
            }
        }
    }
}

/// Apply a value tree's metadata to `state`
///
/// Returns false, leaving the state untouched, if `value` is not an object.
pub fn decode(state: &mut DimensionState, value: &Value) -> bool {
    if !value.is_object() {
        return false;
    }

    let polar = boolean(value, "polar");
    for depth in (MIN_DEPTH..=state.max_depth()).rev() {
        decode_dimension(state, value, depth, polar.unwrap_or(false));
    }

    if let Some(polar) = polar {
        state.polar_coordinates = polar;
    }

    let p = &mut state.parameters;
    if let Some(v) = number(value, "radius") {
        p.radius = v;
    }
    if let Some(v) = number(value, "minorRadius") {
        p.minor_radius = v;
    }
    if let Some(v) = number(value, "constant") {
        p.constant = v;
    }
    if let Some(v) = number(value, "precision") {
        p.precision = v;
    }
    if let Some(v) = count(value, "iterations") {
        p.iterations = v;
    }
    if let Some(v) = unsigned(value, "seed") {
        p.seed = v;
    }
    if let Some(v) = count(value, "functions") {
        p.functions = v;
    }
    if let Some(v) = count(value, "flameCoefficients") {
        p.flame_coefficients = v;
    }
    if let Some(v) = unsigned(value, "vertexLimit") {
        p.vertex_limit = usize::try_from(v).unwrap_or(usize::MAX);
    }
    if let Some(v) = boolean(value, "preRotate") {
        p.pre_rotate = v;
    }
    if let Some(v) = boolean(value, "postRotate") {
        p.post_rotate = v;
    }

    if let Some(v) = number(value, "exportMultiplier") {
        state.export_multiplier = v;
    }
    if let Some(prefix) = value.get("idPrefix").and_then(Value::as_str) {
        state.id_prefix = prefix.to_string();
    }

    decode_colour(value, "background", &mut state.background);
    decode_colour(value, "wireframe", &mut state.wireframe);
    decode_colour(value, "surface", &mut state.surface);
    true
}

/// Resolve the model a value tree declares and install its renderer
///
/// Missing fields default to a cartesian 4-cube rendered in 4D.
pub fn decode_model(state: &mut DimensionState, value: &Value, registry: &ModelRegistry) -> bool {
    if !value.is_object() {
        return false;
    }

    let format = match value.get("coordinateFormat").and_then(Value::as_str) {
        Some(text) => match text.parse::<CoordinateFormat>() {
            Ok(format) => format,
            Err(e) => {
                log::warn!("{}", e);
                return false;
            }
        },
        None => CoordinateFormat::Cartesian,
    };
    let id = value.get("model").and_then(Value::as_str).unwrap_or(DEFAULT_MODEL);
    let depth = number(value, "depth").map_or(DEFAULT_DEPTH, |d| d as usize);
    let render_depth = number(value, "renderDepth").map_or(DEFAULT_DEPTH, |d| d as usize);

    registry.resolve(state, format, id, depth, render_depth)
}
