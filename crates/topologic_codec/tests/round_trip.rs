//! Integration tests for metadata round trips
//!
//! A state encoded to either vocabulary and decoded into a fresh state must
//! come back with the same cameras, transformations and options. Documents
//! written by the vector renderer must also reproduce the model they were
//! drawn from.

use topologic_codec::{json, xml, XmlMetadata};
use topologic_core::{CoordinateFormat, DimensionState, Frame, Rgba, Transformation, VecN};
use topologic_render::{ModelRegistry, OutputMode};

const EPSILON: f64 = 1e-12;

/// A state with every field moved away from its default
fn customised_state() -> DimensionState {
    let mut state = DimensionState::new();
    for depth in 3..=state.max_depth() {
        if let Some(camera) = state.camera_mut(depth) {
            camera.fromp[0] = depth as f64 + 0.5;
            for i in 1..depth {
                camera.fromp[i] = 0.1 * i as f64;
            }
        }
    }
    if let Some(t) = state.transformation_mut(4) {
        *t = Transformation::plane_rotation(4, 0.3, 0, 3).then(&Transformation::scale(4, 1.5));
    }
    if let Some(t) = state.transformation_mut(2) {
        *t = Transformation::translation(2, &VecN::from_slice(&[0.25, -0.75]));
    }

    let p = &mut state.parameters;
    p.radius = 1.75;
    p.minor_radius = 0.3;
    p.constant = 0.8;
    p.precision = 6.0;
    p.iterations = 3;
    p.seed = 1234;
    p.functions = 4;
    p.flame_coefficients = 2;
    p.pre_rotate = false;
    p.post_rotate = true;
    p.vertex_limit = 5000;

    state.export_multiplier = 1.5;
    state.id_prefix = "fig-1-".to_string();
    state.background = Rgba::new(0.1, 0.2, 0.3, 1.0);
    state.wireframe = Rgba::new(0.9, 0.8, 0.7, 0.5);
    state.surface = Rgba::new(0.4, 0.5, 0.6, 0.25);
    state
}

fn assert_same_state(a: &DimensionState, b: &DimensionState) {
    assert_eq!(a.polar_coordinates, b.polar_coordinates);
    for depth in 2..=a.max_depth() {
        if let (Some(ca), Some(cb)) = (a.camera(depth), b.camera(depth)) {
            if a.polar_coordinates {
                assert!(ca.fromp.approx_eq(&cb.fromp, EPSILON), "polar camera {}", depth);
            } else {
                assert!(ca.from().approx_eq(cb.from(), EPSILON), "cartesian camera {}", depth);
            }
        }
        assert_eq!(
            a.transformation(depth).map(|t| t.matrix().as_slice().to_vec()),
            b.transformation(depth).map(|t| t.matrix().as_slice().to_vec()),
            "transformation {}",
            depth
        );
    }
    assert_eq!(a.parameters, b.parameters);
    assert_eq!(a.export_multiplier, b.export_multiplier);
    assert_eq!(a.id_prefix, b.id_prefix);
    assert_eq!(a.background, b.background);
    assert_eq!(a.wireframe, b.wireframe);
    assert_eq!(a.surface, b.surface);
}

// ==================== Attribute Tree ====================

/// Polar state survives describe -> parse -> decode
#[test]
fn test_xml_round_trip_polar() {
    let original = customised_state();
    let text = format!(
        "<metadata xmlns:t='http://ef.gy/2012/topologic'>{}</metadata>",
        original.describe()
    );

    let document = XmlMetadata::parse(&text);
    assert!(document.is_valid());

    let mut decoded = DimensionState::new();
    decoded.polar_coordinates = false;
    assert!(xml::decode(&mut decoded, &document));
    assert_same_state(&original, &decoded);
}

/// Cartesian cameras survive the attribute tree
#[test]
fn test_xml_round_trip_cartesian() {
    let mut original = customised_state();
    original.refresh();
    original.polar_coordinates = false;
    if let Some(camera) = original.camera_mut(5) {
        camera.from_mut()[4] = -2.5;
    }
    let text = format!(
        "<metadata xmlns:t='http://ef.gy/2012/topologic'>{}</metadata>",
        original.describe()
    );

    let mut decoded = DimensionState::new();
    assert!(xml::decode(&mut decoded, &XmlMetadata::parse(&text)));
    assert!(!decoded.polar_coordinates);
    assert_same_state(&original, &decoded);
}

/// An identity element resets a transformation that was set before
#[test]
fn test_xml_identity_resets_matrix() {
    let mut state = DimensionState::with_max_depth(4);
    if let Some(t) = state.transformation_mut(4) {
        *t = Transformation::scale(4, 3.0);
    }
    let document = XmlMetadata::parse(
        "<t:transformation xmlns:t='http://ef.gy/2012/topologic' depth='4' matrix='identity'/>",
    );
    assert!(xml::decode(&mut state, &document));
    assert!(state.transformation(4).map_or(false, |t| t.matrix().is_identity(0.0)));
}

/// A malformed field is skipped and the rest of the document still applies
#[test]
fn test_xml_partial_failure() {
    let mut state = DimensionState::new();
    let document = XmlMetadata::parse(
        "<m xmlns:t='http://ef.gy/2012/topologic'>\
         <t:options radius='abc' minor-radius='0.125'/>\
         <t:ifs iterations='9'/>\
         </m>",
    );
    assert!(xml::decode(&mut state, &document));
    assert_eq!(state.parameters.radius, 1.0);
    assert_eq!(state.parameters.minor_radius, 0.125);
    assert_eq!(state.parameters.iterations, 9);
}

/// Invalid documents change nothing
#[test]
fn test_xml_invalid_document() {
    let mut state = DimensionState::new();
    let before = state.to_json();
    assert!(!xml::decode(&mut state, &XmlMetadata::parse("<t:options radius='3'")));
    assert_eq!(state.to_json(), before);
}

// ==================== Value Tree ====================

/// Polar state survives to_json -> decode
#[test]
fn test_json_round_trip_polar() {
    let original = customised_state();
    let mut decoded = DimensionState::new();
    decoded.polar_coordinates = false;
    assert!(json::decode(&mut decoded, &original.to_json()));
    assert_same_state(&original, &decoded);
}

/// Cartesian cameras survive the value tree, including through text
#[test]
fn test_json_round_trip_cartesian_text() {
    let mut original = customised_state();
    original.refresh();
    original.polar_coordinates = false;

    let text = serde_json::to_string(&original.to_json()).expect("serialise");
    let value: serde_json::Value = serde_json::from_str(&text).expect("parse");

    let mut decoded = DimensionState::new();
    assert!(json::decode(&mut decoded, &value));
    assert_same_state(&original, &decoded);
}

/// The value tree carries the bound model
#[test]
fn test_json_model_round_trip() {
    let registry = ModelRegistry::standard(OutputMode::Vector);
    let mut original = DimensionState::new();
    assert!(registry.resolve(&mut original, CoordinateFormat::Polar, "sphere", 3, 5));

    let mut decoded = DimensionState::new();
    assert!(json::decode_model(&mut decoded, &original.to_json(), &registry));
    assert_eq!(
        decoded.renderer().map(|r| r.declaration()),
        original.renderer().map(|r| r.declaration())
    );
}

// ==================== Integer Fields ====================

/// Seeds and limits beyond f64's exact integer range survive both trees
#[test]
fn test_large_integers_round_trip() {
    let mut original = customised_state();
    original.parameters.seed = (1 << 53) + 1;
    original.parameters.vertex_limit = usize::MAX - 2;

    let text = format!(
        "<metadata xmlns:t='http://ef.gy/2012/topologic'>{}</metadata>",
        original.describe()
    );
    let mut from_xml = DimensionState::new();
    assert!(xml::decode(&mut from_xml, &XmlMetadata::parse(&text)));
    assert_eq!(from_xml.parameters.seed, (1 << 53) + 1);
    assert_same_state(&original, &from_xml);

    let text = serde_json::to_string(&original.to_json()).expect("serialise");
    let value: serde_json::Value = serde_json::from_str(&text).expect("parse");
    let mut from_json = DimensionState::new();
    assert!(json::decode(&mut from_json, &value));
    assert_eq!(from_json.parameters.seed, (1 << 53) + 1);
    assert_same_state(&original, &from_json);
}

// ==================== Rendered Documents ====================

/// A rendered vector document reproduces its state and model
#[test]
fn test_rendered_document_reproduces_model() {
    let registry = ModelRegistry::standard(OutputMode::Vector);
    let mut original = customised_state();
    assert!(registry.resolve(&mut original, CoordinateFormat::Cartesian, "cube", 3, 5));

    let doc = match original.render(true) {
        Some(Frame::Vector(doc)) => doc,
        _ => panic!("expected a vector frame"),
    };

    let document = XmlMetadata::parse(&doc);
    let mut decoded = DimensionState::new();
    assert!(xml::decode(&mut decoded, &document));
    assert!(xml::decode_model(&mut decoded, &document, &registry));

    assert_same_state(&original, &decoded);
    let declaration = decoded.renderer().map(|r| r.declaration()).expect("renderer");
    assert_eq!(
        (declaration.id.as_str(), declaration.depth, declaration.render_depth),
        ("cube", 3, 5)
    );
    assert_eq!(declaration.format, CoordinateFormat::Cartesian);
}

/// An unknown model leaves the installed renderer in place
#[test]
fn test_unknown_model_keeps_renderer() {
    let registry = ModelRegistry::standard(OutputMode::Vector);
    let mut state = DimensionState::new();
    assert!(registry.resolve(&mut state, CoordinateFormat::Cartesian, "simplex", 4, 4));

    let document = XmlMetadata::parse(
        "<t:model xmlns:t='http://ef.gy/2012/topologic' type='teapot' depth='3D' render-depth='3D'/>",
    );
    assert!(!xml::decode_model(&mut state, &document, &registry));
    assert_eq!(state.renderer().map(|r| r.name()), Some("4-simplex".to_string()));
}
