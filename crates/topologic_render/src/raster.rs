//! Raster renderer
//!
//! Produces a frame as an ordered list of [`DrawCommand`]s for an
//! immediate-mode graphics context. When the model is rendered through 3D,
//! points are carried down to 3-space only and the 3D camera is handed to the
//! context as a look-at view; otherwise points are flattened to the plane.
//!
//! The wireframe is drawn before the solid pass, and depth writes are turned
//! off for a translucent solid pass, so surfaces never hide the wireframe.

use std::fmt::Write;

use topologic_core::{
    CoordinateFormat, DimensionState, DrawCommand, Frame, Material, ModelDeclaration, RasterVertex, Renderer, Rgba,
    VecN,
};

use crate::models::{BoundModel, Generator};
use crate::projection::project_mesh;

/// Renders a model to drawing commands
pub struct RasterRenderer {
    model: BoundModel,
}

impl RasterRenderer {
    pub fn new(declaration: ModelDeclaration, generate: Generator) -> Self {
        Self {
            model: BoundModel::new(declaration, generate),
        }
    }

    /// Is the model carried through 3-space with a look-at view?
    #[inline]
    pub fn has_3d_view(&self) -> bool {
        self.model.declaration().render_depth >= 3
    }
}

fn vertices(faces: &[Vec<VecN>]) -> Vec<Vec<RasterVertex>> {
    faces
        .iter()
        .map(|face| {
            face.iter()
                .map(|p| {
                    let z = if p.dim() > 2 { p[2] } else { 0.0 };
                    RasterVertex::new(p[0] as f32, p[1] as f32, z as f32)
                })
                .collect()
        })
        .collect()
}

fn vector3(v: &VecN) -> [f64; 3] {
    let v = v.embed(3);
    [v[0], v[1], v[2]]
}

impl Renderer for RasterRenderer {
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

        let view_3d = self.has_3d_view();
        let render_depth = self.model.declaration().render_depth;
        let target = if view_3d { 3 } else { 2 };
        let mesh = self.model.mesh(&state.parameters, 1.0);
        let faces = vertices(&project_mesh(state, mesh, render_depth, target));

        let mut commands = vec![DrawCommand::Clear(state.background), DrawCommand::PushTransform];
        if view_3d {
            commands.push(DrawCommand::EnableDepthTest);
            if let Some(camera) = state.camera(3) {
                commands.push(DrawCommand::LookAt {
                    eye: vector3(camera.from()),
                    target: vector3(camera.to()),
                    up: [0.0, 1.0, 0.0],
                });
            }
        }
        commands.extend([
            DrawCommand::DepthWrite(true),
            DrawCommand::SetColour(state.wireframe),
            DrawCommand::DrawWireframe(faces.clone()),
            DrawCommand::DepthWrite(state.surface.alpha >= 1.0),
            DrawCommand::SetMaterial(Material::DEFAULT),
            DrawCommand::SetColour(state.surface),
            DrawCommand::DrawSolid(faces),
            DrawCommand::PopTransform,
            DrawCommand::Flush,
            DrawCommand::Present,
        ]);
        Frame::Raster(commands)
    }
}

/// Immediate-mode graphics context that raster frames are replayed on
pub trait GraphicsContext {
    /// Clear colour and depth buffers to `colour`
    fn clear(&mut self, colour: Rgba);
    fn push_transform(&mut self);
    fn pop_transform(&mut self);
    fn enable_depth_test(&mut self);
    fn look_at(&mut self, eye: [f64; 3], target: [f64; 3], up: [f64; 3]);
    fn depth_write(&mut self, enabled: bool);
    fn set_colour(&mut self, colour: Rgba);
    fn set_material(&mut self, material: &Material);
    /// Draw each face as a closed outline
    fn draw_wireframe(&mut self, faces: &[Vec<RasterVertex>]);
    /// Draw each face as a filled polygon
    fn draw_solid(&mut self, faces: &[Vec<RasterVertex>]);
    fn flush(&mut self);
    fn present(&mut self);
}

/// Issue `commands` on `context`, in order
pub fn replay(commands: &[DrawCommand], context: &mut dyn GraphicsContext) {
    for command in commands {
        match command {
            DrawCommand::Clear(colour) => context.clear(*colour),
            DrawCommand::PushTransform => context.push_transform(),
            DrawCommand::EnableDepthTest => context.enable_depth_test(),
            DrawCommand::LookAt { eye, target, up } => context.look_at(*eye, *target, *up),
            DrawCommand::DepthWrite(enabled) => context.depth_write(*enabled),
            DrawCommand::SetColour(colour) => context.set_colour(*colour),
            DrawCommand::SetMaterial(material) => context.set_material(material),
            DrawCommand::DrawWireframe(faces) => context.draw_wireframe(faces),
            DrawCommand::DrawSolid(faces) => context.draw_solid(faces),
            DrawCommand::PopTransform => context.pop_transform(),
            DrawCommand::Flush => context.flush(),
            DrawCommand::Present => context.present(),
        }
    }
}

/// Right-handed look-at view matrix, row-vector convention
pub fn look_at_matrix(eye: [f64; 3], target: [f64; 3], up: [f64; 3]) -> [[f64; 4]; 4] {
    let f = normalize([target[0] - eye[0], target[1] - eye[1], target[2] - eye[2]]);
    let s = normalize(cross(f, up));
    let u = cross(s, f);

    [
        [s[0], u[0], -f[0], 0.0],
        [s[1], u[1], -f[1], 0.0],
        [s[2], u[2], -f[2], 0.0],
        [-dot(s, eye), -dot(u, eye), dot(f, eye), 1.0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = dot(v, v).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Context that records every operation as a line of text
///
/// Used for command dumps and to inspect frames in tests.
#[derive(Debug, Default)]
pub struct RecordingContext {
    /// One line per operation, in issue order
    pub operations: Vec<String>,
    /// View matrix set by the last look-at
    pub view: Option<[[f64; 4]; 4]>,
    depth: usize,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current transform stack depth
    #[inline]
    pub fn stack_depth(&self) -> usize {
        self.depth
    }

    fn record_faces(&mut self, name: &str, faces: &[Vec<RasterVertex>]) {
        let bytes: usize = faces.iter().map(|f| bytemuck::cast_slice::<RasterVertex, u8>(f.as_slice()).len()).sum();
        self.operations
            .push(format!("{} faces={} bytes={}", name, faces.len(), bytes));
    }

    fn record_colour(&mut self, name: &str, colour: Rgba) {
        self.operations.push(format!(
            "{} {} {} {} {}",
            name, colour.red, colour.green, colour.blue, colour.alpha
        ));
    }
}

impl GraphicsContext for RecordingContext {
    fn clear(&mut self, colour: Rgba) {
        self.record_colour("clear", colour);
    }

    fn push_transform(&mut self) {
        self.depth += 1;
        self.operations.push("push-transform".to_string());
    }

    fn pop_transform(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.operations.push("pop-transform".to_string());
    }

    fn enable_depth_test(&mut self) {
        self.operations.push("enable-depth-test".to_string());
    }

    fn look_at(&mut self, eye: [f64; 3], target: [f64; 3], up: [f64; 3]) {
        self.view = Some(look_at_matrix(eye, target, up));
        let mut line = "look-at".to_string();
        for v in [eye, target, up] {
            let _ = write!(line, " {},{},{}", v[0], v[1], v[2]);
        }
        self.operations.push(line);
    }

    fn depth_write(&mut self, enabled: bool) {
        self.operations.push(format!("depth-write {}", enabled));
    }

    fn set_colour(&mut self, colour: Rgba) {
        self.record_colour("set-colour", colour);
    }

    fn set_material(&mut self, material: &Material) {
        self.operations.push(format!("set-material shininess={}", material.shininess));
    }

    fn draw_wireframe(&mut self, faces: &[Vec<RasterVertex>]) {
        self.record_faces("draw-wireframe", faces);
    }

    fn draw_solid(&mut self, faces: &[Vec<RasterVertex>]) {
        self.record_faces("draw-solid", faces);
    }

    fn flush(&mut self) {
        self.operations.push("flush".to_string());
    }

    fn present(&mut self) {
        self.operations.push("present".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::polytope;

    const EPSILON: f64 = 1e-9;

    fn renderer(id: &str, depth: usize, render_depth: usize) -> RasterRenderer {
        RasterRenderer::new(
            ModelDeclaration {
                id: id.to_string(),
                depth,
                render_depth,
                format: CoordinateFormat::Cartesian,
            },
            polytope::cube,
        )
    }

    fn names(frame: &Frame) -> Vec<&'static str> {
        frame.commands().unwrap_or_default().iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_command_order_3d() {
        let mut state = DimensionState::with_max_depth(4);
        let frame = renderer("cube", 4, 4).frame(&mut state, true);
        assert_eq!(
            names(&frame),
            vec![
                "clear",
                "push-transform",
                "enable-depth-test",
                "look-at",
                "depth-write",
                "set-colour",
                "draw-wireframe",
                "depth-write",
                "set-material",
                "set-colour",
                "draw-solid",
                "pop-transform",
                "flush",
                "present",
            ]
        );
    }

    #[test]
    fn test_command_order_2d() {
        let mut state = DimensionState::with_max_depth(4);
        let frame = renderer("cube", 2, 2).frame(&mut state, false);
        let names = names(&frame);
        assert!(!names.contains(&"enable-depth-test"));
        assert!(!names.contains(&"look-at"));
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_translucent_surface_masks_depth_for_solid_only() {
        let mut state = DimensionState::with_max_depth(4);
        state.surface.alpha = 0.5;
        let frame = renderer("cube", 3, 3).frame(&mut state, true);
        let commands = frame.commands().unwrap_or_default();

        let wire = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::DrawWireframe(_)))
            .expect("wireframe pass");
        let solid = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::DrawSolid(_)))
            .expect("solid pass");
        assert!(wire < solid);

        let last_write_before = |index: usize| {
            commands[..index].iter().rev().find_map(|c| match c {
                DrawCommand::DepthWrite(enabled) => Some(*enabled),
                _ => None,
            })
        };
        assert_eq!(last_write_before(wire), Some(true));
        assert_eq!(last_write_before(solid), Some(false));
    }

    #[test]
    fn test_opaque_surface_writes_depth() {
        let mut state = DimensionState::with_max_depth(3);
        state.surface.alpha = 1.0;
        let frame = renderer("cube", 3, 3).frame(&mut state, true);
        let writes: Vec<bool> = frame
            .commands()
            .unwrap_or_default()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DepthWrite(enabled) => Some(*enabled),
                _ => None,
            })
            .collect();
        assert_eq!(writes, vec![true, true]);
    }

    #[test]
    fn test_replay_on_recording_context() {
        let mut state = DimensionState::with_max_depth(3);
        let frame = renderer("cube", 3, 3).frame(&mut state, true);

        let mut context = RecordingContext::new();
        replay(frame.commands().unwrap_or_default(), &mut context);

        assert_eq!(context.operations.len(), frame.commands().map(|c| c.len()).unwrap_or(0));
        assert_eq!(context.operations[0], "clear 0.45 0.45 0.65 1");
        assert!(context.operations.contains(&"draw-solid faces=6 bytes=288".to_string()));
        assert_eq!(context.stack_depth(), 0);
        assert!(context.view.is_some());
    }

    #[test]
    fn test_look_at_matrix() {
        let m = look_at_matrix([0.0, 0.0, 5.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        // Eye maps to the origin of view space
        let eye_z = 5.0 * m[2][2] + m[3][2];
        assert!(eye_z.abs() < EPSILON);
        assert!((m[0][0] - 1.0).abs() < EPSILON);
        assert!((m[1][1] - 1.0).abs() < EPSILON);
    }
}
