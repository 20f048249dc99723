//! Renderer output
//!
//! Vector renderers produce a complete document. Raster renderers produce an
//! ordered list of immediate-mode drawing operations that a host replays on
//! its graphics context; the order of the list is significant.

use bytemuck::{Pod, Zeroable};
use topologic_math::Rgba;

/// Output of a single [`Renderer::frame`](crate::Renderer::frame) call
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    /// Self-contained vector document
    Vector(String),
    /// Ordered drawing operations
    Raster(Vec<DrawCommand>),
}

impl Frame {
    /// The vector document, if this is a vector frame
    pub fn as_document(&self) -> Option<&str> {
        match self {
            Frame::Vector(doc) => Some(doc),
            Frame::Raster(_) => None,
        }
    }

    /// The drawing operations, if this is a raster frame
    pub fn commands(&self) -> Option<&[DrawCommand]> {
        match self {
            Frame::Vector(_) => None,
            Frame::Raster(commands) => Some(commands),
        }
    }
}

/// Vertex position uploaded to the graphics context
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RasterVertex {
    pub position: [f32; 3],
}

impl RasterVertex {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

/// Surface material properties
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub specular: [f32; 4],
    pub emission: [f32; 4],
    pub shininess: f32,
}

impl Material {
    /// Shiny white specular highlight, no emission
    pub const DEFAULT: Self = Self {
        specular: [1.0, 1.0, 1.0, 1.0],
        emission: [0.0, 0.0, 0.0, 1.0],
        shininess: 50.0,
    };
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One immediate-mode drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Set the clear colour and clear colour and depth buffers
    Clear(Rgba),
    PushTransform,
    EnableDepthTest,
    /// Position the 3D eye
    LookAt {
        eye: [f64; 3],
        target: [f64; 3],
        up: [f64; 3],
    },
    /// Enable or disable depth buffer writes
    DepthWrite(bool),
    SetColour(Rgba),
    SetMaterial(Material),
    /// Closed outlines, one per face
    DrawWireframe(Vec<Vec<RasterVertex>>),
    /// Filled polygons, one per face
    DrawSolid(Vec<Vec<RasterVertex>>),
    PopTransform,
    Flush,
    Present,
}

impl DrawCommand {
    /// Short operation name, used for logging and command dumps
    pub fn name(&self) -> &'static str {
        match self {
            DrawCommand::Clear(_) => "clear",
            DrawCommand::PushTransform => "push-transform",
            DrawCommand::EnableDepthTest => "enable-depth-test",
            DrawCommand::LookAt { .. } => "look-at",
            DrawCommand::DepthWrite(_) => "depth-write",
            DrawCommand::SetColour(_) => "set-colour",
            DrawCommand::SetMaterial(_) => "set-material",
            DrawCommand::DrawWireframe(_) => "draw-wireframe",
            DrawCommand::DrawSolid(_) => "draw-solid",
            DrawCommand::PopTransform => "pop-transform",
            DrawCommand::Flush => "flush",
            DrawCommand::Present => "present",
        }
    }
}
