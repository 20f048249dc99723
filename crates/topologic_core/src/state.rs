//! DimensionState chain
//!
//! One [`Dimension`] record per dimension from [`MIN_DEPTH`] up to the state's
//! maximum depth. Every record holds the affine transformation applied in that
//! dimension; records from 3 upwards also hold a [`Camera`] whose perspective
//! projection takes d-space down to (d-1)-space. Operations that walk the chain
//! (refresh, metadata encoding and decoding) go from the highest dimension down.
//!
//! The state also owns the options shared by every dimension and the active
//! [`Renderer`].

use topologic_math::{polar, PerspectiveProjection, Rgba, Transformation, VecN};

use crate::{Frame, Parameters, Renderer};

/// Highest dimension a state can hold
pub const MAX_DEPTH: usize = 7;

/// Lowest dimension in the chain
pub const MIN_DEPTH: usize = 2;

/// Attribute names for cartesian camera coordinates, one per axis
pub const CARTESIAN_AXES: &str = "xyzwvutsrqponmlkjihgfedcbaZYXWVUTSRQPONMLKJIHGFEDCBA";

/// Angle of untouched polar camera axes
pub(crate) const DEFAULT_ANGLE: f64 = 1.57;

/// Metadata name of cartesian axis `i`: a letter, or `d-<i>` past the alphabet
pub fn axis_name(i: usize) -> String {
    CARTESIAN_AXES
        .chars()
        .nth(i)
        .map(|c| c.to_string())
        .unwrap_or_else(|| format!("d-{}", i))
}

/// Camera of a single dimension, in both representations
///
/// Which of `fromp` (polar) and the projection's `from` (cartesian) is
/// authoritative is decided by [`DimensionState::polar_coordinates`];
/// [`DimensionState::refresh`] derives the cartesian one from the polar one.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Polar camera position: radius, then one angle per remaining axis
    pub fromp: VecN,
    /// Projection holding the cartesian `from` and `to`
    pub projection: PerspectiveProjection,
}

impl Camera {
    /// Default camera for `depth`-space
    pub fn new(depth: usize) -> Self {
        let mut fromp = VecN::zeros(depth);
        if depth == 3 {
            fromp[0] = 3.0;
            fromp[1] = 1.0;
            fromp[2] = 1.0;
        } else if depth > 0 {
            fromp[0] = 2.0;
            for i in 1..depth {
                fromp[i] = DEFAULT_ANGLE;
            }
        }

        Self {
            fromp,
            projection: PerspectiveProjection::new(depth),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.fromp.dim()
    }

    /// Cartesian camera position
    #[inline]
    pub fn from(&self) -> &VecN {
        &self.projection.from
    }

    #[inline]
    pub fn from_mut(&mut self) -> &mut VecN {
        &mut self.projection.from
    }

    /// Cartesian look-at target
    #[inline]
    pub fn to(&self) -> &VecN {
        &self.projection.to
    }

    #[inline]
    pub fn to_mut(&mut self) -> &mut VecN {
        &mut self.projection.to
    }
}

/// Per-dimension record
#[derive(Clone, Debug, PartialEq)]
pub struct Dimension {
    depth: usize,
    /// Camera projecting this dimension onto the next lower one (absent in 2D)
    pub camera: Option<Camera>,
    /// Affine transformation applied in this dimension
    pub transformation: Transformation,
}

impl Dimension {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            camera: (depth > MIN_DEPTH).then(|| Camera::new(depth)),
            transformation: Transformation::identity(depth),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Scene state: per-dimension records, shared options and the active renderer
pub struct DimensionState {
    /// Records for dimensions MIN_DEPTH..=max_depth, lowest first
    dimensions: Vec<Dimension>,
    /// Is the polar camera authoritative?
    pub polar_coordinates: bool,
    /// Model generation parameters
    pub parameters: Parameters,
    /// Precision multiplier applied when exporting vector documents
    pub export_multiplier: f64,
    pub background: Rgba,
    pub wireframe: Rgba,
    pub surface: Rgba,
    /// Prefix for element ids in vector documents
    pub id_prefix: String,
    renderer: Option<Box<dyn Renderer>>,
}

impl Default for DimensionState {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionState {
    /// Create a state holding every dimension up to [`MAX_DEPTH`]
    pub fn new() -> Self {
        Self::with_max_depth(MAX_DEPTH)
    }

    /// Create a state holding dimensions up to `max_depth`
    ///
    /// `max_depth` is clamped to `MIN_DEPTH..=MAX_DEPTH`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        let max_depth = max_depth.clamp(MIN_DEPTH, MAX_DEPTH);
        Self {
            dimensions: (MIN_DEPTH..=max_depth).map(Dimension::new).collect(),
            polar_coordinates: true,
            parameters: Parameters::default(),
            export_multiplier: 2.0,
            background: Rgba::new(0.45, 0.45, 0.65, 1.0),
            wireframe: Rgba::new(1.0, 1.0, 1.0, 1.0),
            surface: Rgba::new(1.0, 1.0, 1.0, 0.1),
            id_prefix: String::new(),
            renderer: None,
        }
    }

    /// Highest dimension held by this state
    #[inline]
    pub fn max_depth(&self) -> usize {
        MIN_DEPTH + self.dimensions.len() - 1
    }

    pub fn dimension(&self, depth: usize) -> Option<&Dimension> {
        depth.checked_sub(MIN_DEPTH).and_then(|i| self.dimensions.get(i))
    }

    pub fn dimension_mut(&mut self, depth: usize) -> Option<&mut Dimension> {
        depth.checked_sub(MIN_DEPTH).and_then(move |i| self.dimensions.get_mut(i))
    }

    /// Records from the highest dimension down to [`MIN_DEPTH`]
    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter().rev()
    }

    pub fn camera(&self, depth: usize) -> Option<&Camera> {
        self.dimension(depth).and_then(|d| d.camera.as_ref())
    }

    pub fn camera_mut(&mut self, depth: usize) -> Option<&mut Camera> {
        self.dimension_mut(depth).and_then(|d| d.camera.as_mut())
    }

    pub fn transformation(&self, depth: usize) -> Option<&Transformation> {
        self.dimension(depth).map(|d| &d.transformation)
    }

    pub fn transformation_mut(&mut self, depth: usize) -> Option<&mut Transformation> {
        self.dimension_mut(depth).map(|d| &mut d.transformation)
    }

    /// Bring every projection up to date, highest dimension first
    ///
    /// In polar mode each camera's cartesian position is recomputed from its
    /// polar position before the view matrix is rebuilt.
    pub fn refresh(&mut self) {
        let polar_mode = self.polar_coordinates;
        for dimension in self.dimensions.iter_mut().rev() {
            if let Some(camera) = dimension.camera.as_mut() {
                if polar_mode {
                    camera.projection.from = polar::to_cartesian(&camera.fromp);
                }
                camera.projection.update_matrix();
            }
        }
    }

    /// The active renderer, if any
    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_deref()
    }

    /// Replace the active renderer
    ///
    /// The previous renderer is dropped before the new one is stored.
    pub fn install_renderer(&mut self, renderer: Box<dyn Renderer>) {
        if let Some(previous) = self.renderer.take() {
            log::debug!("releasing renderer {}", previous.name());
            drop(previous);
        }
        log::debug!("installing renderer {}", renderer.name());
        self.renderer = Some(renderer);
    }

    /// Drop the active renderer
    pub fn clear_renderer(&mut self) {
        self.renderer = None;
    }

    /// Produce a frame with the active renderer
    ///
    /// Returns `None` when no renderer is installed.
    pub fn render(&mut self, update_matrix: bool) -> Option<Frame> {
        let mut renderer = self.renderer.take()?;
        let frame = renderer.frame(self, update_matrix);
        self.renderer = Some(renderer);
        Some(frame)
    }
}
