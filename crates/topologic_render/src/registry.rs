//! Model dispatch
//!
//! A [`ModelRegistry`] maps model type names to [`ModelEntry`]s and builds
//! renderers for them. Resolving a (format, type, depth, render depth) request
//! applies each entry's depth policy, then installs a new renderer on the
//! state; a request that can't be satisfied leaves the current renderer alone.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use topologic_core::{CoordinateFormat, DimensionState, ModelDeclaration, Renderer, MAX_DEPTH, MIN_DEPTH};

use crate::models::{ifs, parametric, polytope, Generator};
use crate::raster::RasterRenderer;
use crate::svg::VectorRenderer;

bitflags! {
    /// Topological traits of a model that affect its depth policy
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ModelTraits: u8 {
        /// Closed manifold: always rendered from at least one dimension up
        const CLOSED = 1 << 0;
        /// Only defined at its minimum depth
        const FIXED_DEPTH = 1 << 1;
        /// Generated in a space of higher dimension than its depth
        const EMBEDDED = 1 << 2;
    }
}

/// Which renderer family a registry builds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Vector,
    Raster,
}

const CARTESIAN: &[CoordinateFormat] = &[CoordinateFormat::Cartesian];
const ANY_FORMAT: &[CoordinateFormat] = &[CoordinateFormat::Cartesian, CoordinateFormat::Polar];

/// One model type
#[derive(Clone)]
pub struct ModelEntry {
    pub id: &'static str,
    pub min_depth: usize,
    pub max_depth: usize,
    /// Lowest render depth the model can be drawn from
    pub min_render_depth: usize,
    pub formats: &'static [CoordinateFormat],
    pub traits: ModelTraits,
    pub generate: Generator,
}

impl ModelEntry {
    pub fn new(id: &'static str, generate: Generator) -> Self {
        Self {
            id,
            min_depth: MIN_DEPTH,
            max_depth: MAX_DEPTH,
            min_render_depth: MIN_DEPTH,
            formats: CARTESIAN,
            traits: ModelTraits::empty(),
            generate,
        }
    }

    pub fn fixed(mut self, depth: usize) -> Self {
        self.min_depth = depth;
        self.max_depth = depth;
        self.traits |= ModelTraits::FIXED_DEPTH;
        self
    }

    pub fn with_traits(mut self, traits: ModelTraits) -> Self {
        self.traits |= traits;
        self
    }

    #[inline]
    pub fn supports(&self, format: CoordinateFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Depth and render depth this model is drawn at for a request
    ///
    /// The depth is clamped to the model's bounds. Closed models get a render
    /// depth above the depth; every model gets one of at least the depth and its
    /// minimum render depth. Returns `None` if the result exceeds [`MAX_DEPTH`].
    pub fn plan(&self, depth: usize, render_depth: usize) -> Option<(usize, usize)> {
        let depth = depth.clamp(self.min_depth, self.max_depth);
        let mut render_depth = render_depth.max(self.min_render_depth);
        if self.traits.contains(ModelTraits::CLOSED) && render_depth <= depth {
            render_depth = depth + 1;
        }
        render_depth = render_depth.max(depth);
        (render_depth <= MAX_DEPTH).then_some((depth, render_depth))
    }
}

/// Registry of model types, populated once at startup
pub struct ModelRegistry {
    mode: OutputMode,
    entries: Vec<ModelEntry>,
}

impl ModelRegistry {
    /// Empty registry
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    /// Registry holding every built-in model
    pub fn standard(mode: OutputMode) -> Self {
        let mut registry = Self::new(mode);
        registry.register(ModelEntry::new("cube", polytope::cube));
        registry.register(ModelEntry::new("simplex", polytope::simplex));
        registry.register(ModelEntry::new("plane", polytope::plane).fixed(2));

        let mut sphere = ModelEntry::new("sphere", parametric::sphere)
            .with_traits(ModelTraits::CLOSED | ModelTraits::EMBEDDED);
        sphere.max_depth = MAX_DEPTH - 1;
        sphere.formats = ANY_FORMAT;
        registry.register(sphere);

        for (id, generate) in [
            ("moebius-strip", parametric::moebius_strip as Generator),
            ("klein-bagel", parametric::klein_bagel as Generator),
        ] {
            let mut entry = ModelEntry::new(id, generate)
                .fixed(2)
                .with_traits(ModelTraits::EMBEDDED);
            entry.min_render_depth = 3;
            registry.register(entry);
        }

        registry.register(ModelEntry::new("sierpinski-gasket", ifs::sierpinski_gasket));
        registry.register(ModelEntry::new("random-affine-ifs", ifs::random_affine_ifs));
        registry.register(ModelEntry::new("random-flame", ifs::random_flame));
        registry
    }

    #[inline]
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Add an entry, replacing any entry with the same id
    pub fn register(&mut self, entry: ModelEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entry(&self, id: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Registered model ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Render depth to use when a document doesn't give one
    ///
    /// Embedded models default to one above their depth, all others to the depth.
    pub fn default_render_depth(&self, id: &str, depth: usize) -> usize {
        match self.entry(id) {
            Some(entry) if entry.traits.contains(ModelTraits::EMBEDDED) => depth + 1,
            _ => depth,
        }
    }

    /// The declaration a request resolves to, if any
    pub fn plan(
        &self,
        format: CoordinateFormat,
        id: &str,
        depth: usize,
        render_depth: usize,
    ) -> Option<ModelDeclaration> {
        if depth == 0 || depth > MAX_DEPTH || render_depth > MAX_DEPTH {
            return None;
        }
        let entry = self.entry(id)?;
        if !entry.supports(format) {
            return None;
        }
        let (depth, render_depth) = entry.plan(depth, render_depth)?;
        Some(ModelDeclaration {
            id: entry.id.to_string(),
            depth,
            render_depth,
            format,
        })
    }

    /// Build a renderer for a planned declaration
    pub fn build(&self, declaration: ModelDeclaration) -> Option<Box<dyn Renderer>> {
        let generate = self.entry(&declaration.id)?.generate;
        let renderer: Box<dyn Renderer> = match self.mode {
            OutputMode::Vector => Box::new(VectorRenderer::new(declaration, generate)),
            OutputMode::Raster => Box::new(RasterRenderer::new(declaration, generate)),
        };
        Some(renderer)
    }

    /// Resolve a request and install the resulting renderer on `state`
    ///
    /// Returns false, leaving the current renderer installed, if no model
    /// matches or the request is out of bounds for the state.
    pub fn resolve(
        &self,
        state: &mut DimensionState,
        format: CoordinateFormat,
        id: &str,
        depth: usize,
        render_depth: usize,
    ) -> bool {
        let declaration = match self.plan(format, id, depth, render_depth) {
            Some(declaration) if declaration.render_depth <= state.max_depth() => declaration,
            _ => {
                log::warn!(
                    "no model for {} {} at depth {}, render depth {}",
                    format,
                    id,
                    depth,
                    render_depth
                );
                return false;
            }
        };

        match self.build(declaration) {
            Some(renderer) => {
                log::info!("resolved {} to {}", id, renderer.name());
                state.install_renderer(renderer);
                true
            }
            None => false,
        }
    }
}
