//! Application context
//!
//! A [`Context`] owns the dimension state and the model registry that
//! dispatches against it. It is created by [`Context::start`], fed documents
//! and live setting changes, and torn down by [`Context::exit`].

use std::fmt;
use std::path::Path;

use serde_json::Value;
use topologic_codec::{json, xml, DocumentError, XmlMetadata};
use topologic_core::{CoordinateFormat, DimensionState, Frame, ModelDeclaration};
use topologic_render::{ModelRegistry, ModelTraits};

use crate::config::AppConfig;

/// Context error
#[derive(Debug)]
pub enum ContextError {
    /// Reading a file failed
    Io(std::io::Error),
    /// A value-tree document is not valid JSON
    Json(serde_json::Error),
    /// An attribute-tree document is invalid
    Document(DocumentError),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::Io(e) => write!(f, "IO error: {}", e),
            ContextError::Json(e) => write!(f, "JSON error: {}", e),
            ContextError::Document(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContextError::Io(e) => Some(e),
            ContextError::Json(e) => Some(e),
            ContextError::Document(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ContextError {
    fn from(e: std::io::Error) -> Self {
        ContextError::Io(e)
    }
}

impl From<serde_json::Error> for ContextError {
    fn from(e: serde_json::Error) -> Self {
        ContextError::Json(e)
    }
}

impl From<DocumentError> for ContextError {
    fn from(e: DocumentError) -> Self {
        ContextError::Document(e)
    }
}

/// A change made to the model while running
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    Model(String),
    Format(CoordinateFormat),
    Depth(usize),
    RenderDepth(usize),
}

/// Owned state plus the registry that installs its renderers
pub struct Context {
    state: DimensionState,
    registry: ModelRegistry,
    /// Last model request, used when no renderer is installed
    request: ModelDeclaration,
}

impl Context {
    /// Create a context from configuration and install its default model
    ///
    /// If the configured model can't be resolved the context starts without
    /// a renderer.
    pub fn start(config: &AppConfig) -> Self {
        let mut state = DimensionState::new();
        config.apply(&mut state);

        let registry = ModelRegistry::standard(config.output.mode);
        let mut request = config.model.declaration();
        if request.render_depth == 0 {
            request.render_depth = registry.default_render_depth(&request.id, request.depth);
        }

        let mut context = Self { state, registry, request };
        if !context.apply_request() {
            log::warn!("starting without a model");
        }
        log::info!("context started in {:?} mode", config.output.mode);
        context
    }

    #[inline]
    pub fn state(&self) -> &DimensionState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut DimensionState {
        &mut self.state
    }

    #[inline]
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Declaration of the installed renderer, or the pending request
    pub fn model(&self) -> ModelDeclaration {
        self.state
            .renderer()
            .map(|r| r.declaration())
            .unwrap_or_else(|| self.request.clone())
    }

    fn apply_request(&mut self) -> bool {
        let r = &self.request;
        self.registry
            .resolve(&mut self.state, r.format, &r.id, r.depth, r.render_depth)
    }

    fn remember_model(&mut self) {
        if let Some(declaration) = self.state.renderer().map(|r| r.declaration()) {
            self.request = declaration;
        }
    }

    /// Apply an attribute-tree document
    ///
    /// Returns whether the document's model was installed.
    pub fn load_xml(&mut self, text: &str) -> Result<bool, ContextError> {
        let document = XmlMetadata::parse(text);
        if let Some(e) = document.error() {
            return Err(e.clone().into());
        }

        xml::decode(&mut self.state, &document);
        let resolved = xml::decode_model(&mut self.state, &document, &self.registry);
        self.remember_model();
        Ok(resolved)
    }

    /// Apply a value-tree document
    ///
    /// Returns whether the document's model was installed.
    pub fn load_json(&mut self, text: &str) -> Result<bool, ContextError> {
        let value: Value = serde_json::from_str(text)?;
        if !json::decode(&mut self.state, &value) {
            return Ok(false);
        }
        let resolved = json::decode_model(&mut self.state, &value, &self.registry);
        self.remember_model();
        Ok(resolved)
    }

    /// Apply a document file, JSON if it ends in `.json`, XML otherwise
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, ContextError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::info!("loading {}", path.display());

        let is_json = path.extension().map_or(false, |e| e.eq_ignore_ascii_case("json"));
        if is_json {
            self.load_json(&text)
        } else {
            self.load_xml(&text)
        }
    }

    /// Change one model setting and re-resolve
    ///
    /// Changing the depth pulls the render depth along: closed models keep it
    /// above the depth, the rest keep it at least equal. Changing the render
    /// depth pushes the depth the other way. Returns false, keeping the
    /// current renderer, if the new request doesn't resolve.
    pub fn update_model_settings(&mut self, change: SettingChange) -> bool {
        let mut request = self.model();
        let closed = self
            .registry
            .entry(&request.id)
            .map_or(false, |e| e.traits.contains(ModelTraits::CLOSED));

        match change {
            SettingChange::Model(id) => request.id = id,
            SettingChange::Format(format) => request.format = format,
            SettingChange::Depth(depth) => {
                request.depth = depth;
                if closed && request.render_depth <= depth {
                    request.render_depth = depth + 1;
                } else if request.render_depth < depth {
                    request.render_depth = depth;
                }
            }
            SettingChange::RenderDepth(render_depth) => {
                request.render_depth = render_depth;
                if closed && request.depth >= render_depth {
                    request.depth = render_depth.saturating_sub(1);
                } else if request.depth > render_depth {
                    request.depth = render_depth;
                }
            }
        }

        let previous = std::mem::replace(&mut self.request, request);
        if self.apply_request() {
            self.remember_model();
            true
        } else {
            self.request = previous;
            false
        }
    }

    /// Render a frame with the installed renderer
    pub fn render(&mut self) -> Option<Frame> {
        self.state.render(true)
    }

    /// Attribute-tree encoding of the state and model
    pub fn describe(&self) -> String {
        self.state.describe()
    }

    /// Value-tree encoding of the state and model
    pub fn to_json(&self) -> Value {
        self.state.to_json()
    }

    /// Release the renderer and hand back the state
    pub fn exit(mut self) -> DimensionState {
        self.state.clear_renderer();
        log::info!("context exited");
        self.state
    }
}
