//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`TOPOLOGIC_SECTION__KEY`)
//!
//! Metadata loaded from a document is applied after configuration, so it
//! overrides everything here.

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use topologic_core::{CoordinateFormat, DimensionState, ModelDeclaration, Parameters, Rgba};
use topologic_render::OutputMode;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Model shown when no document declares one
    #[serde(default)]
    pub model: ModelConfig,
    /// Model generation parameters
    #[serde(default)]
    pub parameters: Parameters,
    /// Colours
    #[serde(default)]
    pub colours: ColourConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`TOPOLOGIC_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // TOPOLOGIC_MODEL__DEPTH=5 -> model.depth = 5
        figment = figment.merge(Env::prefixed("TOPOLOGIC_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Copy the options into a state
    pub fn apply(&self, state: &mut DimensionState) {
        state.parameters = self.parameters.clone();
        state.export_multiplier = self.output.export_multiplier;
        state.id_prefix = self.output.id_prefix.clone();
        state.polar_coordinates = self.output.polar;
        state.background = self.colours.background.into_rgba();
        state.wireframe = self.colours.wireframe.into_rgba();
        state.surface = self.colours.surface.into_rgba();
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Renderer family: `vector` or `raster`
    pub mode: OutputMode,
    /// Prefix for element ids in vector documents
    pub id_prefix: String,
    /// Precision multiplier for vector documents
    pub export_multiplier: f64,
    /// Use polar camera coordinates
    pub polar: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Vector,
            id_prefix: String::new(),
            export_multiplier: 2.0,
            polar: true,
        }
    }
}

/// Default model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model type, e.g. `cube`
    #[serde(rename = "type")]
    pub kind: String,
    pub depth: usize,
    /// Dimension the model is projected from; 0 picks the model's default
    pub render_depth: usize,
    pub format: CoordinateFormat,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: "cube".to_string(),
            depth: 4,
            render_depth: 4,
            format: CoordinateFormat::Cartesian,
        }
    }
}

impl ModelConfig {
    /// The request this configuration describes
    pub fn declaration(&self) -> ModelDeclaration {
        ModelDeclaration {
            id: self.kind.clone(),
            depth: self.depth,
            render_depth: self.render_depth,
            format: self.format,
        }
    }
}

/// An RGBA colour as `[r, g, b, a]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColourValue(pub [f64; 4]);

impl ColourValue {
    pub fn into_rgba(self) -> Rgba {
        let [r, g, b, a] = self.0;
        Rgba::new(r, g, b, a)
    }
}

/// Colour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColourConfig {
    pub background: ColourValue,
    pub wireframe: ColourValue,
    pub surface: ColourValue,
}

impl Default for ColourConfig {
    fn default() -> Self {
        Self {
            background: ColourValue([0.45, 0.45, 0.65, 1.0]),
            wireframe: ColourValue([1.0, 1.0, 1.0, 1.0]),
            surface: ColourValue([1.0, 1.0, 1.0, 0.1]),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.output.mode, OutputMode::Vector);
        assert_eq!(config.model.kind, "cube");
        assert_eq!(config.model.depth, 4);
        assert_eq!(config.parameters.precision, 10.0);
    }

    #[test]
    fn test_defaults_match_fresh_state() {
        let fresh = DimensionState::new();
        let mut state = DimensionState::new();
        AppConfig::default().apply(&mut state);
        assert_eq!(state.parameters, fresh.parameters);
        assert_eq!(state.export_multiplier, fresh.export_multiplier);
        assert_eq!(state.polar_coordinates, fresh.polar_coordinates);
        assert_eq!(state.background, fresh.background);
        assert_eq!(state.wireframe, fresh.wireframe);
        assert_eq!(state.surface, fresh.surface);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("[model]"));
        assert!(toml.contains("type = \"cube\""));
        assert!(toml.contains("mode = \"vector\""));
        assert!(toml.contains("vertex_limit"));
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            "[model]\ntype = \"sphere\"\n\n[parameters]\nradius = 2.0\n\n[colours]\nsurface = [0.0, 0.5, 1.0, 1.0]\n",
        )
        .unwrap();
        assert_eq!(config.model.kind, "sphere");
        assert_eq!(config.model.depth, 4);
        assert_eq!(config.parameters.radius, 2.0);
        assert_eq!(config.parameters.iterations, 4);
        assert_eq!(config.colours.surface.into_rgba(), Rgba::new(0.0, 0.5, 1.0, 1.0));
        assert_eq!(config.colours.wireframe, ColourValue([1.0, 1.0, 1.0, 1.0]));
    }
}
