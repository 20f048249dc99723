//! Model identification: coordinate formats and declarations

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

/// Vector format a model is generated in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateFormat {
    Cartesian,
    Polar,
}

impl CoordinateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateFormat::Cartesian => "cartesian",
            CoordinateFormat::Polar => "polar",
        }
    }
}

impl Default for CoordinateFormat {
    fn default() -> Self {
        CoordinateFormat::Cartesian
    }
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a coordinate format name that isn't recognised
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown coordinate format: '{}'", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for CoordinateFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cartesian" => Ok(CoordinateFormat::Cartesian),
            "polar" => Ok(CoordinateFormat::Polar),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// What a bound renderer is drawing
///
/// This is the part of a renderer that survives an encode/decode round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelDeclaration {
    pub id: String,
    pub depth: usize,
    pub render_depth: usize,
    pub format: CoordinateFormat,
}
