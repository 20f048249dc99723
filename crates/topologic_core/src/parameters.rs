//! Model generation parameters

use serde::{Serialize, Deserialize};

/// Parameters shared by all model generators
///
/// Not every model reads every field: the IFS models use `iterations`,
/// `seed`, `functions` and the rotate flags, the flame model additionally
/// uses `flame_coefficients`, parametric surfaces use the radii and `precision`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Primary radius
    pub radius: f64,
    /// Secondary radius (tori and similar)
    pub minor_radius: f64,
    /// Model-specific constant
    pub constant: f64,
    /// Number of subdivisions per parameter axis
    pub precision: f64,
    /// IFS iteration count
    pub iterations: u32,
    /// Seed for randomised models
    pub seed: u64,
    /// Number of IFS functions
    pub functions: u32,
    /// Number of flame variation coefficients
    pub flame_coefficients: u32,
    /// Apply a random rotation before each IFS function's scale
    pub pre_rotate: bool,
    /// Apply a random rotation after each IFS function's scale
    pub post_rotate: bool,
    /// Upper bound on generated vertices
    pub vertex_limit: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            radius: 1.0,
            minor_radius: 0.5,
            constant: 0.9,
            precision: 10.0,
            iterations: 4,
            seed: 0,
            functions: 3,
            flame_coefficients: 3,
            pre_rotate: true,
            post_rotate: false,
            vertex_limit: 1_000_000,
        }
    }
}

impl Parameters {
    /// Subdivision steps for a given precision multiplier, never below 1
    pub fn steps(&self, multiplier: f64) -> usize {
        let steps = (self.precision * multiplier).round();
        if steps.is_finite() && steps >= 1.0 {
            steps as usize
        } else {
            1
        }
    }
}
