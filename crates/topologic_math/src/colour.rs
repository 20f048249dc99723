//! RGBA colour values

use serde::{Serialize, Deserialize};

/// Colour with red, green, blue and alpha channels in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self { red, green, blue, alpha }
    }

    /// Channels as `[red, green, blue, alpha]`
    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    #[inline]
    pub fn from_array(channels: [f64; 4]) -> Self {
        Self::new(channels[0], channels[1], channels[2], channels[3])
    }

    /// Is the colour fully opaque?
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}
