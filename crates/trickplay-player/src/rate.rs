//! Signed playback rate.
//!
//! The sign carries the direction and the magnitude carries the speed multiplier.
//! Only [`PlaybackRate::reversed`] changes the sign; magnitude updates keep it.

use std::fmt;

/// Signed playback rate passed to seek and step requests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    /// Magnitude selected by `S`, and the startup rate.
    pub const SLOW: f64 = 4.0;
    /// Magnitude selected by `s`.
    pub const FAST: f64 = 20.0;

    pub fn forward(magnitude: f64) -> Self {
        Self(magnitude.abs())
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn magnitude(self) -> f64 {
        self.0.abs()
    }

    pub fn is_forward(self) -> bool {
        self.0 > 0.0
    }

    /// Same direction, new speed multiplier.
    pub fn with_magnitude(self, magnitude: f64) -> Self {
        Self(magnitude.abs().copysign(self.0))
    }

    /// Same speed multiplier, opposite direction.
    pub fn reversed(self) -> Self {
        Self(-self.0)
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self::forward(Self::SLOW)
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
