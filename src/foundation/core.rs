use crate::foundation::error::{AnimpackError, AnimpackResult};

/// 0-based frame index in output timeline order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

/// Per-frame display time as the rational `num/den` seconds.
///
/// A zero denominator is read by APNG decoders as `1/100` of a second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Delay {
    /// Delay numerator.
    pub num: u16,
    /// Delay denominator.
    pub den: u16,
}

impl Delay {
    pub fn new(num: u16, den: u16) -> Self {
        Self { num, den }
    }

    /// One frame per `1 / round(fps)` seconds.
    pub fn from_fps(fps: f64) -> AnimpackResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnimpackError::validation("fps must be finite and > 0"));
        }
        let den = fps.round().clamp(1.0, f64::from(u16::MAX)) as u16;
        Ok(Self { num: 1, den })
    }

    /// Delay in seconds, using the decoder rule for a zero denominator.
    pub fn as_secs(self) -> f64 {
        let den = if self.den == 0 { 100 } else { self.den };
        f64::from(self.num) / f64::from(den)
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self { num: 1, den: 100 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> AnimpackResult<Self> {
        if width == 0 || height == 0 {
            return Err(AnimpackError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
