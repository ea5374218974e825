use serde::{Deserialize, Serialize};

/// Compression quality in `[0.01, 1.0]`
///
/// Higher values trade larger output for higher fidelity.
/// The value is clamped on construction so every `Quality` is valid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd)]
#[serde(from = "f32", into = "f32")]
pub struct Quality(f32);

impl Quality {
    pub const MIN: f32 = 0.01;
    pub const MAX: f32 = 1.0;
    /// Slider granularity
    pub const STEP: f32 = 0.01;
    pub const DEFAULT: f32 = 0.6;

    /// Clamp `value` into range. NaN and infinities fall back to the default.
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self(Self::DEFAULT)
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Rounded percentage for display (0.6 → 60)
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    /// Quality level understood by the JPEG encoder (1..=100)
    pub fn jpeg_level(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Quality factor understood by the WebP encoder (0.0..=100.0)
    pub fn webp_level(self) -> f32 {
        (self.0 * 100.0).clamp(0.0, 100.0)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f32> for Quality {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for f32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sixty_percent() {
        let quality = Quality::default();
        assert_eq!(quality.value(), 0.6);
        assert_eq!(quality.percent(), 60);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Quality::new(0.0).value(), Quality::MIN);
        assert_eq!(Quality::new(-3.0).value(), Quality::MIN);
        assert_eq!(Quality::new(1.5).value(), Quality::MAX);
        assert_eq!(Quality::new(f32::NAN), Quality::default());
        assert_eq!(Quality::new(f32::INFINITY), Quality::default());
    }

    #[test]
    fn test_jpeg_level() {
        assert_eq!(Quality::new(0.01).jpeg_level(), 1);
        assert_eq!(Quality::new(0.6).jpeg_level(), 60);
        assert_eq!(Quality::new(1.0).jpeg_level(), 100);
    }

    #[test]
    fn test_webp_level() {
        assert_eq!(Quality::new(0.5).webp_level(), 50.0);
        assert_eq!(Quality::new(1.0).webp_level(), 100.0);
    }

    #[test]
    fn test_deserialize_clamps() {
        let quality: Quality = serde_json::from_str("7.0").unwrap();
        assert_eq!(quality.value(), 1.0);
    }
}
