//! Color temperature range
//!
//! Temperatures are in mireds, matching the Home Assistant slider
//! (154 = cold daylight, 500 = warm candle light). Only the position within
//! the range matters for the output: it splits the white channels between
//! cold and warm.

/// Inclusive color temperature bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub min: f32,
    pub max: f32,
}

impl TemperatureRange {
    /// Home Assistant default slider bounds.
    pub const HASS: Self = Self {
        min: 154.0,
        max: 500.0,
    };

    /// Position of `temperature` within the range, clamped to `0..1`.
    pub fn fraction(self, temperature: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((temperature - self.min) / span).clamp(0.0, 1.0)
    }

    /// Temperature at `fraction` of the range.
    pub fn from_fraction(self, fraction: f32) -> f32 {
        self.min + (self.max - self.min) * fraction
    }

    /// Clamp into the range.
    pub fn clamp(self, temperature: f32) -> f32 {
        temperature.max(self.min).min(self.max)
    }

    /// Jump to the opposite bound when leaving the range.
    pub fn wrap(self, temperature: f32) -> f32 {
        if temperature < self.min {
            self.max
        } else if temperature > self.max {
            self.min
        } else {
            temperature
        }
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self::HASS
    }
}

/// Split a temperature fraction into `(cold, warm)` 0-255 levels.
pub fn cold_warm_split(fraction: f32) -> (f32, f32) {
    (255.0 * (1.0 - fraction), 255.0 * fraction)
}
