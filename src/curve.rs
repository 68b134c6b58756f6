//! Perceptual brightness curves
//!
//! Human brightness perception is roughly logarithmic, so a linear dimmer
//! spends most of its travel near full brightness. The exponential modes
//! bend the dimmer so that equal steps look equal, down to a floor of 1% or
//! 0.1% output.
//!
//! The constants are calibrated against real bulbs. They are evaluated with
//! `f32` inputs and an `f64` power, exactly like the firmware that shipped
//! them, so outputs stay bit-identical.

use crate::logging::warning;

/// Brightness curve selection (`led_expoMode 0..4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ExponentialMode {
    /// Linear dimming.
    Off = 0,
    /// 1% floor, moderate curve.
    Moderate1Percent = 1,
    /// 1% floor, full curve.
    #[default]
    Full1Percent = 2,
    /// 0.1% floor, moderate curve.
    Moderate01Percent = 3,
    /// 0.1% floor, full curve.
    Full01Percent = 4,
}

struct CurveConstants {
    base: f32,
    factor: f32,
    offset: f32,
}

const MODERATE_BASE: f32 = 1.2;
const MODERATE_FACTOR: f32 = 15.32;
const MODERATE_OFFSET: f32 = 0.066_09;
const FULL_BASE: f32 = 1.06;
const FULL_FACTOR: f32 = 74.115;
const FULL_OFFSET: f32 = 0.013;
const ONE_PERCENT_FLOOR: f32 = 0.009;

impl ExponentialMode {
    pub fn from_raw(value: i32) -> Option<Self> {
        Some(match value {
            0 => Self::Off,
            1 => Self::Moderate1Percent,
            2 => Self::Full1Percent,
            3 => Self::Moderate01Percent,
            4 => Self::Full01Percent,
            _ => return None,
        })
    }

    /// Parse a raw mode, keeping `current` when out of range.
    pub fn from_raw_or(value: i32, current: Self) -> Self {
        Self::from_raw(value).unwrap_or_else(|| {
            warning!("exponential mode {} out of range, keeping {:?}", value, current);
            current
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    fn constants(self) -> Option<CurveConstants> {
        // The offset is accumulated in f32 in the same order as calibrated
        let floor = match self {
            Self::Off => return None,
            Self::Moderate1Percent | Self::Full1Percent => ONE_PERCENT_FLOOR,
            Self::Moderate01Percent | Self::Full01Percent => 0.0,
        };
        Some(match self {
            Self::Moderate1Percent | Self::Moderate01Percent => CurveConstants {
                base: MODERATE_BASE,
                factor: MODERATE_FACTOR,
                offset: floor - MODERATE_OFFSET,
            },
            _ => CurveConstants {
                base: FULL_BASE,
                factor: FULL_FACTOR,
                offset: floor - FULL_OFFSET,
            },
        })
    }

    /// Apply the curve to a raw 0-255 channel at `brightness` (0..1).
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(self, raw: f32, brightness: f32) -> f32 {
        let Some(curve) = self.constants() else {
            return raw * brightness;
        };
        if brightness <= 0.0 {
            return 0.0;
        }

        let exponent = brightness * curve.factor;
        let scale = libm::pow(f64::from(curve.base), f64::from(exponent)) / f64::from(curve.factor)
            + f64::from(curve.offset);
        (f64::from(raw) * scale) as f32
    }
}
