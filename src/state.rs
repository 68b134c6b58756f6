//! Light state aggregate and configuration

use crate::color::{ColorModel, RGBCW_CHANNELS, Rgbcw, TemperatureRange, to_byte};
use crate::curve::ExponentialMode;
use crate::ports::SavedLightState;
use crate::topology::ChipSet;

const MODE_NAME_ALL: &str = "all";
const MODE_NAME_TEMPERATURE: &str = "cw";
const MODE_NAME_RGB: &str = "rgb";

const MODE_ID_ALL: u8 = 0;
const MODE_ID_TEMPERATURE: u8 = 1;
const MODE_ID_RGB: u8 = 2;

/// Which logical channels take part in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ColorMode {
    /// RGB and white channels.
    All = MODE_ID_ALL,
    /// White channels only.
    Temperature = MODE_ID_TEMPERATURE,
    /// RGB channels only.
    #[default]
    Rgb = MODE_ID_RGB,
}

impl ColorMode {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_ALL => Self::All,
            MODE_ID_TEMPERATURE => Self::Temperature,
            MODE_ID_RGB => Self::Rgb,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => MODE_NAME_ALL,
            Self::Temperature => MODE_NAME_TEMPERATURE,
            Self::Rgb => MODE_NAME_RGB,
        }
    }

    /// Whether logical channel `index` is zeroed in this mode.
    pub const fn masks(self, index: usize) -> bool {
        match self {
            Self::All => false,
            Self::Temperature => index < 3,
            Self::Rgb => index >= 3,
        }
    }
}

/// Calibration and tuning of the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct LightConfig {
    /// Converts the 0-100 dimmer into the 0..1 brightness.
    pub brightness_multiplier: f32,
    /// Converts 0-255 color levels into 0-100 channel levels.
    pub channel_scale: f32,
    /// Transition speed in color units per second.
    pub lerp_speed: f32,
    pub exponential_mode: ExponentialMode,
    pub temperature: TemperatureRange,
    /// Driver chips fed with every frame.
    pub chips: ChipSet,
}

impl LightConfig {
    pub const DEFAULT_BRIGHTNESS_MULTIPLIER: f32 = 0.01;
    pub const DEFAULT_CHANNEL_SCALE: f32 = 100.0 / 255.0;
    pub const DEFAULT_LERP_SPEED: f32 = 200.0;

    pub const DEFAULT: Self = Self {
        brightness_multiplier: Self::DEFAULT_BRIGHTNESS_MULTIPLIER,
        channel_scale: Self::DEFAULT_CHANNEL_SCALE,
        lerp_speed: Self::DEFAULT_LERP_SPEED,
        exponential_mode: ExponentialMode::Full1Percent,
        temperature: TemperatureRange::HASS,
        chips: ChipSet::new(),
    };

    /// Restore the calibration values, keeping chips, curve and speed.
    pub fn reset_calibration(&mut self) {
        self.brightness_multiplier = Self::DEFAULT_BRIGHTNESS_MULTIPLIER;
        self.channel_scale = Self::DEFAULT_CHANNEL_SCALE;
        self.temperature = TemperatureRange::HASS;
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete light state.
///
/// Turning the light off only clears `enabled`; color and brightness are
/// kept so switching back on restores the previous output exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct LightState {
    pub(crate) color: ColorModel,
    pub(crate) final_color: Rgbcw,
    pub(crate) brightness: f32,
    pub(crate) temperature: f32,
    pub(crate) mode: ColorMode,
    pub(crate) enabled: bool,
}

impl LightState {
    pub const fn new(temperature: TemperatureRange) -> Self {
        Self {
            color: ColorModel::new(),
            final_color: [255.0; RGBCW_CHANNELS],
            brightness: 1.0,
            temperature: temperature.min,
            mode: ColorMode::Rgb,
            enabled: false,
        }
    }

    pub const fn color(&self) -> &ColorModel {
        &self.color
    }

    /// Last composed output, 0-255 before channel scaling.
    pub const fn final_color(&self) -> &Rgbcw {
        &self.final_color
    }

    /// Global brightness, 0..1.
    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    pub const fn mode(&self) -> ColorMode {
        self.mode
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Brightness expressed on the 0-100 dimmer scale.
    #[allow(clippy::cast_possible_truncation)]
    pub fn dimmer(&self, config: &LightConfig) -> i32 {
        libm::roundf(self.brightness / config.brightness_multiplier) as i32
    }

    /// Record for flash storage.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_saved(&self, config: &LightConfig) -> SavedLightState {
        SavedLightState {
            mode: self.mode.as_raw(),
            dimmer: self.dimmer(config) as i16,
            temperature: self.temperature as i16,
            rgb: self.color.base_rgb(),
            enabled: self.enabled,
        }
    }

    /// Final color as driver bytes.
    pub fn final_rgbcw(&self) -> [u8; RGBCW_CHANNELS] {
        crate::color::rgbcw_bytes(&self.final_color)
    }

    /// Final color on the fixed 0-100 scale reported to device groups.
    pub fn final_channels_100(&self) -> [u8; RGBCW_CHANNELS] {
        let mut levels = [0u8; RGBCW_CHANNELS];
        for (level, value) in levels.iter_mut().zip(self.final_color) {
            *level = to_byte(value * (100.0 / 255.0));
        }
        levels
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new(TemperatureRange::HASS)
    }
}
