use super::{
    COLD_INDEX, Hsv, RGBCW_CHANNELS, Rgb, Rgbcw, WARM_INDEX, hsv_to_rgb, parse_base_color,
    rgb_to_hsv, to_byte,
};
use crate::logging::warning;
use crate::ports::RandomSource;

const RANDOM_KEYWORD: &str = "rand";

/// Base (pre-brightness) RGBCW color with its HSV view.
///
/// Channels 0-2 and the HSV triple describe the same color. Both are
/// private and every setter re-derives one from the other, so they never
/// drift apart. Channels 3-4 (cold/warm) are independent of HSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorModel {
    base: Rgbcw,
    hsv: Hsv,
    num_base_colors: u8,
}

impl ColorModel {
    /// Full white on every channel.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new() -> Self {
        Self {
            base: [255.0; RGBCW_CHANNELS],
            hsv: Hsv::WHITE,
            num_base_colors: RGBCW_CHANNELS as u8,
        }
    }

    /// Raw RGBCW channels, 0-255, brightness not applied.
    pub const fn base(&self) -> &Rgbcw {
        &self.base
    }

    pub const fn hsv(&self) -> Hsv {
        self.hsv
    }

    /// Number of channels set by the last hex color string.
    pub const fn num_base_colors(&self) -> u8 {
        self.num_base_colors
    }

    /// Channels 0-2 as bytes.
    pub fn base_rgb(&self) -> Rgb {
        Rgb::new(
            to_byte(self.base[0]),
            to_byte(self.base[1]),
            to_byte(self.base[2]),
        )
    }

    /// Set channels 0-2 (0-255 range).
    pub fn set_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.base[0] = r;
        self.base[1] = g;
        self.base[2] = b;
        self.sync_hsv();
    }

    /// Set the white channels (0-255 range).
    pub fn set_cold_warm(&mut self, cold: f32, warm: f32) {
        self.base[COLD_INDEX] = cold;
        self.base[WARM_INDEX] = warm;
    }

    pub fn set_hsv(&mut self, hsv: Hsv) {
        self.hsv = hsv.normalized();
        self.sync_rgb();
    }

    /// Set hue in degrees, keeping saturation and value.
    pub fn set_hue(&mut self, hue: f32) {
        self.set_hsv(Hsv { hue, ..self.hsv });
    }

    /// Set saturation (`0..1`), keeping hue and value.
    pub fn set_saturation(&mut self, sat: f32) {
        self.set_hsv(Hsv { sat, ..self.hsv });
    }

    /// Set HSV value (`0..1`), keeping hue and saturation.
    pub fn set_value(&mut self, val: f32) {
        self.set_hsv(Hsv { val, ..self.hsv });
    }

    /// Apply a hex color string.
    ///
    /// `"rand"` picks random channels instead: three, or all five when
    /// `all` is set. Returns the number of channels parsed from hex.
    pub fn set_from_hex(&mut self, text: &str, all: bool, rng: &mut impl RandomSource) -> u8 {
        let keyword = text.strip_prefix('#').unwrap_or(text);
        if keyword.eq_ignore_ascii_case(RANDOM_KEYWORD) {
            let count = if all { RGBCW_CHANNELS } else { 3 };
            for channel in &mut self.base[..count] {
                *channel = f32::from(rng.random_byte() % 255);
            }
            self.num_base_colors = 0;
            self.sync_hsv();
            return 0;
        }

        let parsed = parse_base_color(text);
        if let Some(error) = parsed.error {
            warning!("base color '{}': {}", text, error);
        }
        for (channel, value) in self.base.iter_mut().zip(parsed.values()) {
            *channel = f32::from(*value);
        }
        self.num_base_colors = parsed.count;
        self.sync_hsv();
        parsed.count
    }

    fn sync_hsv(&mut self) {
        self.hsv = rgb_to_hsv(
            self.base[0] / 255.0,
            self.base[1] / 255.0,
            self.base[2] / 255.0,
        );
    }

    fn sync_rgb(&mut self) {
        let (r, g, b) = hsv_to_rgb(self.hsv);
        self.base[0] = r * 255.0;
        self.base[1] = g * 255.0;
        self.base[2] = b * 255.0;
    }
}

impl Default for ColorModel {
    fn default() -> Self {
        Self::new()
    }
}
