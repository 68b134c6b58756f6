mod hex;
mod hsv;
mod model;
mod temperature;

use smart_leds::RGB8;

pub use hex::{
    HexColorError, HexString, MAX_BASE_CHANNELS, ParsedBaseColor, parse_base_color, to_byte,
    to_hex,
};
pub use hsv::{Hsv, hsv_to_rgb, rgb_to_hsv, wrap_hue};
pub use model::ColorModel;
pub use temperature::{TemperatureRange, cold_warm_split};

pub type Rgb = RGB8;

/// Number of logical output channels (R, G, B, Cold, Warm).
pub const RGBCW_CHANNELS: usize = 5;

/// Index of the cold white channel.
pub const COLD_INDEX: usize = 3;

/// Index of the warm white channel.
pub const WARM_INDEX: usize = 4;

/// Logical channel vector in RGBCW order.
pub type Rgbcw = [f32; RGBCW_CHANNELS];

/// Convert a float RGBCW vector into driver bytes.
pub fn rgbcw_bytes(values: &Rgbcw) -> [u8; RGBCW_CHANNELS] {
    let mut bytes = [0u8; RGBCW_CHANNELS];
    for (byte, value) in bytes.iter_mut().zip(values) {
        *byte = to_byte(*value);
    }
    bytes
}
