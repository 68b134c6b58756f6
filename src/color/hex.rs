//! Hex color strings
//!
//! Base colors arrive as `RRGGBB[CC[WW]]` strings, optionally prefixed
//! with `#`. Outgoing announcements use the same upper-case format.

use core::fmt::Write;

use heapless::String;

/// Maximum number of channels a hex color string can carry.
pub const MAX_BASE_CHANNELS: usize = 5;

/// Upper-case hex string holding up to five channels.
pub type HexString = String<{ MAX_BASE_CHANNELS * 2 }>;

/// Error produced while parsing a hex color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HexColorError {
    /// A pair of characters is not a valid hex byte.
    #[error("malformed hex pair '{high}{low}' for channel {channel}")]
    MalformedPair { channel: u8, high: char, low: char },
}

/// Result of parsing a hex color string.
///
/// Parsing is partial: channels before a malformed pair are kept and
/// reported in `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedBaseColor {
    pub channels: [u8; MAX_BASE_CHANNELS],
    pub count: u8,
    pub error: Option<HexColorError>,
}

impl ParsedBaseColor {
    /// Parsed channel values.
    pub fn values(&self) -> &[u8] {
        &self.channels[..self.count as usize]
    }
}

/// Parse up to five two-digit hex channels.
///
/// Stops at the first malformed pair. A trailing single digit is ignored.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_base_color(text: &str) -> ParsedBaseColor {
    let digits = text.strip_prefix('#').unwrap_or(text).as_bytes();
    let mut parsed = ParsedBaseColor::default();

    for pair in digits.chunks_exact(2).take(MAX_BASE_CHANNELS) {
        let (Some(high), Some(low)) = (hex_digit(pair[0]), hex_digit(pair[1])) else {
            parsed.error = Some(HexColorError::MalformedPair {
                channel: parsed.count,
                high: char::from(pair[0]),
                low: char::from(pair[1]),
            });
            break;
        };
        parsed.channels[parsed.count as usize] = (high << 4) | low;
        parsed.count += 1;
    }

    parsed
}

const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Convert a 0-255 float channel into a byte, truncating the fraction.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_byte(value: f32) -> u8 {
    // `as` saturates out-of-range values and maps NaN to 0
    value as u8
}

/// Format bytes as an upper-case hex string.
///
/// Only the first five bytes are written.
pub fn to_hex(bytes: &[u8]) -> HexString {
    let mut text = HexString::new();
    for byte in bytes.iter().take(MAX_BASE_CHANNELS) {
        let _ = write!(text, "{:02X}", byte);
    }
    text
}
