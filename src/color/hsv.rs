//! Float HSV conversions
//!
//! Hue is kept in degrees (`0..360`), saturation and value in `0..1`.
//! The conversions use the classic six-sector algorithm so a color survives
//! an RGB -> HSV -> RGB round trip within byte rounding.

/// HSV color with hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees, `0..360`.
    pub hue: f32,
    /// Saturation, `0..1`.
    pub sat: f32,
    /// Value, `0..1`.
    pub val: f32,
}

impl Hsv {
    /// Full white.
    pub const WHITE: Self = Self {
        hue: 0.0,
        sat: 0.0,
        val: 1.0,
    };

    pub const fn new(hue: f32, sat: f32, val: f32) -> Self {
        Self { hue, sat, val }
    }

    /// Returns the color with hue wrapped into `0..360` and the other
    /// components clamped to `0..1`.
    pub fn normalized(self) -> Self {
        Self {
            hue: wrap_hue(self.hue),
            sat: clamp_unit(self.sat),
            val: clamp_unit(self.val),
        }
    }
}

impl Default for Hsv {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Wrap a hue in degrees into `0..360`.
pub fn wrap_hue(hue: f32) -> f32 {
    if !hue.is_finite() {
        return 0.0;
    }
    let mut wrapped = libm::fmodf(hue, 360.0);
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    // -0.00001 + 360.0 rounds to 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Convert normalized RGB (`0..1` per channel) to HSV.
///
/// Grey levels have no hue; they are reported with `hue = 0` and `sat = 0`.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if max <= 0.0 || delta <= 0.0 {
        return Hsv {
            hue: 0.0,
            sat: 0.0,
            val: max.max(0.0),
        };
    }

    let sector = if r >= max {
        // between yellow and magenta
        (g - b) / delta
    } else if g >= max {
        // between cyan and yellow
        2.0 + (b - r) / delta
    } else {
        // between magenta and cyan
        4.0 + (r - g) / delta
    };

    let mut hue = sector * 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }

    Hsv {
        hue: wrap_hue(hue),
        sat: delta / max,
        val: max,
    }
}

/// Convert HSV to normalized RGB (`0..1` per channel).
#[allow(clippy::cast_possible_truncation)]
pub fn hsv_to_rgb(hsv: Hsv) -> (f32, f32, f32) {
    let Hsv { hue, sat, val } = hsv;

    if sat <= 0.0 {
        return (val, val, val);
    }

    let sector = hue / 60.0;
    let whole = libm::floorf(sector);
    let frac = sector - whole;

    let p = val * (1.0 - sat);
    let q = val * (1.0 - sat * frac);
    let t = val * (1.0 - sat * (1.0 - frac));

    match (whole as i32).rem_euclid(6) {
        0 => (val, t, p),
        1 => (q, val, p),
        2 => (p, val, t),
        3 => (p, q, val),
        4 => (t, p, val),
        _ => (val, p, q),
    }
}
