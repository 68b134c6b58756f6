//! Outward announcements of the light state
//!
//! Color announcements are skipped on devices with two PWM channels or
//! fewer (single color and CW fixtures) unless the controller is forced to
//! show RGB.

use crate::color::{RGBCW_CHANNELS, to_byte, to_hex};
use crate::ports::{DedupKey, PublishResult, PublishValue, Publisher};
use crate::state::LightState;
use crate::topology::ChannelTopology;

/// Seconds a deduplicated announcement stays suppressed.
pub const ANNOUNCE_EXPIRE_SECS: u16 = 60;

pub const TOPIC_BASE_COLOR_RGB: &str = "led_basecolor_rgb";
pub const TOPIC_FINAL_COLOR_RGB: &str = "led_finalcolor_rgb";
pub const TOPIC_FINAL_COLOR_RGBCW: &str = "led_finalcolor_rgbcw";
pub const TOPIC_DIMMER: &str = "led_dimmer";
pub const TOPIC_TEMPERATURE: &str = "led_temperature";
pub const TOPIC_ENABLE_ALL: &str = "led_enableAll";

/// Announce the base color as `RRGGBB`.
pub(crate) fn base_color(
    state: &LightState,
    topology: ChannelTopology,
    publisher: &mut impl Publisher,
) -> PublishResult {
    if !topology.should_broadcast_rgb() {
        return PublishResult::NotRequired;
    }
    let rgb = state.color().base_rgb();
    let text = to_hex(&[rgb.r, rgb.g, rgb.b]);
    publisher.announce(
        DedupKey::BaseColorRgb,
        ANNOUNCE_EXPIRE_SECS,
        TOPIC_BASE_COLOR_RGB,
        PublishValue::Str(&text),
    )
}

/// Announce the brightness-applied color as `RRGGBB`.
pub(crate) fn final_color(
    state: &LightState,
    topology: ChannelTopology,
    publisher: &mut impl Publisher,
) -> PublishResult {
    if !topology.should_broadcast_rgb() {
        return PublishResult::NotRequired;
    }
    let [r, g, b, ..] = *state.final_color();
    let text = to_hex(&[to_byte(r), to_byte(g), to_byte(b)]);
    publisher.announce(
        DedupKey::FinalColorRgb,
        ANNOUNCE_EXPIRE_SECS,
        TOPIC_FINAL_COLOR_RGB,
        PublishValue::Str(&text),
    )
}

/// Announce the full output vector as `RRGGBBCCWW`.
pub(crate) fn final_rgbcw(
    rgbcw: &[u8; RGBCW_CHANNELS],
    publisher: &mut impl Publisher,
) -> PublishResult {
    let text = to_hex(rgbcw);
    publisher.announce(
        DedupKey::FinalColorRgbcw,
        ANNOUNCE_EXPIRE_SECS,
        TOPIC_FINAL_COLOR_RGBCW,
        PublishValue::Str(&text),
    )
}

pub(crate) fn dimmer(dimmer: i32, publisher: &mut impl Publisher) -> PublishResult {
    publisher.announce(
        DedupKey::Dimmer,
        ANNOUNCE_EXPIRE_SECS,
        TOPIC_DIMMER,
        PublishValue::Int(dimmer),
    )
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn temperature(temperature: f32, publisher: &mut impl Publisher) -> PublishResult {
    publisher.announce(
        DedupKey::Temperature,
        ANNOUNCE_EXPIRE_SECS,
        TOPIC_TEMPERATURE,
        PublishValue::Int(temperature as i32),
    )
}

pub(crate) fn enabled(enabled: bool, publisher: &mut impl Publisher) -> PublishResult {
    publisher.announce(
        DedupKey::EnableAll,
        ANNOUNCE_EXPIRE_SECS,
        TOPIC_ENABLE_ALL,
        PublishValue::Int(i32::from(enabled)),
    )
}
