//! Light composition
//!
//! Turns the light state into the final RGBCW vector and drives the
//! physical channels with it:
//!
//! 1. brightness curve (or zero when the light is off)
//! 2. mode mask (RGB hides white, temperature hides RGB)
//! 3. channel scale and clamp to 0-100
//! 4. mapping onto physical channels (direct, CW or alternate CW)
//!
//! With smooth transitions enabled only the target is updated here; the
//! transition tick performs the hardware writes.

use crate::announce;
use crate::color::{COLD_INDEX, RGBCW_CHANNELS, WARM_INDEX, rgbcw_bytes};
use crate::ports::{ChannelWriteFlags, LightFlag, LightPorts};
use crate::state::{LightConfig, LightState};
use crate::topology::{ChannelMapping, ChannelTopology};

/// Highest level a physical channel accepts.
pub const CHANNEL_MAX: f32 = 100.0;

/// Scale a 0-255 level into a clamped 0-100 channel level.
#[inline]
pub(crate) fn channel_level(value: f32, scale: f32) -> f32 {
    (value * scale).clamp(0.0, CHANNEL_MAX)
}

/// Temperature and brightness levels of an alternate CW driver (0-100).
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn alternate_cw_levels(state: &LightState, config: &LightConfig) -> (f32, f32) {
    if !state.enabled {
        return (0.0, 0.0);
    }
    let temperature = config.temperature.fraction(state.temperature);
    (
        libm::truncf(temperature * 100.0),
        libm::truncf(state.brightness * 100.0),
    )
}

/// Compose the final color and push it to the outputs.
///
/// Returns the composed frame as driver bytes.
pub fn compose<P: LightPorts>(
    state: &mut LightState,
    config: &LightConfig,
    ports: &mut P,
) -> [u8; RGBCW_CHANNELS] {
    let topology = ChannelTopology::resolve(&*ports, &*ports);
    let smooth = ports.has(LightFlag::SmoothTransitions);
    let first = topology.first_channel_index();

    let frame = match topology.mapping() {
        ChannelMapping::AlternateColdWarm => {
            state.final_color = [0.0; RGBCW_CHANNELS];
            if state.enabled {
                for index in COLD_INDEX..=WARM_INDEX {
                    state.final_color[index] = state.color.base()[index] * state.brightness;
                }
            }
            if !smooth {
                let (temperature, brightness) = alternate_cw_levels(state, config);
                ports.set_channel(first, temperature, ChannelWriteFlags::QUIET);
                ports.set_channel(first + 1, brightness, ChannelWriteFlags::QUIET);
            }
            rgbcw_bytes(&state.final_color)
        }
        mapping => {
            compose_channels(state, config, topology);
            if !smooth {
                write_channels(&state.final_color, mapping, topology, config, ports);
            }
            rgbcw_bytes(&state.final_color)
        }
    };

    if !smooth {
        for chip in config.chips.iter() {
            ports.write_chip(chip, &frame);
        }
    }

    if ports.has(LightFlag::RememberLastState) {
        ports.save_light_state(&state.to_saved(config));
    }

    ports.on_final_colors_change(&frame);

    if ports.has(LightFlag::BroadcastFullRgbcw) {
        announce::final_rgbcw(&frame, ports);
    }

    frame
}

/// Fill `final_color` from the base color.
///
/// Indices past the composable range are zeroed.
fn compose_channels(state: &mut LightState, config: &LightConfig, topology: ChannelTopology) {
    let max_index = topology.max_composable_index();
    for index in 0..RGBCW_CHANNELS {
        let mut level = 0.0;
        if index < max_index && state.enabled {
            level = config
                .exponential_mode
                .apply(state.color.base()[index], state.brightness);
        }
        if state.mode.masks(index) {
            level = 0.0;
        }
        state.final_color[index] = level;
    }
}

/// Write logical levels to the physical channels.
///
/// Shared with the transition tick, which passes its interpolated levels.
pub(crate) fn write_channels(
    levels: &[f32; RGBCW_CHANNELS],
    mapping: ChannelMapping,
    topology: ChannelTopology,
    config: &LightConfig,
    ports: &mut impl LightPorts,
) {
    let first = topology.first_channel_index();
    match mapping {
        ChannelMapping::ColdWarm => {
            let cold = channel_level(levels[COLD_INDEX], config.channel_scale);
            let warm = channel_level(levels[WARM_INDEX], config.channel_scale);
            ports.set_channel(first, cold, ChannelWriteFlags::QUIET);
            ports.set_channel(first + 1, warm, ChannelWriteFlags::QUIET);
        }
        ChannelMapping::Direct => {
            for (offset, level) in (0u8..).zip(&levels[..topology.max_composable_index()]) {
                let value = channel_level(*level, config.channel_scale);
                ports.set_channel(first + offset, value, ChannelWriteFlags::QUIET);
            }
        }
        // driven from temperature and brightness levels instead
        ChannelMapping::AlternateColdWarm => {}
    }
}
