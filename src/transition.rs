//! Smooth transitions between composed colors
//!
//! When smooth transitions are enabled the composer only updates the
//! target. This engine runs from a periodic tick and moves its own copy of
//! the RGBCW levels towards that target at a fixed rate, writing every
//! intermediate step to the hardware.

use embassy_time::Duration;

use crate::color::{RGBCW_CHANNELS, Rgbcw, rgbcw_bytes};
use crate::composer::{alternate_cw_levels, write_channels};
use crate::ports::{ChannelWriteFlags, LightPorts};
use crate::state::{LightConfig, LightState};
use crate::topology::{ChannelMapping, ChannelTopology};

/// Move `current` towards `target` by at most `max_step`.
///
/// Lands exactly on `target` once it is within reach, so it never
/// overshoots.
#[inline]
pub fn move_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let remaining = target - current;
    if libm::fabsf(remaining) <= max_step {
        return target;
    }
    if remaining < 0.0 {
        current - max_step
    } else {
        current + max_step
    }
}

/// Linear approach of the output levels towards the composed target.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionEngine {
    current: Rgbcw,
    brightness_lerp: f32,
    warm_cold_lerp: f32,
}

impl TransitionEngine {
    /// Start from all channels off.
    pub const fn new() -> Self {
        Self {
            current: [0.0; RGBCW_CHANNELS],
            brightness_lerp: 0.0,
            warm_cold_lerp: 0.0,
        }
    }

    /// Interpolated RGBCW levels, 0-255.
    pub const fn current(&self) -> &Rgbcw {
        &self.current
    }

    /// Interpolated brightness level of an alternate CW driver (0-100).
    pub const fn brightness_lerp(&self) -> f32 {
        self.brightness_lerp
    }

    /// Interpolated temperature level of an alternate CW driver (0-100).
    pub const fn warm_cold_lerp(&self) -> f32 {
        self.warm_cold_lerp
    }

    /// Advance by `delta` and write the result to the outputs.
    #[allow(clippy::cast_possible_truncation)]
    pub fn step<P: LightPorts>(
        &mut self,
        delta: Duration,
        state: &LightState,
        config: &LightConfig,
        ports: &mut P,
    ) -> [u8; RGBCW_CHANNELS] {
        self.step_ms(delta.as_millis() as u32, state, config, ports)
    }

    /// Advance by `delta_ms` milliseconds and write the result to the outputs.
    ///
    /// Channel writes are quiet (no publish, no log); this path never
    /// announces or persists anything.
    #[allow(clippy::cast_precision_loss)]
    pub fn step_ms<P: LightPorts>(
        &mut self,
        delta_ms: u32,
        state: &LightState,
        config: &LightConfig,
        ports: &mut P,
    ) -> [u8; RGBCW_CHANNELS] {
        let max_step = delta_ms as f32 * 0.001 * config.lerp_speed;

        for (current, target) in self.current.iter_mut().zip(state.final_color()) {
            *current = move_towards(*current, *target, max_step);
        }

        let topology = ChannelTopology::resolve(&*ports, &*ports);
        match topology.mapping() {
            ChannelMapping::AlternateColdWarm => {
                let (temperature, brightness) = alternate_cw_levels(state, config);
                self.brightness_lerp = move_towards(self.brightness_lerp, brightness, max_step);
                self.warm_cold_lerp = move_towards(self.warm_cold_lerp, temperature, max_step);

                let first = topology.first_channel_index();
                ports.set_channel(first, self.warm_cold_lerp, ChannelWriteFlags::QUIET);
                ports.set_channel(first + 1, self.brightness_lerp, ChannelWriteFlags::QUIET);
            }
            mapping => write_channels(&self.current, mapping, topology, config, ports),
        }

        let frame = rgbcw_bytes(&self.current);
        for chip in config.chips.iter() {
            ports.write_chip(chip, &frame);
        }
        frame
    }
}
