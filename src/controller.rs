//! Light controller
//!
//! Owns the light state, its configuration and the transition engine, and
//! implements every state-changing operation of the light. Each operation
//! mutates the state, recomposes the output and emits the matching
//! announcements through the ports.
//!
//! Enable changes are queued while an operation runs and only delivered to
//! the [`EventBus`](crate::ports::EventBus) once it has completed. Listeners
//! that want to react with another light change post a [`Command`] to the
//! mailbox instead of calling back in.

use embassy_time::Duration;
use heapless::Deque;

use crate::announce;
use crate::color::{HexString, Hsv, RGBCW_CHANNELS, cold_warm_split, to_hex};
use crate::command::{Command, DimmerUpdate, PowerChange};
use crate::composer;
use crate::curve::ExponentialMode;
use crate::logging::{debug, info, warning};
use crate::mailbox::CommandReceiver;
use crate::ports::{LightEvent, LightFlag, LightPorts, PublishResult};
use crate::state::{ColorMode, LightConfig, LightState};
use crate::topology::ChannelTopology;
use crate::transition::TransitionEngine;

/// Pending enable events per operation.
const EVENT_QUEUE_SIZE: usize = 4;

/// Dimmer value the brightness never exceeds.
const DIMMER_MAX: f32 = 100.0;

/// Dimmer step of a button hold.
const DIMMER_HOLD_STEP: i32 = 10;

/// Lowest dimmer reachable by a button hold, so a hold never turns the
/// light into an enabled but black fixture.
const DIMMER_HOLD_MIN: i32 = 2;

/// Temperature step of a button hold.
const TEMPERATURE_HOLD_STEP: i32 = 25;

/// Base colors `led_nextColor` cycles through.
const NEXT_COLOR_PALETTE: [&str; 7] = [
    "FF0000", "00FF00", "0000FF", "FFFF00", "00FFFF", "FF00FF", "FFFFFF",
];

/// Single owner of the light state.
pub struct LightController {
    state: LightState,
    config: LightConfig,
    transition: TransitionEngine,
    events: Deque<LightEvent, EVENT_QUEUE_SIZE>,
    next_color: usize,
}

impl LightController {
    pub const fn new(config: LightConfig) -> Self {
        Self {
            state: LightState::new(config.temperature),
            config,
            transition: TransitionEngine::new(),
            events: Deque::new(),
            next_color: 0,
        }
    }

    pub const fn state(&self) -> &LightState {
        &self.state
    }

    pub const fn config(&self) -> &LightConfig {
        &self.config
    }

    pub const fn transition(&self) -> &TransitionEngine {
        &self.transition
    }

    /// Apply the stored temperature without side effects.
    ///
    /// Cold/warm-only fixtures start in temperature mode.
    pub fn init<P: LightPorts>(&mut self, ports: &mut P) {
        self.store_temperature(self.state.temperature);
        let topology = ChannelTopology::resolve(&*ports, &*ports);
        debug!(
            "topology: {} pwm, first channel {}",
            topology.pwm_count(),
            topology.first_channel_index()
        );
        if topology.is_cw_mode() {
            self.set_mode(ColorMode::Temperature);
        }
    }

    /// Recompose the output from the current state.
    pub fn apply<P: LightPorts>(&mut self, ports: &mut P) -> [u8; RGBCW_CHANNELS] {
        composer::compose(&mut self.state, &self.config, ports)
    }

    /// Switch the color mode; no-op when unchanged.
    pub fn set_mode(&mut self, mode: ColorMode) {
        if self.state.mode != mode {
            debug!(
                "Changing LightMode from {} to {}",
                self.state.mode.as_str(),
                mode.as_str()
            );
            self.state.mode = mode;
        }
    }

    /// Turn the light on or off.
    ///
    /// Color and brightness are kept. Switching on also announces the
    /// dimmer, so listeners see the brightness the light comes back with.
    pub fn set_enabled<P: LightPorts>(&mut self, enabled: bool, ports: &mut P) {
        let was_enabled = self.state.enabled;
        if was_enabled != enabled {
            self.queue_event(LightEvent::StateChanged(enabled));
        }
        self.state.enabled = enabled;

        self.apply(ports);
        ports.on_enable_change(enabled);
        announce::enabled(enabled, ports);
        if !was_enabled && enabled {
            announce::dimmer(self.dimmer(), ports);
        }
        self.flush_events(ports);
    }

    pub fn toggle_enabled<P: LightPorts>(&mut self, ports: &mut P) {
        self.set_enabled(!self.state.enabled, ports);
    }

    /// Set the dimmer (0-100 with the default multiplier).
    #[allow(clippy::cast_precision_loss)]
    pub fn set_dimmer<P: LightPorts>(&mut self, dimmer: i32, ports: &mut P) {
        self.state.brightness = dimmer as f32 * self.config.brightness_multiplier;
        ports.on_dimmer_change(dimmer);

        self.apply(ports);
        announce::dimmer(self.dimmer(), ports);

        let topology = ChannelTopology::resolve(&*ports, &*ports);
        if ports.has(LightFlag::BroadcastParamsTogether) {
            announce::base_color(&self.state, topology, ports);
        }
        if ports.has(LightFlag::BroadcastFinalColor) {
            announce::final_color(&self.state, topology, ports);
        }
        self.flush_events(ports);
    }

    /// Move the dimmer by `delta`.
    ///
    /// Leaving `min..=100` either clamps or jumps to the opposite end.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn add_dimmer<P: LightPorts>(&mut self, delta: i32, wrap: bool, min: i32, ports: &mut P) {
        let min = min as f32;
        let mut dimmer = (self.dimmer() + delta) as f32;
        if wrap {
            if dimmer < min {
                dimmer = DIMMER_MAX;
            } else if dimmer > DIMMER_MAX {
                dimmer = min;
            }
        } else {
            dimmer = dimmer.max(min).min(DIMMER_MAX);
        }
        self.set_dimmer(dimmer as i32, ports);
    }

    pub fn next_dimmer_hold<P: LightPorts>(&mut self, ports: &mut P) {
        self.add_dimmer(DIMMER_HOLD_STEP, true, DIMMER_HOLD_MIN, ports);
    }

    /// Store a color temperature and derive the white channels from it.
    ///
    /// With `apply` the light also switches to temperature mode, announces
    /// the temperature and recomposes.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_temperature<P: LightPorts>(&mut self, temperature: i32, apply: bool, ports: &mut P) {
        self.store_temperature(temperature as f32);
        if apply {
            self.set_mode(ColorMode::Temperature);
            announce::temperature(self.state.temperature, ports);
            self.apply(ports);
            self.flush_events(ports);
        }
    }

    /// Move the temperature by `delta`, clamping or wrapping at the bounds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn add_temperature<P: LightPorts>(&mut self, delta: i32, wrap: bool, ports: &mut P) {
        let range = self.config.temperature;
        let moved = self.state.temperature + delta as f32;
        let temperature = if wrap {
            range.wrap(moved)
        } else {
            range.clamp(moved)
        };
        self.set_temperature(temperature as i32, true, ports);
    }

    pub fn next_temperature_hold<P: LightPorts>(&mut self, ports: &mut P) {
        self.add_temperature(TEMPERATURE_HOLD_STEP, true, ports);
    }

    /// Apply a hex color string (`RRGGBB`, `RRGGBBCCWW` or `rand`).
    ///
    /// `all` selects the RGBCW variant, which also switches to the combined
    /// mode. Returns the number of channels parsed.
    pub fn set_base_color_hex<P: LightPorts>(&mut self, text: &str, all: bool, ports: &mut P) -> u8 {
        debug!("base color: {}", text);
        self.set_mode(if all { ColorMode::All } else { ColorMode::Rgb });

        let parsed = self.state.color.set_from_hex(text, all, ports);

        self.apply(ports);
        let topology = ChannelTopology::resolve(&*ports, &*ports);
        announce::base_color(&self.state, topology, ports);
        if ports.has(LightFlag::BroadcastParamsTogether) {
            announce::dimmer(self.dimmer(), ports);
        }
        if ports.has(LightFlag::BroadcastFinalColor) {
            announce::final_color(&self.state, topology, ports);
        }
        self.flush_events(ports);
        parsed
    }

    /// Step to the next base color of the palette.
    ///
    /// Wraps after the last entry. Returns the applied color.
    pub fn next_color<P: LightPorts>(&mut self, ports: &mut P) -> &'static str {
        let color = NEXT_COLOR_PALETTE[self.next_color];
        self.next_color = (self.next_color + 1) % NEXT_COLOR_PALETTE.len();
        self.set_base_color_hex(color, false, ports);
        color
    }

    /// Set the color from hue (degrees), saturation and brightness (0-100).
    pub fn set_base_color_hsb<P: LightPorts>(&mut self, hue: f32, sat: f32, bri: f32, ports: &mut P) {
        self.set_mode(ColorMode::Rgb);
        self.state.color.set_hsv(Hsv::new(hue, sat * 0.01, bri * 0.01));
        self.on_hsv_changed(ports);
    }

    pub fn set_hue<P: LightPorts>(&mut self, hue: f32, ports: &mut P) {
        self.set_mode(ColorMode::Rgb);
        self.state.color.set_hue(hue);
        self.on_hsv_changed(ports);
    }

    /// Set saturation (0-100).
    pub fn set_saturation<P: LightPorts>(&mut self, sat: f32, ports: &mut P) {
        self.set_mode(ColorMode::Rgb);
        self.state.color.set_saturation(sat * 0.01);
        self.on_hsv_changed(ports);
    }

    /// Set the HSV brightness (0-100); the dimmer is not touched.
    pub fn set_hsv_brightness<P: LightPorts>(&mut self, bri: f32, ports: &mut P) {
        self.set_mode(ColorMode::Rgb);
        self.state.color.set_value(bri * 0.01);
        self.on_hsv_changed(ports);
    }

    fn on_hsv_changed<P: LightPorts>(&mut self, ports: &mut P) {
        let topology = ChannelTopology::resolve(&*ports, &*ports);
        announce::base_color(&self.state, topology, ports);
        self.apply(ports);
        if ports.has(LightFlag::BroadcastFinalColor) {
            announce::final_color(&self.state, topology, ports);
        }
        self.flush_events(ports);
    }

    /// Take over a frame reported by another device of the group.
    ///
    /// A frame with any white content is treated as a temperature color,
    /// otherwise as plain RGB.
    pub fn ingest_final_rgbcw<P: LightPorts>(&mut self, rgbcw: [u8; RGBCW_CHANNELS], ports: &mut P) {
        let [r, g, b, cold, warm] = rgbcw;
        if cold == 0 && warm == 0 {
            self.set_final_rgb(r, g, b, ports);
        } else {
            self.set_final_cw(cold, warm, ports);
        }
    }

    pub fn set_final_rgb<P: LightPorts>(&mut self, r: u8, g: u8, b: u8, ports: &mut P) {
        self.set_mode(ColorMode::Rgb);
        self.state
            .color
            .set_rgb(f32::from(r), f32::from(g), f32::from(b));
        self.apply(ports);
        self.flush_events(ports);
    }

    /// Take over raw white levels.
    ///
    /// The temperature is estimated from the cold level alone.
    pub fn set_final_cw<P: LightPorts>(&mut self, cold: u8, warm: u8, ports: &mut P) {
        self.set_mode(ColorMode::Temperature);
        self.state.temperature = self
            .config
            .temperature
            .from_fraction(f32::from(cold) / 255.0);
        self.state
            .color
            .set_cold_warm(f32::from(cold), f32::from(warm));
        self.apply(ports);
        self.flush_events(ports);
    }

    /// Announce the value that defines the current mode.
    ///
    /// Temperature mode announces the temperature, RGB mode the base color.
    /// The combined mode has nothing to announce.
    pub fn send_current_light_mode<P: LightPorts>(&self, ports: &mut P) -> PublishResult {
        match self.state.mode {
            ColorMode::Temperature => announce::temperature(self.state.temperature, ports),
            ColorMode::Rgb => {
                let topology = ChannelTopology::resolve(&*ports, &*ports);
                announce::base_color(&self.state, topology, ports)
            }
            ColorMode::All => PublishResult::NotRequired,
        }
    }

    /// Reload the last saved state, when remembering it is enabled.
    ///
    /// Returns whether anything was restored. No enable event is raised.
    #[allow(clippy::cast_precision_loss)]
    pub fn restore_from_persistence<P: LightPorts>(&mut self, ports: &mut P) -> bool {
        if !ports.has(LightFlag::RememberLastState) {
            return false;
        }
        let saved = ports.load_light_state();
        info!(
            "restoring light: mode {}, dimmer {}, temperature {}",
            saved.mode, saved.dimmer, saved.temperature
        );

        self.state.enabled = saved.enabled;
        let mode = ColorMode::from_raw(saved.mode).unwrap_or_else(|| {
            warning!("saved light mode {} is invalid, using rgb", saved.mode);
            ColorMode::Rgb
        });
        self.set_mode(mode);
        self.state.brightness = f32::from(saved.dimmer) * self.config.brightness_multiplier;
        self.store_temperature(f32::from(saved.temperature));
        self.state.color.set_rgb(
            f32::from(saved.rgb.r),
            f32::from(saved.rgb.g),
            f32::from(saved.rgb.b),
        );
        self.apply(ports);
        true
    }

    /// Return state and calibration to their power-on defaults.
    ///
    /// Curve, lerp speed and driver chips are kept. Nothing is written to
    /// the outputs until the next composition.
    pub fn reset_to_defaults(&mut self) {
        self.config.reset_calibration();
        self.state = LightState::new(self.config.temperature);
        self.events.clear();
        self.next_color = 0;
    }

    /// Select the brightness curve by raw id; out of range ids are ignored.
    pub fn set_exponential_mode_raw(&mut self, raw: i32) {
        self.config.exponential_mode = ExponentialMode::from_raw_or(raw, self.config.exponential_mode);
    }

    pub fn set_exponential_mode(&mut self, mode: ExponentialMode) {
        self.config.exponential_mode = mode;
    }

    /// Transition speed in color units per second.
    pub fn set_lerp_speed(&mut self, speed: f32) {
        self.config.lerp_speed = speed;
    }

    pub fn set_brightness_multiplier(&mut self, multiplier: f32) {
        self.config.brightness_multiplier = multiplier;
    }

    pub fn set_channel_scale(&mut self, scale: f32) {
        self.config.channel_scale = scale;
    }

    /// Advance the smooth transition by `delta`.
    pub fn run_transition<P: LightPorts>(&mut self, delta: Duration, ports: &mut P) -> [u8; RGBCW_CHANNELS] {
        self.transition.step(delta, &self.state, &self.config, ports)
    }

    /// Advance the smooth transition by `delta_ms` milliseconds.
    pub fn run_transition_ms<P: LightPorts>(&mut self, delta_ms: u32, ports: &mut P) -> [u8; RGBCW_CHANNELS] {
        self.transition.step_ms(delta_ms, &self.state, &self.config, ports)
    }

    /// Current dimmer on the 0-100 scale.
    pub fn dimmer(&self) -> i32 {
        self.state.dimmer(&self.config)
    }

    pub const fn temperature(&self) -> f32 {
        self.state.temperature
    }

    pub const fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub const fn mode(&self) -> ColorMode {
        self.state.mode
    }

    /// Hue in degrees.
    pub const fn hue(&self) -> f32 {
        self.state.color.hsv().hue
    }

    /// Saturation on the 0-100 scale.
    pub fn saturation(&self) -> f32 {
        self.state.color.hsv().sat * 100.0
    }

    pub fn final_rgbcw(&self) -> [u8; RGBCW_CHANNELS] {
        self.state.final_rgbcw()
    }

    pub fn final_channels_100(&self) -> [u8; RGBCW_CHANNELS] {
        self.state.final_channels_100()
    }

    /// Base RGB as `RRGGBB`.
    pub fn base_color_hex(&self) -> HexString {
        let rgb = self.state.color.base_rgb();
        to_hex(&[rgb.r, rgb.g, rgb.b])
    }

    /// Run one command.
    pub fn execute<P: LightPorts>(&mut self, command: Command, ports: &mut P) {
        debug!("light command: {:?}", command);
        match command {
            Command::Dimmer(update) => self.apply_dimmer_update(update, ports),
            Command::AddDimmer { delta, wrap } => self.add_dimmer(delta, wrap, 0, ports),
            Command::Power(PowerChange::Set(enabled)) => self.set_enabled(enabled, ports),
            Command::Power(PowerChange::Toggle) => self.toggle_enabled(ports),
            Command::BaseColorRgb(text) => {
                self.set_base_color_hex(&text, false, ports);
            }
            Command::BaseColorRgbcw(text) => {
                self.set_base_color_hex(&text, true, ports);
            }
            Command::Temperature(temperature) => self.set_temperature(temperature, true, ports),
            Command::BrightnessMultiplier(multiplier) => self.set_brightness_multiplier(multiplier),
            Command::ChannelScale(scale) => self.set_channel_scale(scale),
            Command::Hue(hue) => self.set_hue(hue, ports),
            Command::Saturation(sat) => self.set_saturation(sat, ports),
            Command::HsvBrightness(bri) => self.set_hsv_brightness(bri, ports),
            Command::HsbColor { hue, sat, bri } => self.set_base_color_hsb(hue, sat, bri, ports),
            Command::LerpSpeed(speed) => self.set_lerp_speed(speed),
            Command::ExponentialMode(raw) => self.set_exponential_mode_raw(raw),
            Command::NextDimmerHold => self.next_dimmer_hold(ports),
            Command::NextTemperatureHold => self.next_temperature_hold(ports),
            Command::NextColor => {
                self.next_color(ports);
            }
        }
    }

    /// Execute every command waiting in the mailbox (non-blocking).
    ///
    /// Returns the number of commands executed.
    pub fn process_pending<P: LightPorts, const SIZE: usize>(
        &mut self,
        commands: &CommandReceiver<'_, SIZE>,
        ports: &mut P,
    ) -> usize {
        let mut executed = 0;
        while let Some(command) = commands.try_receive() {
            self.execute(command, ports);
            executed += 1;
        }
        executed
    }

    fn apply_dimmer_update<P: LightPorts>(&mut self, update: DimmerUpdate, ports: &mut P) {
        if let Some(dimmer) = update.dimmer {
            self.set_dimmer(dimmer, ports);
        }
        if let Some(enabled) = update.enabled {
            self.set_enabled(enabled, ports);
        }
    }

    fn store_temperature(&mut self, temperature: f32) {
        self.state.temperature = temperature;
        let (cold, warm) = cold_warm_split(self.config.temperature.fraction(temperature));
        self.state.color.set_cold_warm(cold, warm);
    }

    fn queue_event(&mut self, event: LightEvent) {
        if self.events.push_back(event).is_err() {
            warning!("light event queue full, dropping {:?}", event);
        }
    }

    fn flush_events(&mut self, ports: &mut impl LightPorts) {
        while let Some(event) = self.events.pop_front() {
            ports.fire(event);
        }
    }
}

impl Default for LightController {
    fn default() -> Self {
        Self::new(LightConfig::DEFAULT)
    }
}
