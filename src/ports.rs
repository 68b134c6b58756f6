//! Collaborator traits
//!
//! The composer never touches hardware, storage or the network directly.
//! Everything outside the light state goes through these traits, which the
//! firmware implements on top of its PWM, driver-chip, MQTT and flash
//! layers.
//!
//! ```text
//!   commands ──▶ LightController ──▶ ChannelOutput / ChipDriver
//!                      │
//!                      ├──▶ Publisher / Persistence / GroupSync
//!                      └──▶ EventBus (after the operation returns)
//! ```

use crate::color::{RGBCW_CHANNELS, Rgb};
use crate::topology::ChipKind;

/// Flags attached to a physical channel write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelWriteFlags {
    /// Do not publish the channel value.
    pub skip_publish: bool,
    /// Do not log the write.
    pub silent: bool,
}

impl ChannelWriteFlags {
    /// Flags used for every write made by the composer.
    pub const QUIET: Self = Self {
        skip_publish: true,
        silent: true,
    };
}

/// Physical channel sink (PWM duty in percent).
pub trait ChannelOutput {
    /// Drive `channel` to `value` (0-100).
    fn set_channel(&mut self, channel: u8, value: f32, flags: ChannelWriteFlags);
}

/// Serial LED driver chips.
pub trait ChipDriver {
    /// Send an RGBCW frame to one chip.
    fn write_chip(&mut self, chip: ChipKind, rgbcw: &[u8; RGBCW_CHANNELS]);
}

/// Deduplication slot of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DedupKey {
    BaseColorRgb,
    FinalColorRgb,
    FinalColorRgbcw,
    Dimmer,
    Temperature,
    EnableAll,
}

/// Announcement payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishValue<'a> {
    Str(&'a str),
    Int(i32),
}

/// Outcome of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishResult {
    Ok,
    NotRequired,
    Failed,
}

/// Deduplicated outward announcements (MQTT in the firmware).
pub trait Publisher {
    /// Announce `value` under `topic`.
    ///
    /// Implementations may drop the message when the same `key` carried the
    /// same value less than `expire_secs` ago.
    fn announce(
        &mut self,
        key: DedupKey,
        expire_secs: u16,
        topic: &str,
        value: PublishValue<'_>,
    ) -> PublishResult;
}

/// Light state as stored in flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedLightState {
    /// Raw light mode id, see [`ColorMode::from_raw`](crate::ColorMode::from_raw).
    pub mode: u8,
    /// Dimmer, 0-100.
    pub dimmer: i16,
    /// Color temperature.
    pub temperature: i16,
    pub rgb: Rgb,
    pub enabled: bool,
}

/// Best-effort light state storage.
pub trait Persistence {
    fn save_light_state(&mut self, state: &SavedLightState);

    fn load_light_state(&mut self) -> SavedLightState;
}

/// Pin roles relevant to light output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    Pwm,
    /// PWM with inverted polarity.
    PwmInverted,
}

/// PWM roles a light channel can be driven by.
pub const PWM_ROLES: &[PinRole] = &[PinRole::Pwm, PinRole::PwmInverted];

/// Pin configuration queries.
pub trait PinRoleQuery {
    /// Number of pins with any of `roles`.
    fn count_channels_with_role(&self, roles: &[PinRole]) -> u8;

    /// Whether `channel` is bound to a pin with any of `roles`.
    fn channel_has_role(&self, channel: u8, roles: &[PinRole]) -> bool;
}

/// Light events delivered to the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightEvent {
    /// The light was switched on (`true`) or off (`false`).
    StateChanged(bool),
}

pub trait EventBus {
    fn fire(&mut self, event: LightEvent);
}

/// Configuration flags consulted by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LightFlag {
    /// Only drive channels 0-2.
    ForceRgbMode,
    /// Two-PWM devices use one PWM for brightness and one for temperature.
    AlternateCwMode,
    /// Hardware writes happen from the transition tick.
    SmoothTransitions,
    /// Save the light state after every composition.
    RememberLastState,
    /// Announce the final RGBCW vector after every composition.
    BroadcastFullRgbcw,
    /// Announce color and dimmer together.
    BroadcastParamsTogether,
    /// Announce the final (brightness applied) RGB color.
    BroadcastFinalColor,
    /// Announce RGB even on devices with two PWM channels or fewer.
    ForceShowRgbcwController,
}

pub trait ConfigFlags {
    fn has(&self, flag: LightFlag) -> bool;
}

/// Bitmask implementation of [`ConfigFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagSet(u16);

impl FlagSet {
    pub const EMPTY: Self = Self(0);

    pub const fn with(self, flag: LightFlag) -> Self {
        Self(self.0 | Self::bit(flag))
    }

    pub const fn without(self, flag: LightFlag) -> Self {
        Self(self.0 & !Self::bit(flag))
    }

    pub fn set(&mut self, flag: LightFlag, enabled: bool) {
        *self = if enabled {
            self.with(flag)
        } else {
            self.without(flag)
        };
    }

    pub const fn contains(self, flag: LightFlag) -> bool {
        self.0 & Self::bit(flag) != 0
    }

    const fn bit(flag: LightFlag) -> u16 {
        1 << flag as u8
    }
}

impl ConfigFlags for FlagSet {
    fn has(&self, flag: LightFlag) -> bool {
        self.contains(flag)
    }
}

/// Listener for device-group style synchronization.
///
/// All methods default to no-ops.
pub trait GroupSync {
    fn on_final_colors_change(&mut self, _rgbcw: &[u8; RGBCW_CHANNELS]) {}

    fn on_enable_change(&mut self, _enabled: bool) {}

    fn on_dimmer_change(&mut self, _dimmer: i32) {}
}

/// Source of random bytes for the `rand` color command.
pub trait RandomSource {
    fn random_byte(&mut self) -> u8;
}

/// Everything the light controller talks to.
pub trait LightPorts:
    ChannelOutput
    + ChipDriver
    + Publisher
    + Persistence
    + PinRoleQuery
    + EventBus
    + ConfigFlags
    + GroupSync
    + RandomSource
{
}

impl<T> LightPorts for T where
    T: ChannelOutput
        + ChipDriver
        + Publisher
        + Persistence
        + PinRoleQuery
        + EventBus
        + ConfigFlags
        + GroupSync
        + RandomSource
{
}
