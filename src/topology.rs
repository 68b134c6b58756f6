//! Physical channel topology
//!
//! The logical color vector is always RGBCW. How it lands on physical
//! channels depends on the pin configuration:
//!
//! - boards with a PWM on channel 0 start RGB at channel 0, the others at 1
//! - exactly two PWM channels means a cold/warm-only (CW) fixture
//! - the "force RGB" flag hides the white channels entirely

use heapless::Vec;

use crate::ports::{ConfigFlags, LightFlag, PWM_ROLES, PinRoleQuery};

/// Serial LED driver chips the composer can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipKind {
    Sm2135,
    Bp5758d,
    Bp1658cj,
}

impl ChipKind {
    pub const ALL: [Self; 3] = [Self::Sm2135, Self::Bp5758d, Self::Bp1658cj];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sm2135 => "SM2135",
            Self::Bp5758d => "BP5758D",
            Self::Bp1658cj => "BP1658CJ",
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|chip| chip.as_str().eq_ignore_ascii_case(s))
    }
}

/// Set of driver chips that are active on this device.
///
/// Resolved once when the device is configured; composition just iterates
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipSet {
    chips: Vec<ChipKind, 3>,
}

impl ChipSet {
    pub const fn new() -> Self {
        Self { chips: Vec::new() }
    }

    /// Build the set from the chips the driver registry reports as running.
    pub fn from_running(mut is_running: impl FnMut(ChipKind) -> bool) -> Self {
        let mut set = Self::new();
        for chip in ChipKind::ALL {
            if is_running(chip) {
                set.insert(chip);
            }
        }
        set
    }

    pub fn insert(&mut self, chip: ChipKind) {
        if !self.contains(chip) {
            // capacity equals the number of chip kinds
            let _ = self.chips.push(chip);
        }
    }

    pub fn contains(&self, chip: ChipKind) -> bool {
        self.chips.contains(&chip)
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ChipKind> + '_ {
        self.chips.iter().copied()
    }
}

/// How the logical RGBCW channels map onto physical outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMapping {
    /// Index `i` goes to physical `first + i`.
    Direct,
    /// Cold goes to `first`, warm to `first + 1`.
    ColdWarm,
    /// `first` carries the temperature, `first + 1` the brightness.
    AlternateColdWarm,
}

/// Snapshot of the channel topology.
///
/// Probed from the pin configuration at the start of every composition and
/// transition step, so pin changes take effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelTopology {
    pwm_count: u8,
    first_channel: u8,
    force_rgb: bool,
    force_show_rgb: bool,
    alternate_cw: bool,
}

impl ChannelTopology {
    pub fn resolve(pins: &impl PinRoleQuery, flags: &impl ConfigFlags) -> Self {
        Self {
            pwm_count: pins.count_channels_with_role(PWM_ROLES),
            first_channel: if pins.channel_has_role(0, PWM_ROLES) {
                0
            } else {
                1
            },
            force_rgb: flags.has(LightFlag::ForceRgbMode),
            force_show_rgb: flags.has(LightFlag::ForceShowRgbcwController),
            alternate_cw: flags.has(LightFlag::AlternateCwMode),
        }
    }

    /// Physical index of the first logical channel (0 or 1).
    pub const fn first_channel_index(self) -> u8 {
        self.first_channel
    }

    pub const fn pwm_count(self) -> u8 {
        self.pwm_count
    }

    /// Cold/warm-only fixture: exactly two PWM channels.
    pub const fn is_cw_mode(self) -> bool {
        self.pwm_count == 2
    }

    /// Whether RGB color announcements make sense for this device.
    pub const fn should_broadcast_rgb(self) -> bool {
        self.force_show_rgb || self.pwm_count > 2
    }

    /// Exclusive upper bound of composed logical indices (3 or 5).
    pub const fn max_composable_index(self) -> usize {
        if self.force_rgb { 3 } else { 5 }
    }

    pub const fn mapping(self) -> ChannelMapping {
        if self.is_cw_mode() {
            if self.alternate_cw {
                ChannelMapping::AlternateColdWarm
            } else {
                ChannelMapping::ColdWarm
            }
        } else {
            ChannelMapping::Direct
        }
    }

    /// Whether any light output exists at all.
    pub fn is_led_running(self, chips: &ChipSet) -> bool {
        !chips.is_empty() || self.pwm_count > 0
    }

    /// Whether the RGBCW controller should be shown for this device.
    ///
    /// True with PWM outputs, or when the controller is forced on.
    pub const fn is_running_driver(self) -> bool {
        self.pwm_count > 0 || self.force_show_rgb
    }
}
