#![allow(dead_code)]

use rgbcw_light_composer::ports::{
    ChannelOutput, ChannelWriteFlags, ChipDriver, ConfigFlags, DedupKey, EventBus, FlagSet,
    GroupSync, LightEvent, LightFlag, PinRole, PinRoleQuery, Persistence, PublishResult,
    PublishValue, Publisher, RandomSource, SavedLightState,
};
use rgbcw_light_composer::{ChipKind, Rgb};

/// One recorded announcement
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub key: DedupKey,
    pub topic: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i32),
}

/// Records every interaction with the outside world
#[derive(Debug, Clone)]
pub struct MockPorts {
    pub pwm_count: u8,
    pub first_channel: u8,
    pub flags: FlagSet,
    pub channel_writes: Vec<(u8, f32, ChannelWriteFlags)>,
    pub chip_writes: Vec<(ChipKind, [u8; 5])>,
    pub announcements: Vec<Announcement>,
    pub saved: Vec<SavedLightState>,
    pub stored: SavedLightState,
    pub events: Vec<LightEvent>,
    pub group_frames: Vec<[u8; 5]>,
    pub group_enables: Vec<bool>,
    pub group_dimmers: Vec<i32>,
    pub random: Vec<u8>,
    /// Announcements and events in the order they happened
    pub journal: Vec<String>,
}

impl MockPorts {
    /// RGBCW bulb with five PWM channels starting at 0
    pub fn rgbcw() -> Self {
        Self::with_pwm(5, 0)
    }

    pub fn with_pwm(pwm_count: u8, first_channel: u8) -> Self {
        Self {
            pwm_count,
            first_channel,
            flags: FlagSet::EMPTY,
            channel_writes: Vec::new(),
            chip_writes: Vec::new(),
            announcements: Vec::new(),
            saved: Vec::new(),
            stored: SavedLightState {
                mode: 2,
                dimmer: 100,
                temperature: 154,
                rgb: Rgb::new(255, 255, 255),
                enabled: false,
            },
            events: Vec::new(),
            group_frames: Vec::new(),
            group_enables: Vec::new(),
            group_dimmers: Vec::new(),
            random: Vec::new(),
            journal: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: LightFlag) -> Self {
        self.flags.set(flag, true);
        self
    }

    pub fn clear(&mut self) {
        self.channel_writes.clear();
        self.chip_writes.clear();
        self.announcements.clear();
        self.saved.clear();
        self.events.clear();
        self.group_frames.clear();
        self.group_enables.clear();
        self.group_dimmers.clear();
        self.journal.clear();
    }

    /// Values of the last write to each channel, in write order
    pub fn written(&self) -> Vec<(u8, f32)> {
        self.channel_writes
            .iter()
            .map(|(channel, value, _)| (*channel, *value))
            .collect()
    }

    pub fn topics(&self) -> Vec<&str> {
        self.announcements
            .iter()
            .map(|announcement| announcement.topic.as_str())
            .collect()
    }

    pub fn announced(&self, topic: &str) -> Vec<Value> {
        self.announcements
            .iter()
            .filter(|announcement| announcement.topic == topic)
            .map(|announcement| announcement.value.clone())
            .collect()
    }
}

impl ChannelOutput for MockPorts {
    fn set_channel(&mut self, channel: u8, value: f32, flags: ChannelWriteFlags) {
        self.channel_writes.push((channel, value, flags));
    }
}

impl ChipDriver for MockPorts {
    fn write_chip(&mut self, chip: ChipKind, rgbcw: &[u8; 5]) {
        self.chip_writes.push((chip, *rgbcw));
    }
}

impl Publisher for MockPorts {
    fn announce(
        &mut self,
        key: DedupKey,
        _expire_secs: u16,
        topic: &str,
        value: PublishValue<'_>,
    ) -> PublishResult {
        let value = match value {
            PublishValue::Str(text) => Value::Str(text.to_string()),
            PublishValue::Int(number) => Value::Int(number),
        };
        self.journal.push(format!("announce {topic}"));
        self.announcements.push(Announcement {
            key,
            topic: topic.to_string(),
            value,
        });
        PublishResult::Ok
    }
}

impl Persistence for MockPorts {
    fn save_light_state(&mut self, state: &SavedLightState) {
        self.saved.push(*state);
    }

    fn load_light_state(&mut self) -> SavedLightState {
        self.stored
    }
}

impl PinRoleQuery for MockPorts {
    fn count_channels_with_role(&self, _roles: &[PinRole]) -> u8 {
        self.pwm_count
    }

    fn channel_has_role(&self, channel: u8, _roles: &[PinRole]) -> bool {
        channel >= self.first_channel && channel < self.first_channel + self.pwm_count
    }
}

impl EventBus for MockPorts {
    fn fire(&mut self, event: LightEvent) {
        self.journal.push(format!("event {event:?}"));
        self.events.push(event);
    }
}

impl ConfigFlags for MockPorts {
    fn has(&self, flag: LightFlag) -> bool {
        self.flags.contains(flag)
    }
}

impl GroupSync for MockPorts {
    fn on_final_colors_change(&mut self, rgbcw: &[u8; 5]) {
        self.group_frames.push(*rgbcw);
    }

    fn on_enable_change(&mut self, enabled: bool) {
        self.group_enables.push(enabled);
    }

    fn on_dimmer_change(&mut self, dimmer: i32) {
        self.group_dimmers.push(dimmer);
    }
}

impl RandomSource for MockPorts {
    fn random_byte(&mut self) -> u8 {
        if self.random.is_empty() {
            0
        } else {
            self.random.remove(0)
        }
    }
}

pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +- {tolerance}, got {actual}"
    );
}
