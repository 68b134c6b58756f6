//! Light commands
//!
//! One variant per command of the light surface. Commands can be built
//! directly, or parsed from the firmware command name and its argument
//! string (`led_dimmer 50`, `led_basecolor_rgb #FF8000`, `HSBColor 90,100,100`).

use heapless::String;
use serde::Deserialize;

use crate::logging::{info, warning};

/// Longest color argument kept; longer tokens are cut (`#RRGGBBCCWW` plus slack).
pub const COLOR_TEXT_CAPACITY: usize = 16;

/// Owned color argument.
pub type ColorText = String<COLOR_TEXT_CAPACITY>;

/// Error produced while parsing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown light command")]
    Unknown,
}

/// Error produced while decoding a JSON dimmer payload.
#[derive(Debug, thiserror::Error)]
#[error("malformed dimmer payload: {0}")]
pub struct DimmerPayloadError(pub serde_json_core::de::Error);

impl From<serde_json_core::de::Error> for DimmerPayloadError {
    fn from(error: serde_json_core::de::Error) -> Self {
        Self(error)
    }
}

/// Dimmer and/or power change.
///
/// Produced by `led_dimmer`; the JSON form can carry both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimmerUpdate {
    pub dimmer: Option<i32>,
    pub enabled: Option<bool>,
}

#[derive(Deserialize)]
struct DimmerPayload<'a> {
    brightness: Option<f32>,
    #[serde(borrow)]
    state: Option<&'a str>,
}

/// Same payload with `brightness` skipped whatever its type.
#[derive(Deserialize)]
struct StatePayload<'a> {
    #[serde(borrow)]
    state: Option<&'a str>,
}

impl DimmerUpdate {
    /// Decode `{"brightness":N,"state":"ON"|"OFF"}`.
    ///
    /// Both fields are optional; other `state` strings are ignored. A
    /// `brightness` that is not a number is dropped and `state` still
    /// applies.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_json(payload: &str) -> Result<Self, DimmerPayloadError> {
        let parsed = match serde_json_core::from_str::<DimmerPayload<'_>>(payload) {
            Ok((parsed, _)) => parsed,
            Err(_) => {
                let (StatePayload { state }, _) =
                    serde_json_core::from_str::<StatePayload<'_>>(payload)?;
                DimmerPayload {
                    brightness: None,
                    state,
                }
            }
        };
        let enabled = parsed.state.and_then(|state| {
            if state.eq_ignore_ascii_case("ON") {
                Some(true)
            } else if state.eq_ignore_ascii_case("OFF") {
                Some(false)
            } else {
                None
            }
        });
        Ok(Self {
            dimmer: parsed.brightness.map(|brightness| brightness as i32),
            enabled,
        })
    }
}

/// Power argument of `led_enableAll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerChange {
    Set(bool),
    Toggle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `led_dimmer`
    Dimmer(DimmerUpdate),
    /// `add_dimmer <delta> [wrap]`
    AddDimmer { delta: i32, wrap: bool },
    /// `led_enableAll <0|1|toggle>`
    Power(PowerChange),
    /// `led_basecolor_rgb`
    BaseColorRgb(ColorText),
    /// `led_basecolor_rgbcw`
    BaseColorRgbcw(ColorText),
    /// `led_temperature`
    Temperature(i32),
    /// `led_brightnessMult`
    BrightnessMultiplier(f32),
    /// `led_colorMult`
    ChannelScale(f32),
    /// `led_hue`, `HSBColor1` (degrees).
    Hue(f32),
    /// `led_saturation`, `HSBColor2` (0-100).
    Saturation(f32),
    /// `HSBColor3` (0-100).
    HsvBrightness(f32),
    /// `HSBColor <hue>,<sat>,<bri>`
    HsbColor { hue: f32, sat: f32, bri: f32 },
    /// `led_lerpSpeed` (units per second).
    LerpSpeed(f32),
    /// `led_expoMode <0..4>`
    ExponentialMode(i32),
    /// Button hold: step the dimmer up, wrapping at the top.
    NextDimmerHold,
    /// Button hold: step the temperature, wrapping at the ends.
    NextTemperatureHold,
    /// `led_nextColor`: next base color of the built-in palette.
    NextColor,
}

type CommandParser = fn(&str) -> Result<Command, CommandError>;

const COMMANDS: &[(&str, CommandParser)] = &[
    ("led_dimmer", parse_dimmer),
    ("add_dimmer", |args| {
        let mut tokens = args.split_ascii_whitespace();
        Ok(Command::AddDimmer {
            delta: tokens.next().map_or(0, parse_int),
            wrap: tokens.next().map_or(0, parse_int) != 0,
        })
    }),
    ("led_enableAll", parse_power),
    ("led_basecolor_rgb", |args| Ok(Command::BaseColorRgb(color_text(args)))),
    ("led_basecolor_rgbcw", |args| {
        Ok(Command::BaseColorRgbcw(color_text(args)))
    }),
    ("led_temperature", |args| {
        Ok(Command::Temperature(parse_int(args)))
    }),
    ("led_brightnessMult", |args| {
        Ok(Command::BrightnessMultiplier(parse_float(args)))
    }),
    ("led_colorMult", |args| {
        Ok(Command::ChannelScale(parse_float(args)))
    }),
    ("led_saturation", |args| Ok(Command::Saturation(parse_float(args)))),
    ("led_hue", |args| Ok(Command::Hue(parse_float(args)))),
    ("led_lerpSpeed", |args| Ok(Command::LerpSpeed(parse_float(args)))),
    ("led_expoMode", |args| {
        Ok(Command::ExponentialMode(parse_int(args)))
    }),
    ("led_nextColor", |_| Ok(Command::NextColor)),
    ("HSBColor", parse_hsb),
    ("HSBColor1", |args| Ok(Command::Hue(parse_float(args)))),
    ("HSBColor2", |args| Ok(Command::Saturation(parse_float(args)))),
    ("HSBColor3", |args| Ok(Command::HsvBrightness(parse_float(args)))),
];

impl Command {
    /// Parse a command from its name (case insensitive) and arguments.
    pub fn parse(name: &str, args: &str) -> Result<Self, CommandError> {
        let (_, parser) = COMMANDS
            .iter()
            .find(|(command, _)| command.eq_ignore_ascii_case(name))
            .ok_or(CommandError::Unknown)?;
        parser(args.trim())
    }
}

fn parse_dimmer(args: &str) -> Result<Command, CommandError> {
    if !args.starts_with('{') {
        return Ok(Command::Dimmer(DimmerUpdate {
            dimmer: Some(parse_int(args)),
            enabled: None,
        }));
    }
    // Bad JSON is not an error for the caller; it just changes nothing
    let update = DimmerUpdate::from_json(args).unwrap_or_else(|error| {
        warning!("dimmer: {}", error);
        DimmerUpdate::default()
    });
    info!("dimmer: json {:?}", update);
    Ok(Command::Dimmer(update))
}

fn parse_power(args: &str) -> Result<Command, CommandError> {
    let first = args.split_ascii_whitespace().next().unwrap_or("");
    if first.eq_ignore_ascii_case("toggle") {
        return Ok(Command::Power(PowerChange::Toggle));
    }
    Ok(Command::Power(PowerChange::Set(parse_int(first) != 0)))
}

/// `HSBColor 90,100,100` or `HSBColor 90 100 100`.
fn parse_hsb(args: &str) -> Result<Command, CommandError> {
    let mut values = [0.0f32; 3];
    let separator = |c: char| c == ',' || c.is_ascii_whitespace();
    for (value, token) in values
        .iter_mut()
        .zip(args.split(separator).filter(|token| !token.is_empty()))
    {
        *value = parse_float(token);
    }
    let [hue, sat, bri] = values;
    Ok(Command::HsbColor { hue, sat, bri })
}

/// First token of `args`, cut to [`COLOR_TEXT_CAPACITY`].
///
/// Only five channels are ever parsed, so the cut never loses one.
fn color_text(args: &str) -> ColorText {
    let token = args.split_ascii_whitespace().next().unwrap_or("");
    let mut text = ColorText::new();
    for c in token.chars() {
        if text.push(c).is_err() {
            break;
        }
    }
    text
}

/// Leading integer of `text`, 0 when there is none.
pub fn parse_int(text: &str) -> i32 {
    let text = text.trim_start();
    let end = number_prefix_len(text, false);
    text[..end].parse().unwrap_or(0)
}

/// Leading decimal number of `text`, 0 when there is none.
pub fn parse_float(text: &str) -> f32 {
    let text = text.trim_start();
    let end = number_prefix_len(text, true);
    text[..end].parse().unwrap_or(0.0)
}

fn number_prefix_len(text: &str, allow_fraction: bool) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mut seen_dot = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => {}
            b'.' if allow_fraction && !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    end
}
