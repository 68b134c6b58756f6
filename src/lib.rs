#![no_std]

mod logging;

mod announce;
pub mod color;
pub mod command;
pub mod composer;
pub mod controller;
pub mod curve;
pub mod frame_scheduler;
pub mod mailbox;
pub mod ports;
pub mod state;
pub mod topology;
pub mod transition;

pub use announce::{
    ANNOUNCE_EXPIRE_SECS, TOPIC_BASE_COLOR_RGB, TOPIC_DIMMER, TOPIC_ENABLE_ALL,
    TOPIC_FINAL_COLOR_RGB, TOPIC_FINAL_COLOR_RGBCW, TOPIC_TEMPERATURE,
};
pub use color::{ColorModel, Hsv, Rgb, Rgbcw, TemperatureRange};
pub use command::{Command, CommandError, DimmerPayloadError, DimmerUpdate, PowerChange};
pub use composer::compose;
pub use controller::LightController;
pub use curve::ExponentialMode;
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use mailbox::{CommandMailbox, CommandReceiver, CommandSender, Mailbox, TrySendError};
pub use ports::{FlagSet, LightEvent, LightFlag, LightPorts, PublishResult};
pub use state::{ColorMode, LightConfig, LightState};
pub use topology::{ChannelMapping, ChannelTopology, ChipKind, ChipSet};
pub use transition::{TransitionEngine, move_towards};

pub use embassy_time::{Duration, Instant};
