//! Frame scheduling for the transition tick
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::controller::LightController;
use crate::mailbox::CommandReceiver;
use crate::ports::{LightFlag, LightPorts};

/// Default tick rate of the transition (50 FPS).
pub const DEFAULT_FPS: u32 = 50;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Commands executed during this tick.
    pub commands: usize,
}

/// Drives a [`LightController`] from a periodic tick.
///
/// Every tick drains the command mailbox and, when smooth transitions are
/// enabled, advances the transition by the time elapsed since the previous
/// tick. Commands and transition steps therefore never interleave.
///
/// # Usage.
///
/// ```ignore
/// static COMMANDS: CommandMailbox<8> = CommandMailbox::new();
///
/// let mut scheduler = FrameScheduler::new(controller, ports, COMMANDS.receiver());
///
/// loop {
///     let now = get_current_time_ms();
///     let result = scheduler.tick(Instant::from_millis(now));
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis() as u64);
/// }
/// ```
pub struct FrameScheduler<'a, P: LightPorts, const COMMAND_QUEUE_SIZE: usize> {
    controller: LightController,
    ports: P,
    commands: CommandReceiver<'a, COMMAND_QUEUE_SIZE>,
    last_tick: Option<Instant>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, P: LightPorts, const COMMAND_QUEUE_SIZE: usize> FrameScheduler<'a, P, COMMAND_QUEUE_SIZE> {
    /// Uses `DEFAULT_FRAME_DURATION` (50 FPS) for frame timing.
    pub fn new(
        controller: LightController,
        ports: P,
        commands: CommandReceiver<'a, COMMAND_QUEUE_SIZE>,
    ) -> Self {
        Self::with_frame_duration(controller, ports, commands, DEFAULT_FRAME_DURATION)
    }

    pub fn with_frame_duration(
        controller: LightController,
        ports: P,
        commands: CommandReceiver<'a, COMMAND_QUEUE_SIZE>,
        frame_duration: Duration,
    ) -> Self {
        Self {
            controller,
            ports,
            commands,
            last_tick: None,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// The first tick only records the time; the transition starts moving
    /// from the second one.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Skip the backlog after a long stall instead of catching up
        let max_drift = Duration::from_millis(self.frame_duration.as_millis() * 2);
        if now.as_millis() > self.next_frame.as_millis() + max_drift.as_millis() {
            self.next_frame = now;
        }

        let commands = self
            .controller
            .process_pending(&self.commands, &mut self.ports);

        let delta = self
            .last_tick
            .and_then(|last| now.checked_duration_since(last))
            .unwrap_or(Duration::from_millis(0));
        self.last_tick = Some(now);
        if self.ports.has(LightFlag::SmoothTransitions) {
            self.controller.run_transition(delta, &mut self.ports);
        }

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            commands,
        }
    }

    pub fn controller(&self) -> &LightController {
        &self.controller
    }

    /// Direct access for operations that are not commands (restore, init).
    pub fn controller_mut(&mut self) -> &mut LightController {
        &mut self.controller
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }

    /// Controller and ports together, for calls that need both.
    pub fn parts_mut(&mut self) -> (&mut LightController, &mut P) {
        (&mut self.controller, &mut self.ports)
    }
}
