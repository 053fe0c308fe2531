//! Commands from the outside world and the driver that applies them
//!
//! Input collaborators never touch the control loop directly. They push
//! [`LoopCommand`]s into a channel and the [`Driver`] drains it at tick
//! boundaries, so a retarget can never land halfway through a tick.

use crate::simulation::control_loop::{ControlLoop, Snapshot};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopCommand {
    /// Replace the setpoint (°C)
    Retarget(f64),
    /// Stop ticking
    Quit,
}

/// Parse one line of text input
///
/// Accepts `q`/`quit`, `c <value>`/`target <value>`, or a bare number.
pub fn parse_command(input: &str) -> Result<LoopCommand, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty command".into());
    }

    if input == "q" || input == "quit" {
        return Ok(LoopCommand::Quit);
    }

    let value = input
        .strip_prefix("c ")
        .or_else(|| input.strip_prefix("target "))
        .unwrap_or(input)
        .trim();

    parse_target(value).map(LoopCommand::Retarget)
}

/// Parse a target temperature, rejecting non-finite values
pub fn parse_target(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(v) => Err(format!("target must be finite, got {}", v)),
        Err(_) => Err(format!("'{}' is not a temperature", value.trim())),
    }
}

/// Steps a control loop, applying queued commands between ticks
pub struct Driver {
    control: ControlLoop,
    commands: Receiver<LoopCommand>,
    stopped: bool,
}

impl Driver {
    /// Wrap `control` and return the sender side of its command channel
    pub fn new(control: ControlLoop) -> (Self, Sender<LoopCommand>) {
        let (tx, rx) = mpsc::channel();
        let driver = Self {
            control,
            commands: rx,
            stopped: false,
        };
        (driver, tx)
    }

    pub fn control(&self) -> &ControlLoop {
        &self.control
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Apply every command queued so far
    ///
    /// A closed channel only means no more input will arrive; the loop keeps
    /// running.
    pub fn drain_commands(&mut self) {
        loop {
            match self.commands.try_recv() {
                Ok(LoopCommand::Retarget(target)) => self.control.set_target(target),
                Ok(LoopCommand::Quit) => {
                    tracing::info!("Quit requested at tick {}", self.control.state().tick);
                    self.stopped = true;
                    return;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return,
            }
        }
    }

    /// Apply pending commands, then run one tick unless told to stop
    pub fn tick(&mut self) -> Option<Snapshot> {
        if self.stopped {
            return None;
        }
        self.drain_commands();
        if self.stopped {
            return None;
        }
        Some(self.control.step())
    }
}
