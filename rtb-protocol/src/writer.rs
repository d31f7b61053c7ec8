//! Shared writer for robot commands.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::commands::Command;
use crate::grammar::{Part, RobotOption};
use crate::ProtocolError;

/// Sends commands to the server, one whole line per write.
///
/// Clones share the same output stream, so the writer can be handed to
/// several threads. Lines from concurrent callers never interleave, but
/// their relative order is up to the scheduler.
pub struct CommandWriter {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    debug: bool,
}

impl CommandWriter {
    /// Create a writer on any output stream, with debug output off
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        CommandWriter {
            out: Arc::new(Mutex::new(Box::new(out))),
            debug: false,
        }
    }

    /// Create a writer on the process stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Enable or disable `Debug` lines. When disabled, [`debug`] is a no-op.
    ///
    /// [`debug`]: CommandWriter::debug
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Encode and send a command
    pub fn send(&self, cmd: &Command) -> Result<(), ProtocolError> {
        let line = cmd.encode()?;
        let mut out = self.out.lock().map_err(|_| ProtocolError::Poisoned)?;
        out.write_all(line.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    pub fn robot_option(&self, option: RobotOption, value: i64) -> Result<(), ProtocolError> {
        self.send(&Command::RobotOption { option, value })
    }

    /// Set the robot name. Send it when `Initialize` says this is the first
    /// sequence.
    pub fn name(&self, name: &str) -> Result<(), ProtocolError> {
        self.send(&Command::Name(name.to_string()))
    }

    pub fn colour(&self, home: &str, away: &str) -> Result<(), ProtocolError> {
        self.send(&Command::Colour {
            home: home.to_string(),
            away: away.to_string(),
        })
    }

    pub fn rotate(&self, part: Part, velocity: f64) -> Result<(), ProtocolError> {
        self.send(&Command::Rotate { part, velocity })
    }

    pub fn rotate_to(&self, part: Part, velocity: f64, angle: f64) -> Result<(), ProtocolError> {
        self.send(&Command::RotateTo {
            part,
            velocity,
            angle,
        })
    }

    pub fn rotate_amount(
        &self,
        part: Part,
        velocity: f64,
        angle: f64,
    ) -> Result<(), ProtocolError> {
        self.send(&Command::RotateAmount {
            part,
            velocity,
            angle,
        })
    }

    pub fn sweep(
        &self,
        part: Part,
        velocity: f64,
        right_angle: f64,
        left_angle: f64,
    ) -> Result<(), ProtocolError> {
        self.send(&Command::Sweep {
            part,
            velocity,
            right_angle,
            left_angle,
        })
    }

    pub fn accelerate(&self, value: f64) -> Result<(), ProtocolError> {
        self.send(&Command::Accelerate(value))
    }

    pub fn brake(&self, portion: f64) -> Result<(), ProtocolError> {
        self.send(&Command::Brake(portion))
    }

    pub fn shoot(&self, energy: f64) -> Result<(), ProtocolError> {
        self.send(&Command::Shoot(energy))
    }

    pub fn print(&self, text: &str) -> Result<(), ProtocolError> {
        self.send(&Command::Print(text.to_string()))
    }

    /// Print in the message window if debug output is enabled
    pub fn debug(&self, text: &str) -> Result<(), ProtocolError> {
        if !self.debug {
            return Ok(());
        }
        self.send(&Command::Debug(text.to_string()))
    }

    pub fn debug_line(
        &self,
        angle1: f64,
        radius1: f64,
        angle2: f64,
        radius2: f64,
    ) -> Result<(), ProtocolError> {
        self.send(&Command::DebugLine {
            angle1,
            radius1,
            angle2,
            radius2,
        })
    }

    pub fn debug_circle(
        &self,
        center_angle: f64,
        center_radius: f64,
        circle_radius: f64,
    ) -> Result<(), ProtocolError> {
        self.send(&Command::DebugCircle {
            center_angle,
            center_radius,
            circle_radius,
        })
    }
}

impl Clone for CommandWriter {
    fn clone(&self) -> Self {
        CommandWriter {
            out: self.out.clone(),
            debug: self.debug,
        }
    }
}
