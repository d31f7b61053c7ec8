//! Robot commands and line encoding.

use std::fmt::Write;

use thiserror::Error;

use crate::grammar::{Part, RobotOption};

/// Longest line the server accepts, trailing newline included
pub const MAX_LINE_LEN: usize = 128;

/// Wire names of the robot commands
mod cmd_name {
    pub const ROBOT_OPTION: &str = "RobotOption";
    pub const NAME: &str = "Name";
    pub const COLOUR: &str = "Colour";
    pub const ROTATE: &str = "Rotate";
    pub const ROTATE_TO: &str = "RotateTo";
    pub const ROTATE_AMOUNT: &str = "RotateAmount";
    pub const SWEEP: &str = "Sweep";
    pub const ACCELERATE: &str = "Accelerate";
    // The server only understands this spelling
    pub const BRAKE: &str = "Break";
    pub const SHOOT: &str = "Shoot";
    pub const PRINT: &str = "Print";
    pub const DEBUG: &str = "Debug";
    pub const DEBUG_LINE: &str = "DebugLine";
    pub const DEBUG_CIRCLE: &str = "DebugCircle";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("message is too long ({len} bytes, max 128)")]
    TooLong { len: usize },
}

/// Builds one command line, checking its length before handing it out.
#[derive(Debug, Clone)]
pub struct LineBuilder {
    line: String,
}

impl LineBuilder {
    pub fn new(name: &str) -> Self {
        LineBuilder {
            line: name.to_string(),
        }
    }

    /// Append a float with six fractional digits
    pub fn float(mut self, value: f64) -> Self {
        let _ = write!(self.line, " {:.6}", value);
        self
    }

    pub fn int(mut self, value: i64) -> Self {
        let _ = write!(self.line, " {}", value);
        self
    }

    /// Append free text verbatim
    pub fn text(mut self, text: &str) -> Self {
        self.line.push(' ');
        self.line.push_str(text);
        self
    }

    /// Terminate the line and check it against [`MAX_LINE_LEN`].
    pub fn finish(mut self) -> Result<String, EncodeError> {
        if !self.line.ends_with('\n') {
            self.line.push('\n');
        }
        if self.line.len() > MAX_LINE_LEN {
            return Err(EncodeError::TooLong {
                len: self.line.len(),
            });
        }
        Ok(self.line)
    }
}

/// Commands sent by the robot to the server
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RobotOption { option: RobotOption, value: i64 },

    /// Robot name. A name ending in "Team: teamname" puts the robot in team
    /// "teamname".
    Name(String),

    /// Home and away colours as hex strings like "11aa22". The away colour
    /// is used when the home colour is taken.
    Colour { home: String, away: String },

    /// Angular velocity in radians/s, capped by the max rotate options.
    Rotate { part: Part, velocity: f64 },

    /// Rotate to an angle. Cannon and radar angles are relative to the
    /// robot; the robot itself cannot use this.
    RotateTo { part: Part, velocity: f64, angle: f64 },

    /// Rotate relative to the current angle.
    RotateAmount { part: Part, velocity: f64, angle: f64 },

    /// Sweep cannon and/or radar between two angles.
    Sweep {
        part: Part,
        velocity: f64,
        right_angle: f64,
        left_angle: f64,
    },

    Accelerate(f64),

    /// 1.0 is full brake.
    Brake(f64),

    Shoot(f64),

    /// Message window output.
    Print(String),

    /// Message window output, shown only in debug mode.
    Debug(String),

    /// Line in polar coordinates relative to the robot. Only allowed at
    /// debug level 5.
    DebugLine {
        angle1: f64,
        radius1: f64,
        angle2: f64,
        radius2: f64,
    },

    /// Circle whose centre is given in polar coordinates relative to the
    /// robot. Only allowed at debug level 5.
    DebugCircle {
        center_angle: f64,
        center_radius: f64,
        circle_radius: f64,
    },
}

impl Command {
    /// Encode to a newline terminated wire line.
    ///
    /// Fails with [`EncodeError::TooLong`] instead of truncating long text.
    pub fn encode(&self) -> Result<String, EncodeError> {
        let line = match self {
            Command::RobotOption { option, value } => LineBuilder::new(cmd_name::ROBOT_OPTION)
                .int(option.code())
                .int(*value),
            Command::Name(name) => LineBuilder::new(cmd_name::NAME).text(name),
            Command::Colour { home, away } => {
                LineBuilder::new(cmd_name::COLOUR).text(home).text(away)
            }
            Command::Rotate { part, velocity } => LineBuilder::new(cmd_name::ROTATE)
                .int(part.code().into())
                .float(*velocity),
            Command::RotateTo {
                part,
                velocity,
                angle,
            } => LineBuilder::new(cmd_name::ROTATE_TO)
                .int(part.code().into())
                .float(*velocity)
                .float(*angle),
            Command::RotateAmount {
                part,
                velocity,
                angle,
            } => LineBuilder::new(cmd_name::ROTATE_AMOUNT)
                .int(part.code().into())
                .float(*velocity)
                .float(*angle),
            Command::Sweep {
                part,
                velocity,
                right_angle,
                left_angle,
            } => LineBuilder::new(cmd_name::SWEEP)
                .int(part.code().into())
                .float(*velocity)
                .float(*right_angle)
                .float(*left_angle),
            Command::Accelerate(value) => LineBuilder::new(cmd_name::ACCELERATE).float(*value),
            Command::Brake(portion) => LineBuilder::new(cmd_name::BRAKE).float(*portion),
            Command::Shoot(energy) => LineBuilder::new(cmd_name::SHOOT).float(*energy),
            Command::Print(text) => LineBuilder::new(cmd_name::PRINT).text(text),
            Command::Debug(text) => LineBuilder::new(cmd_name::DEBUG).text(text),
            Command::DebugLine {
                angle1,
                radius1,
                angle2,
                radius2,
            } => LineBuilder::new(cmd_name::DEBUG_LINE)
                .float(*angle1)
                .float(*radius1)
                .float(*angle2)
                .float(*radius2),
            Command::DebugCircle {
                center_angle,
                center_radius,
                circle_radius,
            } => LineBuilder::new(cmd_name::DEBUG_CIRCLE)
                .float(*center_angle)
                .float(*center_radius)
                .float(*circle_radius),
        };
        line.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_float_commands() {
        assert_eq!(Command::Accelerate(1.5).encode().unwrap(), "Accelerate 1.500000\n");
        assert_eq!(Command::Shoot(-0.25).encode().unwrap(), "Shoot -0.250000\n");
        assert_eq!(
            Command::DebugCircle {
                center_angle: 0.0,
                center_radius: 10.0,
                circle_radius: 2.5,
            }
            .encode()
            .unwrap(),
            "DebugCircle 0.000000 10.000000 2.500000\n"
        );
        assert_eq!(
            Command::DebugLine {
                angle1: 1.0,
                radius1: 2.0,
                angle2: 3.0,
                radius2: 4.0,
            }
            .encode()
            .unwrap(),
            "DebugLine 1.000000 2.000000 3.000000 4.000000\n"
        );
    }

    #[test]
    fn test_brake_uses_server_spelling() {
        assert_eq!(Command::Brake(1.0).encode().unwrap(), "Break 1.000000\n");
    }

    #[test]
    fn test_parts_encode_as_codes() {
        let cmd = Command::Sweep {
            part: Part::CANNON | Part::RADAR,
            velocity: std::f64::consts::FRAC_PI_4,
            right_angle: -std::f64::consts::FRAC_PI_2,
            left_angle: std::f64::consts::FRAC_PI_2,
        };
        assert_eq!(
            cmd.encode().unwrap(),
            "Sweep 6 0.785398 -1.570796 1.570796\n"
        );
        let cmd = Command::RotateTo {
            part: Part::RADAR,
            velocity: 1.0,
            angle: 0.5,
        };
        assert_eq!(cmd.encode().unwrap(), "RotateTo 4 1.000000 0.500000\n");
        let cmd = Command::Rotate {
            part: Part::ROBOT,
            velocity: 2.0,
        };
        assert_eq!(cmd.encode().unwrap(), "Rotate 1 2.000000\n");
        let cmd = Command::RotateAmount {
            part: Part::ROBOT,
            velocity: 1.0,
            angle: -3.0,
        };
        assert_eq!(cmd.encode().unwrap(), "RotateAmount 1 1.000000 -3.000000\n");
    }

    #[test]
    fn test_encode_text_commands() {
        assert_eq!(
            Command::Name("foo Team: bar".into()).encode().unwrap(),
            "Name foo Team: bar\n"
        );
        assert_eq!(
            Command::Colour {
                home: "00ff00".into(),
                away: "ff0000".into(),
            }
            .encode()
            .unwrap(),
            "Colour 00ff00 ff0000\n"
        );
        assert_eq!(
            Command::RobotOption {
                option: RobotOption::UseNonBlocking,
                value: 0,
            }
            .encode()
            .unwrap(),
            "RobotOption 3 0\n"
        );
    }

    #[test]
    fn test_existing_newline_is_not_doubled() {
        assert_eq!(Command::Print("hi\n".into()).encode().unwrap(), "Print hi\n");
    }

    #[test]
    fn test_length_boundary() {
        // "Print " is 6 bytes
        let fits = "x".repeat(121);
        let line = Command::Print(fits).encode().unwrap();
        assert_eq!(line.len(), MAX_LINE_LEN);

        let too_long = "x".repeat(122);
        assert_eq!(
            Command::Print(too_long).encode(),
            Err(EncodeError::TooLong { len: 129 })
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let cmd = Command::Sweep {
            part: Part::RADAR,
            velocity: 0.1,
            right_angle: 1.0 / 3.0,
            left_angle: 2.0 / 3.0,
        };
        assert_eq!(cmd.encode(), cmd.encode());
    }

    #[test]
    fn test_line_builder() {
        let line = LineBuilder::new("Foo").int(-3).float(0.1).text("a b").finish();
        assert_eq!(line, Ok("Foo -3 0.100000 a b\n".to_string()));
    }
}
