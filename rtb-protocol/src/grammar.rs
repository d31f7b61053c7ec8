//! Enumerated values carried by protocol lines.
//!
//! The numeric codes are what travels on the wire. Display names exist for
//! logs and debug output only; codes the server sends outside the known set
//! are kept as `Unknown(code)` and render as `"unknown"`.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Part of the robot. Values can be or'ed to address several parts at
    /// once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Part: i32 {
        /// The robot body.
        const ROBOT = 1;
        /// The cannon.
        const CANNON = 2;
        /// The radar.
        const RADAR = 4;
    }
}

impl Part {
    /// Build a part from its wire code, keeping any unrecognized bits.
    pub fn from_code(code: i32) -> Self {
        Part::from_bits_retain(code)
    }

    /// Raw wire code.
    pub fn code(self) -> i32 {
        self.bits()
    }
}

impl fmt::Display for Part {
    // Only the three low bits have names; anything above them is ignored.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Part::ROBOT, "Robot"),
            (Part::CANNON, "Cannon"),
            (Part::RADAR, "Radar"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.bits() & flag.bits() != 0)
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            f.write_str("unknown")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

/// Game option announced by the server before each game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOption {
    /// How fast the robot itself may rotate, in radians/s.
    RobotMaxRotate,
    /// Maximum cannon rotate speed, relative to the robot.
    RobotCannonMaxRotate,
    /// Maximum radar rotate speed, relative to the robot.
    RobotRadarMaxRotate,
    RobotMaxAcceleration,
    RobotMinAcceleration,
    /// Energy every robot starts a game with.
    RobotStartEnergy,
    /// Energy cap; cookies cannot push a robot above it.
    RobotMaxEnergy,
    /// Number of discretization levels used for energy reports.
    RobotEnergyLevels,
    /// Shot speed in the cannon direction, added to the robot velocity.
    ShotSpeed,
    ShotMinEnergy,
    ShotMaxEnergy,
    /// Shot energy regain in energy/s.
    ShotEnergyIncreaseSpeed,
    /// Longest time a game may take.
    Timeout,
    /// Debug level, 0 (none) to 5 (highest).
    DebugLevel,
    /// 0: no coordinates, 1: relative to start, 2: absolute.
    SendRobotCoordinates,
    Unknown(i64),
}

impl GameOption {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => GameOption::RobotMaxRotate,
            1 => GameOption::RobotCannonMaxRotate,
            2 => GameOption::RobotRadarMaxRotate,
            3 => GameOption::RobotMaxAcceleration,
            4 => GameOption::RobotMinAcceleration,
            5 => GameOption::RobotStartEnergy,
            6 => GameOption::RobotMaxEnergy,
            7 => GameOption::RobotEnergyLevels,
            8 => GameOption::ShotSpeed,
            9 => GameOption::ShotMinEnergy,
            10 => GameOption::ShotMaxEnergy,
            11 => GameOption::ShotEnergyIncreaseSpeed,
            12 => GameOption::Timeout,
            13 => GameOption::DebugLevel,
            14 => GameOption::SendRobotCoordinates,
            other => GameOption::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            GameOption::RobotMaxRotate => 0,
            GameOption::RobotCannonMaxRotate => 1,
            GameOption::RobotRadarMaxRotate => 2,
            GameOption::RobotMaxAcceleration => 3,
            GameOption::RobotMinAcceleration => 4,
            GameOption::RobotStartEnergy => 5,
            GameOption::RobotMaxEnergy => 6,
            GameOption::RobotEnergyLevels => 7,
            GameOption::ShotSpeed => 8,
            GameOption::ShotMinEnergy => 9,
            GameOption::ShotMaxEnergy => 10,
            GameOption::ShotEnergyIncreaseSpeed => 11,
            GameOption::Timeout => 12,
            GameOption::DebugLevel => 13,
            GameOption::SendRobotCoordinates => 14,
            GameOption::Unknown(code) => code,
        }
    }
}

impl fmt::Display for GameOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameOption::RobotMaxRotate => "RobotMaxRotate",
            GameOption::RobotCannonMaxRotate => "RobotCannonMaxRotate",
            GameOption::RobotRadarMaxRotate => "RobotRadarMaxRotate",
            GameOption::RobotMaxAcceleration => "RobotMaxAcceleration",
            GameOption::RobotMinAcceleration => "RobotMinAcceleration",
            GameOption::RobotStartEnergy => "RobotStartEnergy",
            GameOption::RobotMaxEnergy => "RobotMaxEnergy",
            GameOption::RobotEnergyLevels => "RobotEnergyLevels",
            GameOption::ShotSpeed => "ShotSpeed",
            GameOption::ShotMinEnergy => "ShotMinEnergy",
            GameOption::ShotMaxEnergy => "ShotMaxEnergy",
            GameOption::ShotEnergyIncreaseSpeed => "ShotEnergyIncreaseSpeed",
            GameOption::Timeout => "Timeout",
            GameOption::DebugLevel => "DebugLevel",
            GameOption::SendRobotCoordinates => "SendRobotCoordinates",
            GameOption::Unknown(_) => "unknown",
        };
        f.write_str(name)
    }
}

/// Kind of object seen by the radar or involved in a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Object {
    /// Should never be sent.
    NoObject,
    Robot,
    Shot,
    Wall,
    Cookie,
    Mine,
    Unknown(i64),
}

impl Object {
    pub fn from_code(code: i64) -> Self {
        match code {
            -1 => Object::NoObject,
            0 => Object::Robot,
            1 => Object::Shot,
            2 => Object::Wall,
            3 => Object::Cookie,
            4 => Object::Mine,
            other => Object::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Object::NoObject => -1,
            Object::Robot => 0,
            Object::Shot => 1,
            Object::Wall => 2,
            Object::Cookie => 3,
            Object::Mine => 4,
            Object::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Object::NoObject => "NoObject",
            Object::Robot => "Robot",
            Object::Shot => "Shot",
            Object::Wall => "Wall",
            Object::Cookie => "Cookie",
            Object::Mine => "Mine",
            Object::Unknown(_) => "unknown",
        };
        f.write_str(name)
    }
}

/// Problem the server reports back to the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// The server could not recognize a message.
    UnknownMessage,
    /// CPU usage reached the warning percentage (competition mode only).
    ProcessTimeLow,
    /// The message cannot be handled in the current state, e.g. `Rotate`
    /// before the game started.
    MessageSentInIllegalState,
    /// Illegal robot option name or argument.
    UnknownOption,
    ObsoleteKeyword,
    /// No name was sent before the game began.
    NameNotGiven,
    /// No colour was sent before the game began.
    ColourNotGiven,
    Unknown(i64),
}

impl WarningKind {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => WarningKind::UnknownMessage,
            1 => WarningKind::ProcessTimeLow,
            2 => WarningKind::MessageSentInIllegalState,
            3 => WarningKind::UnknownOption,
            4 => WarningKind::ObsoleteKeyword,
            5 => WarningKind::NameNotGiven,
            6 => WarningKind::ColourNotGiven,
            other => WarningKind::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            WarningKind::UnknownMessage => 0,
            WarningKind::ProcessTimeLow => 1,
            WarningKind::MessageSentInIllegalState => 2,
            WarningKind::UnknownOption => 3,
            WarningKind::ObsoleteKeyword => 4,
            WarningKind::NameNotGiven => 5,
            WarningKind::ColourNotGiven => 6,
            WarningKind::Unknown(code) => code,
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningKind::UnknownMessage => "UnknownMessage",
            WarningKind::ProcessTimeLow => "ProcessTimeLow",
            WarningKind::MessageSentInIllegalState => "MessageSentInIllegalState",
            WarningKind::UnknownOption => "UnknownOption",
            WarningKind::ObsoleteKeyword => "ObsoleteKeyword",
            WarningKind::NameNotGiven => "NameNotGiven",
            WarningKind::ColourNotGiven => "ColourNotGiven",
            WarningKind::Unknown(_) => "unknown",
        };
        f.write_str(name)
    }
}

/// Option the robot sets on the server with a `RobotOption` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotOption {
    /// Ask for SIGUSR1 when a message is waiting. Default false.
    SendSignal = 0,
    /// Ask for `RotationReached` notifications, see [`RotationReachedMode`].
    SendRotationReached = 1,
    /// Signal number to send when a message is waiting. 0 disables.
    Signal = 2,
    /// Select blocking (0) or non-blocking (1) reads. Must be sent once, as
    /// soon as the program starts.
    UseNonBlocking = 3,
}

impl RobotOption {
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// When the server should send `RotationReached`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum RotationReachedMode {
    /// No notifications.
    #[default]
    Never = 0,
    /// When a `RotateTo` or `RotateAmount` finishes.
    Rotations = 1,
    /// Also when a sweep changes direction.
    RotationsAndSweeps = 2,
}

impl RotationReachedMode {
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(RotationReachedMode::Never),
            1 => Some(RotationReachedMode::Rotations),
            2 => Some(RotationReachedMode::RotationsAndSweeps),
            _ => None,
        }
    }

    pub fn level(self) -> i64 {
        self as i64
    }
}

impl FromStr for RotationReachedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .ok()
            .and_then(RotationReachedMode::from_level)
            .ok_or_else(|| format!("expected 0, 1 or 2, got {:?}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_display() {
        assert_eq!((Part::ROBOT | Part::CANNON).to_string(), "Robot|Cannon");
        assert_eq!(Part::RADAR.to_string(), "Radar");
        assert_eq!(Part::from_code(7).to_string(), "Robot|Cannon|Radar");
    }

    #[test]
    fn test_part_display_ignores_high_bits() {
        assert_eq!(Part::from_code(15).to_string(), "Robot|Cannon|Radar");
        assert_eq!(Part::from_code(16).to_string(), "unknown");
        assert_eq!(Part::from_code(0).to_string(), "unknown");
    }

    #[test]
    fn test_part_keeps_raw_code() {
        assert_eq!(Part::from_code(15).code(), 15);
        assert_eq!((Part::CANNON | Part::RADAR).code(), 6);
    }

    #[test]
    fn test_game_option_codes() {
        assert_eq!(GameOption::from_code(8), GameOption::ShotSpeed);
        assert_eq!(GameOption::ShotSpeed.to_string(), "ShotSpeed");
        assert_eq!(GameOption::from_code(14).code(), 14);
        assert_eq!(GameOption::from_code(15), GameOption::Unknown(15));
        assert_eq!(GameOption::from_code(15).to_string(), "unknown");
    }

    #[test]
    fn test_object_codes() {
        assert_eq!(Object::from_code(-1), Object::NoObject);
        assert_eq!(Object::from_code(3).to_string(), "Cookie");
        assert_eq!(Object::from_code(-2).to_string(), "unknown");
        assert_eq!(Object::from_code(42).code(), 42);
    }

    #[test]
    fn test_warning_codes() {
        assert_eq!(
            WarningKind::from_code(2),
            WarningKind::MessageSentInIllegalState
        );
        assert_eq!(WarningKind::ColourNotGiven.to_string(), "ColourNotGiven");
        assert_eq!(WarningKind::from_code(7).to_string(), "unknown");
    }

    #[test]
    fn test_rotation_reached_mode_parse() {
        assert_eq!("2".parse::<RotationReachedMode>(), Ok(RotationReachedMode::RotationsAndSweeps));
        assert_eq!(RotationReachedMode::default().level(), 0);
        assert!("3".parse::<RotationReachedMode>().is_err());
        assert!("x".parse::<RotationReachedMode>().is_err());
    }
}
