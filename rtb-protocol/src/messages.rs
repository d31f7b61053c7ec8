//! Server messages and line decoding.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::grammar::{GameOption, Object, Part, WarningKind};

/// Wire names of the server messages
mod msg_name {
    pub const INITIALIZE: &str = "Initialize";
    pub const YOUR_NAME: &str = "YourName";
    pub const YOUR_COLOUR: &str = "YourColour";
    pub const GAME_OPTION: &str = "GameOption";
    pub const GAME_STARTS: &str = "GameStarts";
    pub const RADAR: &str = "Radar";
    pub const INFO: &str = "Info";
    pub const COORDINATES: &str = "Coordinates";
    pub const ROBOT_INFO: &str = "RobotInfo";
    pub const ROTATION_REACHED: &str = "RotationReached";
    pub const ENERGY: &str = "Energy";
    pub const ROBOTS_LEFT: &str = "RobotsLeft";
    pub const COLLISION: &str = "Collision";
    pub const WARNING: &str = "Warning";
    pub const DEAD: &str = "Dead";
    pub const GAME_FINISHES: &str = "GameFinishes";
    pub const EXIT_ROBOT: &str = "ExitRobot";
}

/// Number of tokens a message line must have, counting the message name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Reasons a line does not decode into a [`Message`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty line")]
    EmptyInput,

    #[error("unknown message {0:?}")]
    UnknownMessage(String),

    #[error("wrong number of fields for {message}: expected {expected} tokens, got {got}")]
    WrongArity {
        message: &'static str,
        expected: Arity,
        got: usize,
    },

    #[error("could not parse {field} {token:?}")]
    MalformedField { field: &'static str, token: String },
}

/// Messages sent by the server to the robot
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Very first message of a sequence. When `first` is set the robot
    /// should send its name and colour, otherwise it waits for `YourName`
    /// and `YourColour`.
    Initialize { first: bool },

    /// Current name of the robot.
    YourName { name: String },

    /// Current colour of the robot. All robots in a team share it.
    YourColour { colour: String },

    /// One game setting, sent at the beginning of each game.
    GameOption { option: GameOption, value: f64 },

    GameStarts,

    /// Radar reading, sent every turn. `angle` is relative to the robot
    /// front, in radians.
    Radar {
        distance: f64,
        object: Object,
        angle: f64,
    },

    /// Always follows `Radar`. `time` is game time, which is not wall time.
    Info {
        time: f64,
        speed: f64,
        cannon_angle: f64,
    },

    /// Robot position. Only sent when `SendRobotCoordinates` is 1 or 2.
    Coordinates { x: f64, y: f64, angle: f64 },

    /// Follows `Radar` when it saw a robot.
    RobotInfo { energy_level: f64, team_mate: bool },

    /// A `RotateTo`/`RotateAmount` finished or a sweep changed direction.
    RotationReached { part: Part },

    /// Own energy level, sent at the end of each round.
    Energy { energy_level: f64 },

    /// Sent when the game starts and when a robot is killed.
    RobotsLeft { count: i64 },

    /// The robot hit, or was hit by, something. `angle` is relative to the
    /// robot.
    Collision { object: Object, angle: f64 },

    Warning { kind: WarningKind, message: String },

    /// The robot died; the server ignores commands until the game ends.
    Dead,

    GameFinishes,

    /// Exit immediately or be killed.
    ExitRobot,
}

impl Message {
    /// Wire name of the message
    pub fn name(&self) -> &'static str {
        match self {
            Message::Initialize { .. } => msg_name::INITIALIZE,
            Message::YourName { .. } => msg_name::YOUR_NAME,
            Message::YourColour { .. } => msg_name::YOUR_COLOUR,
            Message::GameOption { .. } => msg_name::GAME_OPTION,
            Message::GameStarts => msg_name::GAME_STARTS,
            Message::Radar { .. } => msg_name::RADAR,
            Message::Info { .. } => msg_name::INFO,
            Message::Coordinates { .. } => msg_name::COORDINATES,
            Message::RobotInfo { .. } => msg_name::ROBOT_INFO,
            Message::RotationReached { .. } => msg_name::ROTATION_REACHED,
            Message::Energy { .. } => msg_name::ENERGY,
            Message::RobotsLeft { .. } => msg_name::ROBOTS_LEFT,
            Message::Collision { .. } => msg_name::COLLISION,
            Message::Warning { .. } => msg_name::WARNING,
            Message::Dead => msg_name::DEAD,
            Message::GameFinishes => msg_name::GAME_FINISHES,
            Message::ExitRobot => msg_name::EXIT_ROBOT,
        }
    }
}

impl FromStr for Message {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

type DecodeFn = fn(&[&str]) -> Result<Message, DecodeError>;

/// Message name -> expected arity and field decoder. Decoders receive the
/// whole token list, name included, after the arity check.
const DECODERS: &[(&str, Arity, DecodeFn)] = &[
    (msg_name::INITIALIZE, Arity::Exact(2), decode_initialize),
    (msg_name::YOUR_NAME, Arity::AtLeast(2), decode_your_name),
    (msg_name::YOUR_COLOUR, Arity::AtLeast(2), decode_your_colour),
    (msg_name::GAME_OPTION, Arity::Exact(3), decode_game_option),
    (msg_name::GAME_STARTS, Arity::Exact(1), decode_game_starts),
    (msg_name::RADAR, Arity::Exact(4), decode_radar),
    (msg_name::INFO, Arity::Exact(4), decode_info),
    (msg_name::COORDINATES, Arity::Exact(4), decode_coordinates),
    (msg_name::ROBOT_INFO, Arity::Exact(3), decode_robot_info),
    (msg_name::ROTATION_REACHED, Arity::Exact(2), decode_rotation_reached),
    (msg_name::ENERGY, Arity::Exact(2), decode_energy),
    (msg_name::ROBOTS_LEFT, Arity::Exact(2), decode_robots_left),
    (msg_name::COLLISION, Arity::Exact(3), decode_collision),
    (msg_name::WARNING, Arity::AtLeast(2), decode_warning),
    (msg_name::DEAD, Arity::Exact(1), decode_dead),
    (msg_name::GAME_FINISHES, Arity::Exact(1), decode_game_finishes),
    (msg_name::EXIT_ROBOT, Arity::Exact(1), decode_exit_robot),
];

/// Decode one line received from the server.
///
/// Leading and trailing whitespace is ignored and fields may be separated
/// by any run of spaces or tabs. A line either decodes completely or not at
/// all.
pub fn decode(line: &str) -> Result<Message, DecodeError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let Some(&name) = fields.first() else {
        return Err(DecodeError::EmptyInput);
    };

    let &(message, arity, decoder) = DECODERS
        .iter()
        .find(|(message, _, _)| *message == name)
        .ok_or_else(|| DecodeError::UnknownMessage(name.to_string()))?;

    if !arity.accepts(fields.len()) {
        return Err(DecodeError::WrongArity {
            message,
            expected: arity,
            got: fields.len(),
        });
    }

    decoder(&fields)
}

fn float(field: &'static str, token: &str) -> Result<f64, DecodeError> {
    token.parse().map_err(|_| DecodeError::MalformedField {
        field,
        token: token.to_string(),
    })
}

fn int<T: FromStr>(field: &'static str, token: &str) -> Result<T, DecodeError> {
    token.parse().map_err(|_| DecodeError::MalformedField {
        field,
        token: token.to_string(),
    })
}

fn decode_initialize(fields: &[&str]) -> Result<Message, DecodeError> {
    // Anything but "1" means "not first"
    Ok(Message::Initialize {
        first: fields[1] == "1",
    })
}

fn decode_your_name(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::YourName {
        name: fields[1..].join(" "),
    })
}

fn decode_your_colour(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::YourColour {
        colour: fields[1..].join(" "),
    })
}

fn decode_game_option(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::GameOption {
        option: GameOption::from_code(int("option", fields[1])?),
        value: float("value", fields[2])?,
    })
}

fn decode_game_starts(_: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::GameStarts)
}

fn decode_radar(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::Radar {
        distance: float("distance", fields[1])?,
        object: Object::from_code(int("object", fields[2])?),
        angle: float("angle", fields[3])?,
    })
}

fn decode_info(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::Info {
        time: float("time", fields[1])?,
        speed: float("speed", fields[2])?,
        cannon_angle: float("cannon_angle", fields[3])?,
    })
}

fn decode_coordinates(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::Coordinates {
        x: float("x", fields[1])?,
        y: float("y", fields[2])?,
        angle: float("angle", fields[3])?,
    })
}

fn decode_robot_info(fields: &[&str]) -> Result<Message, DecodeError> {
    let energy_level = float("energy_level", fields[1])?;
    // Unlike Initialize, the team mate flag must be exactly 0 or 1
    let team_mate = match fields[2] {
        "1" => true,
        "0" => false,
        other => {
            return Err(DecodeError::MalformedField {
                field: "team_mate",
                token: other.to_string(),
            })
        }
    };
    Ok(Message::RobotInfo {
        energy_level,
        team_mate,
    })
}

fn decode_rotation_reached(fields: &[&str]) -> Result<Message, DecodeError> {
    let code: i64 = int("part", fields[1])?;
    // Only the low 32 bits carry parts
    Ok(Message::RotationReached {
        part: Part::from_code(code as i32),
    })
}

fn decode_energy(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::Energy {
        energy_level: float("energy_level", fields[1])?,
    })
}

fn decode_robots_left(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::RobotsLeft {
        count: int("count", fields[1])?,
    })
}

fn decode_collision(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::Collision {
        object: Object::from_code(int("object", fields[1])?),
        angle: float("angle", fields[2])?,
    })
}

fn decode_warning(fields: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::Warning {
        kind: WarningKind::from_code(int("warning", fields[1])?),
        message: fields[2..].join(" "),
    })
}

fn decode_dead(_: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::Dead)
}

fn decode_game_finishes(_: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::GameFinishes)
}

fn decode_exit_robot(_: &[&str]) -> Result<Message, DecodeError> {
    Ok(Message::ExitRobot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_lines() {
        let cases = [
            ("Initialize 1", Message::Initialize { first: true }),
            ("Initialize 2", Message::Initialize { first: false }),
            ("YourName foo", Message::YourName { name: "foo".into() }),
            ("YourName foo bar", Message::YourName { name: "foo bar".into() }),
            ("YourColour 11aa22", Message::YourColour { colour: "11aa22".into() }),
            (
                "GameOption 8 1.234",
                Message::GameOption {
                    option: GameOption::ShotSpeed,
                    value: 1.234,
                },
            ),
            ("GameStarts", Message::GameStarts),
            (
                "Radar 1.2 3 4.5",
                Message::Radar {
                    distance: 1.2,
                    object: Object::Cookie,
                    angle: 4.5,
                },
            ),
            (
                "Info 1.2 3.4 5.6",
                Message::Info {
                    time: 1.2,
                    speed: 3.4,
                    cannon_angle: 5.6,
                },
            ),
            (
                "Coordinates 1.2 3.4 5.6",
                Message::Coordinates {
                    x: 1.2,
                    y: 3.4,
                    angle: 5.6,
                },
            ),
            (
                "RobotInfo 1.2 0",
                Message::RobotInfo {
                    energy_level: 1.2,
                    team_mate: false,
                },
            ),
            (
                "RobotInfo 1.2 1",
                Message::RobotInfo {
                    energy_level: 1.2,
                    team_mate: true,
                },
            ),
            (
                "RotationReached 3",
                Message::RotationReached {
                    part: Part::ROBOT | Part::CANNON,
                },
            ),
            ("Energy\t1.2", Message::Energy { energy_level: 1.2 }),
            ("RobotsLeft 123", Message::RobotsLeft { count: 123 }),
            (
                "Collision 2 3.4",
                Message::Collision {
                    object: Object::Wall,
                    angle: 3.4,
                },
            ),
            (
                "Warning 2 foo",
                Message::Warning {
                    kind: WarningKind::MessageSentInIllegalState,
                    message: "foo".into(),
                },
            ),
            (
                "Warning 2 foo bar",
                Message::Warning {
                    kind: WarningKind::MessageSentInIllegalState,
                    message: "foo bar".into(),
                },
            ),
            ("Dead", Message::Dead),
            ("GameFinishes", Message::GameFinishes),
            ("ExitRobot", Message::ExitRobot),
        ];

        for (line, expected) in cases {
            assert_eq!(decode(line), Ok(expected), "line {:?}", line);
        }
    }

    #[test]
    fn test_decode_collapses_whitespace() {
        let msg = decode("  YourName \t foo   bar\t\n").unwrap();
        assert_eq!(msg, Message::YourName { name: "foo bar".into() });
    }

    #[test]
    fn test_decode_warning_without_text() {
        let msg = decode("Warning 5").unwrap();
        assert_eq!(
            msg,
            Message::Warning {
                kind: WarningKind::NameNotGiven,
                message: String::new(),
            }
        );
    }

    #[test]
    fn test_decode_keeps_unknown_codes() {
        assert_eq!(
            decode("Collision 9 0.5"),
            Ok(Message::Collision {
                object: Object::Unknown(9),
                angle: 0.5,
            })
        );
        assert_eq!(
            decode("RotationReached 16").unwrap(),
            Message::RotationReached {
                part: Part::from_code(16)
            }
        );
    }

    #[test]
    fn test_decode_wide_part_code() {
        let part = match decode("RotationReached 4294967297") {
            Ok(Message::RotationReached { part }) => part,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(part.code(), 1);
        assert_eq!(part.to_string(), "Robot");
        assert!(decode("RotationReached 99999999999999999999").is_err());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(""), Err(DecodeError::EmptyInput));
        assert_eq!(decode(" \t  "), Err(DecodeError::EmptyInput));
    }

    #[test]
    fn test_decode_unknown_message() {
        assert_eq!(
            decode("Teleport 1 2"),
            Err(DecodeError::UnknownMessage("Teleport".into()))
        );
        // Names are case sensitive
        assert!(matches!(
            decode("gamestarts"),
            Err(DecodeError::UnknownMessage(_))
        ));
    }

    #[test]
    fn test_decode_wrong_arity() {
        for line in [
            "Initialize",
            "Initialize 1 1",
            "YourName",
            "YourColour",
            "GameOption 8",
            "GameStarts now",
            "Radar 1.2 3",
            "Info 1 2 3 4",
            "Coordinates 1 2",
            "RobotInfo 1.2",
            "RotationReached",
            "Energy 1 2",
            "RobotsLeft",
            "Collision 2",
            "Warning",
            "Dead 1",
            "GameFinishes x",
            "ExitRobot now",
        ] {
            assert!(
                matches!(decode(line), Err(DecodeError::WrongArity { .. })),
                "line {:?}",
                line
            );
        }
    }

    #[test]
    fn test_wrong_arity_details() {
        assert_eq!(
            decode("Radar 1.2 3"),
            Err(DecodeError::WrongArity {
                message: "Radar",
                expected: Arity::Exact(4),
                got: 3,
            })
        );
        assert_eq!(
            decode("YourName"),
            Err(DecodeError::WrongArity {
                message: "YourName",
                expected: Arity::AtLeast(2),
                got: 1,
            })
        );
    }

    #[test]
    fn test_decode_malformed_field() {
        assert_eq!(
            decode("Radar 1.2 3.5 4.5"),
            Err(DecodeError::MalformedField {
                field: "object",
                token: "3.5".into(),
            })
        );
        assert_eq!(
            decode("Info 1.2 fast 5.6"),
            Err(DecodeError::MalformedField {
                field: "speed",
                token: "fast".into(),
            })
        );
        assert!(matches!(
            decode("Warning x foo"),
            Err(DecodeError::MalformedField { field: "warning", .. })
        ));
        assert!(matches!(
            decode("RobotsLeft 1.5"),
            Err(DecodeError::MalformedField { field: "count", .. })
        ));
    }

    #[test]
    fn test_robot_info_team_mate_is_strict() {
        assert_eq!(
            decode("RobotInfo 1.2 -1"),
            Err(DecodeError::MalformedField {
                field: "team_mate",
                token: "-1".into(),
            })
        );
        assert!(decode("RobotInfo 1.2 yes").is_err());
    }

    #[test]
    fn test_initialize_flag_is_loose() {
        assert_eq!(decode("Initialize yes"), Ok(Message::Initialize { first: false }));
        assert_eq!(decode("Initialize -1"), Ok(Message::Initialize { first: false }));
    }

    #[test]
    fn test_message_name_matches_wire_name() {
        for line in ["GameStarts", "Radar 1 2 3", "Warning 1", "ExitRobot"] {
            let msg: Message = line.parse().unwrap();
            assert_eq!(msg.name(), line.split(' ').next().unwrap());
        }
    }

    #[test]
    fn test_error_display() {
        let err = decode("Radar 1.2 3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "wrong number of fields for Radar: expected exactly 4 tokens, got 3"
        );
    }
}
