//! # RTB Protocol
//!
//! Client side of the RealTimeBattle robot protocol. The server talks to a
//! robot over its stdin/stdout, one message per line.
//!
//! ## Wire Format
//!
//! Whitespace-separated text lines, at most 128 bytes including the newline:
//! ```text
//! <Name> <field> <field> ...\n
//! ```
//!
//! ## Server Messages
//!
//! | Name | Fields |
//! |------|--------|
//! | Initialize | first:bool |
//! | YourName | name... |
//! | YourColour | colour... |
//! | GameOption | option:int, value:float |
//! | GameStarts | - |
//! | Radar | distance:float, object:int, angle:float |
//! | Info | time:float, speed:float, cannon_angle:float |
//! | Coordinates | x:float, y:float, angle:float |
//! | RobotInfo | energy_level:float, team_mate:0/1 |
//! | RotationReached | part:int |
//! | Energy | energy_level:float |
//! | RobotsLeft | count:int |
//! | Collision | object:int, angle:float |
//! | Warning | kind:int, message... |
//! | Dead, GameFinishes, ExitRobot | - |
//!
//! ## Robot Commands
//!
//! `RobotOption`, `Name`, `Colour`, `Rotate`, `RotateTo`, `RotateAmount`,
//! `Sweep`, `Accelerate`, `Break`, `Shoot`, `Print`, `Debug`, `DebugLine`,
//! `DebugCircle`. Floats are always written with six fractional digits.

mod commands;
mod error;
mod grammar;
pub mod listener;
mod messages;
pub mod writer;

pub use commands::{Command, EncodeError, LineBuilder, MAX_LINE_LEN};
pub use error::ProtocolError;
pub use grammar::{GameOption, Object, Part, RobotOption, RotationReachedMode, WarningKind};
pub use listener::{
    bootstrap, listen, listen_on, ListenSettings, ListenStats, Listener, ListenerState,
    MAX_INPUT_LINE,
};
pub use messages::{decode, Arity, DecodeError, Message};
pub use writer::CommandWriter;
