//! Errors returned when sending commands or starting a session.

use thiserror::Error;

use crate::commands::EncodeError;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// I/O error while writing to or reading from the server
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Command could not be put on the wire
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Another writer panicked while holding the output stream
    #[error("Output stream lock poisoned")]
    Poisoned,
}
