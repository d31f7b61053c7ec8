//! Session start-up and background ingestion of server messages.
//!
//! [`listen`] sends the start-up options, then spawns a thread that reads
//! the server's lines, decodes them and hands the messages to the consumer
//! over a channel, in the order the lines arrived. Lines that fail to decode
//! are logged and dropped. The channel closes when the input ends.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread;

use log::{debug, error, trace, warn};

use crate::grammar::{RobotOption, RotationReachedMode};
use crate::messages::{decode, Message};
use crate::writer::CommandWriter;
use crate::ProtocolError;

/// Settings for [`listen`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenSettings {
    /// When the server should send `RotationReached`
    pub send_rotation_reached: RotationReachedMode,
    /// Messages buffered before the reader blocks. 0 makes every message a
    /// rendezvous between the reader and the consumer.
    pub channel_capacity: usize,
    /// Enables `Debug` lines on the writer, including reports of lines
    /// that could not be decoded
    pub debug: bool,
}

/// Lifecycle of a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// Start-up options are being sent
    Starting = 0,
    /// The reader thread is delivering messages
    Running = 1,
    /// Input ended; the reader is shutting down
    Draining = 2,
    /// The channel is closed, no more messages will arrive
    Closed = 3,
}

impl ListenerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ListenerState::Starting,
            1 => ListenerState::Running,
            2 => ListenerState::Draining,
            _ => ListenerState::Closed,
        }
    }
}

/// Counters kept by the reader thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenStats {
    /// Messages handed to the consumer
    pub delivered: u64,
    /// Lines dropped because they did not decode
    pub rejected: u64,
}

/// State shared between the reader thread and the [`Listener`]
struct Shared {
    state: AtomicU8,
    delivered: AtomicU64,
    rejected: AtomicU64,
}

impl Shared {
    fn new() -> Self {
        Shared {
            state: AtomicU8::new(ListenerState::Starting as u8),
            delivered: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    fn set_state(&self, state: ListenerState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}

/// Consumer end of a running session.
///
/// Messages are received with [`recv`](Listener::recv) or by iterating;
/// iteration ends when the server closes the input. Commands go out
/// through [`writer`](Listener::writer).
pub struct Listener {
    messages: Receiver<Message>,
    writer: CommandWriter,
    shared: Arc<Shared>,
}

impl Listener {
    /// Wait for the next message. Returns `None` once the input has ended.
    pub fn recv(&self) -> Option<Message> {
        self.messages.recv().ok()
    }

    /// Take a message if one is waiting.
    /// Returns None if no message is available
    pub fn try_recv(&self) -> Option<Message> {
        self.messages.try_recv().ok()
    }

    /// Blocking iterator over the messages, ending when the input ends
    pub fn iter(&self) -> mpsc::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Writer for commands, sharing the session's output stream
    pub fn writer(&self) -> &CommandWriter {
        &self.writer
    }

    pub fn state(&self) -> ListenerState {
        ListenerState::from_u8(self.shared.state.load(Ordering::SeqCst))
    }

    pub fn stats(&self) -> ListenStats {
        ListenStats {
            delivered: self.shared.delivered.load(Ordering::SeqCst),
            rejected: self.shared.rejected.load(Ordering::SeqCst),
        }
    }
}

impl<'a> IntoIterator for &'a Listener {
    type Item = Message;
    type IntoIter = mpsc::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Send the start-up options every session begins with.
///
/// Reads happen on a dedicated thread, so blocking mode is requested.
pub fn bootstrap(writer: &CommandWriter, mode: RotationReachedMode) -> Result<(), ProtocolError> {
    debug!("-> RobotOption UseNonBlocking 0");
    writer.robot_option(RobotOption::UseNonBlocking, 0)?;
    debug!("-> RobotOption SendRotationReached {}", mode.level());
    writer.robot_option(RobotOption::SendRotationReached, mode.level())?;
    Ok(())
}

/// Start a session on the process stdin/stdout
pub fn listen(settings: ListenSettings) -> Result<Listener, ProtocolError> {
    listen_on(BufReader::new(io::stdin()), io::stdout(), settings)
}

/// Start a session on the given streams.
///
/// The start-up options are written before this returns; any error doing
/// so is returned and no reader is started.
pub fn listen_on<R, W>(
    input: R,
    output: W,
    settings: ListenSettings,
) -> Result<Listener, ProtocolError>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    let writer = CommandWriter::new(output).with_debug(settings.debug);
    let shared = Arc::new(Shared::new());

    bootstrap(&writer, settings.send_rotation_reached)?;

    let (tx, rx) = mpsc::sync_channel(settings.channel_capacity);
    shared.set_state(ListenerState::Running);

    let reader_shared = shared.clone();
    let reader_writer = writer.clone();
    thread::Builder::new()
        .name("rtb-reader".to_string())
        .spawn(move || read_loop(input, tx, reader_writer, reader_shared))?;

    Ok(Listener {
        messages: rx,
        writer,
        shared,
    })
}

/// Longest input line kept, newline included. Longer lines are dropped.
pub const MAX_INPUT_LINE: usize = 64 * 1024;

/// One line read from the server
enum Line {
    Text(String),
    TooLong(usize),
    Eof,
}

/// Read one line, never buffering more than [`MAX_INPUT_LINE`] bytes of it.
/// Bytes that are not valid UTF-8 are replaced, not treated as an error.
fn read_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<Line> {
    buf.clear();
    let limit = MAX_INPUT_LINE as u64;
    if input.by_ref().take(limit).read_until(b'\n', buf)? == 0 {
        return Ok(Line::Eof);
    }

    if buf.len() == MAX_INPUT_LINE && buf.last() != Some(&b'\n') {
        // Skip the rest of the line
        let mut skipped = buf.len();
        loop {
            buf.clear();
            let n = input.by_ref().take(limit).read_until(b'\n', buf)?;
            skipped += n;
            if n == 0 || buf.last() == Some(&b'\n') {
                return Ok(Line::TooLong(skipped));
            }
        }
    }

    Ok(Line::Text(String::from_utf8_lossy(buf).into_owned()))
}

fn read_loop<R: BufRead>(
    mut input: R,
    tx: SyncSender<Message>,
    writer: CommandWriter,
    shared: Arc<Shared>,
) {
    let mut buf = Vec::new();
    loop {
        let line = match read_line(&mut input, &mut buf) {
            Ok(Line::Text(l)) => l,
            Ok(Line::TooLong(len)) => {
                shared.rejected.fetch_add(1, Ordering::SeqCst);
                warn!("dropped {} byte line from server", len);
                continue;
            }
            Ok(Line::Eof) => {
                shared.set_state(ListenerState::Draining);
                debug!("server input closed");
                break;
            }
            Err(e) => {
                shared.set_state(ListenerState::Draining);
                error!("error reading from server: {}", e);
                break;
            }
        };

        match decode(&line) {
            Ok(msg) => {
                trace!("<- {:?}", msg);
                if tx.send(msg).is_err() {
                    debug!("consumer is gone, stopping reader");
                    shared.set_state(ListenerState::Closed);
                    return;
                }
                shared.delivered.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                shared.rejected.fetch_add(1, Ordering::SeqCst);
                let report = format!("error parsing message {:?}: {}", line.trim_end(), e);
                warn!("{}", report);
                if let Err(e) = writer.debug(&report) {
                    warn!("could not report parse error to server: {}", e);
                }
            }
        }
    }

    // Closed must be visible before the consumer sees the channel end
    shared.set_state(ListenerState::Closed);
    drop(tx);
}
