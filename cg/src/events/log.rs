//! Event log - in-memory transcript with optional stdout echo

use std::fmt;
use std::io::{self, Write};

use colored::*;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::types::GameEvent;

struct Transcript {
    events: Vec<GameEvent>,
    echo: Option<Box<dyn Write + Send>>,
}

/// Ordered record of everything that happened in a game
///
/// Events are appended and echoed under the same lock, so stdout shows
/// them in transcript order even when many threads record at once.
/// A failed echo (closed pipe, full disk) is logged and the game goes on.
pub struct EventLog {
    inner: Mutex<Transcript>,
}

impl EventLog {
    /// Create a log that also prints every event to stdout
    pub fn new(echo: bool) -> Self {
        debug!(echo, "EventLog::new: called");
        let sink: Option<Box<dyn Write + Send>> = if echo { Some(Box::new(io::stdout())) } else { None };
        Self::with_sink(sink)
    }

    /// Create a log that only keeps the transcript
    pub fn silent() -> Self {
        Self::new(false)
    }

    /// Create a log that echoes every event to `out`
    pub fn with_writer<W: Write + Send + 'static>(out: W) -> Self {
        Self::with_sink(Some(Box::new(out)))
    }

    fn with_sink(echo: Option<Box<dyn Write + Send>>) -> Self {
        Self {
            inner: Mutex::new(Transcript {
                events: Vec::new(),
                echo,
            }),
        }
    }

    /// Append an event
    pub fn record(&self, event: GameEvent) {
        debug!(event_type = event.event_type(), round = ?event.round(), "EventLog::record");
        let mut inner = self.inner.lock();
        if let Some(out) = inner.echo.as_mut()
            && let Err(e) = writeln!(out, "{}", paint(&event)).and_then(|_| out.flush())
        {
            warn!(error = %e, event_type = event.event_type(), "EventLog::record: echo failed");
        }
        inner.events.push(event);
    }

    /// Copy of the transcript so far
    pub fn events(&self) -> Vec<GameEvent> {
        self.inner.lock().events.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().events.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::silent()
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("EventLog")
            .field("events", &inner.events.len())
            .field("echo", &inner.echo.is_some())
            .finish()
    }
}

fn paint(event: &GameEvent) -> ColoredString {
    let line = event.to_string();
    match event {
        GameEvent::RoundStarted { .. } => line.cyan().bold(),
        GameEvent::MusicStopped { .. } => line.yellow(),
        GameEvent::Seated { .. } => line.green(),
        GameEvent::Eliminated { .. } => line.red(),
        GameEvent::Standings { .. } => line.dimmed(),
        GameEvent::Winner { .. } => line.magenta().bold(),
        GameEvent::Finished => line.normal(),
    }
}
