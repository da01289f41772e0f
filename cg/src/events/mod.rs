//! Game progress events
//!
//! Participants and the coordinator record a [`GameEvent`] for every
//! observable step. The [`EventLog`] keeps the transcript and, when asked,
//! echoes each event to stdout as a human-readable line.

mod log;
mod types;

pub use log::EventLog;
pub use types::GameEvent;
