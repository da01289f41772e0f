//! chairgame - musical chairs as a concurrency exercise
//!
//! N participant threads race for a shrinking pool of chairs. A coordinator
//! thread stops the music at random moments; every participant then makes
//! exactly one claim, and whoever finds no chair is eliminated. Each round
//! removes one chair until a single survivor is left.
//!
//! # Modules
//!
//! - [`game`] - seat pool, round signal, game state, participants and coordinator
//! - [`events`] - progress events and the transcript
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//! - [`error`] - error types
//!
//! # Example
//!
//! ```no_run
//! use chairgame::config::GameConfig;
//!
//! let report = chairgame::play(&GameConfig::default())?;
//! println!("winner: {}", report.winner);
//! # Ok::<(), chairgame::GameError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod game;

pub use config::{Config, GameConfig};
pub use error::GameError;
pub use events::{EventLog, GameEvent};
pub use game::{
    Coordinator, Cue, Finish, GameReport, GameState, Participant, ParticipantId, RoundSignal, RoundSummary,
    RoundTiming, Seat, SeatPool, Snapshot, play, play_with_log,
};

/// Players at the table when nothing else is configured
pub const DEFAULT_PLAYERS: usize = 4;
