//! Event types for game progress
//!
//! Every line the game prints is one of these events:
//! - Round lifecycle (started, music stopped, standings)
//! - Race results (seated, eliminated)
//! - Game end (winner, finished)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::ParticipantId;

/// Something observable that happened during a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A round began with this many chairs on the table
    RoundStarted { round: u32, chairs: usize },
    /// The music stopped and the racing window opened
    MusicStopped { round: u32 },
    /// A participant claimed a chair
    Seated { round: u32, id: ParticipantId },
    /// A participant found no chair left
    Eliminated { round: u32, id: ParticipantId },
    /// Counts after the round was reclaimed
    Standings {
        round: u32,
        participants: usize,
        chairs: usize,
    },
    /// One participant is left
    Winner { id: ParticipantId, rounds: u32 },
    /// All threads have been joined
    Finished,
}

impl GameEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::RoundStarted { .. } => "RoundStarted",
            GameEvent::MusicStopped { .. } => "MusicStopped",
            GameEvent::Seated { .. } => "Seated",
            GameEvent::Eliminated { .. } => "Eliminated",
            GameEvent::Standings { .. } => "Standings",
            GameEvent::Winner { .. } => "Winner",
            GameEvent::Finished => "Finished",
        }
    }

    /// Round the event belongs to, if any
    pub fn round(&self) -> Option<u32> {
        match self {
            GameEvent::RoundStarted { round, .. }
            | GameEvent::MusicStopped { round }
            | GameEvent::Seated { round, .. }
            | GameEvent::Eliminated { round, .. }
            | GameEvent::Standings { round, .. } => Some(*round),
            GameEvent::Winner { .. } | GameEvent::Finished => None,
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::RoundStarted { round, chairs } => {
                write!(f, "Round {} started with {} chairs.", round, chairs)
            }
            GameEvent::MusicStopped { .. } => write!(f, "Music stopped! Run for the chairs!"),
            GameEvent::Seated { id, .. } => write!(f, "Player {} got a chair!", id),
            GameEvent::Eliminated { id, .. } => write!(f, "Player {} was eliminated.", id),
            GameEvent::Standings {
                participants, chairs, ..
            } => write!(f, "Players remaining: {}, chairs remaining: {}", participants, chairs),
            GameEvent::Winner { id, rounds } => {
                write!(f, "Musical chairs is over after {} rounds. Player {} wins!", rounds, id)
            }
            GameEvent::Finished => write!(f, "Game finished."),
        }
    }
}
