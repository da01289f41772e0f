//! Musical chairs game
//!
//! One coordinator thread and one thread per participant share a
//! [`GameState`] arena:
//! - **SeatPool:** bounded counter of chairs, claimed without blocking
//! - **RoundSignal:** broadcast that stops the music and ends the game
//! - **GameState:** standings, serialized behind one lock
//!
//! [`play`] spawns every thread, joins them and returns a [`GameReport`].

mod coordinator;
mod player;
mod seats;
mod signal;
mod state;

pub use coordinator::{Coordinator, RoundTiming};
pub use player::{Finish, Participant};
pub use seats::SeatPool;
pub use signal::{Cue, RoundSignal};
pub use state::{GameState, ParticipantId, RoundSummary, Seat, Snapshot};

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::events::{EventLog, GameEvent};

/// Outcome of a finished game
#[derive(Debug, Clone)]
pub struct GameReport {
    pub players: usize,
    pub winner: ParticipantId,
    pub rounds: Vec<RoundSummary>,
    /// How each participant left, ordered by id
    pub finishes: Vec<(ParticipantId, Finish)>,
    pub events: Vec<GameEvent>,
}

impl GameReport {
    /// Round in which `id` was eliminated, None for the winner
    pub fn eliminated_in(&self, id: ParticipantId) -> Option<u32> {
        self.finishes.iter().find(|(pid, _)| *pid == id).and_then(|(_, finish)| match finish {
            Finish::Eliminated { round } => Some(*round),
            Finish::Survived => None,
        })
    }
}

/// Play a whole game with the given setup
pub fn play(config: &GameConfig) -> Result<GameReport, GameError> {
    play_with_log(config, EventLog::new(config.echo))
}

/// Play a whole game, recording into `events`
pub fn play_with_log(config: &GameConfig, events: EventLog) -> Result<GameReport, GameError> {
    config.validate()?;
    info!(players = config.players, seed = ?config.seed, "play: starting game");

    let state = Arc::new(GameState::new(config.players, events)?);

    let mut participants = Vec::with_capacity(config.players);
    for id in 1..=config.players {
        let participant = Participant::new(id, Arc::clone(&state));
        let spawned = thread::Builder::new()
            .name(format!("player-{}", id))
            .spawn(move || participant.run());
        match spawned {
            Ok(handle) => participants.push((id, handle)),
            Err(e) => {
                warn!(id, error = %e, "play: failed to spawn participant");
                abandon(&state, participants);
                return Err(GameError::Spawn(e));
            }
        }
    }

    let coordinator = Coordinator::new(Arc::clone(&state), RoundTiming::from(config), config.seed);
    let coordinator = match thread::Builder::new()
        .name("coordinator".to_string())
        .spawn(move || coordinator.run())
    {
        Ok(handle) => handle,
        Err(e) => {
            warn!(error = %e, "play: failed to spawn coordinator");
            abandon(&state, participants);
            return Err(GameError::Spawn(e));
        }
    };

    let mut finishes = Vec::with_capacity(config.players);
    let mut first_error = None;
    for (id, handle) in participants {
        match handle.join() {
            Ok(Ok(finish)) => finishes.push((id, finish)),
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(_) => {
                state.signal().end_game();
                first_error.get_or_insert(GameError::ThreadPanicked {
                    name: format!("player-{}", id),
                });
            }
        }
    }

    let winner = coordinator.join().map_err(|_| GameError::ThreadPanicked {
        name: "coordinator".to_string(),
    })?;
    if let Some(e) = first_error {
        return Err(e);
    }
    let winner = winner.ok_or(GameError::NoSurvivor)?;

    state.events().record(GameEvent::Finished);
    debug!(winner, rounds = state.rounds().len(), "play: game finished");

    Ok(GameReport {
        players: state.players(),
        winner,
        rounds: state.rounds(),
        finishes,
        events: state.events().events(),
    })
}

/// End the game and reap the threads already started
fn abandon<T>(state: &GameState, handles: Vec<(ParticipantId, JoinHandle<T>)>) {
    state.signal().end_game();
    for (_, handle) in handles {
        let _ = handle.join();
    }
}
