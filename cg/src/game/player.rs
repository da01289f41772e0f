//! Participant - one thread racing for a chair every round

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::signal::Cue;
use super::state::{GameState, ParticipantId, Seat};
use crate::error::GameError;

/// How a participant left the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// Still seated when the game ended
    Survived,
    /// Found no chair in this round
    Eliminated { round: u32 },
}

/// A player at the table
pub struct Participant {
    id: ParticipantId,
    state: Arc<GameState>,
}

impl Participant {
    pub fn new(id: ParticipantId, state: Arc<GameState>) -> Self {
        Self { id, state }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Play until eliminated or until the game ends
    ///
    /// Races exactly once per stop of the music. Every attempt is reported to
    /// the round signal, whatever its outcome, so the coordinator can close
    /// the racing window.
    pub fn run(self) -> Result<Finish, GameError> {
        debug!(id = self.id, "Participant::run: joined the table");
        let signal = self.state.signal();
        let mut last_round = 0;

        loop {
            let round = match signal.wait_for_music(last_round) {
                Cue::GameOver => {
                    info!(id = self.id, "Participant::run: game over, leaving seated");
                    return Ok(Finish::Survived);
                }
                Cue::Race(round) => round,
            };
            last_round = round;

            let outcome = self.state.race(self.id, round);
            signal.attempt_finished();

            match outcome {
                Ok(Seat::Taken) => continue,
                Ok(Seat::Lost) => return Ok(Finish::Eliminated { round }),
                Err(e) => {
                    warn!(id = self.id, round, error = %e, "Participant::run: race failed, stopping game");
                    signal.end_game();
                    return Err(e);
                }
            }
        }
    }
}
