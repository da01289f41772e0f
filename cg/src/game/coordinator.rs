//! Coordinator - paces the rounds until one participant is left

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::state::{GameState, ParticipantId};
use crate::config::GameConfig;
use crate::events::GameEvent;

/// Round timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTiming {
    /// Shortest stretch of music before a stop
    pub stop_min: Duration,
    /// Longest stretch of music before a stop
    pub stop_max: Duration,
    /// Pause after every racer finished, before the chairs are reclaimed
    pub grace: Duration,
}

impl From<&GameConfig> for RoundTiming {
    fn from(config: &GameConfig) -> Self {
        Self {
            stop_min: config.stop_min(),
            stop_max: config.stop_max(),
            grace: config.grace(),
        }
    }
}

/// Drives the music: stops it at random moments and settles each round
pub struct Coordinator {
    state: Arc<GameState>,
    timing: RoundTiming,
    rng: StdRng,
}

impl Coordinator {
    pub fn new(state: Arc<GameState>, timing: RoundTiming, seed: Option<u64>) -> Self {
        debug!(?timing, ?seed, "Coordinator::new: called");
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { state, timing, rng }
    }

    /// Run rounds until the game ends
    ///
    /// Returns the survivor, if the game ended with exactly one.
    pub fn run(mut self) -> Option<ParticipantId> {
        let state = Arc::clone(&self.state);
        let signal = state.signal();
        info!(players = state.players(), "Coordinator started");

        loop {
            let summary = state.start_round();

            let pause = self.music_duration();
            debug!(round = summary.round, ?pause, "Coordinator::run: music playing");
            thread::sleep(pause);

            // Announce before the broadcast so no race result precedes it
            let racers = state.participants_remaining();
            state.events().record(GameEvent::MusicStopped { round: signal.round() + 1 });
            let round = signal.stop_music(racers);

            signal.wait_for_attempts();
            if !self.timing.grace.is_zero() {
                thread::sleep(self.timing.grace);
            }

            let released = state.reclaim();
            let snapshot = state.snapshot();
            debug!(round, released, ?snapshot, "Coordinator::run: round settled");
            state.events().record(GameEvent::Standings {
                round,
                participants: snapshot.participants,
                chairs: state.seats().available(),
            });

            if !signal.is_active() {
                break;
            }
            signal.begin_round();
        }

        let survivor = state.survivor();
        match survivor {
            Some(id) => {
                let rounds = signal.round();
                info!(id, rounds, "Coordinator finished with a winner");
                state.events().record(GameEvent::Winner { id, rounds });
            }
            None => info!("Coordinator finished without a winner"),
        }
        survivor
    }

    fn music_duration(&mut self) -> Duration {
        let min = self.timing.stop_min.as_millis() as u64;
        let max = self.timing.stop_max.as_millis() as u64;
        if min >= max {
            return self.timing.stop_min;
        }
        Duration::from_millis(self.rng.random_range(min..=max))
    }
}
