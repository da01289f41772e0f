//! Round signal - the broadcast that starts each race and ends the game
//!
//! One mutex guards both flags, the round number and the attempt countdown.
//! Participants sleep on `music`, the coordinator sleeps on `attempts`.
//! Every predicate is re-checked under that mutex after each wake, so a
//! broadcast sent before a thread starts waiting is never missed.

use parking_lot::{Condvar, Mutex};
use tracing::debug;

/// What a waiting participant should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Music stopped for this round: race for a chair
    Race(u32),
    /// The game is over: leave without racing
    GameOver,
}

#[derive(Debug)]
struct SignalState {
    music_stopped: bool,
    game_active: bool,
    round: u32,
    racers: usize,
    attempts: usize,
}

/// Broadcast condition shared by the coordinator and every participant
#[derive(Debug)]
pub struct RoundSignal {
    state: Mutex<SignalState>,
    music: Condvar,
    attempts: Condvar,
}

impl Default for RoundSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundSignal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SignalState {
                music_stopped: false,
                game_active: true,
                round: 0,
                racers: 0,
                attempts: 0,
            }),
            music: Condvar::new(),
            attempts: Condvar::new(),
        }
    }

    /// Start the music again for the next round
    pub fn begin_round(&self) {
        let mut state = self.state.lock();
        debug!(round = state.round, "RoundSignal::begin_round: called");
        state.music_stopped = false;
    }

    /// Stop the music and wake every participant
    ///
    /// Arms the attempt countdown with `racers` and returns the new round number.
    pub fn stop_music(&self, racers: usize) -> u32 {
        let mut state = self.state.lock();
        state.round += 1;
        state.music_stopped = true;
        state.racers = racers;
        state.attempts = 0;
        let woken = self.music.notify_all();
        debug!(round = state.round, racers, woken, "RoundSignal::stop_music: broadcast");
        state.round
    }

    /// Mark the game finished and wake everyone
    ///
    /// Returns true only for the call that flipped `game_active`.
    pub fn end_game(&self) -> bool {
        let mut state = self.state.lock();
        if !state.game_active {
            debug!("RoundSignal::end_game: already ended");
            return false;
        }
        state.game_active = false;
        self.music.notify_all();
        self.attempts.notify_all();
        debug!(round = state.round, "RoundSignal::end_game: game ended");
        true
    }

    /// Block until the music stops for a round after `last_round`, or the game ends
    pub fn wait_for_music(&self, last_round: u32) -> Cue {
        let mut state = self.state.lock();
        loop {
            if !state.game_active {
                return Cue::GameOver;
            }
            if state.music_stopped && state.round > last_round {
                return Cue::Race(state.round);
            }
            self.music.wait(&mut state);
        }
    }

    /// Record one finished race attempt for the current round
    pub fn attempt_finished(&self) {
        let mut state = self.state.lock();
        state.attempts += 1;
        debug!(
            round = state.round,
            attempts = state.attempts,
            racers = state.racers,
            "RoundSignal::attempt_finished: called"
        );
        if state.attempts >= state.racers {
            self.attempts.notify_all();
        }
    }

    /// Block until every racer of the current round has finished its attempt
    ///
    /// Returns early once the game has ended: racers that had not raced yet
    /// will see the game over and never attempt.
    pub fn wait_for_attempts(&self) {
        let mut state = self.state.lock();
        while state.game_active && state.attempts < state.racers {
            self.attempts.wait(&mut state);
        }
        debug!(round = state.round, attempts = state.attempts, "RoundSignal::wait_for_attempts: done");
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().game_active
    }

    pub fn is_music_stopped(&self) -> bool {
        self.state.lock().music_stopped
    }

    /// Number of the most recent stop, 0 before the first one
    pub fn round(&self) -> u32 {
        self.state.lock().round
    }
}
