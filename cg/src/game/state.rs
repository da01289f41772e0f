//! Game state - elimination bookkeeping shared by every thread
//!
//! `GameState` owns the seat pool, the round signal and the event log, and
//! serializes every mutation of the standings through one lock. A race holds
//! that lock across the claim and the elimination it may cause, so a round
//! can never start while the previous one is still settling.

use std::collections::{BTreeSet, HashMap};

use parking_lot::Mutex;
use tracing::{debug, info};

use super::seats::SeatPool;
use super::signal::RoundSignal;
use crate::error::GameError;
use crate::events::{EventLog, GameEvent};

/// Participant identity, 1-based
pub type ParticipantId = usize;

/// Result of one race attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Taken,
    Lost,
}

/// What happened in a single round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    /// Chairs on the table when the round started
    pub chairs: usize,
    /// Participants alive when the round started
    pub racers: usize,
    pub seated: Vec<ParticipantId>,
    pub eliminated: Vec<ParticipantId>,
}

impl RoundSummary {
    fn new(round: u32, chairs: usize, racers: usize) -> Self {
        Self {
            round,
            chairs,
            racers,
            seated: Vec::new(),
            eliminated: Vec::new(),
        }
    }

    /// Every racer either sat down or was eliminated
    pub fn is_settled(&self) -> bool {
        self.seated.len() + self.eliminated.len() == self.racers
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub round: u32,
    pub participants: usize,
    pub chairs: usize,
}

#[derive(Debug)]
struct Standings {
    alive: BTreeSet<ParticipantId>,
    chairs: usize,
    round: u32,
    last_raced: HashMap<ParticipantId, u32>,
    rounds: Vec<RoundSummary>,
}

/// Shared arena for one game
#[derive(Debug)]
pub struct GameState {
    players: usize,
    standings: Mutex<Standings>,
    seats: SeatPool,
    signal: RoundSignal,
    events: EventLog,
}

impl GameState {
    /// Set up a table with one chair per player
    ///
    /// The first `start_round` takes one away, so round 1 has `players - 1` chairs.
    pub fn new(players: usize, events: EventLog) -> Result<Self, GameError> {
        debug!(players, "GameState::new: called");
        if players < 2 {
            return Err(GameError::InvalidPlayerCount { count: players });
        }

        Ok(Self {
            players,
            standings: Mutex::new(Standings {
                alive: (1..=players).collect(),
                chairs: players,
                round: 0,
                last_raced: HashMap::new(),
                rounds: Vec::new(),
            }),
            seats: SeatPool::new(players),
            signal: RoundSignal::new(),
            events,
        })
    }

    /// Remove one chair and reset the pool for the next round
    ///
    /// Call only while the music is playing.
    pub fn start_round(&self) -> RoundSummary {
        debug_assert!(!self.signal.is_music_stopped(), "start_round while music is stopped");

        let mut standings = self.standings.lock();
        standings.round += 1;
        standings.chairs = standings.chairs.saturating_sub(1);
        self.seats.reset(standings.chairs);

        let summary = RoundSummary::new(standings.round, standings.chairs, standings.alive.len());
        standings.rounds.push(summary.clone());

        info!(
            round = standings.round,
            chairs = standings.chairs,
            participants = standings.alive.len(),
            "GameState::start_round: round started"
        );
        self.events.record(GameEvent::RoundStarted {
            round: standings.round,
            chairs: standings.chairs,
        });
        summary
    }

    /// One claim attempt for `id` in `round`
    ///
    /// A failed claim eliminates the participant before the lock is released.
    pub fn race(&self, id: ParticipantId, round: u32) -> Result<Seat, GameError> {
        let mut standings = self.standings.lock();
        if !standings.alive.contains(&id) {
            return Err(GameError::UnknownParticipant { id });
        }
        if standings.last_raced.insert(id, round) == Some(round) {
            return Err(GameError::AlreadyRaced { id, round });
        }

        if self.seats.try_claim() {
            debug!(id, round, "GameState::race: seated");
            if let Some(summary) = standings.rounds.last_mut() {
                summary.seated.push(id);
            }
            self.events.record(GameEvent::Seated { round, id });
            Ok(Seat::Taken)
        } else {
            debug!(id, round, "GameState::race: no chair left");
            self.eliminate_locked(&mut standings, id, round);
            Ok(Seat::Lost)
        }
    }

    /// Remove `id` from the game
    ///
    /// Returns the number of participants left. Reaching one ends the game.
    pub fn eliminate(&self, id: ParticipantId) -> Result<usize, GameError> {
        let mut standings = self.standings.lock();
        if !standings.alive.contains(&id) {
            return Err(GameError::UnknownParticipant { id });
        }
        if standings.alive.len() == 1 {
            return Err(GameError::GameOver);
        }
        let round = standings.round;
        Ok(self.eliminate_locked(&mut standings, id, round))
    }

    fn eliminate_locked(&self, standings: &mut Standings, id: ParticipantId, round: u32) -> usize {
        standings.alive.remove(&id);
        if let Some(summary) = standings.rounds.last_mut().filter(|s| s.round == round) {
            summary.eliminated.push(id);
        }
        self.events.record(GameEvent::Eliminated { round, id });

        let remaining = standings.alive.len();
        info!(id, round, remaining, "GameState::eliminate: participant out");
        if remaining == 1 && self.signal.end_game() {
            debug!(round, "GameState::eliminate: last elimination ended the game");
        }
        remaining
    }

    /// Refill the pool with exactly next round's chair count
    ///
    /// Returns the number of permits released.
    pub fn reclaim(&self) -> usize {
        let standings = self.standings.lock();
        let next_chairs = standings.alive.len().saturating_sub(1);
        let released = next_chairs.saturating_sub(self.seats.available());
        self.seats.replenish(released);
        debug!(
            round = standings.round,
            next_chairs,
            released,
            "GameState::reclaim: called"
        );
        released
    }

    pub fn participants_remaining(&self) -> usize {
        self.standings.lock().alive.len()
    }

    pub fn chairs_remaining(&self) -> usize {
        self.standings.lock().chairs
    }

    /// Ids still in the game, ascending
    pub fn alive(&self) -> Vec<ParticipantId> {
        self.standings.lock().alive.iter().copied().collect()
    }

    /// The last one standing, once only one is left
    pub fn survivor(&self) -> Option<ParticipantId> {
        let standings = self.standings.lock();
        match standings.alive.len() {
            1 => standings.alive.first().copied(),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let standings = self.standings.lock();
        Snapshot {
            round: standings.round,
            participants: standings.alive.len(),
            chairs: standings.chairs,
        }
    }

    pub fn rounds(&self) -> Vec<RoundSummary> {
        self.standings.lock().rounds.clone()
    }

    /// Player count the game started with
    pub fn players(&self) -> usize {
        self.players
    }

    pub fn seats(&self) -> &SeatPool {
        &self.seats
    }

    pub fn signal(&self) -> &RoundSignal {
        &self.signal
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(players: usize) -> GameState {
        GameState::new(players, EventLog::silent()).unwrap()
    }

    #[test]
    fn test_rejects_fewer_than_two_players() {
        for count in [0, 1] {
            let err = GameState::new(count, EventLog::silent()).unwrap_err();
            assert!(matches!(err, GameError::InvalidPlayerCount { count: c } if c == count));
        }
    }

    #[test]
    fn test_first_round_has_one_chair_less_than_players() {
        let state = table(4);
        assert_eq!(state.chairs_remaining(), 4);

        let summary = state.start_round();
        assert_eq!(summary.round, 1);
        assert_eq!(summary.chairs, 3);
        assert_eq!(summary.racers, 4);
        assert_eq!(state.seats().available(), 3);
        assert_eq!(state.chairs_remaining(), state.participants_remaining() - 1);
    }

    #[test]
    fn test_race_seats_until_chairs_run_out() {
        let state = table(3);
        state.start_round();
        let round = state.signal().stop_music(3);

        assert_eq!(state.race(1, round).unwrap(), Seat::Taken);
        assert_eq!(state.race(2, round).unwrap(), Seat::Taken);
        assert_eq!(state.race(3, round).unwrap(), Seat::Lost);

        assert_eq!(state.participants_remaining(), 2);
        assert_eq!(state.alive(), vec![1, 2]);
        assert_eq!(state.seats().available(), 0);

        let rounds = state.rounds();
        assert_eq!(rounds[0].seated, vec![1, 2]);
        assert_eq!(rounds[0].eliminated, vec![3]);
        assert!(rounds[0].is_settled());
    }

    #[test]
    fn test_second_claim_in_same_round_is_refused() {
        let state = table(4);
        state.start_round();
        let round = state.signal().stop_music(4);

        assert_eq!(state.race(2, round).unwrap(), Seat::Taken);
        let err = state.race(2, round).unwrap_err();
        assert!(matches!(err, GameError::AlreadyRaced { id: 2, round: 1 }));
        assert_eq!(state.seats().available(), 2);
    }

    #[test]
    fn test_eliminated_participant_cannot_race() {
        let state = table(2);
        state.start_round();
        let round = state.signal().stop_music(2);

        assert_eq!(state.race(1, round).unwrap(), Seat::Taken);
        assert_eq!(state.race(2, round).unwrap(), Seat::Lost);
        assert!(matches!(
            state.race(2, round + 1),
            Err(GameError::UnknownParticipant { id: 2 })
        ));
    }

    #[test]
    fn test_last_elimination_ends_game() {
        let state = table(3);
        assert_eq!(state.eliminate(1).unwrap(), 2);
        assert!(state.signal().is_active());
        assert_eq!(state.survivor(), None);

        assert_eq!(state.eliminate(3).unwrap(), 1);
        assert!(!state.signal().is_active());
        assert_eq!(state.survivor(), Some(2));

        assert!(matches!(state.eliminate(2), Err(GameError::GameOver)));
        assert_eq!(state.participants_remaining(), 1);
    }

    #[test]
    fn test_reclaim_refills_to_next_round_chairs() {
        let state = table(5);
        state.start_round();
        let round = state.signal().stop_music(5);
        for id in 1..=5 {
            state.race(id, round).unwrap();
        }
        assert_eq!(state.seats().available(), 0);

        assert_eq!(state.reclaim(), 3);
        assert_eq!(state.seats().available(), 3);

        state.signal().begin_round();
        let summary = state.start_round();
        assert_eq!(summary.chairs, 3);
        assert_eq!(summary.racers, 4);
        assert_eq!(state.seats().available(), 3);
    }

    #[test]
    fn test_four_player_scenario() {
        let state = table(4);
        let mut alive = vec![1, 2, 3, 4];

        for (expected_chairs, expected_left) in [(3, 3), (2, 2), (1, 1)] {
            let summary = state.start_round();
            assert_eq!(summary.chairs, expected_chairs);

            let round = state.signal().stop_music(alive.len());
            let mut seated = 0;
            for &id in &alive {
                if state.race(id, round).unwrap() == Seat::Taken {
                    seated += 1;
                }
            }
            assert_eq!(seated, expected_chairs);
            assert_eq!(state.participants_remaining(), expected_left);

            state.reclaim();
            alive = state.alive();
            if state.signal().is_active() {
                state.signal().begin_round();
            }
        }

        assert!(!state.signal().is_active());
        assert_eq!(state.survivor(), Some(1));
        assert!(state.rounds().iter().all(RoundSummary::is_settled));
    }

    #[test]
    fn test_events_follow_race_order() {
        let state = table(2);
        state.start_round();
        let round = state.signal().stop_music(2);
        state.race(2, round).unwrap();
        state.race(1, round).unwrap();

        assert_eq!(
            state.events().events(),
            vec![
                GameEvent::RoundStarted { round: 1, chairs: 1 },
                GameEvent::Seated { round: 1, id: 2 },
                GameEvent::Eliminated { round: 1, id: 1 },
            ]
        );
    }
}
