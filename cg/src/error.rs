//! Game error types

use thiserror::Error;

use crate::game::ParticipantId;

/// Errors that can occur while setting up or playing a game
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid player count {count}: musical chairs needs at least 2 players")]
    InvalidPlayerCount { count: usize },

    #[error("Invalid stop interval: min {min_ms}ms is greater than max {max_ms}ms")]
    InvalidStopInterval { min_ms: u64, max_ms: u64 },

    #[error("Participant {id} is not in the game")]
    UnknownParticipant { id: ParticipantId },

    #[error("Participant {id} already raced in round {round}")]
    AlreadyRaced { id: ParticipantId, round: u32 },

    #[error("Game is already over")]
    GameOver,

    #[error("Game ended without a single survivor")]
    NoSurvivor,

    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Thread {name} panicked")]
    ThreadPanicked { name: String },
}

impl GameError {
    /// Check if this error comes from a bad configuration rather than from play
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GameError::InvalidPlayerCount { .. } | GameError::InvalidStopInterval { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_player_count_message() {
        let err = GameError::InvalidPlayerCount { count: 1 };

        let msg = err.to_string();
        assert!(msg.contains("1"));
        assert!(msg.contains("at least 2"));
    }

    #[test]
    fn test_already_raced_message() {
        let err = GameError::AlreadyRaced { id: 3, round: 2 };

        let msg = err.to_string();
        assert!(msg.contains("Participant 3"));
        assert!(msg.contains("round 2"));
    }

    #[test]
    fn test_is_config_error() {
        assert!(GameError::InvalidPlayerCount { count: 0 }.is_config_error());
        assert!(GameError::InvalidStopInterval { min_ms: 5, max_ms: 1 }.is_config_error());
        assert!(!GameError::UnknownParticipant { id: 1 }.is_config_error());
        assert!(
            !GameError::ThreadPanicked {
                name: "player-1".to_string()
            }
            .is_config_error()
        );
    }
}
