//! Game session state and the randomized pause draw.
//!
//! A session is a plain value: the configured pause window, the position
//! at which playback will pause (while a timer is armed), and whether a
//! round is in progress. The controller owns the single live session
//! behind a lock; nothing here touches the device or the clock.

use crate::error::{GameError, Result};
use rand::Rng;

/// Phase of the game state machine.
///
/// ```text
/// Idle -> Armed -> PausedByGame
///           |            |
///           v            v
///        Stopped      (continue -> Armed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// No round in progress
    #[default]
    Idle,
    /// A pause timer is pending
    Armed,
    /// The timer fired and playback was paused
    PausedByGame,
    /// The user stopped the game
    Stopped,
}

/// State of the current (or most recent) game round.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSession {
    /// Lower bound of the pause window, in seconds
    pub min_seconds: u64,
    /// Upper bound (exclusive) of the pause window, in seconds
    pub max_seconds: u64,
    /// Track position (ms) at which playback will pause, while armed
    pub pause_at_ms: Option<u64>,
    /// Whether a round is in progress (armed timer pending)
    pub is_active: bool,
    /// Current phase of the round
    pub phase: GamePhase,
}

/// Validate a pause window.
///
/// The draw interval `[min, max)` is empty unless `min < max`, so equal
/// bounds are rejected too.
pub fn validate_range(min_seconds: u64, max_seconds: u64) -> Result<()> {
    if min_seconds >= max_seconds {
        return Err(GameError::InvalidRange {
            min: min_seconds,
            max: max_seconds,
        });
    }
    Ok(())
}

/// Draw a pause delay uniformly from `[min_seconds, max_seconds)`,
/// returned in milliseconds.
///
/// The draw is continuous over the window at millisecond granularity, so
/// `min=5, max=6` yields delays anywhere in `[5000, 6000)` ms.
///
/// Callers must validate the range first; an empty window panics in
/// `gen_range`.
pub fn draw_pause_delay_ms(min_seconds: u64, max_seconds: u64) -> u64 {
    let mut rng = rand::thread_rng();
    rng.gen_range(min_seconds * 1000..max_seconds * 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_range_accepts_nonempty_window() {
        assert!(validate_range(5, 6).is_ok());
        assert!(validate_range(0, 1).is_ok());
    }

    #[test]
    fn validate_range_rejects_equal_bounds() {
        assert!(matches!(
            validate_range(10, 10),
            Err(GameError::InvalidRange { min: 10, max: 10 })
        ));
    }

    #[test]
    fn validate_range_rejects_inverted_bounds() {
        assert!(matches!(
            validate_range(8, 3),
            Err(GameError::InvalidRange { min: 8, max: 3 })
        ));
    }

    #[test]
    fn draw_stays_within_window() {
        for _ in 0..10_000 {
            let delay = draw_pause_delay_ms(5, 6);
            assert!((5000..6000).contains(&delay), "delay {} out of range", delay);
        }
    }

    #[test]
    fn draw_covers_wide_windows() {
        for _ in 0..10_000 {
            let delay = draw_pause_delay_ms(1, 30);
            assert!((1000..30_000).contains(&delay));
        }
    }

    #[test]
    fn default_session_is_idle() {
        let session = GameSession::default();
        assert!(!session.is_active);
        assert_eq!(session.phase, GamePhase::Idle);
        assert!(session.pause_at_ms.is_none());
    }
}
