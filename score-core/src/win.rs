use crate::text::capitalize_first;
use score_types::{Game, Player, PlayerId};
use std::time::{Duration, Instant};

pub const DEFAULT_CELEBRATION_DURATION: Duration = Duration::from_millis(2200);

/// An active win celebration. Display-only; dismissal never touches
/// scores.
#[derive(Debug, Clone)]
pub struct Celebration {
    pub player_id: PlayerId,
    pub winner_name: String,
    pub expires_at: Instant,
}

/// Edge-triggered win detection.
///
/// The winner is the top player of the stable sort once their score
/// reaches the game's target. A celebration fires only when the winner
/// identity changes, so further increments by the reigning winner stay
/// quiet, and a reset that clears the win condition rearms the trigger.
#[derive(Debug)]
pub struct WinTracker {
    prev_winner: Option<PlayerId>,
    active: Option<Celebration>,
    duration: Duration,
}

impl WinTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            prev_winner: None,
            active: None,
            duration,
        }
    }

    /// Current winner of a game: the first player holding the top score,
    /// once that score is at or past the target. The first-holder rule
    /// matches the stable sort's tie-break.
    pub fn winner_of(game: &Game) -> Option<&Player> {
        let mut top: Option<&Player> = None;
        for player in &game.players {
            match top {
                Some(current) if player.score <= current.score => {}
                _ => top = Some(player),
            }
        }
        top.filter(|p| p.score >= game.target_points)
    }

    /// Re-evaluates the winner after a mutation and fires a celebration
    /// on a transition to a new winner identity.
    pub fn observe(&mut self, game: &Game, now: Instant) {
        let winner = Self::winner_of(game);
        let winner_id = winner.map(|p| p.id);

        if let Some(player) = winner {
            if self.prev_winner != winner_id {
                self.active = Some(Celebration {
                    player_id: player.id,
                    winner_name: capitalize_first(&player.name),
                    expires_at: now + self.duration,
                });
            }
        }
        self.prev_winner = winner_id;
    }

    /// Auto-dismisses an expired celebration.
    pub fn tick(&mut self, now: Instant) {
        if let Some(active) = &self.active {
            if now >= active.expires_at {
                self.active = None;
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.active = None;
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.active.as_ref()
    }

    /// Forgets all winner state, e.g. when leaving a game.
    pub fn reset(&mut self) {
        self.prev_winner = None;
        self.active = None;
    }
}

impl Default for WinTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CELEBRATION_DURATION)
    }
}
