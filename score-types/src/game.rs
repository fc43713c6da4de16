use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::player::{Player, ProfileId};

pub type GameId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub target_points: i64,
    /// Insertion order; display order is always derived from scores.
    pub players: Vec<Player>,
    pub created_at: String, // RFC 3339 string
}

impl Game {
    pub fn has_profile(&self, profile_id: ProfileId) -> bool {
        self.players
            .iter()
            .any(|p| p.profile_id == Some(profile_id))
    }

    pub fn any_score_nonzero(&self) -> bool {
        self.players.iter().any(|p| p.score != 0)
    }
}
