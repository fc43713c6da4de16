use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PlayerId = Uuid;
pub type ProfileId = Uuid;

/// A saved player that can be added to any game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: ProfileId,
    pub name: String,
    pub avatar_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar_color: String,
    pub score: i64,
    /// Back-reference to the saved profile this player was added from.
    /// Never dereferenced; only used to block adding the same profile twice.
    pub profile_id: Option<ProfileId>,
}
