use crate::text::clamp_name;
use score_types::{Game, GameId, Player, PlayerId, ProfileId};
use uuid::Uuid;

/// Input for a player about to be added, before ids are assigned.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: String,
    pub avatar_color: String,
    pub profile_id: Option<ProfileId>,
}

impl NewPlayer {
    pub fn freeform(name: &str, avatar_color: &str) -> Self {
        Self {
            name: name.to_string(),
            avatar_color: avatar_color.to_string(),
            profile_id: None,
        }
    }
}

/// Ordered collection of games. All mutations validate at the edge and
/// reject invalid input as a no-op; nothing here returns an error.
#[derive(Debug, Default)]
pub struct GameStore {
    pub games: Vec<Game>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_games(games: Vec<Game>) -> Self {
        Self { games }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn game_mut(&mut self, id: GameId) -> Option<&mut Game> {
        self.games.iter_mut().find(|g| g.id == id)
    }

    /// Creates a game. Rejected (`None`, no mutation) when the clamped
    /// name is empty or the target is not positive. Initial players that
    /// fail the same name validation are skipped.
    pub fn create_game(
        &mut self,
        name: &str,
        target_points: i64,
        initial_players: &[NewPlayer],
    ) -> Option<GameId> {
        let name = clamp_name(name);
        if name.is_empty() || target_points <= 0 {
            return None;
        }

        let id = Uuid::new_v4();
        let mut game = Game {
            id,
            name,
            target_points,
            players: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        for entry in initial_players {
            if let Some(player) = build_player(&game, entry) {
                game.players.push(player);
            }
        }

        tracing::debug!(game_id = %id, target_points, "created game");
        self.games.push(game);
        Some(id)
    }

    pub fn delete_game(&mut self, id: GameId) -> bool {
        let before = self.games.len();
        self.games.retain(|g| g.id != id);
        let deleted = self.games.len() != before;
        if deleted {
            tracing::debug!(game_id = %id, "deleted game");
        }
        deleted
    }

    /// Adds a player to a game. No-op (`None`) when the game id is
    /// unknown, the clamped name is empty, or the player's profile is
    /// already present in that game.
    pub fn add_player(
        &mut self,
        game_id: GameId,
        name: &str,
        avatar_color: &str,
        profile_id: Option<ProfileId>,
    ) -> Option<PlayerId> {
        let game = self.game_mut(game_id)?;
        let entry = NewPlayer {
            name: name.to_string(),
            avatar_color: avatar_color.to_string(),
            profile_id,
        };
        let player = build_player(game, &entry)?;
        let player_id = player.id;
        game.players.push(player);
        Some(player_id)
    }

    pub fn remove_player(&mut self, game_id: GameId, player_id: PlayerId) -> bool {
        let Some(game) = self.game_mut(game_id) else {
            return false;
        };
        let before = game.players.len();
        game.players.retain(|p| p.id != player_id);
        game.players.len() != before
    }

    /// Applies a signed delta and returns the new score. Scores are
    /// unbounded in both directions.
    pub fn apply_delta(&mut self, game_id: GameId, player_id: PlayerId, delta: i64) -> Option<i64> {
        let game = self.game_mut(game_id)?;
        let player = game.players.iter_mut().find(|p| p.id == player_id)?;
        player.score += delta;
        Some(player.score)
    }

    /// Sets every score in the game to exactly 0.
    pub fn reset_scores(&mut self, game_id: GameId) -> bool {
        let Some(game) = self.game_mut(game_id) else {
            return false;
        };
        for player in &mut game.players {
            player.score = 0;
        }
        true
    }
}

fn build_player(game: &Game, entry: &NewPlayer) -> Option<Player> {
    let name = clamp_name(&entry.name);
    if name.is_empty() {
        return None;
    }
    if let Some(profile_id) = entry.profile_id {
        if game.has_profile(profile_id) {
            return None;
        }
    }
    Some(Player {
        id: Uuid::new_v4(),
        name,
        avatar_color: entry.avatar_color.clone(),
        score: 0,
        profile_id: entry.profile_id,
    })
}
