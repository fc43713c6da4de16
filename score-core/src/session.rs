use crate::games::{GameStore, NewPlayer};
use crate::profiles::ProfileStore;
use crate::pulse::{DEFAULT_PULSE_DURATION, Pulse, PulseTracker};
use crate::ranking::{DEFAULT_RESORT_DELAY, RankingTracker, compute_ranks};
use crate::win::{Celebration, DEFAULT_CELEBRATION_DURATION, WinTracker};
use score_types::{Game, GameId, Player, PlayerId, PlayerProfile, ProfileId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub resort_delay: Duration,
    pub pulse_duration: Duration,
    pub celebration_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resort_delay: DEFAULT_RESORT_DELAY,
            pulse_duration: DEFAULT_PULSE_DURATION,
            celebration_duration: DEFAULT_CELEBRATION_DURATION,
        }
    }
}

/// Composes the stores with the per-game trackers and applies every
/// mutation's follow-up effects (resort scheduling, pulse flags, win
/// detection) in one place.
///
/// All timing flows through the `now` arguments and the caller's
/// `tick`; the session never reads the clock itself.
pub struct Session {
    pub games: GameStore,
    pub profiles: ProfileStore,
    config: SessionConfig,
    current: Option<GameId>,
    ranking: RankingTracker,
    pulses: PulseTracker,
    win: WinTracker,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::from_parts(Vec::new(), Vec::new(), config)
    }

    pub fn from_parts(
        games: Vec<Game>,
        profiles: Vec<PlayerProfile>,
        config: SessionConfig,
    ) -> Self {
        Self {
            games: GameStore::from_games(games),
            profiles: ProfileStore::from_profiles(profiles),
            ranking: RankingTracker::new(&[], config.resort_delay),
            pulses: PulseTracker::new(config.pulse_duration),
            win: WinTracker::new(config.celebration_duration),
            config,
            current: None,
        }
    }

    pub fn current_game_id(&self) -> Option<GameId> {
        self.current
    }

    pub fn current_game(&self) -> Option<&Game> {
        self.games.game(self.current?)
    }

    /// Enters a game, rebuilding the trackers for it. An existing win
    /// condition counts as a fresh transition, so re-entering a decided
    /// game replays its celebration.
    pub fn select_game(&mut self, id: GameId, now: Instant) -> bool {
        let Some(game) = self.games.game(id) else {
            return false;
        };
        self.current = Some(id);
        self.ranking = RankingTracker::new(&game.players, self.config.resort_delay);
        self.pulses.clear();
        self.win.reset();
        self.win.observe(game, now);
        true
    }

    /// Returns to the home screen, discarding all transient state.
    pub fn leave_game(&mut self) {
        self.current = None;
        self.ranking = RankingTracker::new(&[], self.config.resort_delay);
        self.pulses.clear();
        self.win.reset();
    }

    /// Creates a game and enters it.
    pub fn create_game(
        &mut self,
        name: &str,
        target_points: i64,
        initial_players: &[NewPlayer],
        now: Instant,
    ) -> Option<GameId> {
        let id = self.games.create_game(name, target_points, initial_players)?;
        self.select_game(id, now);
        Some(id)
    }

    pub fn delete_game(&mut self, id: GameId) -> bool {
        let deleted = self.games.delete_game(id);
        if deleted && self.current == Some(id) {
            self.leave_game();
        }
        deleted
    }

    /// Adds a player to the current game. Membership changes reorder the
    /// display immediately.
    pub fn add_player(
        &mut self,
        name: &str,
        avatar_color: &str,
        profile_id: Option<ProfileId>,
        now: Instant,
    ) -> Option<PlayerId> {
        let game_id = self.current?;
        let player_id = self
            .games
            .add_player(game_id, name, avatar_color, profile_id)?;
        let game = self.games.game(game_id)?;
        self.ranking.sync_membership(&game.players);
        self.win.observe(game, now);
        Some(player_id)
    }

    /// Adds a saved profile to the current game, carrying the stored
    /// name and color.
    pub fn add_from_profile(&mut self, profile_id: ProfileId, now: Instant) -> Option<PlayerId> {
        let profile = self.profiles.profile(profile_id)?.clone();
        self.add_player(&profile.name, &profile.avatar_color, Some(profile.id), now)
    }

    /// The add-player dialog's submit: optionally save the identity for
    /// later, then add. Saving reuses an existing profile on a name
    /// match, and the added player carries the profile's stored form.
    pub fn create_and_add(
        &mut self,
        name: &str,
        avatar_color: &str,
        save_for_later: bool,
        now: Instant,
    ) -> Option<PlayerId> {
        if !save_for_later {
            return self.add_player(name, avatar_color, None, now);
        }
        let profile_id = self.profiles.upsert(name, avatar_color)?;
        self.add_from_profile(profile_id, now)
    }

    pub fn remove_player(&mut self, player_id: PlayerId, now: Instant) -> bool {
        let Some(game_id) = self.current else {
            return false;
        };
        if !self.games.remove_player(game_id, player_id) {
            return false;
        }
        self.pulses.remove_player(player_id);
        if let Some(game) = self.games.game(game_id) {
            self.ranking.sync_membership(&game.players);
            self.win.observe(game, now);
        }
        true
    }

    /// Applies a signed delta to a player of the current game, arming
    /// the resort debounce and the pulse flag, then re-checks the win
    /// condition.
    pub fn apply_delta(&mut self, player_id: PlayerId, delta: i64, now: Instant) -> Option<i64> {
        let game_id = self.current?;
        let new_score = self.games.apply_delta(game_id, player_id, delta)?;
        if delta != 0 {
            self.pulses.trigger(player_id, delta, now);
            self.ranking.note_score_change(now);
        }
        let game = self.games.game(game_id)?;
        self.win.observe(game, now);
        Some(new_score)
    }

    /// Zeroes every score in the current game and reorders immediately.
    pub fn reset_scores(&mut self, now: Instant) -> bool {
        let Some(game_id) = self.current else {
            return false;
        };
        if !self.games.reset_scores(game_id) {
            return false;
        }
        if let Some(game) = self.games.game(game_id) {
            self.ranking.force_resort(&game.players);
            self.win.observe(game, now);
        }
        true
    }

    pub fn upsert_profile(&mut self, name: &str, avatar_color: &str) -> Option<ProfileId> {
        self.profiles.upsert(name, avatar_color)
    }

    pub fn delete_profile(&mut self, id: ProfileId) -> bool {
        self.profiles.delete(id)
    }

    /// Advances all stored deadlines. Called from the shell's tick.
    pub fn tick(&mut self, now: Instant) {
        if let Some(game_id) = self.current {
            if let Some(game) = self.games.game(game_id) {
                self.ranking.tick(&game.players, now);
            }
        }
        self.pulses.tick(now);
        self.win.tick(now);
    }

    /// Players of the current game in display order.
    pub fn ordered_players(&self) -> Vec<Player> {
        match self.current_game() {
            Some(game) => self.ranking.ordered(&game.players),
            None => Vec::new(),
        }
    }

    pub fn ranks(&self) -> HashMap<PlayerId, u32> {
        compute_ranks(&self.ordered_players())
    }

    pub fn pulse(&self, player_id: PlayerId) -> Option<Pulse> {
        self.pulses.pulse(player_id)
    }

    pub fn winner_id(&self) -> Option<PlayerId> {
        let game = self.current_game()?;
        WinTracker::winner_of(game).map(|p| p.id)
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.win.celebration()
    }

    pub fn dismiss_celebration(&mut self) {
        self.win.dismiss();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
