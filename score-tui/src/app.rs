use crate::config::Config;
use crate::snapshot;
use crossterm::event::{KeyCode, KeyEvent};
use score_core::{Session, clamp_name};
use score_types::{AVATAR_COLORS, GameId, Player, PlayerId, PlayerProfile, ProfileId, QUICK_DELTAS};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateField {
    Name,
    Target,
}

#[derive(Debug, Clone)]
pub struct CreateGameForm {
    pub name: String,
    pub target: String,
    pub field: CreateField,
}

impl CreateGameForm {
    fn new() -> Self {
        Self {
            name: String::new(),
            target: String::new(),
            field: CreateField::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Name,
    Color,
    Save,
    Saved,
}

/// State of the add-player dialog. `save_for_later` starts checked to
/// match the common flow of building a roster once and reusing it.
#[derive(Debug, Clone)]
pub struct AddPlayerDialog {
    pub name: String,
    pub color_index: usize,
    pub save_for_later: bool,
    pub search: String,
    pub profile_cursor: usize,
    pub field: DialogField,
}

impl AddPlayerDialog {
    fn new() -> Self {
        Self {
            name: String::new(),
            color_index: 0,
            save_for_later: true,
            search: String::new(),
            profile_cursor: 0,
            field: DialogField::Name,
        }
    }

    /// Saved profiles whose name contains the search text, case folded.
    pub fn filtered_profiles<'a>(&self, profiles: &'a [PlayerProfile]) -> Vec<&'a PlayerProfile> {
        let query = self.search.trim().to_lowercase();
        profiles
            .iter()
            .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct CustomDeltaForm {
    pub player_id: PlayerId,
    pub player_name: String,
    pub raw: String,
    pub negative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    DeleteGame(GameId),
    RemovePlayer(PlayerId),
    DeleteProfile(ProfileId),
    ResetScores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Danger,
}

#[derive(Debug, Clone)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub tone: Tone,
    pub action: PendingAction,
}

#[derive(Debug, Clone)]
pub enum Overlay {
    CreateGame(CreateGameForm),
    AddPlayer(AddPlayerDialog),
    CustomDelta(CustomDeltaForm),
    Confirm(ConfirmPrompt),
}

pub struct App {
    pub session: Session,
    pub config: Config,
    pub screen: Screen,
    pub overlay: Option<Overlay>,
    pub home_cursor: usize,
    pub player_cursor: usize,
    pub should_quit: bool,
    dirty: bool,
}

impl App {
    pub fn new(session: Session, config: Config) -> Self {
        Self {
            session,
            config,
            screen: Screen::Home,
            overlay: None,
            home_cursor: 0,
            player_cursor: 0,
            should_quit: false,
            dirty: false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        if self.overlay.is_some() {
            self.on_overlay_key(key, now);
            return;
        }
        match self.screen {
            Screen::Home => self.on_home_key(key, now),
            Screen::Game => self.on_game_key(key, now),
        }
    }

    /// Advances timers and flushes a pending snapshot write.
    pub fn on_tick(&mut self, now: Instant) {
        self.session.tick(now);
        self.maybe_save_snapshot();
    }

    /// Best-effort persistence. A failed write is logged and retried on
    /// the next mutation instead of crashing the app.
    pub fn maybe_save_snapshot(&mut self) {
        if !self.dirty {
            return;
        }
        let result = snapshot::save(
            self.session.games.games(),
            self.session.profiles.profiles(),
            self.config.snapshot_path.as_deref(),
        );
        match result {
            Ok(()) => self.dirty = false,
            Err(err) => tracing::warn!("snapshot save failed: {err}"),
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn on_home_key(&mut self, key: KeyEvent, now: Instant) {
        let game_count = self.session.games.games().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if game_count > 0 {
                    self.home_cursor = (self.home_cursor + 1).min(game_count - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.home_cursor = self.home_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_game_id() {
                    if self.session.select_game(id, now) {
                        self.screen = Screen::Game;
                        self.player_cursor = 0;
                    }
                }
            }
            KeyCode::Char('n') => {
                self.overlay = Some(Overlay::CreateGame(CreateGameForm::new()));
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_game_id() {
                    let name = self
                        .session
                        .games
                        .game(id)
                        .map(|g| g.name.clone())
                        .unwrap_or_default();
                    self.overlay = Some(Overlay::Confirm(ConfirmPrompt {
                        title: "Delete game".to_string(),
                        message: format!(
                            "Delete \"{name}\"? This removes the game and its scores."
                        ),
                        confirm_label: "Delete".to_string(),
                        tone: Tone::Danger,
                        action: PendingAction::DeleteGame(id),
                    }));
                }
            }
            _ => {}
        }
    }

    fn on_game_key(&mut self, key: KeyEvent, now: Instant) {
        // Any keypress while the banner is up dismisses it first.
        if self.session.celebration().is_some() {
            self.session.dismiss_celebration();
            return;
        }
        let player_count = self.session.ordered_players().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.session.leave_game();
                self.screen = Screen::Home;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if player_count > 0 {
                    self.player_cursor = (self.player_cursor + 1).min(player_count - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.player_cursor = self.player_cursor.saturating_sub(1);
            }
            KeyCode::Char('a') => {
                self.overlay = Some(Overlay::AddPlayer(AddPlayerDialog::new()));
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = (c as usize) - ('1' as usize);
                if let Some(player) = self.selected_player() {
                    self.session.apply_delta(player.id, QUICK_DELTAS[index], now);
                    self.mark_dirty();
                }
            }
            KeyCode::Char('c') => {
                if let Some(player) = self.selected_player() {
                    self.overlay = Some(Overlay::CustomDelta(CustomDeltaForm {
                        player_id: player.id,
                        player_name: player.name.clone(),
                        raw: String::new(),
                        negative: false,
                    }));
                }
            }
            KeyCode::Char('x') => {
                if let Some(player) = self.selected_player() {
                    self.overlay = Some(Overlay::Confirm(ConfirmPrompt {
                        title: "Delete player".to_string(),
                        message: format!("Remove \"{}\" from this game?", player.name),
                        confirm_label: "Delete".to_string(),
                        tone: Tone::Danger,
                        action: PendingAction::RemovePlayer(player.id),
                    }));
                }
            }
            KeyCode::Char('r') => {
                let resettable = self
                    .session
                    .current_game()
                    .map(|g| g.any_score_nonzero())
                    .unwrap_or(false);
                if resettable {
                    self.overlay = Some(Overlay::Confirm(ConfirmPrompt {
                        title: "Reset game".to_string(),
                        message: "Reset all scores to 0?".to_string(),
                        confirm_label: "Reset".to_string(),
                        tone: Tone::Neutral,
                        action: PendingAction::ResetScores,
                    }));
                }
            }
            _ => {}
        }
    }

    fn on_overlay_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        self.overlay = match overlay {
            Overlay::CreateGame(form) => self.on_create_game_key(form, key, now),
            Overlay::AddPlayer(dialog) => self.on_add_player_key(dialog, key, now),
            Overlay::CustomDelta(form) => self.on_custom_delta_key(form, key, now),
            Overlay::Confirm(prompt) => self.on_confirm_key(prompt, key, now),
        };
    }

    fn on_create_game_key(
        &mut self,
        mut form: CreateGameForm,
        key: KeyEvent,
        now: Instant,
    ) -> Option<Overlay> {
        match key.code {
            KeyCode::Esc => return None,
            KeyCode::Tab | KeyCode::BackTab => {
                form.field = match form.field {
                    CreateField::Name => CreateField::Target,
                    CreateField::Target => CreateField::Name,
                };
            }
            KeyCode::Enter => {
                let target = form.target.parse::<i64>().unwrap_or(0);
                if clamp_name(&form.name).is_empty() || target <= 0 {
                    return Some(Overlay::CreateGame(form));
                }
                if self.session.create_game(&form.name, target, &[], now).is_some() {
                    self.screen = Screen::Game;
                    self.player_cursor = 0;
                    self.mark_dirty();
                    return None;
                }
                return Some(Overlay::CreateGame(form));
            }
            KeyCode::Backspace => {
                match form.field {
                    CreateField::Name => form.name.pop(),
                    CreateField::Target => form.target.pop(),
                };
            }
            KeyCode::Char(c) => match form.field {
                CreateField::Name => form.name.push(c),
                CreateField::Target => {
                    if c.is_ascii_digit() {
                        form.target.push(c);
                    }
                }
            },
            _ => {}
        }
        Some(Overlay::CreateGame(form))
    }

    fn on_add_player_key(
        &mut self,
        mut dialog: AddPlayerDialog,
        key: KeyEvent,
        now: Instant,
    ) -> Option<Overlay> {
        let profile_count = self.session.profiles.profiles().len();
        let visible_count = dialog
            .filtered_profiles(self.session.profiles.profiles())
            .len();
        match key.code {
            KeyCode::Esc => return None,
            KeyCode::Tab => {
                dialog.field = match dialog.field {
                    DialogField::Name => DialogField::Color,
                    DialogField::Color => DialogField::Save,
                    DialogField::Save if profile_count > 0 => DialogField::Saved,
                    DialogField::Save => DialogField::Name,
                    DialogField::Saved => DialogField::Name,
                };
            }
            KeyCode::BackTab => {
                dialog.field = match dialog.field {
                    DialogField::Name if profile_count > 0 => DialogField::Saved,
                    DialogField::Name => DialogField::Save,
                    DialogField::Color => DialogField::Name,
                    DialogField::Save => DialogField::Color,
                    DialogField::Saved => DialogField::Save,
                };
            }
            KeyCode::Left => {
                if dialog.field == DialogField::Color {
                    dialog.color_index =
                        (dialog.color_index + AVATAR_COLORS.len() - 1) % AVATAR_COLORS.len();
                }
            }
            KeyCode::Right => {
                if dialog.field == DialogField::Color {
                    dialog.color_index = (dialog.color_index + 1) % AVATAR_COLORS.len();
                }
            }
            KeyCode::Up => {
                if dialog.field == DialogField::Saved {
                    dialog.profile_cursor = dialog.profile_cursor.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if dialog.field == DialogField::Saved && visible_count > 0 {
                    dialog.profile_cursor = (dialog.profile_cursor + 1).min(visible_count - 1);
                }
            }
            KeyCode::Delete => {
                if dialog.field == DialogField::Saved {
                    if let Some(profile) = dialog
                        .filtered_profiles(self.session.profiles.profiles())
                        .get(dialog.profile_cursor)
                        .map(|p| (*p).clone())
                    {
                        return Some(Overlay::Confirm(ConfirmPrompt {
                            title: "Delete saved player".to_string(),
                            message: format!(
                                "Delete \"{}\" from your saved players?",
                                profile.name
                            ),
                            confirm_label: "Delete".to_string(),
                            tone: Tone::Danger,
                            action: PendingAction::DeleteProfile(profile.id),
                        }));
                    }
                }
            }
            KeyCode::Enter => match dialog.field {
                DialogField::Saved => {
                    let profile_id = dialog
                        .filtered_profiles(self.session.profiles.profiles())
                        .get(dialog.profile_cursor)
                        .map(|p| p.id);
                    if let Some(profile_id) = profile_id {
                        if self.session.add_from_profile(profile_id, now).is_some() {
                            self.mark_dirty();
                            return None;
                        }
                    }
                }
                DialogField::Save => {
                    dialog.save_for_later = !dialog.save_for_later;
                }
                _ => {
                    let color = AVATAR_COLORS[dialog.color_index].value;
                    if self
                        .session
                        .create_and_add(&dialog.name, color, dialog.save_for_later, now)
                        .is_some()
                    {
                        self.mark_dirty();
                        return None;
                    }
                }
            },
            KeyCode::Char(' ') if dialog.field == DialogField::Save => {
                dialog.save_for_later = !dialog.save_for_later;
            }
            KeyCode::Backspace => match dialog.field {
                DialogField::Name => {
                    dialog.name.pop();
                }
                DialogField::Saved => {
                    dialog.search.pop();
                    dialog.profile_cursor = 0;
                }
                _ => {}
            },
            KeyCode::Char(c) => match dialog.field {
                DialogField::Name => dialog.name.push(c),
                DialogField::Saved => {
                    dialog.search.push(c);
                    dialog.profile_cursor = 0;
                }
                _ => {}
            },
            _ => {}
        }
        Some(Overlay::AddPlayer(dialog))
    }

    fn on_custom_delta_key(
        &mut self,
        mut form: CustomDeltaForm,
        key: KeyEvent,
        now: Instant,
    ) -> Option<Overlay> {
        match key.code {
            KeyCode::Esc => return None,
            KeyCode::Enter => {
                if let Ok(amount) = form.raw.parse::<i64>() {
                    if amount != 0 {
                        let delta = if form.negative { -amount } else { amount };
                        self.session.apply_delta(form.player_id, delta, now);
                        self.mark_dirty();
                        return None;
                    }
                }
                return Some(Overlay::CustomDelta(form));
            }
            KeyCode::Char('+') => form.negative = false,
            KeyCode::Char('-') => form.negative = true,
            KeyCode::Backspace => {
                form.raw.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => form.raw.push(c),
            _ => {}
        }
        Some(Overlay::CustomDelta(form))
    }

    fn on_confirm_key(
        &mut self,
        prompt: ConfirmPrompt,
        key: KeyEvent,
        now: Instant,
    ) -> Option<Overlay> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                self.run_action(prompt.action, now);
                None
            }
            KeyCode::Esc | KeyCode::Char('n') => None,
            _ => Some(Overlay::Confirm(prompt)),
        }
    }

    fn run_action(&mut self, action: PendingAction, now: Instant) {
        match action {
            PendingAction::DeleteGame(id) => {
                if self.session.delete_game(id) {
                    if self.session.current_game_id().is_none() {
                        self.screen = Screen::Home;
                    }
                    self.clamp_cursors();
                    self.mark_dirty();
                }
            }
            PendingAction::RemovePlayer(id) => {
                if self.session.remove_player(id, now) {
                    self.clamp_cursors();
                    self.mark_dirty();
                }
            }
            PendingAction::DeleteProfile(id) => {
                if self.session.delete_profile(id) {
                    self.mark_dirty();
                }
            }
            PendingAction::ResetScores => {
                if self.session.reset_scores(now) {
                    self.mark_dirty();
                }
            }
        }
    }

    fn clamp_cursors(&mut self) {
        let game_count = self.session.games.games().len();
        self.home_cursor = self.home_cursor.min(game_count.saturating_sub(1));
        let player_count = self.session.ordered_players().len();
        self.player_cursor = self.player_cursor.min(player_count.saturating_sub(1));
    }

    pub fn selected_game_id(&self) -> Option<GameId> {
        self.session.games.games().get(self.home_cursor).map(|g| g.id)
    }

    pub fn selected_player(&self) -> Option<Player> {
        self.session.ordered_players().get(self.player_cursor).cloned()
    }
}
