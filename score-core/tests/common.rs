use score_core::Session;
use score_types::{GameId, PlayerId};
use std::time::{Duration, Instant};

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Session with the default timing knobs (1200ms resort debounce,
/// 600ms pulse, 2200ms celebration).
pub fn create_test_session() -> Session {
    Session::default()
}

/// Creates a game with the given target, enters it and adds the named
/// players with zero scores.
pub fn setup_game(
    session: &mut Session,
    target: i64,
    names: &[&str],
    now: Instant,
) -> (GameId, Vec<PlayerId>) {
    let game_id = session
        .create_game("Test game", target, &[], now)
        .expect("game creation should succeed");
    let ids = names
        .iter()
        .map(|name| {
            session
                .add_player(name, "#64748b", None, now)
                .expect("player add should succeed")
        })
        .collect();
    (game_id, ids)
}

/// Applies a delta and advances past the resort debounce so the display
/// order reflects it. Returns the settled instant.
pub fn score_and_settle(
    session: &mut Session,
    player_id: PlayerId,
    delta: i64,
    now: Instant,
) -> Instant {
    session
        .apply_delta(player_id, delta, now)
        .expect("delta should apply");
    let settled = now + ms(1300);
    session.tick(settled);
    settled
}

/// Player names of the current game in display order.
pub fn shown_names(session: &Session) -> Vec<String> {
    session
        .ordered_players()
        .iter()
        .map(|p| p.name.clone())
        .collect()
}
