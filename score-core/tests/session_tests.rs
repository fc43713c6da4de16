mod common;

use common::*;
use score_core::Session;
use std::time::Instant;

#[test]
fn test_win_fires_once_per_winner_identity() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (_, ids) = setup_game(&mut session, 10, &["A", "B"], now);
    let (a, b) = (ids[0], ids[1]);

    session.apply_delta(a, 7, now).unwrap();
    session.apply_delta(b, 9, now).unwrap();
    assert!(session.celebration().is_none());

    // B crosses the target.
    assert_eq!(session.apply_delta(b, 3, now), Some(12));
    let celebration = session.celebration().expect("celebration should fire");
    assert_eq!(celebration.winner_name, "B");
    assert_eq!(celebration.player_id, b);
    session.dismiss_celebration();

    // A gains a point but B is still the winner, so nothing re-fires.
    assert_eq!(session.apply_delta(a, 1, now), Some(8));
    assert!(session.celebration().is_none());
}

#[test]
fn test_saved_profile_add_and_reuse() {
    let now = Instant::now();
    let mut session = create_test_session();
    setup_game(&mut session, 50, &[], now);

    let player_id = session
        .create_and_add("  bob ", "#ff0000", true, now)
        .expect("create-and-add should succeed");

    let profiles = session.profiles.profiles();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].name, "bob");
    assert_eq!(profiles[0].avatar_color, "#ff0000");
    let profile_id = profiles[0].id;

    let game = session.current_game().unwrap();
    let player = game.players.iter().find(|p| p.id == player_id).unwrap();
    assert_eq!(player.name, "bob");
    assert_eq!(player.avatar_color, "#ff0000");
    assert_eq!(player.profile_id, Some(profile_id));

    // The profile is taken in this game now.
    assert!(session.add_from_profile(profile_id, now).is_none());
    assert_eq!(session.current_game().unwrap().players.len(), 1);
}

#[test]
fn test_add_without_saving_creates_no_profile() {
    let now = Instant::now();
    let mut session = create_test_session();
    setup_game(&mut session, 50, &[], now);

    session
        .create_and_add("carol", "#22c55e", false, now)
        .expect("add should succeed");

    assert!(session.profiles.profiles().is_empty());
    let game = session.current_game().unwrap();
    assert_eq!(game.players[0].profile_id, None);
}

#[test]
fn test_burst_of_deltas_resorts_once_with_final_scores() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (_, ids) = setup_game(&mut session, 100, &["A", "B", "C"], now);

    session.apply_delta(ids[2], 5, now).unwrap();
    session.apply_delta(ids[1], 3, now + ms(100)).unwrap();
    session.apply_delta(ids[2], -4, now + ms(200)).unwrap();

    // Inside the debounce window the display order is untouched.
    session.tick(now + ms(1300));
    assert_eq!(shown_names(&session), ["A", "B", "C"]);

    // The last change armed the deadline; once it passes, the order
    // reflects only the final scores (B=3, C=1, A=0).
    session.tick(now + ms(1500));
    assert_eq!(shown_names(&session), ["B", "C", "A"]);
}

#[test]
fn test_membership_change_reorders_immediately() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (_, ids) = setup_game(&mut session, 100, &["A", "B"], now);

    session.apply_delta(ids[1], 9, now).unwrap();
    assert_eq!(shown_names(&session), ["A", "B"]);

    // Adding a player flushes the pending resort right away.
    session.add_player("C", "#3b82f6", None, now + ms(100)).unwrap();
    assert_eq!(shown_names(&session), ["B", "A", "C"]);

    // No stale deadline fires later.
    session.tick(now + ms(5000));
    assert_eq!(shown_names(&session), ["B", "A", "C"]);
}

#[test]
fn test_removing_player_updates_display_and_pulse() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (_, ids) = setup_game(&mut session, 100, &["A", "B"], now);

    session.apply_delta(ids[0], 4, now).unwrap();
    assert!(session.pulse(ids[0]).is_some());

    assert!(session.remove_player(ids[0], now));
    assert!(session.pulse(ids[0]).is_none());
    assert_eq!(shown_names(&session), ["B"]);
}

#[test]
fn test_reset_zeroes_scores_and_reranks_immediately() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (_, ids) = setup_game(&mut session, 10, &["A", "B"], now);

    let now = score_and_settle(&mut session, ids[1], 9, now);
    assert_eq!(shown_names(&session), ["B", "A"]);

    assert!(session.reset_scores(now));
    let game = session.current_game().unwrap();
    assert!(game.players.iter().all(|p| p.score == 0));
    // Insertion order comes back without waiting for a debounce.
    assert_eq!(shown_names(&session), ["A", "B"]);
}

#[test]
fn test_reset_allows_celebration_to_fire_again() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (_, ids) = setup_game(&mut session, 10, &["A", "B"], now);

    session.apply_delta(ids[0], 10, now).unwrap();
    assert!(session.celebration().is_some());
    session.dismiss_celebration();

    assert!(session.reset_scores(now));
    assert!(session.celebration().is_none());

    // The same player winning again counts as a new transition.
    session.apply_delta(ids[0], 11, now).unwrap();
    assert!(session.celebration().is_some());
}

#[test]
fn test_celebration_auto_dismisses_without_touching_scores() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (_, ids) = setup_game(&mut session, 10, &["A"], now);

    session.apply_delta(ids[0], 10, now).unwrap();
    assert!(session.celebration().is_some());

    session.tick(now + ms(2200));
    assert!(session.celebration().is_none());
    assert_eq!(session.current_game().unwrap().players[0].score, 10);
}

#[test]
fn test_deleting_profile_leaves_game_players_alone() {
    let now = Instant::now();
    let mut session = create_test_session();
    setup_game(&mut session, 50, &[], now);

    let player_id = session.create_and_add("bob", "#ff0000", true, now).unwrap();
    let profile_id = session.profiles.profiles()[0].id;

    let now = score_and_settle(&mut session, player_id, 7, now);

    assert!(session.delete_profile(profile_id));
    let game = session.current_game().unwrap();
    assert_eq!(game.players.len(), 1);
    assert_eq!(game.players[0].name, "bob");
    assert_eq!(game.players[0].score, 7);

    // The dangling back-reference only re-enables saving the name anew.
    let fresh = session.upsert_profile("bob", "#3b82f6").unwrap();
    assert_ne!(fresh, profile_id);
    assert!(session.add_from_profile(fresh, now).is_some());
}

#[test]
fn test_session_ranks_follow_competition_ranking() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (_, ids) = setup_game(&mut session, 100, &["A", "B", "C", "D"], now);

    let now = score_and_settle(&mut session, ids[0], 10, now);
    let now = score_and_settle(&mut session, ids[1], 8, now);
    let now = score_and_settle(&mut session, ids[2], 8, now);
    session.tick(now + ms(1300));

    let ranks = session.ranks();
    assert_eq!(ranks[&ids[0]], 1);
    assert_eq!(ranks[&ids[1]], 2);
    assert_eq!(ranks[&ids[2]], 2);
    assert_eq!(ranks[&ids[3]], 4);
}

#[test]
fn test_deleting_current_game_returns_home() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (game_id, _) = setup_game(&mut session, 100, &["A"], now);

    assert!(session.delete_game(game_id));
    assert!(session.current_game().is_none());
    assert!(session.ordered_players().is_empty());
    assert!(session.games.games().is_empty());
}

#[test]
fn test_reentering_decided_game_replays_celebration() {
    let now = Instant::now();
    let mut session = create_test_session();
    let (game_id, ids) = setup_game(&mut session, 10, &["A", "B"], now);

    session.apply_delta(ids[0], 12, now).unwrap();
    session.dismiss_celebration();

    session.leave_game();
    assert!(session.select_game(game_id, now));

    // The winner was standing when we walked back in.
    let celebration = session.celebration().expect("celebration should replay");
    assert_eq!(celebration.player_id, ids[0]);
}

#[test]
fn test_operations_without_current_game_are_noops() {
    let now = Instant::now();
    let mut session = Session::default();

    assert!(session.add_player("A", "#64748b", None, now).is_none());
    assert!(session.apply_delta(uuid::Uuid::new_v4(), 5, now).is_none());
    assert!(!session.remove_player(uuid::Uuid::new_v4(), now));
    assert!(!session.reset_scores(now));
}
