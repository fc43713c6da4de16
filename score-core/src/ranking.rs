use score_types::{Player, PlayerId};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

pub const DEFAULT_RESORT_DELAY: Duration = Duration::from_millis(1200);

/// Stable descending sort by score. Players with equal scores keep their
/// relative insertion order, so repeated sorts of unchanged input are
/// deterministic.
pub fn sort_players(players: &[Player]) -> Vec<Player> {
    let mut sorted = players.to_vec();
    sorted.sort_by_key(|p| Reverse(p.score));
    sorted
}

/// Standard competition ranking: rank is 1 plus the number of distinct
/// scores strictly above the player's. Equal scores share a rank and the
/// next distinct score skips past the tie (1, 1, 3). Dense ranking
/// (1, 1, 2) is intentionally not used.
pub fn compute_ranks(players: &[Player]) -> HashMap<PlayerId, u32> {
    let mut distinct: Vec<i64> = players.iter().map(|p| p.score).collect();
    distinct.sort_unstable_by_key(|s| Reverse(*s));
    distinct.dedup();

    players
        .iter()
        .map(|p| {
            let above = distinct.iter().take_while(|s| **s > p.score).count();
            (p.id, above as u32 + 1)
        })
        .collect()
}

fn sorted_ids(players: &[Player]) -> Vec<PlayerId> {
    sort_players(players).into_iter().map(|p| p.id).collect()
}

/// Owns the displayed player order for one game.
///
/// Membership changes reorder immediately; score-only changes arm a
/// debounce deadline so a burst of adjustments causes a single reflow
/// once the burst settles. The deadline is a stored `Instant` polled by
/// the caller's tick; nothing here spawns timers.
#[derive(Debug)]
pub struct RankingTracker {
    order: Vec<PlayerId>,
    deadline: Option<Instant>,
    delay: Duration,
}

impl RankingTracker {
    pub fn new(players: &[Player], delay: Duration) -> Self {
        Self {
            order: sorted_ids(players),
            deadline: None,
            delay,
        }
    }

    /// The player set changed. Resorts immediately and drops any pending
    /// deadline.
    pub fn sync_membership(&mut self, players: &[Player]) {
        self.deadline = None;
        self.order = sorted_ids(players);
    }

    /// A score changed with membership intact. Arms (or rearms) the
    /// resort deadline; only the last change of a burst fires.
    pub fn note_score_change(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Fires the pending resort once its deadline has passed. Returns
    /// true when the order was recomputed.
    pub fn tick(&mut self, players: &[Player], now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.order = sorted_ids(players);
                true
            }
            _ => false,
        }
    }

    /// Immediate resort, canceling any pending deadline.
    pub fn force_resort(&mut self, players: &[Player]) {
        self.deadline = None;
        self.order = sorted_ids(players);
    }

    pub fn resort_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves the stored order against the live player list. Ids that
    /// no longer exist are skipped; players missing from the stored
    /// order are appended in stable-sorted order, so no player is ever
    /// dropped from display even when the order is stale.
    pub fn ordered(&self, players: &[Player]) -> Vec<Player> {
        let by_id: HashMap<PlayerId, &Player> = players.iter().map(|p| (p.id, p)).collect();
        let mut out: Vec<Player> = self
            .order
            .iter()
            .filter_map(|id| by_id.get(id).map(|p| (*p).clone()))
            .collect();

        if out.len() != players.len() {
            let known: HashSet<PlayerId> = self.order.iter().copied().collect();
            let missing: Vec<Player> = players
                .iter()
                .filter(|p| !known.contains(&p.id))
                .cloned()
                .collect();
            out.extend(sort_players(&missing));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn player(name: &str, score: i64) -> Player {
        Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            avatar_color: "#64748b".to_string(),
            score,
            profile_id: None,
        }
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let players = vec![
            player("Alice", 3),
            player("Bob", 9),
            player("Carol", 3),
            player("Dave", 7),
        ];

        let sorted = sort_players(&players);
        let names: Vec<&str> = sorted.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Dave", "Alice", "Carol"]);

        // Unchanged input sorts identically every time.
        let again = sort_players(&players);
        let ids: Vec<PlayerId> = sorted.iter().map(|p| p.id).collect();
        let ids_again: Vec<PlayerId> = again.iter().map(|p| p.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[test]
    fn test_competition_ranking_skips_after_tie() {
        let players = vec![
            player("Alice", 10),
            player("Bob", 8),
            player("Carol", 8),
            player("Dave", 3),
        ];

        let ranks = compute_ranks(&players);
        assert_eq!(ranks[&players[0].id], 1);
        assert_eq!(ranks[&players[1].id], 2);
        assert_eq!(ranks[&players[2].id], 2);
        assert_eq!(ranks[&players[3].id], 4);
    }

    #[test]
    fn test_rank_counts_distinct_higher_scores() {
        let players = vec![
            player("Alice", 5),
            player("Bob", 5),
            player("Carol", 5),
            player("Dave", 1),
        ];

        let ranks = compute_ranks(&players);
        for p in &players[..3] {
            assert_eq!(ranks[&p.id], 1);
        }
        assert_eq!(ranks[&players[3].id], 2);
    }

    #[test]
    fn test_score_change_debounces() {
        let start = Instant::now();
        let mut players = vec![player("Alice", 0), player("Bob", 0)];
        let mut tracker = RankingTracker::new(&players, Duration::from_millis(1200));

        players[1].score = 5;
        tracker.note_score_change(start);

        // Before the deadline nothing fires and the order stays stale.
        assert!(!tracker.tick(&players, start + Duration::from_millis(1199)));
        let shown = tracker.ordered(&players);
        assert_eq!(shown[0].name, "Alice");

        // A second change inside the window rearms the deadline.
        players[0].score = 9;
        tracker.note_score_change(start + Duration::from_millis(600));
        assert!(!tracker.tick(&players, start + Duration::from_millis(1400)));

        assert!(tracker.tick(&players, start + Duration::from_millis(1800)));
        let shown = tracker.ordered(&players);
        assert_eq!(shown[0].name, "Alice");
        assert_eq!(shown[1].name, "Bob");
        assert!(!tracker.resort_pending());
    }

    #[test]
    fn test_membership_change_resorts_immediately() {
        let start = Instant::now();
        let mut players = vec![player("Alice", 2), player("Bob", 1)];
        let mut tracker = RankingTracker::new(&players, Duration::from_millis(1200));

        players[1].score = 10;
        tracker.note_score_change(start);

        players.push(player("Carol", 5));
        tracker.sync_membership(&players);

        // The pending score deadline is gone and the order is current.
        assert!(!tracker.resort_pending());
        let shown = tracker.ordered(&players);
        let names: Vec<&str> = shown.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Carol", "Alice"]);
    }

    #[test]
    fn test_stale_order_never_drops_players() {
        let mut players = vec![player("Alice", 4), player("Bob", 2)];
        let tracker = RankingTracker::new(&players, Duration::from_millis(1200));

        // Remove one player and add two more without telling the tracker.
        players.remove(1);
        players.push(player("Carol", 9));
        players.push(player("Dave", 6));

        let shown = tracker.ordered(&players);
        let names: Vec<&str> = shown.iter().map(|p| p.name.as_str()).collect();
        // Alice from the stored order first, the rest appended sorted.
        assert_eq!(names, ["Alice", "Carol", "Dave"]);
    }

    #[test]
    fn test_force_resort_cancels_pending_deadline() {
        let start = Instant::now();
        let mut players = vec![player("Alice", 0), player("Bob", 0)];
        let mut tracker = RankingTracker::new(&players, Duration::from_millis(1200));

        players[1].score = 3;
        tracker.note_score_change(start);
        tracker.force_resort(&players);

        assert!(!tracker.resort_pending());
        let shown = tracker.ordered(&players);
        assert_eq!(shown[0].name, "Bob");
    }
}
