use score_types::PlayerId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_PULSE_DURATION: Duration = Duration::from_millis(600);

/// Direction of the most recent score change, used to flash the score
/// readout. Purely cosmetic; never feeds back into scores or ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    Positive,
    Negative,
}

impl Pulse {
    pub fn from_delta(delta: i64) -> Option<Self> {
        match delta.signum() {
            1 => Some(Pulse::Positive),
            -1 => Some(Pulse::Negative),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct PulseEntry {
    pulse: Pulse,
    expires_at: Instant,
}

/// Per-player transient flags with a fixed lifetime. A newer delta on
/// the same player supersedes the previous flag and restarts its clock.
#[derive(Debug)]
pub struct PulseTracker {
    entries: HashMap<PlayerId, PulseEntry>,
    duration: Duration,
}

impl PulseTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            duration,
        }
    }

    /// Records the flash for a delta. Zero deltas leave state untouched.
    pub fn trigger(&mut self, player_id: PlayerId, delta: i64, now: Instant) {
        let Some(pulse) = Pulse::from_delta(delta) else {
            return;
        };
        self.entries.insert(
            player_id,
            PulseEntry {
                pulse,
                expires_at: now + self.duration,
            },
        );
    }

    /// Drops expired flags.
    pub fn tick(&mut self, now: Instant) {
        self.entries.retain(|_, entry| now < entry.expires_at);
    }

    pub fn pulse(&self, player_id: PlayerId) -> Option<Pulse> {
        self.entries.get(&player_id).map(|entry| entry.pulse)
    }

    /// Flags belong to their player; removal takes them along.
    pub fn remove_player(&mut self, player_id: PlayerId) {
        self.entries.remove(&player_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for PulseTracker {
    fn default() -> Self {
        Self::new(DEFAULT_PULSE_DURATION)
    }
}
