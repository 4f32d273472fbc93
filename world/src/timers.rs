//! Deterministic timer queue driven by the simulation clock.
//!
//! Timers never fire on their own; the world collects due entries during
//! each tick, so behavior is reproducible regardless of wall-clock time.

use std::collections::BTreeMap;
use std::time::Duration;

use maze_chase_core::EnemyKind;

/// Identity of a scheduled timer. Scheduling the same key twice replaces
/// the earlier entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum TimerKey {
    /// Initial den release of an enemy.
    Release(EnemyKind),
    /// Next scatter/chase flip of an enemy.
    ModeFlip(EnemyKind),
    /// Half a second of warning before the powerup wears off.
    PowerupWarning,
    /// End of the frightened period.
    PowerupEnd,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TimerState {
    /// Will fire once the clock reaches `fire_at`.
    Armed { fire_at: Duration },
    /// Suspended with `remaining` time still owed.
    Paused { remaining: Duration },
}

/// Set of pending timers keyed by [`TimerKey`].
#[derive(Clone, Debug, Default)]
pub(crate) struct TimerQueue {
    entries: BTreeMap<TimerKey, TimerState>,
}

impl TimerQueue {
    /// Arms `key` to fire `delay` after `now`.
    ///
    /// Any earlier entry for the key is unscheduled first, so each key has
    /// at most one outstanding instance and a replaced timer can never fire.
    pub(crate) fn schedule(&mut self, key: TimerKey, now: Duration, delay: Duration) {
        self.cancel(key);
        let _ = self
            .entries
            .insert(key, TimerState::Armed { fire_at: now + delay });
    }

    /// Removes `key` if present. Cancelling an absent key is a no-op.
    pub(crate) fn cancel(&mut self, key: TimerKey) {
        let _ = self.entries.remove(&key);
    }

    /// Suspends an armed timer, preserving its remaining delay.
    ///
    /// Pausing an absent or already-paused timer changes nothing, so a
    /// second power pellet cannot corrupt the stored remainder.
    pub(crate) fn pause(&mut self, key: TimerKey, now: Duration) {
        if let Some(state) = self.entries.get_mut(&key) {
            if let TimerState::Armed { fire_at } = *state {
                *state = TimerState::Paused {
                    remaining: fire_at.saturating_sub(now),
                };
            }
        }
    }

    /// Re-arms a paused timer to fire after its preserved remainder.
    ///
    /// Resuming an absent or armed timer changes nothing.
    pub(crate) fn resume(&mut self, key: TimerKey, now: Duration) {
        if let Some(state) = self.entries.get_mut(&key) {
            if let TimerState::Paused { remaining } = *state {
                *state = TimerState::Armed {
                    fire_at: now + remaining,
                };
            }
        }
    }

    /// Drops every entry.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes and returns every armed timer due at or before `now`,
    /// ordered by deadline and then by key so same-instant firings are
    /// deterministic.
    pub(crate) fn due(&mut self, now: Duration) -> Vec<TimerKey> {
        let mut fired: Vec<(Duration, TimerKey)> = self
            .entries
            .iter()
            .filter_map(|(key, state)| match state {
                TimerState::Armed { fire_at } if *fire_at <= now => Some((*fire_at, *key)),
                _ => None,
            })
            .collect();
        fired.sort();
        fired
            .iter()
            .map(|(_, key)| {
                let _ = self.entries.remove(key);
                *key
            })
            .collect()
    }
}
