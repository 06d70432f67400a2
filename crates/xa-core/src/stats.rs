//! Character attribute bundle and clamped stat arithmetic.

use serde::{Deserialize, Serialize};

/// The four numeric attributes every character carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Hit points. A character at 0 health is dead.
    pub health: i32,
    /// Physical power.
    pub strength: i32,
    /// Gates translation and other learned abilities.
    pub intelligence: i32,
    /// Turn order within a round (higher acts first).
    pub agility: i32,
}

impl Stats {
    /// Create a stat bundle.
    pub fn new(health: i32, strength: i32, intelligence: i32, agility: i32) -> Self {
        Self {
            health,
            strength,
            intelligence,
            agility,
        }
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HP {} STR {} INT {} AGI {}",
            self.health, self.strength, self.intelligence, self.agility
        )
    }
}

/// A sparse stat delta. Unset fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialStats {
    /// Health change.
    pub health: Option<i32>,
    /// Strength change.
    pub strength: Option<i32>,
    /// Intelligence change.
    pub intelligence: Option<i32>,
    /// Agility change.
    pub agility: Option<i32>,
}

/// Inclusive bounds applied per stat by [`change_stats`].
///
/// `max == None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatBounds {
    /// Floor shared by every stat.
    pub min: i32,
    /// Per-stat ceiling.
    pub max: Option<Stats>,
}

impl Default for StatBounds {
    fn default() -> Self {
        Self { min: 0, max: None }
    }
}

impl StatBounds {
    /// Bounds from 0 up to the given maximums.
    pub fn capped(max: Stats) -> Self {
        Self {
            min: 0,
            max: Some(max),
        }
    }
}

fn apply(value: i32, delta: Option<i32>, min: i32, max: Option<i32>) -> i32 {
    let Some(delta) = delta else {
        return value;
    };
    let raised = value.saturating_add(delta).max(min);
    match max {
        Some(max) => raised.min(max),
        None => raised,
    }
}

/// Add `delta` to `stats`, clamping each touched stat to `bounds`.
pub fn change_stats(stats: &mut Stats, delta: &PartialStats, bounds: &StatBounds) {
    let max = bounds.max;
    stats.health = apply(
        stats.health,
        delta.health,
        bounds.min,
        max.map(|m| m.health),
    );
    stats.strength = apply(
        stats.strength,
        delta.strength,
        bounds.min,
        max.map(|m| m.strength),
    );
    stats.intelligence = apply(
        stats.intelligence,
        delta.intelligence,
        bounds.min,
        max.map(|m| m.intelligence),
    );
    stats.agility = apply(
        stats.agility,
        delta.agility,
        bounds.min,
        max.map(|m| m.agility),
    );
}

/// Returns true if every stat is at least the corresponding requirement.
pub fn meets_requirements(stats: &Stats, required: &Stats) -> bool {
    stats.health >= required.health
        && stats.strength >= required.strength
        && stats.intelligence >= required.intelligence
        && stats.agility >= required.agility
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_is_additive() {
        let mut stats = Stats::new(10, 10, 10, 10);
        let delta = PartialStats {
            health: Some(5),
            agility: Some(-3),
            ..Default::default()
        };
        change_stats(&mut stats, &delta, &StatBounds::default());
        assert_eq!(stats, Stats::new(15, 10, 10, 7));
    }

    #[test]
    fn change_clamps_at_zero() {
        let mut stats = Stats::new(2, 1, 0, 0);
        let delta = PartialStats {
            health: Some(-5),
            strength: Some(-5),
            ..Default::default()
        };
        change_stats(&mut stats, &delta, &StatBounds::default());
        assert_eq!(stats.health, 0);
        assert_eq!(stats.strength, 0);
    }

    #[test]
    fn change_clamps_at_max() {
        let mut stats = Stats::new(28, 10, 10, 10);
        let delta = PartialStats {
            health: Some(10),
            ..Default::default()
        };
        let bounds = StatBounds::capped(Stats::new(30, 30, 30, 30));
        change_stats(&mut stats, &delta, &bounds);
        assert_eq!(stats.health, 30);
    }

    #[test]
    fn unbounded_max_passes_through() {
        let mut stats = Stats::new(10, 10, 10, 10);
        let delta = PartialStats {
            intelligence: Some(1_000),
            ..Default::default()
        };
        change_stats(&mut stats, &delta, &StatBounds::default());
        assert_eq!(stats.intelligence, 1_010);
    }

    #[test]
    fn requirements() {
        let stats = Stats::new(10, 20, 30, 40);
        assert!(meets_requirements(&stats, &Stats::new(0, 20, 0, 0)));
        assert!(!meets_requirements(&stats, &Stats::new(0, 0, 50, 0)));
    }

    #[test]
    fn display() {
        let stats = Stats::new(1, 2, 3, 4);
        assert_eq!(stats.to_string(), "HP 1 STR 2 INT 3 AGI 4");
    }
}
