//! Effect tracks: clamped meters and boolean toggles.
//!
//! A meter drains toward zero and becomes *active* (applies its penalty)
//! once it is empty. A toggle is active while set. Immortality overrides
//! every other effect.

use serde::{Deserialize, Serialize};

use crate::stats::PartialStats;

/// Default maximum of the exhaustion meter.
pub const EXHAUSTION_MAX: i32 = 12;
/// Default maximum of the hunger meter.
pub const HUNGER_MAX: i32 = 20;
/// Default maximum of the addiction meter.
pub const ADDICTION_MAX: i32 = 6;

/// Applied each turn while exhausted.
pub const EXHAUSTION_PENALTY: PartialStats = PartialStats {
    health: None,
    strength: Some(-1),
    intelligence: None,
    agility: Some(-1),
};

/// Applied each turn while starving.
pub const HUNGER_PENALTY: PartialStats = PartialStats {
    health: Some(-1),
    strength: Some(-1),
    intelligence: None,
    agility: None,
};

/// Applied each turn while poisoned.
pub const POISON_PENALTY: PartialStats = PartialStats {
    health: Some(-2),
    strength: None,
    intelligence: None,
    agility: None,
};

/// Applied each turn while in withdrawal.
pub const WITHDRAWAL_PENALTY: PartialStats = PartialStats {
    health: None,
    strength: None,
    intelligence: Some(-2),
    agility: Some(-1),
};

/// A counter clamped to `0..=maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    /// Turns left before the effect kicks in.
    pub current: i32,
    /// Value after a refill.
    pub maximum: i32,
}

impl Meter {
    /// A full meter.
    pub fn full(maximum: i32) -> Self {
        let maximum = maximum.max(0);
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Returns true once the meter has drained.
    pub fn is_active(&self) -> bool {
        self.current <= 0
    }

    /// Refill to maximum.
    pub fn refill(&mut self) {
        self.current = self.maximum;
    }
}

impl std::fmt::Display for Meter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}

/// Adjust a meter by `delta`, clamping to `0..=maximum`. Returns the new value.
pub fn update_meter_current_value(meter: &mut Meter, delta: i32) -> i32 {
    meter.current = meter.current.saturating_add(delta).clamp(0, meter.maximum);
    meter.current
}

/// An on/off effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Toggle {
    /// Whether the effect applies.
    pub is_active: bool,
}

impl Toggle {
    /// A toggle that is switched on.
    pub fn on() -> Self {
        Self { is_active: true }
    }
}

/// Addiction: a toggle (is the character addicted at all) paired with a
/// meter (how long since the last dose).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addiction {
    /// Whether the character is addicted.
    pub toggle: Toggle,
    /// Turns of relief left.
    pub meter: Meter,
}

impl Addiction {
    /// Withdrawal only applies while addicted and the meter is drained.
    pub fn is_active(&self) -> bool {
        self.toggle.is_active && self.meter.is_active()
    }
}

/// All effect tracks of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects {
    /// Poisoned characters lose health every turn.
    pub poison: Toggle,
    /// Immortal characters ignore every other effect.
    pub immortality: Toggle,
    /// Withdrawal once addicted and out of relief.
    pub addiction: Addiction,
    /// Drains with every action except resting.
    pub exhaustion: Meter,
    /// Starvation once empty.
    pub hunger: Meter,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            poison: Toggle::default(),
            immortality: Toggle::default(),
            addiction: Addiction {
                toggle: Toggle::default(),
                meter: Meter::full(ADDICTION_MAX),
            },
            exhaustion: Meter::full(EXHAUSTION_MAX),
            hunger: Meter::full(HUNGER_MAX),
        }
    }
}

/// Returns true if any of the five effects is currently active.
pub fn any_active_effects(effects: &Effects) -> bool {
    effects.immortality.is_active
        || effects.exhaustion.is_active()
        || effects.hunger.is_active()
        || effects.poison.is_active
        || effects.addiction.is_active()
}
