//! In-world characters: class, allegiance, modifiers and the per-turn
//! effect tick.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::effects::{
    EXHAUSTION_PENALTY, Effects, HUNGER_PENALTY, POISON_PENALTY, WITHDRAWAL_PENALTY,
    any_active_effects, update_meter_current_value,
};
use crate::error::{CoreError, CoreResult};
use crate::map::Position;
use crate::names::find_approximate;
use crate::stats::{StatBounds, Stats, change_stats, meets_requirements};

/// Intelligence needed to understand speakers of another allegiance.
pub const TRANSLATE_MODERN_INTELLIGENCE: i32 = 50;

/// Character classes and their starting stats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CharacterClass {
    /// No class; balanced stats.
    #[default]
    None,
    /// Wealthy patron.
    Benefactor,
    /// Sharpshooter.
    Gunslinger,
    /// Digger who can break excavatable barriers.
    Excavator,
    /// Healer.
    Doctor,
    /// Cook.
    Chef,
    /// Spiritual guide.
    Shaman,
    /// Strong but simple.
    Caveman,
    /// Mapmaker.
    Cartographer,
    /// Scholar.
    Professor,
    /// Metalworker.
    Smith,
}

impl CharacterClass {
    /// Every class, in declaration order.
    pub const ALL: [CharacterClass; 11] = [
        Self::None,
        Self::Benefactor,
        Self::Gunslinger,
        Self::Excavator,
        Self::Doctor,
        Self::Chef,
        Self::Shaman,
        Self::Caveman,
        Self::Cartographer,
        Self::Professor,
        Self::Smith,
    ];

    /// Display name of the class.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Benefactor => "Benefactor",
            Self::Gunslinger => "Gunslinger",
            Self::Excavator => "Excavator",
            Self::Doctor => "Doctor",
            Self::Chef => "Chef",
            Self::Shaman => "Shaman",
            Self::Caveman => "Caveman",
            Self::Cartographer => "Cartographer",
            Self::Professor => "Professor",
            Self::Smith => "Smith",
        }
    }

    /// Match a class by case-insensitive prefix, e.g. `gun` → Gunslinger.
    pub fn from_approximate(input: &str) -> Option<Self> {
        find_approximate(input, &Self::ALL, |c| c.name()).copied()
    }

    /// Starting stats, which are also the class maximums.
    pub fn starting_stats(&self) -> Stats {
        // (health, strength, intelligence, agility)
        let (h, s, i, a) = match self {
            Self::None => (20, 20, 20, 20),
            Self::Benefactor => (30, 10, 20, 40),
            Self::Gunslinger => (30, 30, 10, 30),
            Self::Excavator => (40, 40, 10, 10),
            Self::Doctor => (30, 10, 50, 10),
            Self::Chef => (10, 20, 40, 30),
            Self::Shaman => (10, 10, 50, 30),
            Self::Caveman => (10, 40, 10, 40),
            Self::Cartographer => (20, 10, 40, 30),
            Self::Professor => (10, 20, 50, 20),
            Self::Smith => (10, 30, 40, 20),
        };
        Stats::new(h, s, i, a)
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Faction; characters of the same allegiance share a language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Allegiance {
    /// Unaligned.
    #[default]
    None,
    /// Eastern faction.
    Eastern,
    /// Western faction.
    Western,
}

impl Allegiance {
    /// Every allegiance, in declaration order.
    pub const ALL: [Allegiance; 3] = [Self::None, Self::Eastern, Self::Western];

    /// Display name of the allegiance.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Eastern => "Eastern",
            Self::Western => "Western",
        }
    }

    /// Match an allegiance by case-insensitive prefix.
    pub fn from_approximate(input: &str) -> Option<Self> {
        find_approximate(input, &Self::ALL, |a| a.name()).copied()
    }
}

impl std::fmt::Display for Allegiance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Achievement flags a character may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    /// Has killed another character.
    Killer,
    /// Cannot die.
    Immortal,
    /// Kills without reason.
    Psycho,
    /// Attacks other allegiances.
    Racist,
    /// Eats other characters.
    Cannibal,
    /// Accepts death.
    Fatalist,
    /// Never attacks.
    Pacifist,
    /// Gambles with their life.
    Rusky,
    /// Sets fires.
    Arsonist,
    /// Heals and kills alike.
    AngelOfDeath,
    /// Hoards items.
    Collector,
    /// Sells for profit.
    Scalper,
    /// Converts others.
    Missionary,
}

impl Modifier {
    /// Every modifier, in declaration order.
    pub const ALL: [Modifier; 13] = [
        Self::Killer,
        Self::Immortal,
        Self::Psycho,
        Self::Racist,
        Self::Cannibal,
        Self::Fatalist,
        Self::Pacifist,
        Self::Rusky,
        Self::Arsonist,
        Self::AngelOfDeath,
        Self::Collector,
        Self::Scalper,
        Self::Missionary,
    ];

    /// Number of distinct modifiers.
    pub const COUNT: usize = Self::ALL.len();
}

/// Pick `count` distinct modifiers at random.
pub fn random_modifiers(count: usize, rng: &mut impl Rng) -> BTreeSet<Modifier> {
    let mut pool = Modifier::ALL;
    pool.shuffle(rng);
    pool.into_iter().take(count.min(Modifier::COUNT)).collect()
}

/// A named pile of identical items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item name.
    pub name: String,
    /// How many are held.
    pub amount: u32,
}

/// The in-world embodiment of a playing player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Current room.
    pub position: Position,
    /// Chosen class.
    pub class: CharacterClass,
    /// Current stats.
    pub stats: Stats,
    /// Carried items.
    pub inventory: Vec<ItemStack>,
    /// Gold carried.
    pub gold_amount: u32,
    /// Faction, which decides who understands whom.
    pub allegiance: Allegiance,
    /// Achievement flags.
    pub modifiers: BTreeSet<Modifier>,
    /// Effect meters and toggles.
    pub effects: Effects,
    /// At most one pending action, cleared after every turn.
    pub next_action: Option<Action>,
}

impl Character {
    /// Create a character with class starting stats and no modifiers.
    pub fn new(class: CharacterClass, allegiance: Allegiance, position: Position) -> Self {
        Self {
            position,
            class,
            stats: class.starting_stats(),
            inventory: Vec::new(),
            gold_amount: 0,
            allegiance,
            modifiers: BTreeSet::new(),
            effects: Effects::default(),
            next_action: None,
        }
    }

    /// Replace the character's modifiers.
    pub fn with_modifiers(mut self, modifiers: BTreeSet<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Returns true once health has reached zero.
    pub fn is_dead(&self) -> bool {
        self.stats.health <= 0
    }
}

/// Returns true if the character can understand speakers of any allegiance.
pub fn can_translate_modern(character: &Character) -> bool {
    let required = Stats::new(0, 0, TRANSLATE_MODERN_INTELLIGENCE, 0);
    meets_requirements(&character.stats, &required)
}

/// Drain the character's exhaustion for one turn unless the pending action
/// replenishes it.
///
/// Must be called while the character's action for the turn is still
/// pending. Hunger and addiction only move through eating, which does not
/// exist yet.
pub fn update_effect_meters(character: &mut Character) -> CoreResult<()> {
    let action = character
        .next_action
        .as_ref()
        .ok_or(CoreError::NoPendingAction)?;
    let rested = action.replenishes_exhaustion();

    if !rested {
        update_meter_current_value(&mut character.effects.exhaustion, -1);
    }
    Ok(())
}

/// Apply the penalties of every active effect and return one log line per
/// effect.
pub fn update_character(character: &mut Character, name: &str) -> Vec<String> {
    let effects = character.effects;
    if !any_active_effects(&effects) {
        return vec![format!("{name} has no active effects")];
    }
    if effects.immortality.is_active {
        return vec![format!("{name} is immortal")];
    }

    let bounds = StatBounds::default();
    let mut log = Vec::new();
    if effects.exhaustion.is_active() {
        change_stats(&mut character.stats, &EXHAUSTION_PENALTY, &bounds);
        log.push(format!("{name} is exhausted"));
    }
    if effects.hunger.is_active() {
        change_stats(&mut character.stats, &HUNGER_PENALTY, &bounds);
        log.push(format!("{name} is starving"));
    }
    if effects.poison.is_active {
        change_stats(&mut character.stats, &POISON_PENALTY, &bounds);
        log.push(format!("{name} is poisoned"));
    }
    if effects.addiction.is_active() {
        change_stats(&mut character.stats, &WITHDRAWAL_PENALTY, &bounds);
        log.push(format!("{name} is suffering from withdrawal"));
    }
    log
}
