//! Action registry: one parse/validate/perform triple per command.
//!
//! The registry is built once and looked up by text (first matching
//! pattern) or by [`ActionKey`]. Validation never mutates the game; all
//! mutation happens in `perform` during turn resolution.

use std::sync::LazyLock;

use regex::Regex;
use xa_core::action::{Action, ActionKey, ActionKind};
use xa_core::map::Direction;
use xa_core::messaging::Message;
use xa_core::player::PlayerId;

use crate::game::Game;

/// Result of validating an action against the current game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The action can be queued.
    Valid,
    /// The action was refused, with the reason shown to the player.
    Invalid(String),
}

impl Validation {
    /// Returns true for [`Validation::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The refusal reason, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }
}

/// Turn matched input into an action.
pub type ParseFn = fn(&Regex, &str, PlayerId, i64) -> Option<Action>;
/// Check an action against the game without changing it.
pub type ValidateFn = fn(&Action, &Game) -> Validation;
/// Apply an action, appending to the turn log and returning messages.
pub type PerformFn = fn(&Action, &mut Game, &mut Vec<String>) -> Vec<Message>;

/// Everything needed to handle one kind of action.
pub struct ActionComponent {
    /// Registry key.
    pub key: ActionKey,
    /// Input that selects this component.
    pub pattern: Regex,
    /// Builds the action from matching input.
    pub parse: ParseFn,
    /// Checks the action before it is queued.
    pub validate: ValidateFn,
    /// Applies the action during turn resolution.
    pub perform: PerformFn,
}

impl ActionComponent {
    /// Returns true if `text` selects this component.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text.trim())
    }

    /// Parse matching input into an action.
    pub fn parse(&self, text: &str, actor: PlayerId, timestamp: i64) -> Option<Action> {
        (self.parse)(&self.pattern, text.trim(), actor, timestamp)
    }
}

/// All known action components, in match order.
pub struct ActionRegistry {
    components: Vec<ActionComponent>,
}

impl ActionRegistry {
    fn standard() -> Self {
        let pattern = |re: &str| Regex::new(re).expect("valid regex");
        Self {
            components: vec![
                ActionComponent {
                    key: ActionKey::Move,
                    pattern: pattern(r"(?i)^go (north|south|east|west)$"),
                    parse: parse_move,
                    validate: validate_move,
                    perform: perform_move,
                },
                ActionComponent {
                    key: ActionKey::Pass,
                    pattern: pattern(r"(?i)^pass$"),
                    parse: parse_pass,
                    validate: validate_pass,
                    perform: perform_pass,
                },
                ActionComponent {
                    key: ActionKey::Rest,
                    pattern: pattern(r"(?i)^rest$"),
                    parse: parse_rest,
                    validate: validate_rest,
                    perform: perform_rest,
                },
            ],
        }
    }

    /// The first component whose pattern matches `text`.
    pub fn by_text(&self, text: &str) -> Option<&ActionComponent> {
        self.components.iter().find(|c| c.matches(text))
    }

    /// The component registered under `key`.
    pub fn by_key(&self, key: ActionKey) -> Option<&ActionComponent> {
        self.components.iter().find(|c| c.key == key)
    }

    /// Every registered key, in match order.
    pub fn keys(&self) -> impl Iterator<Item = ActionKey> + '_ {
        self.components.iter().map(|c| c.key)
    }

    /// Parse `text` into an action. `None` iff no pattern matches.
    pub fn parse_action(&self, text: &str, actor: PlayerId, timestamp: i64) -> Option<Action> {
        self.by_text(text)?.parse(text, actor, timestamp)
    }
}

static REGISTRY: LazyLock<ActionRegistry> = LazyLock::new(ActionRegistry::standard);

/// The process-wide action registry.
pub fn registry() -> &'static ActionRegistry {
    &REGISTRY
}

/// Parse `text` with the standard registry.
pub fn parse_action(text: &str, actor: PlayerId, timestamp: i64) -> Option<Action> {
    registry().parse_action(text, actor, timestamp)
}

fn parse_move(pattern: &Regex, text: &str, actor: PlayerId, timestamp: i64) -> Option<Action> {
    let captures = pattern.captures(text)?;
    let direction = Direction::parse(captures.get(1)?.as_str())?;
    let (row_offset, col_offset) = direction.offset();
    Some(Action::new(
        actor,
        timestamp,
        ActionKind::Move {
            row_offset,
            col_offset,
        },
    ))
}

fn validate_move(action: &Action, game: &Game) -> Validation {
    let ActionKind::Move {
        row_offset,
        col_offset,
    } = action.kind
    else {
        return Validation::Invalid("Not a movement!".to_string());
    };
    let Some(character) = game.character(&action.actor) else {
        return Validation::Invalid("You have no character!".to_string());
    };
    let destination = character.position.offset(row_offset, col_offset);
    if !game.map().is_within(destination) {
        return Validation::Invalid("Out of bounds movement!".to_string());
    }
    if !game.map().is_room(destination) {
        return Validation::Invalid("Desired location is not a room!".to_string());
    }
    Validation::Valid
}

fn perform_move(action: &Action, game: &mut Game, _log: &mut Vec<String>) -> Vec<Message> {
    let ActionKind::Move {
        row_offset,
        col_offset,
    } = action.kind
    else {
        return Vec::new();
    };
    let Some(character) = game.character_mut(&action.actor) else {
        return Vec::new();
    };
    character.position = character.position.offset(row_offset, col_offset);
    let description = game.describe_surroundings(&action.actor);
    vec![
        Message::game_to(&action.actor, "You moved!"),
        Message::game_to(&action.actor, description),
    ]
}

fn parse_pass(_: &Regex, _: &str, actor: PlayerId, timestamp: i64) -> Option<Action> {
    Some(Action::new(actor, timestamp, ActionKind::Pass))
}

fn validate_pass(_: &Action, _: &Game) -> Validation {
    Validation::Valid
}

fn perform_pass(action: &Action, _: &mut Game, _: &mut Vec<String>) -> Vec<Message> {
    vec![Message::game_to(&action.actor, "You performed no action.")]
}

fn parse_rest(_: &Regex, _: &str, actor: PlayerId, timestamp: i64) -> Option<Action> {
    Some(Action::new(actor, timestamp, ActionKind::Rest))
}

fn validate_rest(action: &Action, game: &Game) -> Validation {
    let at_camp = game
        .character(&action.actor)
        .and_then(|c| game.map().room(c.position))
        .is_some_and(|room| room.has_camp);
    if at_camp {
        Validation::Valid
    } else {
        Validation::Invalid("Cannot rest without camp setup!".to_string())
    }
}

fn perform_rest(action: &Action, game: &mut Game, log: &mut Vec<String>) -> Vec<Message> {
    let name = game.player_name(&action.actor);
    let Some(character) = game.character_mut(&action.actor) else {
        return Vec::new();
    };
    let was_exhausted = character.effects.exhaustion.is_active();
    character.effects.exhaustion.refill();
    log.push(format!("{name} rested at a camp"));
    let content = if was_exhausted {
        "You rested at the camp and no longer feel exhausted."
    } else {
        "You rested at the camp."
    };
    vec![Message::game_to(&action.actor, content)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> PlayerId {
        PlayerId::from("p1")
    }

    #[test]
    fn parse_move_offsets() {
        let cases = [
            ("go north", (-1, 0)),
            ("go south", (1, 0)),
            ("GO East", (0, 1)),
            ("go west", (0, -1)),
        ];
        for (text, (row_offset, col_offset)) in cases {
            let action = parse_action(text, actor(), 5).unwrap();
            assert_eq!(
                action.kind,
                ActionKind::Move {
                    row_offset,
                    col_offset
                },
                "{text}"
            );
            assert_eq!(action.timestamp, 5);
            assert_eq!(action.actor, actor());
        }
    }

    #[test]
    fn parse_rejects_unknown_text() {
        for text in ["go up", "go", "passing", "hello", "/t alex hi", ""] {
            assert!(parse_action(text, actor(), 0).is_none(), "{text}");
            assert!(registry().by_text(text).is_none(), "{text}");
        }
    }

    #[test]
    fn every_key_has_a_literal() {
        let literals = [
            (ActionKey::Move, "go north"),
            (ActionKey::Pass, "pass"),
            (ActionKey::Rest, "rest"),
        ];
        for key in registry().keys() {
            let (_, text) = literals.iter().find(|(k, _)| *k == key).unwrap();
            assert_eq!(parse_action(text, actor(), 0).unwrap().key(), key);
        }
        assert_eq!(registry().keys().count(), ActionKey::ALL.len());
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(
            parse_action("  pass \n", actor(), 0).unwrap().kind,
            ActionKind::Pass
        );
    }

    #[test]
    fn lookup_by_key() {
        for key in ActionKey::ALL {
            assert_eq!(registry().by_key(key).unwrap().key, key);
        }
    }

    #[test]
    fn validation_accessors() {
        assert!(Validation::Valid.is_valid());
        let invalid = Validation::Invalid("nope".to_string());
        assert!(!invalid.is_valid());
        assert_eq!(invalid.error(), Some("nope"));
    }
}
