//! Connected players and their lifecycle.

use serde::{Deserialize, Serialize};

use crate::character::{Allegiance, Character, CharacterClass, Modifier, can_translate_modern};

/// Opaque connection identifier, assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap a transport-assigned id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a player is in the session lifecycle.
///
/// `Anon` → `Preparing` → `Ready` happen in the lobby; `Playing`,
/// `Dead` and `Spectating` only exist in a game. `Absent` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    /// Connected but not yet named.
    Anon,
    /// Named and choosing a character.
    Preparing,
    /// Waiting for everyone else to be ready.
    Ready,
    /// Controls a living character.
    Playing,
    /// Character died this game.
    Dead,
    /// Escaped the cave and watches the rest.
    Spectating,
    /// Disconnected.
    Absent,
}

impl PlayerState {
    /// Returns true for the named lobby states.
    pub fn is_in_lobby(&self) -> bool {
        matches!(self, Self::Preparing | Self::Ready)
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Anon => "Anon",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Playing => "Playing",
            Self::Dead => "Dead",
            Self::Spectating => "Spectating",
            Self::Absent => "Absent",
        };
        write!(f, "{s}")
    }
}

/// Character preferences chosen in the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrimordialCharacter {
    /// Class to play.
    pub class: CharacterClass,
    /// Allegiance to play.
    pub allegiance: Allegiance,
    /// How many random modifiers to draw.
    pub num_modifiers: usize,
}

impl PrimordialCharacter {
    /// Derive preferences from a character that has already been played.
    pub fn from_character(character: &Character) -> Self {
        Self {
            class: character.class,
            allegiance: character.allegiance,
            num_modifiers: character.modifiers.len().min(Modifier::COUNT),
        }
    }
}

/// A connected player.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Connection id.
    pub id: PlayerId,
    /// Unset until the player picks a name in the lobby.
    pub name: Option<String>,
    /// Lifecycle state.
    pub state: PlayerState,
    /// Character preferences from the lobby.
    pub primordial: PrimordialCharacter,
    /// Only present while in a game.
    pub character: Option<Character>,
}

impl Player {
    /// A freshly connected, anonymous player.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            name: None,
            state: PlayerState::Anon,
            primordial: PrimordialCharacter::default(),
            character: None,
        }
    }

    /// The chosen name, or the connection id while anonymous.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Returns true while the player controls a living character.
    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// Project to the public roster entry. `None` for anonymous players.
    ///
    /// Game players show their character; lobby players show the modifier
    /// count they asked for.
    pub fn roster_entry(&self) -> Option<RosterEntry> {
        let name = self.name.clone()?;
        let mut entry = RosterEntry {
            name,
            state: self.state,
            character_class: None,
            gold_amount: None,
            allegiance: None,
            num_modifiers: None,
        };
        if let Some(c) = &self.character {
            entry.character_class = Some(c.class);
            entry.gold_amount = Some(c.gold_amount);
            entry.allegiance = Some(c.allegiance);
            entry.num_modifiers = Some(c.modifiers.len());
        } else if self.state.is_in_lobby() {
            entry.num_modifiers = Some(self.primordial.num_modifiers);
        }
        Some(entry)
    }

    /// Project to the player-info message sent to the player themselves.
    pub fn info(&self) -> PlayerInfo {
        let class_name = match &self.character {
            Some(c) => Some(c.class),
            None if self.state.is_in_lobby() && self.primordial.class != CharacterClass::None => {
                Some(self.primordial.class)
            }
            None => None,
        };
        PlayerInfo {
            player_name: self.name.clone(),
            class_name: class_name.map(|c| c.name().to_string()),
        }
    }
}

/// Public view of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// Chosen name.
    pub name: String,
    /// Lifecycle state.
    pub state: PlayerState,
    /// Class of the played character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_class: Option<CharacterClass>,
    /// Gold carried by the played character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_amount: Option<u32>,
    /// Allegiance of the played character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allegiance: Option<Allegiance>,
    /// Modifiers held in a game, or requested in the lobby.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_modifiers: Option<usize>,
}

/// What a player is told about themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    /// Chosen name, once named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    /// Played or requested class, unless it is `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// Returns true if `a` and `b` understand each other.
///
/// Two playing characters understand each other when they share an
/// allegiance or either can translate. Non-players always understand each
/// other; a player and a non-player never do.
pub fn can_communicate(a: &Player, b: &Player) -> bool {
    match (a.is_playing(), b.is_playing()) {
        (true, true) => match (&a.character, &b.character) {
            (Some(ca), Some(cb)) => {
                ca.allegiance == cb.allegiance || can_translate_modern(ca) || can_translate_modern(cb)
            }
            _ => false,
        },
        (false, false) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Position;

    fn playing(id: &str, class: CharacterClass, allegiance: Allegiance) -> Player {
        let mut p = Player::new(PlayerId::from(id));
        p.name = Some(id.to_string());
        p.state = PlayerState::Playing;
        p.character = Some(Character::new(class, allegiance, Position::default()));
        p
    }

    #[test]
    fn new_player_is_anonymous() {
        let p = Player::new(PlayerId::from("007"));
        assert_eq!(p.state, PlayerState::Anon);
        assert_eq!(p.display_name(), "007");
        assert!(p.roster_entry().is_none());
        assert_eq!(p.info(), PlayerInfo::default());
    }

    #[test]
    fn same_allegiance_communicates() {
        let a = playing("a", CharacterClass::Caveman, Allegiance::Eastern);
        let b = playing("b", CharacterClass::Caveman, Allegiance::Eastern);
        assert!(can_communicate(&a, &b));
    }

    #[test]
    fn different_allegiance_needs_translator() {
        let a = playing("a", CharacterClass::Caveman, Allegiance::Eastern);
        let b = playing("b", CharacterClass::Caveman, Allegiance::Western);
        assert!(!can_communicate(&a, &b));
        let c = playing("c", CharacterClass::Shaman, Allegiance::Western);
        assert!(can_communicate(&a, &c));
        assert!(can_communicate(&c, &a));
    }

    #[test]
    fn non_players_always_communicate() {
        let mut a = Player::new(PlayerId::from("a"));
        let mut b = Player::new(PlayerId::from("b"));
        assert!(can_communicate(&a, &b));
        a.state = PlayerState::Dead;
        b.state = PlayerState::Spectating;
        assert!(can_communicate(&a, &b));
    }

    #[test]
    fn mixed_never_communicates() {
        let a = playing("a", CharacterClass::Doctor, Allegiance::None);
        let mut b = Player::new(PlayerId::from("b"));
        b.state = PlayerState::Dead;
        assert!(!can_communicate(&a, &b));
        assert!(!can_communicate(&b, &a));
    }

    #[test]
    fn roster_entry_serializes_camel_case() {
        let p = playing("Geddy", CharacterClass::Chef, Allegiance::Western);
        let json = serde_json::to_value(p.roster_entry().unwrap()).unwrap();
        assert_eq!(json["name"], "Geddy");
        assert_eq!(json["state"], "Playing");
        assert_eq!(json["characterClass"], "Chef");
        assert_eq!(json["allegiance"], "Western");
        assert_eq!(json["goldAmount"], 0);
        assert_eq!(json["numModifiers"], 0);
    }

    #[test]
    fn lobby_roster_entry_omits_character() {
        let mut p = Player::new(PlayerId::from("1"));
        p.name = Some("Alex".to_string());
        p.state = PlayerState::Preparing;
        let json = serde_json::to_value(p.roster_entry().unwrap()).unwrap();
        assert!(json.get("characterClass").is_none());
        assert_eq!(json["state"], "Preparing");
        assert_eq!(json["numModifiers"], 0);
    }

    #[test]
    fn lobby_projections_follow_primordial_choices() {
        let mut p = Player::new(PlayerId::from("1"));
        p.name = Some("Alex".to_string());
        p.state = PlayerState::Ready;
        p.primordial = PrimordialCharacter {
            class: CharacterClass::Cartographer,
            allegiance: Allegiance::Eastern,
            num_modifiers: 4,
        };
        let entry = p.roster_entry().unwrap();
        assert_eq!(entry.num_modifiers, Some(4));
        assert_eq!(entry.character_class, None);
        assert_eq!(p.info().class_name.as_deref(), Some("Cartographer"));

        p.primordial.class = CharacterClass::None;
        assert_eq!(p.info().class_name, None);
    }

    #[test]
    fn dead_player_without_character_has_no_lobby_fields() {
        let mut p = Player::new(PlayerId::from("1"));
        p.name = Some("Alex".to_string());
        p.state = PlayerState::Dead;
        p.primordial.num_modifiers = 3;
        assert_eq!(p.roster_entry().unwrap().num_modifiers, None);
    }

    #[test]
    fn info_includes_class() {
        let p = playing("Neil", CharacterClass::Smith, Allegiance::None);
        let json = serde_json::to_value(p.info()).unwrap();
        assert_eq!(json["playerName"], "Neil");
        assert_eq!(json["className"], "Smith");
    }
}
