//! Outbound messages and recipient helpers.
//!
//! A [`Message`] names its recipients explicitly; fan-out is left to the
//! transport. [`Message::show`] produces the wire shape.

use serde::{Deserialize, Serialize};

use crate::names::find_by_prefix;
use crate::player::{Player, PlayerId};

/// Kind of message, which also decides how clients render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Narration or feedback from the game itself.
    Game,
    /// A player's own input repeated back.
    Echo,
    /// Private message to one player.
    Whisper,
    /// Message to named players.
    Talk,
    /// Message to everyone nearby.
    Shout,
}

/// The speaking player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Connection id of the speaker.
    pub id: PlayerId,
    /// Name shown to recipients.
    pub name: String,
}

impl Sender {
    /// The sender for a player.
    pub fn of(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.display_name().to_string(),
        }
    }
}

/// An immutable message addressed to a set of players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// `None` for messages from the game itself.
    pub from: Option<Sender>,
    /// Recipients.
    pub to: Vec<PlayerId>,
    /// Text as delivered.
    pub content: String,
    /// How the message is rendered.
    pub kind: MessageType,
}

impl Message {
    fn new(
        from: Option<Sender>,
        to: Vec<PlayerId>,
        content: impl Into<String>,
        kind: MessageType,
    ) -> Self {
        Self {
            from,
            to,
            content: content.into(),
            kind,
        }
    }

    /// Repeat a player's raw input back to them.
    pub fn echo(player: &Player, content: impl Into<String>) -> Self {
        Self::new(
            Some(Sender::of(player)),
            vec![player.id.clone()],
            content,
            MessageType::Echo,
        )
    }

    /// A message from the game.
    pub fn game(to: Vec<PlayerId>, content: impl Into<String>) -> Self {
        Self::new(None, to, content, MessageType::Game)
    }

    /// A game message to a single player.
    pub fn game_to(to: &PlayerId, content: impl Into<String>) -> Self {
        Self::game(vec![to.clone()], content)
    }

    /// A private message.
    pub fn whisper(from: &Player, to: Vec<PlayerId>, content: impl Into<String>) -> Self {
        Self::new(Some(Sender::of(from)), to, content, MessageType::Whisper)
    }

    /// A message to named players.
    pub fn talk(from: &Player, to: Vec<PlayerId>, content: impl Into<String>) -> Self {
        Self::new(Some(Sender::of(from)), to, content, MessageType::Talk)
    }

    /// A message to everyone nearby.
    pub fn shout(from: &Player, to: Vec<PlayerId>, content: impl Into<String>) -> Self {
        Self::new(Some(Sender::of(from)), to, content, MessageType::Shout)
    }

    /// The same message with different recipients and content.
    pub fn redirected(&self, to: Vec<PlayerId>, content: impl Into<String>) -> Self {
        Self::new(self.from.clone(), to, content, self.kind)
    }

    /// Returns true if `id` is among the recipients.
    pub fn is_addressed_to(&self, id: &PlayerId) -> bool {
        self.to.contains(id)
    }

    /// The wire form of this message.
    pub fn show(&self) -> ShownMessage {
        ShownMessage {
            kind: self.kind,
            message: self.content.clone(),
            from: self.from.as_ref().map(|s| ShownSender {
                name: s.name.clone(),
            }),
        }
    }
}

/// Serialized message body: `{type, message, from?: {name}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownMessage {
    /// Message kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: MessageType,
    /// Text as delivered.
    pub message: String,
    /// Speaker, absent for game messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<ShownSender>,
}

/// Serialized speaker of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownSender {
    /// Name shown to recipients.
    pub name: String,
}

/// What a listener who does not share the speaker's language hears.
pub fn unintelligible(speaker: &str) -> String {
    format!("{speaker} says something you cannot understand.")
}

/// Split a `/t name1 name2 rest of message` command into the players whose
/// names lead the message and the remaining text.
///
/// A word names a player when it is a case-insensitive prefix of their
/// name, an exact name winning over a longer one. The first word that names
/// nobody starts the message body.
pub fn span_message_player_names<'a>(
    content: &str,
    players: &'a [Player],
) -> (Vec<&'a Player>, String) {
    let mut words = content.split_whitespace().peekable();
    if words.peek().is_some_and(|w| w.starts_with('/')) {
        words.next();
    }

    let mut named: Vec<&Player> = Vec::new();
    while let Some(word) = words.peek() {
        match find_by_prefix(word, players, |p| p.name.as_deref()) {
            Some(player) => {
                if !named.iter().any(|p| p.id == player.id) {
                    named.push(player);
                }
                words.next();
            }
            None => break,
        }
    }

    let rest = words.collect::<Vec<_>>().join(" ");
    (named, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerState;

    fn named(id: &str, name: &str) -> Player {
        let mut p = Player::new(PlayerId::from(id));
        p.name = Some(name.to_string());
        p.state = PlayerState::Playing;
        p
    }

    #[test]
    fn echo_targets_sender() {
        let p = named("1", "Alex");
        let m = Message::echo(&p, "hello");
        assert_eq!(m.kind, MessageType::Echo);
        assert_eq!(m.to, vec![PlayerId::from("1")]);
        assert_eq!(m.from.unwrap().name, "Alex");
    }

    #[test]
    fn game_message_has_no_sender() {
        let m = Message::game_to(&PlayerId::from("1"), "hi");
        assert!(m.from.is_none());
        let json = serde_json::to_value(m.show()).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Game", "message": "hi"}));
    }

    #[test]
    fn show_includes_sender_name() {
        let p = named("1", "Neil");
        let m = Message::shout(&p, vec![PlayerId::from("2")], "over here");
        let json = serde_json::to_value(m.show()).unwrap();
        assert_eq!(json["type"], "Shout");
        assert_eq!(json["message"], "over here");
        assert_eq!(json["from"]["name"], "Neil");
    }

    #[test]
    fn span_single_name() {
        let players = vec![named("1", "Patrick"), named("2", "Sandy")];
        let (names, rest) = span_message_player_names(
            "/t patrick did you know that squidward plays clarinet?",
            &players,
        );
        let names: Vec<_> = names.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["Patrick"]);
        assert_eq!(rest, "did you know that squidward plays clarinet?");
    }

    #[test]
    fn span_several_names() {
        let players = vec![named("1", "Patrick"), named("2", "Sandy")];
        let (names, rest) = span_message_player_names("/t sandy PATRICK sandy hi", &players);
        assert_eq!(names.len(), 2);
        assert_eq!(rest, "hi");
    }

    #[test]
    fn span_without_names() {
        let players = vec![named("1", "Patrick")];
        let (names, rest) = span_message_player_names("/t hello there", &players);
        assert!(names.is_empty());
        assert_eq!(rest, "hello there");
    }

    #[test]
    fn span_matches_name_prefixes() {
        let players = vec![named("1", "Patrick"), named("2", "Squidward")];
        let (names, rest) = span_message_player_names("/t pat squid hi all", &players);
        let names: Vec<_> = names.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["Patrick", "Squidward"]);
        assert_eq!(rest, "hi all");
    }

    #[test]
    fn span_ignores_anonymous_players() {
        let players = vec![Player::new(PlayerId::from("hello"))];
        let (names, rest) = span_message_player_names("/t hello there", &players);
        assert!(names.is_empty());
        assert_eq!(rest, "hello there");
    }

    #[test]
    fn redirect_keeps_sender_and_kind() {
        let p = named("1", "Alex");
        let m = Message::talk(&p, vec![PlayerId::from("2")], "secret");
        let r = m.redirected(vec![PlayerId::from("3")], unintelligible("Alex"));
        assert_eq!(r.kind, MessageType::Talk);
        assert_eq!(r.from, m.from);
        assert!(r.is_addressed_to(&PlayerId::from("3")));
        assert!(r.content.contains("cannot understand"));
    }
}
