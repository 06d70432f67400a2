//! The pre-game phase: naming, chatting and readying up.

use tracing::info;
use xa_core::character::{Allegiance, CharacterClass, Modifier};
use xa_core::messaging::Message;
use xa_core::names::is_approximate_substring;
use xa_core::player::{Player, PlayerId, PlayerState, PrimordialCharacter};

use crate::context::{Context, NameValidation, Roster};
use crate::error::EngineResult;

/// Players waiting for a game to start.
#[derive(Debug, Clone)]
pub struct Lobby {
    roster: Roster,
}

impl Lobby {
    /// An empty lobby.
    pub fn new(max_players: usize) -> Self {
        Self {
            roster: Roster::new(max_players),
        }
    }

    /// Bring players back from a finished game.
    pub fn from_players(max_players: usize, players: Vec<Player>) -> EngineResult<Self> {
        let mut lobby = Self::new(max_players);
        for player in players {
            let player = lobby.convert_player(player);
            lobby.roster.insert(player)?;
        }
        Ok(lobby)
    }

    fn handle_name(&mut self, from: &PlayerId, name: &str) -> Vec<Message> {
        match self.validate_name(name) {
            NameValidation::Valid => {
                if let Some(player) = self.roster.get_mut(from) {
                    player.name = Some(name.to_string());
                    player.state = PlayerState::Preparing;
                }
                info!(player = %from, name, "player named");
                vec![
                    Message::game_to(
                        from,
                        format!("Welcome to Xanadu {name}! Enter `ready` to start."),
                    ),
                    self.broadcast(&format!("{name} has joined the game!"), &[from.clone()]),
                ]
            }
            NameValidation::Taken => vec![Message::game_to(
                from,
                format!("The name '{name}' has already been taken."),
            )],
            NameValidation::InvalidCharacters => vec![Message::game_to(
                from,
                format!(
                    "The name '{name}' contains invalid characters. \
                     Use only alphanumeric, underscore, and hyphen characters."
                ),
            )],
        }
    }

    fn handle_ready(&mut self, player: &Player, options: &str) -> Vec<Message> {
        let (primordial, errors) = parse_primordial_character(options, player.primordial);
        let mut out = Vec::new();
        if !errors.is_empty() {
            out.push(Message::game_to(&player.id, errors.join("\n")));
        }

        let became_ready = player.state == PlayerState::Preparing;
        if let Some(p) = self.roster.get_mut(&player.id) {
            p.primordial = primordial;
            p.state = PlayerState::Ready;
        }
        out.push(Message::game_to(
            &player.id,
            format!(
                "You will play a {} of {} allegiance with {} modifiers.",
                primordial.class, primordial.allegiance, primordial.num_modifiers
            ),
        ));
        if became_ready {
            out.push(self.broadcast(&format!("{} is ready", player.display_name()), &[]));
        }
        out
    }
}

/// Apply `c=<class> a=<allegiance> m=<count>` options on top of `previous`.
///
/// Keys and values match by case-insensitive prefix. Unspecified options
/// keep their previous value. Returns the new settings and one error line
/// per option that could not be applied.
pub fn parse_primordial_character(
    options: &str,
    previous: PrimordialCharacter,
) -> (PrimordialCharacter, Vec<String>) {
    let mut primordial = previous;
    let mut errors = Vec::new();

    for token in options.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            errors.push(format!("Unrecognized key: {token}"));
            continue;
        };
        if key.is_empty() {
            errors.push(format!("Unrecognized key: {token}"));
        } else if is_approximate_substring(key, "class") {
            match CharacterClass::from_approximate(value) {
                Some(class) => primordial.class = class,
                None => errors.push(format!("Unrecognized character class: {value}")),
            }
        } else if is_approximate_substring(key, "allegiance") {
            match Allegiance::from_approximate(value) {
                Some(allegiance) => primordial.allegiance = allegiance,
                None => errors.push(format!("Unrecognized allegiance: {value}")),
            }
        } else if is_approximate_substring(key, "modifiers") {
            match value.parse::<i64>() {
                Ok(n) => {
                    primordial.num_modifiers =
                        usize::try_from(n.clamp(0, Modifier::COUNT as i64)).unwrap_or(0);
                }
                Err(_) => errors.push(format!("Bad number of modifiers: {value}")),
            }
        } else {
            errors.push(format!("Unrecognized key: {key}"));
        }
    }
    (primordial, errors)
}

impl Context for Lobby {
    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn is_accepting_players(&self) -> bool {
        !self.roster.is_full()
    }

    fn is_ready_for_next_context(&self) -> bool {
        !self.roster.is_empty()
            && self
                .roster
                .players()
                .iter()
                .all(|p| p.state == PlayerState::Ready)
    }

    fn handle_message(
        &mut self,
        from: &PlayerId,
        content: &str,
        _timestamp: i64,
    ) -> EngineResult<Vec<Message>> {
        let player = self.get_player(from)?.clone();
        let mut out = vec![Message::echo(&player, content)];
        let text = content.trim();
        if text.is_empty() {
            return Ok(out);
        }

        match player.state {
            PlayerState::Anon => out.extend(self.handle_name(from, text)),
            PlayerState::Preparing | PlayerState::Ready => {
                let (first, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
                if first.eq_ignore_ascii_case("ready") {
                    out.extend(self.handle_ready(&player, rest));
                } else {
                    let to = self.roster.ids_except(&[from.clone()]);
                    if !to.is_empty() {
                        out.push(Message::talk(&player, to, text));
                    }
                }
            }
            _ => {}
        }
        Ok(out)
    }

    fn convert_player(&mut self, mut player: Player) -> Player {
        if let Some(character) = player.character.take() {
            player.primordial = PrimordialCharacter::from_character(&character);
        }
        player.state = if player.name.is_some() {
            PlayerState::Preparing
        } else {
            PlayerState::Anon
        };
        player
    }
}
