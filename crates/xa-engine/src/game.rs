//! The in-game phase: action queueing, chat routing and turn resolution.
//!
//! Every playing player queues one action per turn. Once all of them have,
//! [`Context::update`] resolves the turn: actions run fastest-first
//! (agility, then submission time), each followed by the actor's effect
//! tick. Players whose health hits zero die; players who end a turn on a
//! passage room escape and become spectators.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;
use xa_core::action::Action;
use xa_core::character::{Character, random_modifiers, update_character, update_effect_meters};
use xa_core::map::{Map, Position, RoomKind};
use xa_core::messaging::{Message, span_message_player_names, unintelligible};
use xa_core::player::{Player, PlayerId, PlayerState, can_communicate};

use crate::actions::{Validation, registry};
use crate::config::GameConfig;
use crate::context::{Context, Roster, TurnOutcome};
use crate::error::EngineResult;

/// A running game.
#[derive(Debug)]
pub struct Game {
    roster: Roster,
    map: Map,
    turn_number: u32,
    has_ended: bool,
    rng: StdRng,
    shout_radius: i32,
}

impl Game {
    /// Create an empty game on the configured map.
    pub fn new(config: &GameConfig) -> EngineResult<Self> {
        Ok(Self {
            roster: Roster::new(config.max_players),
            map: Map::parse(&config.map)?,
            turn_number: 0,
            has_ended: false,
            rng: StdRng::seed_from_u64(config.seed),
            shout_radius: config.shout_radius,
        })
    }

    /// Create a game and bring the given lobby players into it.
    pub fn from_players(config: &GameConfig, players: Vec<Player>) -> EngineResult<Self> {
        let mut game = Self::new(config)?;
        for player in players {
            let player = game.convert_player(player);
            game.roster.insert(player)?;
        }
        game.refresh_has_ended();
        Ok(game)
    }

    /// The map being played.
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Turns resolved so far.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Returns true once nobody is playing.
    pub fn has_ended(&self) -> bool {
        self.has_ended
    }

    /// The character of a player, if they have one.
    pub fn character(&self, id: &PlayerId) -> Option<&Character> {
        self.roster.get(id)?.character.as_ref()
    }

    /// The character of a player, mutably.
    pub fn character_mut(&mut self, id: &PlayerId) -> Option<&mut Character> {
        self.roster.get_mut(id)?.character.as_mut()
    }

    /// Display name of a player, or the id if unknown.
    pub fn player_name(&self, id: &PlayerId) -> String {
        self.roster
            .get(id)
            .map_or_else(|| id.to_string(), |p| p.display_name().to_string())
    }

    /// Description of the room the player's character stands in.
    pub fn describe_surroundings(&self, id: &PlayerId) -> String {
        match self.character(id) {
            Some(c) => self.map.describe_room(c.position),
            None => "You are nowhere.".to_string(),
        }
    }

    /// Playing players whose characters are within `radius` of `position`.
    pub fn nearby_players(&self, position: Position, radius: i32) -> Vec<&Player> {
        self.roster
            .players()
            .iter()
            .filter(|p| p.is_playing())
            .filter(|p| {
                p.character
                    .as_ref()
                    .is_some_and(|c| c.position.distance(position) <= radius)
            })
            .collect()
    }

    /// Queued actions in the order they will be resolved: highest agility
    /// first, earlier submissions first among equals.
    pub fn resolution_order(&self) -> Vec<Action> {
        let mut queued: Vec<(i32, Action)> = self
            .roster
            .players()
            .iter()
            .filter_map(|p| p.character.as_ref())
            .filter_map(|c| c.next_action.clone().map(|a| (c.stats.agility, a)))
            .collect();
        queued.sort_by(|(agility_a, a), (agility_b, b)| {
            agility_b
                .cmp(agility_a)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });
        queued.into_iter().map(|(_, action)| action).collect()
    }

    fn refresh_has_ended(&mut self) {
        self.has_ended = !self.roster.players().iter().any(Player::is_playing);
    }

    fn queue_action(&mut self, player: &Player, content: &str, timestamp: i64) -> Message {
        if !player.is_playing() {
            return Message::game_to(
                &player.id,
                format!("You cannot act while {}.", player.state.to_string().to_lowercase()),
            );
        }
        let Some(component) = registry().by_text(content) else {
            return Message::game_to(&player.id, format!("Invalid action: {content}"));
        };
        let Some(action) = component.parse(content, player.id.clone(), timestamp) else {
            return Message::game_to(&player.id, format!("Invalid action: {content}"));
        };
        match (component.validate)(&action, self) {
            Validation::Valid => {
                debug!(player = %player.id, action = %action.key(), "queued action");
                if let Some(character) = self.character_mut(&player.id) {
                    character.next_action = Some(action);
                }
                Message::game_to(&player.id, format!("Next action: {content}"))
            }
            Validation::Invalid(error) => {
                Message::game_to(&player.id, format!("Invalid action: {error}"))
            }
        }
    }

    fn handle_command(&self, sender: &Player, content: &str) -> Vec<Message> {
        let (command, body) = content.split_once(' ').unwrap_or((content, ""));
        let body = body.trim();
        match command.to_lowercase().as_str() {
            "/t" => self.talk(sender, content),
            "/s" => self.shout(sender, body),
            "/w" => self.whisper(sender, body),
            _ => vec![Message::game_to(
                &sender.id,
                format!("Unknown command: {command}"),
            )],
        }
    }

    fn talk(&self, sender: &Player, content: &str) -> Vec<Message> {
        let (named, text) = span_message_player_names(content, self.roster.players());
        let recipients: Vec<&Player> = named.into_iter().filter(|p| p.id != sender.id).collect();
        if recipients.is_empty() || text.is_empty() {
            return vec![Message::game_to(
                &sender.id,
                "Usage: /t <names...> <message>",
            )];
        }
        route(Message::talk(sender, Vec::new(), text), sender, &recipients)
    }

    fn shout(&self, sender: &Player, text: &str) -> Vec<Message> {
        if text.is_empty() {
            return vec![Message::game_to(&sender.id, "Usage: /s <message>")];
        }
        let recipients: Vec<&Player> = match sender.character.as_ref() {
            Some(c) if sender.is_playing() => self
                .nearby_players(c.position, self.shout_radius)
                .into_iter()
                .filter(|p| p.id != sender.id)
                .collect(),
            _ => self
                .roster
                .players()
                .iter()
                .filter(|p| !p.is_playing() && p.id != sender.id)
                .collect(),
        };
        if recipients.is_empty() {
            return vec![Message::game_to(&sender.id, "Nobody is close enough to hear you.")];
        }
        route(Message::shout(sender, Vec::new(), text), sender, &recipients)
    }

    fn whisper(&self, sender: &Player, body: &str) -> Vec<Message> {
        let (name, text) = body.split_once(' ').unwrap_or((body, ""));
        let text = text.trim();
        if name.is_empty() || text.is_empty() {
            return vec![Message::game_to(&sender.id, "Usage: /w <name> <message>")];
        }
        match self.roster.by_name_prefix(name) {
            Some(recipient) if recipient.id != sender.id => {
                route(Message::whisper(sender, Vec::new(), text), sender, &[recipient])
            }
            Some(_) => vec![Message::game_to(&sender.id, "You mutter to yourself.")],
            None => vec![Message::game_to(
                &sender.id,
                format!("There is no player named '{name}'."),
            )],
        }
    }
}

/// Deliver `message` to the recipients who understand the sender and a
/// redacted copy to those who do not.
fn route(message: Message, sender: &Player, recipients: &[&Player]) -> Vec<Message> {
    let (understood, garbled): (Vec<&Player>, Vec<&Player>) = recipients
        .iter()
        .copied()
        .partition(|p| can_communicate(sender, p));
    let ids = |players: Vec<&Player>| players.iter().map(|p| p.id.clone()).collect::<Vec<_>>();

    let mut out = Vec::new();
    if !understood.is_empty() {
        out.push(message.redirected(ids(understood), message.content.clone()));
    }
    if !garbled.is_empty() {
        out.push(message.redirected(ids(garbled), unintelligible(sender.display_name())));
    }
    out
}

impl Context for Game {
    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn is_accepting_players(&self) -> bool {
        false
    }

    fn is_ready_for_next_context(&self) -> bool {
        self.has_ended
    }

    fn is_ready_for_update(&self) -> bool {
        let mut playing = self
            .roster
            .players()
            .iter()
            .filter(|p| p.is_playing())
            .peekable();
        playing.peek().is_some()
            && playing.all(|p| p.character.as_ref().is_some_and(|c| c.next_action.is_some()))
    }

    fn update(&mut self) -> EngineResult<TurnOutcome> {
        let mut outcome = TurnOutcome::default();

        for action in self.resolution_order() {
            let Some(component) = registry().by_key(action.key()) else {
                continue;
            };
            let messages = (component.perform)(&action, self, &mut outcome.log);
            outcome.messages.extend(messages);

            let name = self.player_name(&action.actor);
            if let Some(character) = self.character_mut(&action.actor) {
                update_effect_meters(character)?;
                outcome.log.extend(update_character(character, &name));
            }
        }

        for player in self.roster.players_mut() {
            if !player.is_playing() {
                continue;
            }
            let Some(character) = player.character.as_ref() else {
                continue;
            };
            let name = player.display_name().to_string();
            if character.is_dead() {
                player.state = PlayerState::Dead;
                outcome.log.push(format!("{name} has died"));
                outcome
                    .messages
                    .push(Message::game_to(&player.id, "You have died."));
            } else if self
                .map
                .room(character.position)
                .is_some_and(|r| r.kind == RoomKind::Passage)
            {
                player.state = PlayerState::Spectating;
                outcome.log.push(format!("{name} has escaped"));
                outcome.messages.push(Message::game_to(
                    &player.id,
                    "You found the way out! You are now spectating.",
                ));
            }
        }

        self.turn_number += 1;
        for player in self.roster.players_mut() {
            if let Some(character) = player.character.as_mut() {
                character.next_action = None;
            }
        }
        self.refresh_has_ended();
        Ok(outcome)
    }

    fn handle_message(
        &mut self,
        from: &PlayerId,
        content: &str,
        timestamp: i64,
    ) -> EngineResult<Vec<Message>> {
        let player = self.get_player(from)?.clone();
        let mut out = vec![Message::echo(&player, content)];
        let text = content.trim();

        if registry().by_text(text).is_some() {
            out.push(self.queue_action(&player, text, timestamp));
        } else if text.starts_with('/') {
            out.extend(self.handle_command(&player, text));
        } else {
            out.push(Message::game_to(
                from,
                format!("Unrecognized command: {text}"),
            ));
        }
        Ok(out)
    }

    fn convert_player(&mut self, mut player: Player) -> Player {
        let primordial = player.primordial;
        let modifiers = random_modifiers(primordial.num_modifiers, &mut self.rng);
        let character = Character::new(
            primordial.class,
            primordial.allegiance,
            self.map.starting_position(),
        )
        .with_modifiers(modifiers);
        player.character = Some(character);
        player.state = PlayerState::Playing;
        player
    }

    fn remove_player(&mut self, id: &PlayerId) -> Option<Player> {
        let removed = self.roster.remove(id);
        self.refresh_has_ended();
        removed
    }
}
