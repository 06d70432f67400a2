//! The shared contract of session phases.
//!
//! A [`Context`] owns its [`Roster`] by value. The provided methods cover
//! membership, broadcasting, naming and roster projection; each phase
//! supplies its own message handling and readiness checks.

use std::sync::LazyLock;

use regex::Regex;
use xa_core::messaging::Message;
use xa_core::names::{find_by_prefix, is_approximate_string};
use xa_core::player::{Player, PlayerId, RosterEntry};

use crate::error::{EngineError, EngineResult};

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").expect("valid regex"));

/// Players of one context, capped at `max_players`.
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    max_players: usize,
}

impl Roster {
    /// An empty roster.
    pub fn new(max_players: usize) -> Self {
        Self {
            players: Vec::new(),
            max_players,
        }
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Mutable players in join order.
    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Capacity.
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if nobody is here.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Returns true once capacity is reached.
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    /// Returns true if a player with this id is here.
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.get(id).is_some()
    }

    /// Look a player up by id.
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Look a player up by id, mutably.
    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Find a player by exact name, ignoring case.
    pub fn by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| {
            p.name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }

    /// Find a player by exact name, or else by name prefix, ignoring case.
    pub fn by_name_prefix(&self, name: &str) -> Option<&Player> {
        find_by_prefix(name, &self.players, |p| p.name.as_deref())
    }

    /// Ids of every player except those in `exclude`.
    pub fn ids_except(&self, exclude: &[PlayerId]) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !exclude.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Append a player, enforcing unique ids and capacity.
    pub fn insert(&mut self, player: Player) -> EngineResult<()> {
        if self.contains(&player.id) {
            return Err(EngineError::DuplicatePlayer(player.id));
        }
        if self.is_full() {
            return Err(EngineError::ContextFull {
                max: self.max_players,
            });
        }
        self.players.push(player);
        Ok(())
    }

    /// Remove a player by id.
    pub fn remove(&mut self, id: &PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| &p.id == id)?;
        Some(self.players.remove(index))
    }
}

/// Outcome of checking a proposed player name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameValidation {
    /// The name can be taken.
    Valid,
    /// An existing name is a prefix of the new one, or vice versa.
    Taken,
    /// The name is not made of word characters only.
    InvalidCharacters,
}

/// Messages and log lines produced by resolving one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOutcome {
    /// Messages to deliver.
    pub messages: Vec<Message>,
    /// Server-side narration of the turn.
    pub log: Vec<String>,
}

/// A session phase (lobby or game) that owns a roster of players.
pub trait Context {
    /// The players of this context.
    fn roster(&self) -> &Roster;

    /// The players of this context, mutably.
    fn roster_mut(&mut self) -> &mut Roster;

    /// Whether new connections may join this context.
    fn is_accepting_players(&self) -> bool;

    /// Whether the session should move on to the next phase.
    fn is_ready_for_next_context(&self) -> bool;

    /// Whether a turn can be resolved now.
    fn is_ready_for_update(&self) -> bool {
        false
    }

    /// Resolve one turn.
    fn update(&mut self) -> EngineResult<TurnOutcome> {
        Ok(TurnOutcome::default())
    }

    /// Interpret one line of player input.
    fn handle_message(
        &mut self,
        from: &PlayerId,
        content: &str,
        timestamp: i64,
    ) -> EngineResult<Vec<Message>>;

    /// Turn a player coming from the other phase into one fit for this
    /// context.
    fn convert_player(&mut self, player: Player) -> Player;

    /// Add a freshly connected, anonymous player.
    fn add_player(&mut self, id: PlayerId) -> EngineResult<()> {
        self.roster_mut().insert(Player::new(id))
    }

    /// Remove a player, returning them if they were here.
    fn remove_player(&mut self, id: &PlayerId) -> Option<Player> {
        self.roster_mut().remove(id)
    }

    /// Look a player up by id.
    fn get_player(&self, id: &PlayerId) -> EngineResult<&Player> {
        self.roster()
            .get(id)
            .ok_or_else(|| EngineError::PlayerNotFound(id.clone()))
    }

    /// Look a player up by exact name, ignoring case.
    fn get_player_by_name(&self, name: &str) -> Option<&Player> {
        self.roster().by_name(name)
    }

    /// A game message to everyone but `exclude`.
    fn broadcast(&self, content: &str, exclude: &[PlayerId]) -> Message {
        Message::game(self.roster().ids_except(exclude), content)
    }

    /// Public roster, in roster order, skipping anonymous players.
    fn roster_data(&self) -> Vec<RosterEntry> {
        self.roster()
            .players()
            .iter()
            .filter_map(Player::roster_entry)
            .collect()
    }

    /// Check a proposed name against the roster and the allowed characters.
    fn validate_name(&self, name: &str) -> NameValidation {
        let taken = self
            .roster()
            .players()
            .iter()
            .filter_map(|p| p.name.as_deref())
            .any(|existing| is_approximate_string(existing, name));
        if taken {
            NameValidation::Taken
        } else if !NAME_RE.is_match(name) {
            NameValidation::InvalidCharacters
        } else {
            NameValidation::Valid
        }
    }
}
