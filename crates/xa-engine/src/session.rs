//! Top-level session orchestrator.
//!
//! A [`Session`] owns exactly one active context. It accepts and drops
//! connections, forwards input, resolves turns once every playing player
//! has submitted, and swaps Lobby ⇄ Game when the current phase is done.

use tracing::{info, warn};
use xa_core::messaging::Message;
use xa_core::player::{PlayerId, RosterEntry};

use crate::config::GameConfig;
use crate::context::Context;
use crate::error::{EngineError, EngineResult};
use crate::game::Game;
use crate::lobby::Lobby;

/// The active phase of a session.
#[derive(Debug)]
pub enum Phase {
    /// Players are naming themselves and getting ready.
    Lobby(Lobby),
    /// A game is running.
    Game(Game),
}

/// A running server session.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    phase: Phase,
}

impl Session {
    /// Start a session in the lobby.
    pub fn new(config: GameConfig) -> Self {
        let lobby = Lobby::new(config.max_players);
        Self {
            config,
            phase: Phase::Lobby(lobby),
        }
    }

    /// The configuration every game of this session starts from.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The active phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The active phase as a [`Context`].
    pub fn context(&self) -> &dyn Context {
        match &self.phase {
            Phase::Lobby(lobby) => lobby,
            Phase::Game(game) => game,
        }
    }

    fn context_mut(&mut self) -> &mut dyn Context {
        match &mut self.phase {
            Phase::Lobby(lobby) => lobby,
            Phase::Game(game) => game,
        }
    }

    /// Returns true while a game is running.
    pub fn is_in_game(&self) -> bool {
        matches!(self.phase, Phase::Game(_))
    }

    /// Public roster of the active phase.
    pub fn roster_data(&self) -> Vec<RosterEntry> {
        self.context().roster_data()
    }

    /// Admit a new connection.
    pub fn connect(&mut self, id: PlayerId) -> EngineResult<Vec<Message>> {
        if !self.context().is_accepting_players() {
            warn!(player = %id, "rejected connection");
            return Err(if self.is_in_game() {
                EngineError::NotAcceptingPlayers
            } else {
                EngineError::ContextFull {
                    max: self.config.max_players,
                }
            });
        }
        self.context_mut().add_player(id.clone())?;
        info!(player = %id, "player connected");
        Ok(vec![Message::game_to(
            &id,
            "Welcome to Xanadu! Please enter a name.",
        )])
    }

    /// Drop a connection, discarding any queued action.
    pub fn disconnect(&mut self, id: &PlayerId) -> EngineResult<Vec<Message>> {
        let Some(player) = self.context_mut().remove_player(id) else {
            return Ok(Vec::new());
        };
        info!(player = %id, "player disconnected");
        let mut out = Vec::new();
        if let Some(name) = &player.name {
            out.push(
                self.context()
                    .broadcast(&format!("{name} has left the game."), &[]),
            );
        }
        out.extend(self.resolve_turn()?);
        out.extend(self.advance()?);
        Ok(out)
    }

    /// Handle one line of input from a connected player.
    pub fn handle(
        &mut self,
        id: &PlayerId,
        content: &str,
        timestamp: i64,
    ) -> EngineResult<Vec<Message>> {
        let mut out = self.context_mut().handle_message(id, content, timestamp)?;
        out.extend(self.resolve_turn()?);
        out.extend(self.advance()?);
        Ok(out)
    }

    /// Resolve a turn if every playing player has an action queued.
    fn resolve_turn(&mut self) -> EngineResult<Vec<Message>> {
        if !self.context().is_ready_for_update() {
            return Ok(Vec::new());
        }
        let outcome = self.context_mut().update()?;
        for line in &outcome.log {
            info!("{line}");
        }
        Ok(outcome.messages)
    }

    /// Swap to the next phase if the current one is finished.
    ///
    /// The next phase is built from copies of the players, so a failure
    /// leaves the current phase untouched.
    fn advance(&mut self) -> EngineResult<Vec<Message>> {
        if !self.context().is_ready_for_next_context() {
            return Ok(Vec::new());
        }

        let players = self.context().roster().players().to_vec();
        let (next, out) = match &self.phase {
            Phase::Lobby(_) => {
                let game = Game::from_players(&self.config, players)?;
                info!(players = game.roster().len(), "game started");

                let mut out = vec![game.broadcast("THE GAME HAS BEGUN!", &[])];
                for player in game.roster().players() {
                    out.push(Message::game_to(
                        &player.id,
                        game.describe_surroundings(&player.id),
                    ));
                }
                (Phase::Game(game), out)
            }
            Phase::Game(game) => {
                let lobby = Lobby::from_players(self.config.max_players, players)?;
                info!(turns = game.turn_number(), "game ended");

                let out = if lobby.roster().is_empty() {
                    Vec::new()
                } else {
                    vec![lobby.broadcast(
                        "THE GAME HAS ENDED! Enter `ready` to play again.",
                        &[],
                    )]
                };
                (Phase::Lobby(lobby), out)
            }
        };
        self.phase = next;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xa_core::player::PlayerState;

    const CORRIDOR: &str = "2 2\n###\n#_#\n#^#\n###\n";

    fn id(s: &str) -> PlayerId {
        PlayerId::from(s)
    }

    fn session() -> Session {
        Session::new(GameConfig::default().with_max_players(2).with_map(CORRIDOR))
    }

    fn start_game(s: &mut Session) {
        s.connect(id("1")).unwrap();
        s.connect(id("2")).unwrap();
        s.handle(&id("1"), "Alex", 1).unwrap();
        s.handle(&id("2"), "Neil", 2).unwrap();
        s.handle(&id("1"), "ready", 3).unwrap();
        s.handle(&id("2"), "ready", 4).unwrap();
    }

    #[test]
    fn starts_in_lobby() {
        let s = session();
        assert!(!s.is_in_game());
        assert!(s.roster_data().is_empty());
    }

    #[test]
    fn full_lobby_rejects() {
        let mut s = session();
        s.connect(id("1")).unwrap();
        s.connect(id("2")).unwrap();
        assert!(matches!(
            s.connect(id("3")),
            Err(EngineError::ContextFull { max: 2 })
        ));
    }

    #[test]
    fn all_ready_starts_game() {
        let mut s = session();
        s.connect(id("1")).unwrap();
        s.connect(id("2")).unwrap();
        s.handle(&id("1"), "Alex", 1).unwrap();
        s.handle(&id("2"), "Neil", 2).unwrap();
        s.handle(&id("1"), "ready", 3).unwrap();
        let out = s.handle(&id("2"), "ready", 4).unwrap();
        assert!(s.is_in_game());
        assert!(out.iter().any(|m| m.content == "THE GAME HAS BEGUN!"));
        assert!(
            s.context()
                .roster()
                .players()
                .iter()
                .all(|p| p.state == PlayerState::Playing)
        );
    }

    #[test]
    fn game_rejects_connections() {
        let mut s = session();
        start_game(&mut s);
        assert!(matches!(
            s.connect(id("3")),
            Err(EngineError::NotAcceptingPlayers)
        ));
    }

    #[test]
    fn turn_resolves_when_everyone_submitted() {
        let mut s = session();
        start_game(&mut s);
        let out = s.handle(&id("1"), "pass", 5).unwrap();
        assert!(out.iter().all(|m| m.content != "You performed no action."));
        let out = s.handle(&id("2"), "pass", 6).unwrap();
        assert!(out.iter().any(|m| m.content == "You performed no action."));
        let Phase::Game(game) = s.phase() else {
            panic!("expected game");
        };
        assert_eq!(game.turn_number(), 1);
    }

    #[test]
    fn escape_returns_to_lobby() {
        let mut s = session();
        start_game(&mut s);
        s.handle(&id("1"), "go south", 5).unwrap();
        let out = s.handle(&id("2"), "go south", 6).unwrap();
        assert!(!s.is_in_game());
        assert!(out.iter().any(|m| m.content.starts_with("THE GAME HAS ENDED!")));
        let states: Vec<_> = s.roster_data().into_iter().map(|r| r.state).collect();
        assert_eq!(states, vec![PlayerState::Preparing, PlayerState::Preparing]);
    }

    #[test]
    fn failed_game_start_keeps_the_lobby() {
        let config = GameConfig::default()
            .with_max_players(2)
            .with_map("not a map");
        let mut s = Session::new(config);
        s.connect(id("1")).unwrap();
        s.connect(id("2")).unwrap();
        s.handle(&id("1"), "Alex", 1).unwrap();
        s.handle(&id("2"), "Neil", 2).unwrap();
        s.handle(&id("1"), "ready", 3).unwrap();
        assert!(s.handle(&id("2"), "ready", 4).is_err());

        assert!(!s.is_in_game());
        let names: Vec<_> = s.roster_data().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Alex", "Neil"]);
        assert!(s.context().get_player(&id("1")).is_ok());
        assert_eq!(
            s.context().get_player(&id("2")).unwrap().state,
            PlayerState::Ready
        );
    }

    #[test]
    fn disconnect_broadcasts_departure() {
        let mut s = session();
        s.connect(id("1")).unwrap();
        s.connect(id("2")).unwrap();
        s.handle(&id("1"), "Alex", 1).unwrap();
        let out = s.disconnect(&id("1")).unwrap();
        assert_eq!(out[0].content, "Alex has left the game.");
        assert_eq!(out[0].to, vec![id("2")]);
        assert!(s.disconnect(&id("1")).unwrap().is_empty());
    }

    #[test]
    fn disconnect_can_unblock_turn() {
        let mut s = session();
        start_game(&mut s);
        s.handle(&id("1"), "pass", 5).unwrap();
        let out = s.disconnect(&id("2")).unwrap();
        assert!(out.iter().any(|m| m.content == "You performed no action."));
    }

    #[test]
    fn disconnect_can_unblock_lobby() {
        let mut s = session();
        s.connect(id("1")).unwrap();
        s.connect(id("2")).unwrap();
        s.handle(&id("1"), "Alex", 1).unwrap();
        s.handle(&id("1"), "ready", 2).unwrap();
        assert!(!s.is_in_game());
        s.disconnect(&id("2")).unwrap();
        assert!(s.is_in_game());
    }
}
