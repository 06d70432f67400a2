//! Connection handling and the session actor.
//!
//! Each TCP connection gets a reader task and a writer task. Every event
//! funnels into one [`SessionActor`] over an unbounded channel, so the
//! session sees input strictly one line at a time.

use std::collections::HashMap;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};
use uuid::Uuid;
use xa_core::messaging::Message;
use xa_core::player::PlayerId;
use xa_engine::{GameConfig, Session};

use crate::error::ServerResult;
use crate::wire;

/// Something that happened on a connection.
#[derive(Debug)]
pub enum Event {
    /// A new connection wants to join.
    Connected {
        /// Id assigned to the connection.
        id: PlayerId,
        /// Queue of lines to write back.
        outbox: UnboundedSender<String>,
    },
    /// One line of input arrived.
    Line {
        /// Sending connection.
        id: PlayerId,
        /// The line, without its terminator.
        content: String,
    },
    /// The connection closed.
    Disconnected {
        /// Closed connection.
        id: PlayerId,
    },
}

/// Owns the session and the outbound queue of every admitted connection.
pub struct SessionActor {
    session: Session,
    clients: HashMap<PlayerId, UnboundedSender<String>>,
}

impl SessionActor {
    /// Wrap a session with no clients yet.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            clients: HashMap::new(),
        }
    }

    /// Handle events until every sender is gone.
    pub async fn run(mut self, mut events: UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
    }

    /// Apply one event to the session and deliver the resulting messages.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Connected { id, outbox } => match self.session.connect(id.clone()) {
                Ok(messages) => {
                    self.clients.insert(id, outbox);
                    self.deliver(messages);
                }
                Err(e) => match wire::rejection(&e.to_string()) {
                    // Dropping the outbox closes the connection once the
                    // rejection is written.
                    Ok(line) => {
                        let _ = outbox.send(line);
                    }
                    Err(err) => warn!(player = %id, error = %err, "failed to encode rejection"),
                },
            },
            Event::Line { id, content } => {
                if !self.clients.contains_key(&id) {
                    return;
                }
                let timestamp = Utc::now().timestamp_millis();
                debug!(player = %id, %content, "received");
                match self.session.handle(&id, &content, timestamp) {
                    Ok(messages) => self.deliver(messages),
                    Err(e) => warn!(player = %id, error = %e, "failed to handle message"),
                }
            }
            Event::Disconnected { id } => {
                if self.clients.remove(&id).is_none() {
                    return;
                }
                match self.session.disconnect(&id) {
                    Ok(messages) => self.deliver(messages),
                    Err(e) => warn!(player = %id, error = %e, "failed to disconnect"),
                }
            }
        }
    }

    fn deliver(&self, messages: Vec<Message>) {
        for message in messages {
            let line = match wire::encode(&message) {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "failed to encode message");
                    continue;
                }
            };
            for to in &message.to {
                if let Some(outbox) = self.clients.get(to) {
                    let _ = outbox.send(line.clone());
                }
            }
        }
    }
}

/// Accept connections forever, feeding them into a fresh session.
pub async fn serve(listener: TcpListener, config: GameConfig) -> ServerResult<()> {
    let (events, inbox) = unbounded_channel();
    tokio::spawn(SessionActor::new(Session::new(config)).run(inbox));

    loop {
        let (stream, addr) = listener.accept().await?;
        let id = PlayerId::new(Uuid::new_v4().to_string());
        info!(%addr, player = %id, "accepted connection");
        tokio::spawn(handle_connection(stream, id, events.clone()));
    }
}

async fn handle_connection(stream: TcpStream, id: PlayerId, events: UnboundedSender<Event>) {
    let (reader, writer) = stream.into_split();
    let (outbox, pending) = unbounded_channel();
    if events
        .send(Event::Connected {
            id: id.clone(),
            outbox,
        })
        .is_err()
    {
        return;
    }

    let mut writer_task = tokio::spawn(write_lines(writer, pending));
    let mut lines = BufReader::new(reader).lines();
    loop {
        tokio::select! {
            _ = &mut writer_task => break,
            line = lines.next_line() => match line {
                Ok(Some(content)) => {
                    let event = Event::Line { id: id.clone(), content };
                    if events.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(player = %id, error = %e, "read failed");
                    break;
                }
            },
        }
    }

    let _ = events.send(Event::Disconnected { id });
}

async fn write_lines(mut writer: OwnedWriteHalf, mut pending: UnboundedReceiver<String>) {
    while let Some(line) = pending.recv().await {
        if writer.write_all(line.as_bytes()).await.is_err() {
            break;
        }
    }
    let _ = writer.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(max_players: usize) -> SessionActor {
        SessionActor::new(Session::new(
            GameConfig::default()
                .with_max_players(max_players)
                .with_map("2 2\n###\n#_#\n#^#\n###\n"),
        ))
    }

    fn connect(actor: &mut SessionActor, id: &str) -> UnboundedReceiver<String> {
        let (outbox, pending) = unbounded_channel();
        actor.handle_event(Event::Connected {
            id: PlayerId::from(id),
            outbox,
        });
        pending
    }

    fn line(actor: &mut SessionActor, id: &str, content: &str) {
        actor.handle_event(Event::Line {
            id: PlayerId::from(id),
            content: content.to_string(),
        });
    }

    fn drain(pending: &mut UnboundedReceiver<String>) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        while let Ok(line) = pending.try_recv() {
            out.push(serde_json::from_str(&line).unwrap());
        }
        out
    }

    #[test]
    fn connect_sends_welcome() {
        let mut a = actor(2);
        let mut rx = connect(&mut a, "1");
        let lines = drain(&mut rx);
        assert_eq!(lines.len(), 1);
        assert!(lines[0]["message"].as_str().unwrap().contains("enter a name"));
    }

    #[test]
    fn full_server_rejects_and_closes() {
        let mut a = actor(2);
        let _one = connect(&mut a, "1");
        let _two = connect(&mut a, "2");
        let mut three = connect(&mut a, "3");
        let lines = drain(&mut three);
        assert_eq!(lines.len(), 1);
        assert!(lines[0]["message"].as_str().unwrap().contains("full"));
        assert!(three.try_recv().is_err());
        assert!(three.is_closed());
    }

    #[test]
    fn messages_fan_out_to_recipients() {
        let mut a = actor(2);
        let mut one = connect(&mut a, "1");
        let mut two = connect(&mut a, "2");
        drain(&mut one);
        drain(&mut two);

        line(&mut a, "1", "Alex");
        let mine = drain(&mut one);
        assert_eq!(mine[0]["type"], "Echo");
        assert_eq!(mine[1]["type"], "Game");
        let theirs = drain(&mut two);
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0]["message"], "Alex has joined the game!");
    }

    #[test]
    fn lines_from_unknown_connections_are_ignored() {
        let mut a = actor(2);
        let mut one = connect(&mut a, "1");
        drain(&mut one);
        line(&mut a, "ghost", "hello");
        assert!(drain(&mut one).is_empty());
    }

    #[test]
    fn disconnect_notifies_others() {
        let mut a = actor(2);
        let mut one = connect(&mut a, "1");
        let _two = connect(&mut a, "2");
        line(&mut a, "2", "Neil");
        drain(&mut one);
        a.handle_event(Event::Disconnected {
            id: PlayerId::from("2"),
        });
        let lines = drain(&mut one);
        assert_eq!(lines[0]["message"], "Neil has left the game.");
    }
}
