//! Line-delimited JSON encoding of outbound messages.

use xa_core::messaging::Message;

use crate::error::ServerResult;

/// One newline-terminated JSON object: `{type, message, from?}`.
pub fn encode(message: &Message) -> ServerResult<String> {
    let mut line = serde_json::to_string(&message.show())?;
    line.push('\n');
    Ok(line)
}

/// A game message explaining why a connection was turned away.
pub fn rejection(reason: &str) -> ServerResult<String> {
    encode(&Message::game(Vec::new(), reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xa_core::player::{Player, PlayerId};

    #[test]
    fn encodes_one_line() {
        let m = Message::game_to(&PlayerId::from("1"), "THE GAME HAS BEGUN!");
        let line = encode(&m).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["type"], "Game");
        assert_eq!(value["message"], "THE GAME HAS BEGUN!");
        assert!(value.get("from").is_none());
    }

    #[test]
    fn multiline_content_stays_on_one_line() {
        let mut p = Player::new(PlayerId::from("1"));
        p.name = Some("Alex".to_string());
        let m = Message::talk(&p, vec![PlayerId::from("2")], "line one\nline two");
        let line = encode(&m).unwrap();
        assert_eq!(line.matches('\n').count(), 1);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["from"]["name"], "Alex");
    }

    #[test]
    fn rejection_is_a_game_message() {
        let line = rejection("context is full (2 players)").unwrap();
        assert!(line.contains("\"type\":\"Game\""));
        assert!(line.contains("context is full"));
    }
}
