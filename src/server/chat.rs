//! Chat relay.

use crate::config::game::MAX_CHAT_LEN;
use crate::server::messages::{ChatPayload, ServerMessage};

/// Build the relayed `chat-message` for a payload, or `None` if there is
/// nothing to say. Text is trimmed and capped at `MAX_CHAT_LEN` characters.
pub fn relay_message(payload: &ChatPayload, from: &str) -> Option<ServerMessage> {
    let text = payload.text.trim();
    if text.is_empty() {
        return None;
    }
    Some(ServerMessage::ChatMessage {
        room: payload.room.clone(),
        from: from.to_string(),
        text: text.chars().take(MAX_CHAT_LEN).collect(),
        id: payload.id.clone(),
    })
}
