//! Event handler system.
//!
//! - `event_handler()` handles chat member updates (welcome / goodbye).
//! - `message_event_handler()` runs the passive pipeline on group messages,
//!   commands included: lock enforcement first, then flood accounting.

pub mod antiflood;
pub mod bye;
pub mod locks;
pub mod welcome;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::MessageKind;
use tracing::debug;

pub use antiflood::FloodTracker;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::permissions::is_group;
use locks::{ContentFlags, violated_lock};

/// Build the combined event handler for chat member updates.
pub fn event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(welcome::handler())
        .branch(bye::handler())
}

/// Build the message event handler.
///
/// A filter stage: messages that broke a lock stop here, everything else
/// continues to command dispatch.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter_async(passes_enforcement)
}

/// Only ordinary group messages are enforced; service messages (joins,
/// pins, title changes) and private chats pass untouched.
fn is_enforced(msg: &Message) -> bool {
    is_group(msg) && matches!(msg.kind, MessageKind::Common(_))
}

/// Per-message pipeline. Returns `false` when the message violated a lock.
async fn passes_enforcement(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    flood_tracker: FloodTracker,
) -> bool {
    if !is_enforced(&msg) {
        return true;
    }

    let chat_locks = state.store.locks(msg.chat.id.0);
    let content = ContentFlags::from_message(&msg);

    if let Some(kind) = violated_lock(&chat_locks, &content) {
        debug!("Message {} in chat {} violates {} lock", msg.id.0, msg.chat.id, kind);
        locks::delete_violation(&bot, &msg, kind).await;
        return false;
    }

    antiflood::check_antiflood(&bot, &msg, &state, &flood_tracker).await;
    true
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{Value, json};
    use teloxide::adaptors::throttle::Limits;
    use teloxide::prelude::*;
    use teloxide::types::Update;

    use crate::bot::dispatcher::ThrottledBot;

    pub const GROUP: i64 = -1001234;
    pub const USER: u64 = 42;

    /// A text message from `USER` in a supergroup.
    pub fn group_message(id: i32, text: &str, entities: Value) -> Value {
        json!({
            "message_id": id,
            "date": 1_700_000_000,
            "chat": { "id": GROUP, "type": "supergroup", "title": "Test group" },
            "from": { "id": USER, "is_bot": false, "first_name": "Ann" },
            "text": text,
            "entities": entities,
        })
    }

    /// Same, with a leading bot-command entity.
    pub fn group_command(id: i32, text: &str) -> Value {
        let len = text.split_whitespace().next().map_or(0, str::len);
        group_message(id, text, json!([{ "type": "bot_command", "offset": 0, "length": len }]))
    }

    pub fn message(value: Value) -> Message {
        serde_json::from_value(value).expect("valid message fixture")
    }

    pub fn update(id: i32, message: Value) -> Update {
        // Via a string: teloxide's `UpdateKind` deserializer needs borrowed keys
        serde_json::from_str(&json!({ "update_id": id, "message": message }).to_string())
            .expect("valid update fixture")
    }

    /// Bot pointed at a closed local port so no request leaves the machine.
    pub fn offline_bot() -> ThrottledBot {
        let url = url::Url::parse("http://127.0.0.1:9/").expect("valid url");
        Bot::new("123456:offline").set_api_url(url).throttle(Limits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_messages_are_not_enforced() {
        let joined = message(json!({
            "message_id": 7,
            "date": 1_700_000_000,
            "chat": { "id": GROUP, "type": "supergroup", "title": "Test group" },
            "from": { "id": USER, "is_bot": false, "first_name": "Ann" },
            "new_chat_members": [{ "id": 77, "is_bot": false, "first_name": "Bob" }],
        }));
        assert!(!is_enforced(&joined));

        let text = message(group_message(8, "hello", json!([])));
        assert!(is_enforced(&text));
    }

    #[test]
    fn test_private_messages_are_not_enforced() {
        let private = message(json!({
            "message_id": 3,
            "date": 1_700_000_000,
            "chat": { "id": USER, "type": "private", "first_name": "Ann" },
            "from": { "id": USER, "is_bot": false, "first_name": "Ann" },
            "text": "hello",
        }));
        assert!(!is_enforced(&private));
    }
}
