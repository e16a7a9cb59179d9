//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command handlers and event handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::database::Store;
use crate::events::{self, FloodTracker};
use crate::permissions::Permissions;
use crate::plugins;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Dispatcher type shared by the polling and webhook runners.
pub type BotDispatcher =
    Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Settings, warns, notes and locks tables.
    pub store: Arc<Store>,

    /// Admin gate.
    pub permissions: Permissions,
}

impl AppState {
    /// Create a new application state.
    pub fn new(bot: &ThrottledBot, store: Arc<Store>, owner_ids: Vec<u64>) -> Self {
        // Permissions needs the inner Bot for API calls
        let permissions = Permissions::with_owners(bot.inner().clone(), owner_ids);

        Self { store, permissions }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(bot: ThrottledBot, store: Arc<Store>, owner_ids: Vec<u64>) -> BotDispatcher {
    let state = AppState::new(&bot, store, owner_ids);
    let flood_tracker = FloodTracker::new();

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state, flood_tracker])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    // Chat member events (welcome / goodbye)
    let member_handler = Update::filter_chat_member().branch(events::event_handler());

    // Callback query handler (private menu)
    let callback_handler = plugins::callback_handler();

    dptree::entry()
        .branch(message_schema(plugins::command_handler()))
        .branch(member_handler)
        .branch(callback_handler)
}

/// Message branch: the passive pipeline first, then commands for every
/// message it did not delete. Messages that are not commands end here.
fn message_schema(commands: UpdateHandler<anyhow::Error>) -> UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .chain(events::message_event_handler())
        .branch(commands)
        .branch(dptree::endpoint(|| async { Ok::<(), anyhow::Error>(()) }))
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::database::LockKind;
    use crate::events::fixtures::*;

    /// Stands in for the real command tree and counts what reaches it.
    fn counting_commands(hits: Arc<AtomicUsize>) -> UpdateHandler<anyhow::Error> {
        dptree::filter(|msg: Message| msg.text().is_some_and(|t| t.starts_with('/'))).endpoint(
            move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), anyhow::Error>(())
                }
            },
        )
    }

    #[tokio::test]
    async fn test_commands_count_toward_flood() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path()));
        // High enough that nothing in this test gets muted
        store.set_flood_limit(GROUP, 63);

        let bot = offline_bot();
        let state = AppState::new(&bot, store, vec![]);
        let tracker = FloodTracker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let handler = message_schema(counting_commands(hits.clone()));

        for id in 1..=20 {
            let update = update(id, group_command(id, "/notes"));
            let result = handler
                .dispatch(dptree::deps![update, bot.clone(), state.clone(), tracker.clone()])
                .await;
            assert!(matches!(result, ControlFlow::Break(Ok(()))));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 20);
        assert_eq!(tracker.window_len(GROUP, USER), 20);

        let update = update(21, group_message(21, "hello", json!([])));
        let result = handler
            .dispatch(dptree::deps![update, bot.clone(), state.clone(), tracker.clone()])
            .await;
        assert!(matches!(result, ControlFlow::Break(Ok(()))));
        assert_eq!(hits.load(Ordering::SeqCst), 20);
        assert_eq!(tracker.window_len(GROUP, USER), 21);
    }

    #[tokio::test]
    async fn test_locked_link_is_deleted_before_flood_and_commands() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path()));
        store.set_flood_limit(GROUP, 63);
        store.set_lock(GROUP, LockKind::Links, true);

        let bot = offline_bot();
        let state = AppState::new(&bot, store.clone(), vec![]);
        let tracker = FloodTracker::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let handler = message_schema(counting_commands(hits.clone()));

        let text = "/get x https://spam.example";
        let linked_command = group_message(
            1,
            text,
            json!([
                { "type": "bot_command", "offset": 0, "length": 4 },
                { "type": "url", "offset": 7, "length": 20 },
            ]),
        );
        let result = handler
            .dispatch(dptree::deps![
                update(1, linked_command.clone()),
                bot.clone(),
                state.clone(),
                tracker.clone()
            ])
            .await;

        // Deleted by the lock stage: no command, no flood accounting
        assert!(matches!(result, ControlFlow::Continue(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(tracker.window_len(GROUP, USER), 0);

        store.set_lock(GROUP, LockKind::Links, false);
        let result = handler
            .dispatch(dptree::deps![
                update(2, linked_command),
                bot.clone(),
                state.clone(),
                tracker.clone()
            ])
            .await;
        assert!(matches!(result, ControlFlow::Break(Ok(()))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.window_len(GROUP, USER), 1);
    }
}
