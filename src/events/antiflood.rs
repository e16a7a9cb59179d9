//! Antiflood event handler.
//!
//! Keeps a bounded window of recent message times per (chat, user) and
//! mutes users who exceed the chat's flood limit.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use teloxide::prelude::*;
use teloxide::types::{ChatPermissions, ParseMode};
use tracing::{debug, info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::utils::mention_html;

/// Width of the flood window.
pub const FLOOD_WINDOW: Duration = Duration::from_secs(10);

/// Max timestamps kept per user; the oldest is evicted on overflow.
pub const FLOOD_WINDOW_CAPACITY: usize = 64;

/// In-memory flood tracker, keyed by (chat, user). Not persisted.
#[derive(Clone, Default)]
pub struct FloodTracker {
    windows: Arc<DashMap<(i64, u64), VecDeque<Instant>>>,
}

impl FloodTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message at `now` and report whether the user is flooding,
    /// i.e. the window now holds more than `limit` messages.
    pub fn record_message(&self, chat_id: i64, user_id: u64, limit: u32, now: Instant) -> bool {
        let mut window = self.windows.entry((chat_id, user_id)).or_default();

        if window.len() >= FLOOD_WINDOW_CAPACITY {
            window.pop_front();
        }
        window.push_back(now);

        while let Some(&oldest) = window.front() {
            if now.saturating_duration_since(oldest) > FLOOD_WINDOW {
                window.pop_front();
            } else {
                break;
            }
        }

        window.len() > limit as usize
    }

    /// Clear a user's window.
    pub fn reset_user(&self, chat_id: i64, user_id: u64) {
        self.windows.remove(&(chat_id, user_id));
    }

    /// Number of timestamps currently held for a user.
    #[cfg(test)]
    pub fn window_len(&self, chat_id: i64, user_id: u64) -> usize {
        self.windows
            .get(&(chat_id, user_id))
            .map(|w| w.len())
            .unwrap_or(0)
    }
}

/// Flood accounting for one group message.
///
/// API failures are logged and swallowed.
pub async fn check_antiflood(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    flood_tracker: &FloodTracker,
) {
    let user = match msg.from.as_ref() {
        Some(u) if !u.is_bot => u,
        _ => return,
    };
    let chat_id = msg.chat.id;
    let settings = state.store.settings(chat_id.0);

    let flooding =
        flood_tracker.record_message(chat_id.0, user.id.0, settings.flood_limit, Instant::now());
    if !flooding {
        return;
    }

    debug!("User {} is flooding in chat {}", user.id, chat_id);
    flood_tracker.reset_user(chat_id.0, user.id.0);

    let minutes = settings.flood_mute_min.max(1);
    let until = chrono::Utc::now() + chrono::Duration::minutes(minutes as i64);

    if let Err(e) = bot
        .restrict_chat_member(chat_id, user.id, ChatPermissions::empty())
        .until_date(until)
        .await
    {
        warn!("Failed to mute flooding user {} in chat {}: {}", user.id, chat_id, e);
        return;
    }

    info!("Muted user {} in chat {} for flooding ({} min)", user.id, chat_id, minutes);

    let text = get_text("antiflood.muted")
        .replace("{mention}", &mention_html(user.id, &user.full_name()))
        .replace("{minutes}", &minutes.to_string());

    if let Err(e) = bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await
    {
        warn!("Failed to announce flood mute in chat {}: {}", chat_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: i64 = -100;
    const USER: u64 = 1;

    #[test]
    fn test_ninth_message_triggers_with_limit_eight() {
        let tracker = FloodTracker::new();
        let start = Instant::now();

        for i in 0..8 {
            let at = start + Duration::from_millis(i * 100);
            assert!(!tracker.record_message(CHAT, USER, 8, at), "message {} flagged", i + 1);
        }
        assert!(tracker.record_message(CHAT, USER, 8, start + Duration::from_millis(900)));

        // The handler clears the window after muting.
        tracker.reset_user(CHAT, USER);
        assert_eq!(tracker.window_len(CHAT, USER), 0);
        assert!(!tracker.record_message(CHAT, USER, 8, start + Duration::from_secs(1)));
    }

    #[test]
    fn test_old_entries_expire() {
        let tracker = FloodTracker::new();
        let start = Instant::now();

        for i in 0..5 {
            tracker.record_message(CHAT, USER, 8, start + Duration::from_millis(i * 10));
        }
        let later = start + Duration::from_secs(11);
        assert!(!tracker.record_message(CHAT, USER, 8, later));
        assert_eq!(tracker.window_len(CHAT, USER), 1);
    }

    #[test]
    fn test_window_is_bounded() {
        let tracker = FloodTracker::new();
        let start = Instant::now();

        for i in 0..200 {
            tracker.record_message(CHAT, USER, 1_000, start + Duration::from_millis(i));
            assert!(tracker.window_len(CHAT, USER) <= FLOOD_WINDOW_CAPACITY);
        }
        assert_eq!(tracker.window_len(CHAT, USER), FLOOD_WINDOW_CAPACITY);
    }

    #[test]
    fn test_users_and_chats_are_independent() {
        let tracker = FloodTracker::new();
        let now = Instant::now();

        assert!(!tracker.record_message(CHAT, USER, 1, now));
        assert!(!tracker.record_message(CHAT, 2, 1, now));
        assert!(!tracker.record_message(-200, USER, 1, now));
        assert!(tracker.record_message(CHAT, USER, 1, now));
    }
}
