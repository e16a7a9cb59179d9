//! Goodbye event handler.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberUpdated, ParseMode};
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::utils::mention_html;

/// Returns the handler for member leave events.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(is_member_left).endpoint(bye_handler)
}

/// Check if a (non-bot) member left or was removed.
fn is_member_left(update: ChatMemberUpdated) -> bool {
    let old = &update.old_chat_member;
    let new = &update.new_chat_member;

    old.is_present() && !new.is_present() && !old.user.is_bot
}

/// Handle member leave event. Goodbyes follow the welcome toggle.
async fn bye_handler(
    bot: ThrottledBot,
    update: ChatMemberUpdated,
    state: AppState,
) -> anyhow::Result<()> {
    let chat = update.chat;
    let user = &update.old_chat_member.user;

    debug!("Member {} left chat {}", user.id, chat.id);

    if !state.store.settings(chat.id.0).welcome_on {
        return Ok(());
    }

    let text = get_text("welcome.goodbye")
        .replace("{mention}", &mention_html(user.id, &user.full_name()));

    bot.send_message(chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
