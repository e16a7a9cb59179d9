//! Welcome event handler.
//!
//! Greets new members with the chat's welcome template.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberUpdated, ParseMode};
use tracing::{debug, info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::plugins::welcome::{format_welcome_plain, format_welcome_text};

/// Returns the handler for new member events.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(is_new_member).endpoint(welcome_handler)
}

/// Check if this is a (non-bot) user joining.
fn is_new_member(update: ChatMemberUpdated) -> bool {
    let old = &update.old_chat_member;
    let new = &update.new_chat_member;

    !old.is_present() && new.is_present() && !new.user.is_bot
}

/// Handle new member join event.
async fn welcome_handler(
    bot: ThrottledBot,
    update: ChatMemberUpdated,
    state: AppState,
) -> anyhow::Result<()> {
    let chat = update.chat;
    let user = &update.new_chat_member.user;

    debug!("New member {} joined chat {}", user.id, chat.id);

    let settings = state.store.settings(chat.id.0);
    if !settings.welcome_on {
        debug!("Welcome disabled for chat {}", chat.id);
        return Ok(());
    }

    let text = format_welcome_text(
        &settings.welcome_text,
        user.id,
        &user.first_name,
        &user.full_name(),
        chat.title().unwrap_or("the group"),
    );

    // Templates are admin-written HTML; a malformed one falls back to plain text
    if let Err(e) = bot
        .send_message(chat.id, text)
        .parse_mode(ParseMode::Html)
        .await
    {
        warn!("Welcome template rejected as HTML in chat {}: {}", chat.id, e);
        let plain = format_welcome_plain(
            &settings.welcome_text,
            &user.first_name,
            &user.full_name(),
            chat.title().unwrap_or("the group"),
        );
        bot.send_message(chat.id, plain).await?;
    }

    info!("Sent welcome message to {} in chat {}", user.id, chat.id);
    Ok(())
}
