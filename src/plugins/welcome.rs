//! Welcome command handlers.
//!
//! Commands for configuring welcome messages in groups.

use teloxide::prelude::*;
use teloxide::types::UserId;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::{html_escape, mention_html, reply_text, text_or_reply};

/// Fill a welcome template.
///
/// Supported placeholders: `{mention}`, `{first}`, `{chatname}`.
pub fn format_welcome_text(
    template: &str,
    user_id: UserId,
    first_name: &str,
    full_name: &str,
    chat_title: &str,
) -> String {
    template
        .replace("{mention}", &mention_html(user_id, full_name))
        .replace("{first}", &html_escape(first_name))
        .replace("{chatname}", &html_escape(chat_title))
}

/// Plain-text rendering of the same template, used when Telegram rejects
/// the template's HTML. `{mention}` becomes the bare name.
pub fn format_welcome_plain(
    template: &str,
    first_name: &str,
    full_name: &str,
    chat_title: &str,
) -> String {
    template
        .replace("{mention}", full_name)
        .replace("{first}", first_name)
        .replace("{chatname}", chat_title)
}

/// Handle /setwelcome command.
pub async fn setwelcome_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(template) = text_or_reply(&msg, &args) else {
        return reply_text(&bot, &msg, get_text("welcome.set_usage")).await;
    };

    state
        .store
        .update_settings(msg.chat.id.0, |settings| settings.welcome_text = template);

    info!("Welcome message updated in chat {}", msg.chat.id);
    reply_text(&bot, &msg, get_text("welcome.set")).await
}

/// Handle /welcomeon command.
pub async fn welcomeon_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    set_welcome_enabled(bot, msg, state, true).await
}

/// Handle /welcomeoff command.
pub async fn welcomeoff_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    set_welcome_enabled(bot, msg, state, false).await
}

async fn set_welcome_enabled(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    enabled: bool,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    state
        .store
        .update_settings(msg.chat.id.0, |settings| settings.welcome_on = enabled);

    info!("Welcome messages {} in chat {}", if enabled { "enabled" } else { "disabled" }, msg.chat.id);

    let key = if enabled { "welcome.on" } else { "welcome.off" };
    reply_text(&bot, &msg, get_text(key)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_welcome_text() {
        let text = format_welcome_text(
            "Hi {first}, welcome to {chatname}! {mention}",
            UserId(42),
            "Ann",
            "Ann <Lee>",
            "Rust & Friends",
        );

        assert_eq!(
            text,
            "Hi Ann, welcome to Rust &amp; Friends! <a href=\"tg://user?id=42\">Ann &lt;Lee&gt;</a>"
        );
    }

    #[test]
    fn test_template_without_placeholders() {
        let text = format_welcome_text("Hello!", UserId(1), "A", "A", "G");
        assert_eq!(text, "Hello!");
    }

    #[test]
    fn test_format_welcome_plain_leaves_markup_alone() {
        let text = format_welcome_plain(
            "<b>Hi {mention}</b> in {chatname}",
            "Ann",
            "Ann <Lee>",
            "Rust & Friends",
        );
        assert_eq!(text, "<b>Hi Ann <Lee></b> in Rust & Friends");
    }
}
