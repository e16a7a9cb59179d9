//! Notes command handlers.
//!
//! Note names are case-insensitive; saving under an existing name overwrites.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::get_text;
use crate::permissions::require_group_admin;
use crate::utils::{html_escape, replied_text, reply_html, reply_text, split_first_word};

/// Split `/save` arguments into name and content.
///
/// Content is the rest of the line, or the replied message when empty.
fn parse_save_args(args: &str, replied: Option<String>) -> Option<(String, String)> {
    let (name, rest) = split_first_word(args)?;
    let content = if rest.trim().is_empty() {
        replied?
    } else {
        rest.to_string()
    };
    Some((name.to_string(), content))
}

/// Handle /save command.
pub async fn save_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some((name, content)) = parse_save_args(&args, replied_text(&msg)) else {
        return reply_text(&bot, &msg, get_text("notes.save_usage")).await;
    };

    let key = state.store.save_note(msg.chat.id.0, &name, &content);
    info!("Saved note '{}' in chat {}", key, msg.chat.id);

    reply_html(&bot, &msg, get_text("notes.saved").replace("{name}", &html_escape(&key))).await
}

/// Handle /get command. Public.
pub async fn get_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some((name, _)) = split_first_word(&args) else {
        return reply_text(&bot, &msg, get_text("notes.get_usage")).await;
    };

    match state.store.note(msg.chat.id.0, name) {
        Some(text) => reply_text(&bot, &msg, text).await,
        None => {
            let text = get_text("notes.not_found").replace("{name}", &html_escape(name));
            reply_html(&bot, &msg, text).await
        }
    }
}

/// Handle /notes command. Public.
pub async fn notes_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let names = state.store.note_names(msg.chat.id.0);
    if names.is_empty() {
        return reply_text(&bot, &msg, get_text("notes.empty")).await;
    }

    let list = names
        .iter()
        .map(|name| format!("• <code>{}</code>", html_escape(name)))
        .collect::<Vec<_>>()
        .join("\n");

    reply_html(&bot, &msg, get_text("notes.list").replace("{notes}", &list)).await
}

/// Handle /delnote command.
pub async fn delnote_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !require_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some((name, _)) = split_first_word(&args) else {
        return reply_text(&bot, &msg, get_text("notes.delete_usage")).await;
    };

    let key = if state.store.delete_note(msg.chat.id.0, name) {
        info!("Deleted note '{}' in chat {}", name, msg.chat.id);
        "notes.deleted"
    } else {
        "notes.not_found"
    };

    reply_html(&bot, &msg, get_text(key).replace("{name}", &html_escape(name))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_save_args_inline() {
        assert_eq!(
            parse_save_args("faq Read the\npinned post", None),
            Some(("faq".to_string(), "Read the\npinned post".to_string()))
        );
    }

    #[test]
    fn test_parse_save_args_from_reply() {
        assert_eq!(
            parse_save_args("faq", Some("replied text".to_string())),
            Some(("faq".to_string(), "replied text".to_string()))
        );
        // Inline content wins over the reply
        assert_eq!(
            parse_save_args("faq inline", Some("replied".to_string())),
            Some(("faq".to_string(), "inline".to_string()))
        );
    }

    #[test]
    fn test_parse_save_args_missing_parts() {
        assert_eq!(parse_save_args("", Some("x".to_string())), None);
        assert_eq!(parse_save_args("faq", None), None);
    }
}
