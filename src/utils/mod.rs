//! Utility functions.
//!
//! Collection of helper functions used across the bot.

pub mod reply;
pub mod target;

use teloxide::types::{Message, UserId};

pub use reply::{reply_html, reply_text};
pub use target::{Target, resolve_target};

/// Escape text for Telegram HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// HTML mention link for a user.
pub fn mention_html(user_id: UserId, name: &str) -> String {
    let name = if name.trim().is_empty() { "user" } else { name };
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        user_id,
        html_escape(name)
    )
}

/// Text (or caption) of the message this one replies to, if non-blank.
pub fn replied_text(msg: &Message) -> Option<String> {
    let reply = msg.reply_to_message()?;
    reply
        .text()
        .or_else(|| reply.caption())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Argument text, or the replied-to message's text when no argument was given.
pub fn text_or_reply(msg: &Message, args: &str) -> Option<String> {
    let args = args.trim();
    if args.is_empty() {
        replied_text(msg)
    } else {
        Some(args.to_string())
    }
}

/// Split off the first whitespace-delimited word.
///
/// Returns the word and the remainder with leading whitespace removed,
/// keeping the remainder's inner newlines intact.
pub fn split_first_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(idx) => Some((&s[..idx], s[idx..].trim_start())),
        None => Some((s, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
    }

    #[test]
    fn test_mention_html() {
        assert_eq!(
            mention_html(UserId(5), "A<B"),
            "<a href=\"tg://user?id=5\">A&lt;B</a>"
        );
        assert_eq!(
            mention_html(UserId(5), " "),
            "<a href=\"tg://user?id=5\">user</a>"
        );
    }

    #[test]
    fn test_split_first_word() {
        assert_eq!(split_first_word(""), None);
        assert_eq!(split_first_word("   "), None);
        assert_eq!(split_first_word("faq"), Some(("faq", "")));
        assert_eq!(
            split_first_word("  faq line one\nline two"),
            Some(("faq", "line one\nline two"))
        );
    }
}
