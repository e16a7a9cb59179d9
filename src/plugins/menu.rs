//! Private-chat inline menu.
//!
//! Navigation is a pure function from a callback token to the text and
//! keyboard of the next screen; the callback handler only edits the message.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::debug;
use url::Url;

use crate::bot::dispatcher::ThrottledBot;
use crate::i18n::get_text;

/// Subjects shown under "Content", each with its material links.
const SUBJECTS: &[(&str, &[(&str, &str)])] = &[(
    "Math",
    &[("Algebra (PDF)", "https://example.com/math_algebra.pdf")],
)];

/// Channels shown under "Our Family".
const FAMILY_CHANNELS: &[(&str, &str)] = &[("Main Channel", "https://t.me/your_real_channel")];

const HOME: &str = "menu:home";
const CONTENT: &str = "menu:content";
const FAMILY: &str = "menu:family";
const SUBJECT_PREFIX: &str = "sub:";

/// A menu screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Home,
    Content,
    Subject(String),
    Family,
}

impl MenuState {
    /// Parse callback data. Returns `None` for data this menu does not own.
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            HOME => Some(Self::Home),
            CONTENT => Some(Self::Content),
            FAMILY => Some(Self::Family),
            _ => data
                .strip_prefix(SUBJECT_PREFIX)
                .map(|name| Self::Subject(name.to_string())),
        }
    }

    /// Callback data that leads to this screen.
    pub fn token(&self) -> String {
        match self {
            Self::Home => HOME.to_string(),
            Self::Content => CONTENT.to_string(),
            Self::Subject(name) => format!("{SUBJECT_PREFIX}{name}"),
            Self::Family => FAMILY.to_string(),
        }
    }

    /// Text and keyboard for this screen.
    ///
    /// Unknown subjects fall back to the subject list with an error line.
    pub fn render(&self) -> (String, InlineKeyboardMarkup) {
        match self {
            Self::Home => (get_text("menu.home"), home_keyboard()),
            Self::Content => (get_text("menu.content"), content_keyboard()),
            Self::Subject(name) => match find_subject(name) {
                Some(links) => (
                    get_text("menu.subject").replace("{subject}", name),
                    link_keyboard(links, Self::Content),
                ),
                None => (get_text("menu.subject_not_found"), content_keyboard()),
            },
            Self::Family => (get_text("menu.family"), link_keyboard(FAMILY_CHANNELS, Self::Home)),
        }
    }
}

fn find_subject(name: &str) -> Option<&'static [(&'static str, &'static str)]> {
    SUBJECTS
        .iter()
        .find(|(subject, _)| *subject == name)
        .map(|(_, links)| *links)
}

/// Keyboard for the home screen.
pub fn home_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            get_text("menu.content_btn"),
            MenuState::Content.token(),
        )],
        vec![InlineKeyboardButton::callback(
            get_text("menu.family_btn"),
            MenuState::Family.token(),
        )],
    ])
}

fn content_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = SUBJECTS
        .iter()
        .map(|(name, _)| {
            vec![InlineKeyboardButton::callback(
                *name,
                MenuState::Subject(name.to_string()).token(),
            )]
        })
        .collect();
    rows.push(vec![back_button(MenuState::Home)]);
    InlineKeyboardMarkup::new(rows)
}

/// One URL button per link, then a back button.
fn link_keyboard(links: &[(&str, &str)], back: MenuState) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = links
        .iter()
        .filter_map(|(title, url)| {
            Url::parse(url)
                .ok()
                .map(|url| vec![InlineKeyboardButton::url(*title, url)])
        })
        .collect();
    rows.push(vec![back_button(back)]);
    InlineKeyboardMarkup::new(rows)
}

fn back_button(to: MenuState) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(get_text("menu.back_btn"), to.token())
}

/// Handle menu callback queries.
pub async fn callback_handler(bot: ThrottledBot, q: CallbackQuery) -> anyhow::Result<()> {
    // Unknown buttons still get answered so the client stops its spinner
    let Some(state) = q.data.as_deref().and_then(MenuState::from_callback) else {
        debug!("Unknown callback data {:?} from {}", q.data, q.from.id);
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    let Some(message) = q.message.as_ref() else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    if !message.chat().is_private() {
        bot.answer_callback_query(q.id)
            .text(get_text("menu.private_only"))
            .show_alert(true)
            .await?;
        return Ok(());
    }

    debug!("User {} opened menu {:?}", q.from.id, state);

    bot.answer_callback_query(q.id.clone()).await?;

    let (text, keyboard) = state.render();
    bot.edit_message_text(message.chat().id, message.id(), text)
        .reply_markup(keyboard)
        .await?;

    Ok(())
}
