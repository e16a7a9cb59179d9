//! User-facing strings.
//!
//! Strings live in `en.json`, embedded at compile time and resolved by
//! dotted key, e.g. `"warn.warned"`.

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::warn;

static TRANSLATIONS: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("en.json")).unwrap_or_else(|e| {
        warn!("Failed to parse embedded en.json: {}", e);
        Value::Null
    })
});

/// Get text for a key. Unknown keys resolve to the key itself.
pub fn get_text(key: &str) -> String {
    resolve_key(&TRANSLATIONS, key).unwrap_or_else(|| key.to_string())
}

fn resolve_key(val: &Value, key: &str) -> Option<String> {
    let mut current = val;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    current.as_str().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USED_KEYS: &[&str] = &[
        "common.group_only",
        "common.admins_only",
        "common.no_target",
        "start.private",
        "start.group",
        "help.text",
        "whoami.private",
        "whoami.group",
        "menu.home",
        "menu.content",
        "menu.subject",
        "menu.subject_not_found",
        "menu.family",
        "menu.content_btn",
        "menu.family_btn",
        "menu.back_btn",
        "menu.private_only",
        "welcome.set",
        "welcome.set_usage",
        "welcome.on",
        "welcome.off",
        "welcome.goodbye",
        "ban.banned",
        "ban.unbanned",
        "ban.kicked",
        "ban.unban_usage",
        "ban.failed",
        "mute.muted",
        "mute.unmuted",
        "mute.failed",
        "purge.usage",
        "purge.done",
        "warn.warned",
        "warn.limit_reached",
        "warn.ban_failed",
        "warn.count",
        "warn.cleared",
        "warn.setmax_usage",
        "warn.setmax_done",
        "rules.set",
        "rules.set_usage",
        "pin.usage",
        "pin.pinned",
        "pin.unpinned",
        "pin.failed",
        "notes.save_usage",
        "notes.saved",
        "notes.get_usage",
        "notes.not_found",
        "notes.list",
        "notes.empty",
        "notes.delete_usage",
        "notes.deleted",
        "locks.usage_lock",
        "locks.usage_unlock",
        "locks.locked",
        "locks.unlocked",
        "locks.status",
        "antiflood.muted",
        "antiflood.setflood_usage",
        "antiflood.setflood_done",
        "antiflood.setfloodmute_usage",
        "antiflood.setfloodmute_done",
    ];

    #[test]
    fn test_all_used_keys_resolve() {
        for key in USED_KEYS {
            assert_ne!(get_text(key), *key, "missing translation for {}", key);
        }
    }

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(get_text("nope.missing"), "nope.missing");
    }
}
