//! The durable store: settings, warns, notes and locks tables.
//!
//! Each table lives in its own JSON file under the data directory and is
//! replaced atomically on save. Every mutating method flushes the tables
//! before returning.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{error, info};

use super::json_file::{StoreError, load_table, save_table};
use super::models::{ChatLocks, ChatSettings, LockKind, clamp_flood_limit, clamp_max_warns};

const SETTINGS_FILE: &str = "settings.json";
const WARNS_FILE: &str = "warns.json";
const NOTES_FILE: &str = "notes.json";
const LOCKS_FILE: &str = "locks.json";

type SettingsTable = BTreeMap<i64, ChatSettings>;
type WarnsTable = BTreeMap<i64, BTreeMap<u64, u32>>;
type NotesTable = BTreeMap<i64, BTreeMap<String, String>>;
type LocksTable = BTreeMap<i64, ChatLocks>;

#[derive(Debug, Default)]
struct Tables {
    settings: SettingsTable,
    warns: WarnsTable,
    notes: NotesTable,
    locks: LocksTable,
}

/// Result of adding a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarnOutcome {
    /// Count after this warning (before any reset).
    pub count: u32,
    /// The chat's threshold at the time of the warning.
    pub max: u32,
    /// The threshold was reached and the counter was reset to 0.
    pub limit_reached: bool,
}

/// Process-wide store for per-chat state.
#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
    tables: Mutex<Tables>,
}

/// Normalize a note name: trimmed and lowercase.
pub fn note_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Store {
    /// Open the store, loading whatever tables exist in `dir`.
    ///
    /// Missing or corrupt files start empty; this never fails.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            error!("Could not create data directory {}: {}", dir.display(), e);
        }

        let mut tables = Tables {
            settings: load_table(&dir.join(SETTINGS_FILE)),
            warns: load_table(&dir.join(WARNS_FILE)),
            notes: load_table(&dir.join(NOTES_FILE)),
            locks: load_table(&dir.join(LOCKS_FILE)),
        };

        // Hand-edited files may hold values the setters would never produce
        tables.settings.values_mut().for_each(ChatSettings::normalize);

        info!(
            "Store loaded from {}: {} chats with settings, {} with notes, {} with locks",
            dir.display(),
            tables.settings.len(),
            tables.notes.len(),
            tables.locks.len()
        );

        Self {
            dir,
            tables: Mutex::new(tables),
        }
    }

    /// Data directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ----- settings -----

    /// Settings for a chat, defaults if never configured.
    pub fn settings(&self, chat_id: i64) -> ChatSettings {
        self.tables
            .lock()
            .settings
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Mutate a chat's settings and persist. Returns the updated settings.
    pub fn update_settings<F>(&self, chat_id: i64, f: F) -> ChatSettings
    where
        F: FnOnce(&mut ChatSettings),
    {
        let mut tables = self.tables.lock();
        let settings = tables.settings.entry(chat_id).or_default();
        f(settings);
        let updated = settings.clone();
        self.flush(&tables);
        updated
    }

    /// Set the warn threshold, clamped to [1, 10].
    pub fn set_max_warns(&self, chat_id: i64, requested: i64) -> u32 {
        let max = clamp_max_warns(requested);
        self.update_settings(chat_id, |s| s.max_warns = max);
        max
    }

    /// Set the flood limit, clamped to [1, 63].
    pub fn set_flood_limit(&self, chat_id: i64, requested: i64) -> u32 {
        let limit = clamp_flood_limit(requested);
        self.update_settings(chat_id, |s| s.flood_limit = limit);
        limit
    }

    /// Set the flood mute length in minutes, floor 1.
    pub fn set_flood_mute_min(&self, chat_id: i64, requested: i64) -> u32 {
        let minutes = requested.clamp(1, u32::MAX as i64) as u32;
        self.update_settings(chat_id, |s| s.flood_mute_min = minutes);
        minutes
    }

    // ----- warns -----

    /// Current warn count for a user.
    pub fn warns(&self, chat_id: i64, user_id: u64) -> u32 {
        self.tables
            .lock()
            .warns
            .get(&chat_id)
            .and_then(|users| users.get(&user_id))
            .copied()
            .unwrap_or(0)
    }

    /// Increment a user's warn count.
    ///
    /// When the count reaches the chat's threshold it is reset to 0 in the
    /// same operation and `limit_reached` is set.
    pub fn add_warn(&self, chat_id: i64, user_id: u64) -> WarnOutcome {
        let mut tables = self.tables.lock();
        let max = tables
            .settings
            .get(&chat_id)
            .map(|s| s.max_warns)
            .unwrap_or_else(|| ChatSettings::default().max_warns);

        let counter = tables
            .warns
            .entry(chat_id)
            .or_default()
            .entry(user_id)
            .or_insert(0);
        *counter += 1;
        let count = *counter;

        let limit_reached = count >= max;
        if limit_reached {
            *counter = 0;
        }

        self.flush(&tables);
        WarnOutcome {
            count,
            max,
            limit_reached,
        }
    }

    /// Reset a user's warn count to exactly 0.
    pub fn clear_warns(&self, chat_id: i64, user_id: u64) {
        let mut tables = self.tables.lock();
        tables.warns.entry(chat_id).or_default().insert(user_id, 0);
        self.flush(&tables);
    }

    // ----- notes -----

    /// Save a note, overwriting any note with the same (normalized) name.
    pub fn save_note(&self, chat_id: i64, name: &str, text: &str) -> String {
        let key = note_key(name);
        let mut tables = self.tables.lock();
        tables
            .notes
            .entry(chat_id)
            .or_default()
            .insert(key.clone(), text.to_string());
        self.flush(&tables);
        key
    }

    /// Fetch a note by name.
    pub fn note(&self, chat_id: i64, name: &str) -> Option<String> {
        self.tables
            .lock()
            .notes
            .get(&chat_id)
            .and_then(|notes| notes.get(&note_key(name)))
            .cloned()
    }

    /// Sorted note names for a chat.
    pub fn note_names(&self, chat_id: i64) -> Vec<String> {
        self.tables
            .lock()
            .notes
            .get(&chat_id)
            .map(|notes| notes.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Delete a note. Returns whether it existed.
    pub fn delete_note(&self, chat_id: i64, name: &str) -> bool {
        let mut tables = self.tables.lock();
        let removed = tables
            .notes
            .get_mut(&chat_id)
            .and_then(|notes| notes.remove(&note_key(name)))
            .is_some();
        if removed {
            self.flush(&tables);
        }
        removed
    }

    // ----- locks -----

    /// Lock flags for a chat, all off if never configured.
    pub fn locks(&self, chat_id: i64) -> ChatLocks {
        self.tables
            .lock()
            .locks
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    /// Set one lock flag and persist.
    pub fn set_lock(&self, chat_id: i64, kind: LockKind, locked: bool) -> ChatLocks {
        let mut tables = self.tables.lock();
        let locks = tables.locks.entry(chat_id).or_default();
        locks.set(kind, locked);
        let updated = *locks;
        self.flush(&tables);
        updated
    }

    // ----- persistence -----

    /// Write all four tables. Failures are logged, not returned.
    pub fn save_all(&self) {
        let tables = self.tables.lock();
        self.flush(&tables);
    }

    fn flush(&self, tables: &Tables) {
        for (file, result) in self.write_tables(tables) {
            if let Err(e) = result {
                error!("Failed to save {}: {}", file, e);
            }
        }
    }

    fn write_tables(&self, tables: &Tables) -> [(&'static str, Result<(), StoreError>); 4] {
        [
            (WARNS_FILE, save_table(&self.dir.join(WARNS_FILE), &tables.warns)),
            (
                SETTINGS_FILE,
                save_table(&self.dir.join(SETTINGS_FILE), &tables.settings),
            ),
            (NOTES_FILE, save_table(&self.dir.join(NOTES_FILE), &tables.notes)),
            (LOCKS_FILE, save_table(&self.dir.join(LOCKS_FILE), &tables.locks)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::chat_settings::{DEFAULT_FLOOD_LIMIT, DEFAULT_MAX_WARNS};
    use tempfile::tempdir;

    const CHAT: i64 = -1001234;
    const USER: u64 = 42;

    #[test]
    fn test_unknown_chat_gets_defaults() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path());
        assert_eq!(store.settings(CHAT), ChatSettings::default());
        assert_eq!(store.locks(CHAT), ChatLocks::default());
        assert_eq!(store.warns(CHAT, USER), 0);
        assert!(store.note_names(CHAT).is_empty());
    }

    #[test]
    fn test_clearwarns_sets_zero() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path());
        store.set_max_warns(CHAT, 10);
        for _ in 0..4 {
            store.add_warn(CHAT, USER);
        }
        assert_eq!(store.warns(CHAT, USER), 4);

        store.clear_warns(CHAT, USER);
        assert_eq!(store.warns(CHAT, USER), 0);

        store.clear_warns(CHAT, 7);
        assert_eq!(store.warns(CHAT, 7), 0);
    }

    #[test]
    fn test_warn_limit_resets_once() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path());
        assert_eq!(store.settings(CHAT).max_warns, DEFAULT_MAX_WARNS);

        let first = store.add_warn(CHAT, USER);
        assert_eq!((first.count, first.max, first.limit_reached), (1, 3, false));
        store.add_warn(CHAT, USER);

        let third = store.add_warn(CHAT, USER);
        assert!(third.limit_reached);
        assert_eq!(third.count, 3);
        assert_eq!(store.warns(CHAT, USER), 0);

        // The next warning starts a fresh count.
        let again = store.add_warn(CHAT, USER);
        assert!(!again.limit_reached);
        assert_eq!(again.count, 1);
    }

    #[test]
    fn test_lowered_threshold_triggers_on_next_warn() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path());
        store.set_max_warns(CHAT, 5);
        store.add_warn(CHAT, USER);
        store.add_warn(CHAT, USER);
        store.set_max_warns(CHAT, 1);

        let outcome = store.add_warn(CHAT, USER);
        assert!(outcome.limit_reached);
        assert_eq!(store.warns(CHAT, USER), 0);
    }

    #[test]
    fn test_set_max_warns_clamps() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path());
        assert_eq!(store.set_max_warns(CHAT, 0), 1);
        assert_eq!(store.set_max_warns(CHAT, 999), 10);
        assert_eq!(store.set_max_warns(CHAT, 5), 5);
        assert_eq!(store.settings(CHAT).max_warns, 5);
    }

    #[test]
    fn test_flood_settings() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path());
        assert_eq!(store.settings(CHAT).flood_limit, DEFAULT_FLOOD_LIMIT);
        assert_eq!(store.set_flood_limit(CHAT, 1000), 63);
        assert_eq!(store.set_flood_mute_min(CHAT, 0), 1);
        assert_eq!(store.set_flood_mute_min(CHAT, 30), 30);
    }

    #[test]
    fn test_note_names_are_case_folded() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path());
        store.save_note(CHAT, "Foo", "first");
        assert_eq!(store.note(CHAT, "foo").as_deref(), Some("first"));
        assert_eq!(store.note(CHAT, "  FOO ").as_deref(), Some("first"));

        store.save_note(CHAT, "foo", "second");
        assert_eq!(store.note_names(CHAT), vec!["foo".to_string()]);
        assert_eq!(store.note(CHAT, "Foo").as_deref(), Some("second"));

        assert!(store.delete_note(CHAT, "FOO"));
        assert!(!store.delete_note(CHAT, "foo"));
        assert!(store.note(CHAT, "foo").is_none());
    }

    #[test]
    fn test_locks_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        {
            let store = Store::open(dir.path());
            store.set_lock(CHAT, LockKind::Links, true);
        }

        let reopened = Store::open(dir.path());
        let locks = reopened.locks(CHAT);
        assert!(locks.links);
        assert!(!locks.media);
        assert!(!locks.stickers);
    }

    #[test]
    fn test_tables_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = Store::open(dir.path());
            store.update_settings(CHAT, |s| s.rules_text = "Be kind".to_string());
            store.save_note(CHAT, "faq", "see pinned");
            store.add_warn(CHAT, USER);
        }

        let reopened = Store::open(dir.path());
        assert_eq!(reopened.settings(CHAT).rules_text, "Be kind");
        assert_eq!(reopened.note(CHAT, "FAQ").as_deref(), Some("see pinned"));
        assert_eq!(reopened.warns(CHAT, USER), 1);
    }

    #[test]
    fn test_loaded_settings_are_clamped() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            format!("{{\"{CHAT}\": {{\"max_warns\": 0, \"flood_limit\": 0}}}}"),
        )
        .unwrap();

        let store = Store::open(dir.path());
        let settings = store.settings(CHAT);
        assert_eq!(settings.max_warns, 1);
        assert_eq!(settings.flood_limit, 1);
        assert_eq!(store.add_warn(CHAT, USER).max, 1);
    }

    #[test]
    fn test_malformed_settings_file_means_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), b"[1, 2, oops").unwrap();
        fs::write(dir.path().join(LOCKS_FILE), b"{\"-5\": {\"links\": true}}").unwrap();

        let store = Store::open(dir.path());
        assert_eq!(store.settings(-5), ChatSettings::default());
        assert!(store.locks(-5).links);
    }
}
