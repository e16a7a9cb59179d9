//! Content lock model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A lockable content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKind {
    Links,
    Media,
    Stickers,
}

impl LockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LockKind::Links => "links",
            LockKind::Media => "media",
            LockKind::Stickers => "stickers",
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "links" => Ok(LockKind::Links),
            "media" => Ok(LockKind::Media),
            "stickers" => Ok(LockKind::Stickers),
            _ => Err(()),
        }
    }
}

/// Lock flags stored per chat in `locks.json`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatLocks {
    #[serde(default)]
    pub links: bool,
    #[serde(default)]
    pub media: bool,
    #[serde(default)]
    pub stickers: bool,
}

impl ChatLocks {
    pub fn get(&self, kind: LockKind) -> bool {
        match kind {
            LockKind::Links => self.links,
            LockKind::Media => self.media,
            LockKind::Stickers => self.stickers,
        }
    }

    pub fn set(&mut self, kind: LockKind, locked: bool) {
        match kind {
            LockKind::Links => self.links = locked,
            LockKind::Media => self.media = locked,
            LockKind::Stickers => self.stickers = locked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_kind_parse() {
        assert_eq!("links".parse::<LockKind>(), Ok(LockKind::Links));
        assert_eq!(" Media ".parse::<LockKind>(), Ok(LockKind::Media));
        assert_eq!("STICKERS".parse::<LockKind>(), Ok(LockKind::Stickers));
        assert!("badname".parse::<LockKind>().is_err());
        assert!("".parse::<LockKind>().is_err());
    }

    #[test]
    fn test_set_touches_one_flag() {
        let mut locks = ChatLocks::default();
        locks.set(LockKind::Media, true);
        assert!(locks.get(LockKind::Media));
        assert!(!locks.get(LockKind::Links));
        assert!(!locks.get(LockKind::Stickers));
    }
}
