//! Database model exports.

pub mod chat_settings;
pub mod locks;

pub use chat_settings::{ChatSettings, clamp_flood_limit, clamp_max_warns};
pub use locks::{ChatLocks, LockKind};
