//! Database module exports.
//!
//! Four JSON tables (settings, warns, notes, locks) kept in memory and
//! written back to the data directory after every change.

mod json_file;
mod models;
mod store;

pub use models::*;
pub use store::Store;
