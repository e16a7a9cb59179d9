//! Permission system for gated commands.
//!
//! ## Usage
//!
//! ```rust,ignore
//! // At the top of a gated handler:
//! if !require_group_admin(&bot, &msg, &state).await? {
//!     return Ok(());
//! }
//! ```

mod checker;
mod guard;

pub use checker::Permissions;
pub use guard::{is_group, require_group_admin};
