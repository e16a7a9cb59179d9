//! Warden - Telegram group moderation bot
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - JSON-file store for settings, warns, notes and locks
//! - `permissions` - Owner / live admin checks
//! - `bot` - Core bot functionality (with Throttle for API rate limiting)
//! - `plugins` - Command handlers and the private menu
//! - `events` - Welcome/goodbye, lock enforcement and antiflood
//! - `i18n` - User-facing strings
//! - `utils` - Utility functions

mod bot;
mod config;
mod database;
mod events;
mod i18n;
mod permissions;
mod plugins;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, mask_token};
use database::Store;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warden=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Warden bot...");

    // A missing token is the only fatal startup condition
    let config = Config::from_env()?;
    info!("Token: {}", mask_token(&config.bot_token));
    info!("Bot mode: {:?}", config.bot_mode);

    if config.owner_ids.is_empty() {
        info!("No owner IDs configured (OWNER_ID is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }

    let store = Arc::new(Store::open(config.data_dir.clone()));
    info!("Data directory: {}", store.dir().display());

    // Throttle respects Telegram's rate limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let dispatcher = bot::build_dispatcher(bot.clone(), store.clone(), config.owner_ids.clone());

    bot::run(&config, dispatcher, bot).await?;

    // Every mutation is flushed already; this covers a failed earlier write
    store.save_all();
    info!("Shutdown complete");

    Ok(())
}
