//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the handler to `command_handler()`

pub mod antiflood;
pub mod ban;
pub mod locks;
pub mod menu;
pub mod mute;
pub mod notes;
pub mod pin;
pub mod purge;
pub mod rules;
pub mod start;
pub mod warn;
pub mod welcome;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// All bot commands.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start(String),

    #[command(description = "Show help")]
    Help,

    #[command(description = "Show your Telegram id")]
    Whoami,

    // Welcome
    #[command(description = "Set the welcome message")]
    Setwelcome(String),

    #[command(description = "Enable welcome messages")]
    Welcomeon,

    #[command(description = "Disable welcome messages")]
    Welcomeoff,

    // Bans
    #[command(description = "Ban a user")]
    Ban(String),

    #[command(description = "Unban a user")]
    Unban(String),

    #[command(description = "Kick a user")]
    Kick(String),

    // Mutes
    #[command(description = "Mute a user for some minutes")]
    Mute(String),

    #[command(description = "Unmute a user")]
    Unmute(String),

    // Purge
    #[command(description = "Delete recent messages")]
    Purge(String),

    // Warnings
    #[command(description = "Warn a user")]
    Warn(String),

    #[command(description = "Show a user's warnings")]
    Warnings(String),

    #[command(description = "Reset a user's warnings")]
    Clearwarns(String),

    #[command(description = "Set the warning limit")]
    Setmaxwarns(String),

    // Rules
    #[command(description = "Set the group rules")]
    Setrules(String),

    #[command(description = "Show the group rules")]
    Rules,

    // Pins
    #[command(description = "Pin the replied message")]
    Pin,

    #[command(description = "Unpin a message")]
    Unpin,

    // Notes
    #[command(description = "Save a note")]
    Save(String),

    #[command(description = "Get a note")]
    Get(String),

    #[command(description = "List notes")]
    Notes,

    #[command(description = "Delete a note")]
    Delnote(String),

    // Locks
    #[command(description = "Lock links, media or stickers")]
    Lock(String),

    #[command(description = "Unlock links, media or stickers")]
    Unlock(String),

    #[command(description = "Show current locks")]
    Locks,

    // Antiflood
    #[command(description = "Set the flood limit")]
    Setflood(String),

    #[command(description = "Set the flood mute length")]
    Setfloodmute(String),
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start(args)].endpoint(start::start_command))
        .branch(case![Command::Help].endpoint(start::help_command))
        .branch(case![Command::Whoami].endpoint(start::whoami_command))
        // Welcome
        .branch(case![Command::Setwelcome(args)].endpoint(welcome::setwelcome_command))
        .branch(case![Command::Welcomeon].endpoint(welcome::welcomeon_command))
        .branch(case![Command::Welcomeoff].endpoint(welcome::welcomeoff_command))
        // Ban
        .branch(case![Command::Ban(args)].endpoint(ban::ban_command))
        .branch(case![Command::Unban(args)].endpoint(ban::unban_command))
        .branch(case![Command::Kick(args)].endpoint(ban::kick_command))
        // Mute
        .branch(case![Command::Mute(args)].endpoint(mute::mute_command))
        .branch(case![Command::Unmute(args)].endpoint(mute::unmute_command))
        // Purge
        .branch(case![Command::Purge(args)].endpoint(purge::purge_command))
        // Warning
        .branch(case![Command::Warn(args)].endpoint(warn::warn_command))
        .branch(case![Command::Warnings(args)].endpoint(warn::warnings_command))
        .branch(case![Command::Clearwarns(args)].endpoint(warn::clearwarns_command))
        .branch(case![Command::Setmaxwarns(args)].endpoint(warn::setmaxwarns_command))
        // Rules
        .branch(case![Command::Setrules(args)].endpoint(rules::setrules_command))
        .branch(case![Command::Rules].endpoint(rules::rules_command))
        // Pin
        .branch(case![Command::Pin].endpoint(pin::pin_command))
        .branch(case![Command::Unpin].endpoint(pin::unpin_command))
        // Notes
        .branch(case![Command::Save(args)].endpoint(notes::save_command))
        .branch(case![Command::Get(args)].endpoint(notes::get_command))
        .branch(case![Command::Notes].endpoint(notes::notes_command))
        .branch(case![Command::Delnote(args)].endpoint(notes::delnote_command))
        // Locks
        .branch(case![Command::Lock(args)].endpoint(locks::lock_command))
        .branch(case![Command::Unlock(args)].endpoint(locks::unlock_command))
        .branch(case![Command::Locks].endpoint(locks::locks_command))
        // Antiflood
        .branch(case![Command::Setflood(args)].endpoint(antiflood::setflood_command))
        .branch(case![Command::Setfloodmute(args)].endpoint(antiflood::setfloodmute_command))
}

/// Build the callback query handler.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query().endpoint(menu::callback_handler)
}
