//! Discord bot integration.
//!
//! Connects to the gateway with serenity, hands the live [`directory::SerenityDirectory`]
//! to the birthday scheduler once ready, and routes prefix commands to
//! [`crate::service::birthday::BirthdayService`].
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild availability, fills the cache the scheduler iterates
//! - `GUILD_MESSAGES` - Commands and confirmation replies in guild channels
//! - `DIRECT_MESSAGES` - Confirmation replies in direct messages
//! - `GUILD_MEMBERS` - Member lookups (privileged intent)
//! - `MESSAGE_CONTENT` - Reading command text and replies (privileged intent)
//!
//! Privileged intents must be enabled in the Discord Developer Portal for the bot
//! application.

pub mod command;
pub mod directory;
pub mod handler;
pub mod start;
