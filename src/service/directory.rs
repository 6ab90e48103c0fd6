//! Directory service abstraction over Discord.
//!
//! The reconciliation passes, the confirmation flow and the command operations only
//! talk to Discord through [`Directory`]. Live objects are never cached: every call
//! resolves its identifiers again so deleted roles, removed channels and departed
//! members are observed on the next pass.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::directory::DirectoryError;

/// Destination of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    /// A guild text channel.
    Channel(u64),
    /// A direct message to a user.
    Direct(u64),
}

/// Handle of a message that was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    /// Channel the message landed in. For direct messages this is the DM channel,
    /// which is where replies to it arrive.
    pub channel_id: u64,
    pub message_id: u64,
}

/// A member currently present in a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub user_id: u64,
    /// Nickname if set, otherwise the account name.
    pub display_name: String,
}

#[async_trait]
pub trait Directory: Send + Sync {
    /// User ID of the bot's own account.
    fn bot_user_id(&self) -> u64;

    /// Guilds the bot is currently in.
    fn guild_ids(&self) -> Vec<u64>;

    /// Looks a member up in a guild.
    ///
    /// # Returns
    /// - `Ok(Some(GuildMember))` - Member is present
    /// - `Ok(None)` - User is not (or no longer) a member of the guild
    /// - `Err(DirectoryError)` - Lookup failed
    async fn member(&self, guild_id: u64, user_id: u64)
        -> Result<Option<GuildMember>, DirectoryError>;

    async fn grant_role(&self, guild_id: u64, user_id: u64, role_id: u64)
        -> Result<(), DirectoryError>;

    async fn revoke_role(&self, guild_id: u64, user_id: u64, role_id: u64)
        -> Result<(), DirectoryError>;

    /// Sends a message, optionally deleting it again after `delete_after`.
    ///
    /// # Returns
    /// - `Ok(SentMessage)` - Message delivered
    /// - `Err(DirectoryError::PermissionDenied)` - Channel not writable or recipient
    ///   refuses direct messages
    /// - `Err(DirectoryError::NotFound)` - Channel or user no longer exists
    async fn send_message(
        &self,
        target: MessageTarget,
        text: &str,
        delete_after: Option<Duration>,
    ) -> Result<SentMessage, DirectoryError>;

    /// Waits for the next message `author_id` posts in `channel_id`.
    ///
    /// Returns `None` when nothing arrives within `timeout`.
    async fn wait_for_reply(&self, channel_id: u64, author_id: u64, timeout: Duration)
        -> Option<String>;
}

/// Renders a user mention, e.g. `<@1234>`.
pub fn mention(user_id: u64) -> String {
    format!("<@{}>", user_id)
}

/// Whether a reply is an explicit, case-insensitive `yes`.
pub fn is_yes(reply: &str) -> bool {
    reply.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_is_case_insensitive() {
        assert!(is_yes("yes"));
        assert!(is_yes("YES"));
        assert!(is_yes("Yes"));
    }

    #[test]
    fn anything_else_is_not_yes() {
        assert!(!is_yes("y"));
        assert!(!is_yes("yes please"));
        assert!(!is_yes(" yes"));
        assert!(!is_yes("no"));
        assert!(!is_yes(""));
    }
}
