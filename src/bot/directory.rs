use serenity::{
    all::{ChannelId, Context, CreateMessage, GuildId, MessageCollector, RoleId, UserId},
    async_trait,
};
use std::time::Duration;

use crate::{
    error::directory::DirectoryError,
    service::directory::{Directory, GuildMember, MessageTarget, SentMessage},
};

/// Audit log reason attached to birthday role changes.
const AUDIT_REASON: &str = "Birthday role";

/// [`Directory`] backed by a live serenity context.
pub struct SerenityDirectory {
    ctx: Context,
    bot_user_id: u64,
}

impl SerenityDirectory {
    pub fn new(ctx: Context, bot_user_id: u64) -> Self {
        Self { ctx, bot_user_id }
    }
}

#[async_trait]
impl Directory for SerenityDirectory {
    fn bot_user_id(&self) -> u64 {
        self.bot_user_id
    }

    fn guild_ids(&self) -> Vec<u64> {
        self.ctx
            .cache
            .guilds()
            .into_iter()
            .map(|guild_id| guild_id.get())
            .collect()
    }

    async fn member(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<GuildMember>, DirectoryError> {
        match GuildId::new(guild_id)
            .member(&self.ctx, UserId::new(user_id))
            .await
        {
            Ok(member) => Ok(Some(GuildMember {
                user_id,
                display_name: member.display_name().to_string(),
            })),
            Err(e) => match DirectoryError::from(e) {
                DirectoryError::NotFound => Ok(None),
                e => Err(e),
            },
        }
    }

    async fn grant_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), DirectoryError> {
        self.ctx
            .http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_REASON),
            )
            .await?;

        Ok(())
    }

    async fn revoke_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), DirectoryError> {
        self.ctx
            .http
            .remove_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_REASON),
            )
            .await?;

        Ok(())
    }

    async fn send_message(
        &self,
        target: MessageTarget,
        text: &str,
        delete_after: Option<Duration>,
    ) -> Result<SentMessage, DirectoryError> {
        let channel_id = match target {
            MessageTarget::Channel(channel_id) => ChannelId::new(channel_id),
            MessageTarget::Direct(user_id) => {
                UserId::new(user_id).create_dm_channel(&self.ctx).await?.id
            }
        };

        let message = channel_id
            .send_message(&self.ctx, CreateMessage::new().content(text))
            .await?;

        if let Some(delay) = delete_after {
            let http = self.ctx.http.clone();
            let (channel_id, message_id) = (message.channel_id, message.id);

            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(e) = http.delete_message(channel_id, message_id, None).await {
                    tracing::warn!(
                        "Failed to delete message {} in channel {}: {}",
                        message_id,
                        channel_id,
                        e
                    );
                }
            });
        }

        Ok(SentMessage {
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
        })
    }

    async fn wait_for_reply(
        &self,
        channel_id: u64,
        author_id: u64,
        timeout: Duration,
    ) -> Option<String> {
        MessageCollector::new(&self.ctx)
            .channel_id(ChannelId::new(channel_id))
            .author_id(UserId::new(author_id))
            .timeout(timeout)
            .next()
            .await
            .map(|message| message.content)
    }
}
