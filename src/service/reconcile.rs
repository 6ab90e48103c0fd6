//! Reconciliation engine keeping birthday roles in sync with stored dates.
//!
//! One cycle is a sweep pass followed by an add pass:
//!
//! - **Sweep** revokes the role from every member whose role is recorded as assigned
//!   but whose stored day is not today's day of month.
//! - **Add** grants the role to every present member whose stored month and day are
//!   today's and whose role is not yet recorded as assigned, then announces them.
//!
//! Each pass holds the all-guilds record lock for its whole duration, and cycles are
//! single-flight: a cycle requested while another runs waits for it and then runs
//! against the updated records. Directory failures are handled per member and never
//! abort the pass; store failures abort only the current guild.

use chrono::{Datelike, NaiveDate};
use rand::seq::IndexedRandom;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    data::{GuildSettingsRepository, MemberBirthdayRepository, RecordLocks},
    error::{directory::DirectoryError, AppError},
    service::directory::{mention, Directory, MessageTarget},
};

/// Announcement templates; `{mention}` is replaced with the member mention.
pub const CANNED_MESSAGES: [&str; 5] = [
    ":tada: Happy birthday {mention}! :tada:",
    ":birthday: Everyone wish {mention} a happy birthday! :birthday:",
    ":confetti_ball: It's {mention}'s birthday today, have a great one! :confetti_ball:",
    ":cake: Another trip around the sun for {mention}. Happy birthday! :cake:",
    ":balloon: Make some noise, it's {mention}'s birthday! :balloon:",
];

/// Announcement used when the bot itself has a birthday on record.
pub const BOT_BIRTHDAY_MESSAGE: &str =
    ":tada: It's my birthday today! Thank you all for keeping me around. :tada:";

/// Role changes applied by one cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub revoked: usize,
    pub granted: usize,
}

pub struct ReconciliationEngine {
    db: DatabaseConnection,
    locks: Arc<RecordLocks>,
    cycle: Mutex<()>,
    cancel: CancellationToken,
}

impl ReconciliationEngine {
    pub fn new(db: DatabaseConnection, locks: Arc<RecordLocks>, cancel: CancellationToken) -> Self {
        Self {
            db,
            locks,
            cycle: Mutex::new(()),
            cancel,
        }
    }

    /// Runs one sweep + add cycle against `today`.
    ///
    /// Waits for any cycle already in progress. Stops early, between guilds, once
    /// the cancellation token fires.
    pub async fn run_cycle(&self, directory: &dyn Directory, today: NaiveDate) -> CycleSummary {
        let _cycle = self.cycle.lock().await;

        let revoked = self.sweep(directory, today).await;
        let granted = self.add(directory, today).await;

        tracing::debug!(
            "Birthday cycle for {} finished: {} revoked, {} granted",
            today,
            revoked,
            granted
        );

        CycleSummary { revoked, granted }
    }

    /// Revokes the birthday role from members whose day has passed.
    ///
    /// # Returns
    /// - `usize` - Number of successful revocations
    pub async fn sweep(&self, directory: &dyn Directory, today: NaiveDate) -> usize {
        let _all_guilds = self.locks.all_guilds().await;
        let mut revoked = 0;

        for guild_id in directory.guild_ids() {
            if self.cancel.is_cancelled() {
                tracing::info!("Birthday sweep cancelled");
                break;
            }

            match self.sweep_guild(directory, guild_id, today).await {
                Ok(count) => revoked += count,
                Err(e) => tracing::error!("Failed to sweep birthdays of guild {}: {}", guild_id, e),
            }
        }

        revoked
    }

    /// Grants the birthday role to members whose birthday is today.
    ///
    /// # Returns
    /// - `usize` - Number of successful grants
    pub async fn add(&self, directory: &dyn Directory, today: NaiveDate) -> usize {
        let _all_guilds = self.locks.all_guilds().await;
        let mut granted = 0;

        for guild_id in directory.guild_ids() {
            if self.cancel.is_cancelled() {
                tracing::info!("Birthday add cancelled");
                break;
            }

            match self.add_guild(directory, guild_id, today).await {
                Ok(count) => granted += count,
                Err(e) => tracing::error!("Failed to add birthdays of guild {}: {}", guild_id, e),
            }
        }

        granted
    }

    async fn sweep_guild(
        &self,
        directory: &dyn Directory,
        guild_id: u64,
        today: NaiveDate,
    ) -> Result<usize, AppError> {
        let settings = GuildSettingsRepository::new(&self.db).get(guild_id).await?;
        let Some(role_id) = settings.role_id else {
            return Ok(0);
        };

        let member_repo = MemberBirthdayRepository::new(&self.db);
        let stale = member_repo
            .get_all_by_guild(guild_id)
            .await?
            .into_iter()
            .filter(|record| {
                record.role_assigned && record.birthday.map(|b| b.day()) != Some(today.day())
            });

        let mut revoked = 0;
        for record in stale {
            let user_id = record.user_id;

            // Departed members keep their flag until they rejoin.
            match directory.member(guild_id, user_id).await {
                Ok(Some(_)) => {}
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(
                        "Could not look up member {} in guild {}: {}",
                        user_id,
                        guild_id,
                        e
                    );
                    continue;
                }
            }

            match directory.revoke_role(guild_id, user_id, role_id).await {
                Ok(()) => {
                    member_repo.set_role_assigned(guild_id, user_id, false).await?;
                    revoked += 1;
                    tracing::info!(
                        "Removed birthday role from {} in guild {}",
                        user_id,
                        guild_id
                    );
                }
                Err(DirectoryError::PermissionDenied) => tracing::error!(
                    "Could not remove birthday role from {} in guild {}: missing permissions",
                    user_id,
                    guild_id
                ),
                Err(e) => tracing::warn!(
                    "Could not remove birthday role from {} in guild {}: {}",
                    user_id,
                    guild_id,
                    e
                ),
            }
        }

        Ok(revoked)
    }

    async fn add_guild(
        &self,
        directory: &dyn Directory,
        guild_id: u64,
        today: NaiveDate,
    ) -> Result<usize, AppError> {
        let settings = GuildSettingsRepository::new(&self.db).get(guild_id).await?;
        let Some(role_id) = settings.role_id else {
            return Ok(0);
        };

        let member_repo = MemberBirthdayRepository::new(&self.db);
        let due = member_repo
            .get_all_by_guild(guild_id)
            .await?
            .into_iter()
            .filter(|record| {
                !record.role_assigned && record.birthday.is_some_and(|b| b.matches(today))
            });

        let mut granted = 0;
        for record in due {
            let user_id = record.user_id;

            match directory.member(guild_id, user_id).await {
                Ok(Some(_)) => {}
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(
                        "Could not look up member {} in guild {}: {}",
                        user_id,
                        guild_id,
                        e
                    );
                    continue;
                }
            }

            match directory.grant_role(guild_id, user_id, role_id).await {
                Ok(()) => {
                    member_repo.set_role_assigned(guild_id, user_id, true).await?;
                    granted += 1;
                    tracing::info!("Added birthday role to {} in guild {}", user_id, guild_id);
                }
                Err(DirectoryError::PermissionDenied) => {
                    tracing::error!(
                        "Could not add birthday role to {} in guild {}: missing permissions",
                        user_id,
                        guild_id
                    );
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not add birthday role to {} in guild {}: {}",
                        user_id,
                        guild_id,
                        e
                    );
                    continue;
                }
            }

            // The grant stands even if the announcement cannot be delivered.
            if let Some(channel_id) = settings.channel_id {
                let text = birthday_message(directory.bot_user_id(), user_id);
                if let Err(e) = directory
                    .send_message(MessageTarget::Channel(channel_id), &text, None)
                    .await
                {
                    tracing::error!(
                        "Could not announce birthday of {} in channel {}: {}",
                        user_id,
                        channel_id,
                        e
                    );
                }
            }
        }

        Ok(granted)
    }
}

/// Picks the announcement for a member, or the fixed one if it is the bot's own.
pub fn birthday_message(bot_user_id: u64, user_id: u64) -> String {
    if user_id == bot_user_id {
        return BOT_BIRTHDAY_MESSAGE.to_string();
    }

    let template = CANNED_MESSAGES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(CANNED_MESSAGES[0]);

    template.replace("{mention}", &mention(user_id))
}

/// Every announcement template rendered for one member.
pub fn all_birthday_messages(user_id: u64) -> Vec<String> {
    CANNED_MESSAGES
        .iter()
        .map(|template| template.replace("{mention}", &mention(user_id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_gets_fixed_message() {
        assert_eq!(birthday_message(1, 1), BOT_BIRTHDAY_MESSAGE);
    }

    #[test]
    fn member_message_is_canned_and_mentions_member() {
        let message = birthday_message(1, 42);
        assert!(message.contains("<@42>"));
        assert!(all_birthday_messages(42).contains(&message));
    }

    #[test]
    fn renders_every_template() {
        let messages = all_birthday_messages(7);
        assert_eq!(messages.len(), CANNED_MESSAGES.len());
        assert!(messages.iter().all(|m| m.contains("<@7>") && !m.contains("{mention}")));
    }
}
