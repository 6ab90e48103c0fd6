//! Operations behind the birthday commands.
//!
//! Every operation returns the reply text for the invoking channel. Operations that
//! hold a dialogue of their own (re-add confirmation, self-service set, get own
//! birthday) send their intermediate prompts through the [`Directory`] and return
//! `None` when nothing is left to say.
//!
//! Member records are read-modify-written under the guild record lock. The lock is
//! never held while waiting for a human reply, and is always released before a
//! reconciliation cycle is triggered.

use sea_orm::DatabaseConnection;
use std::time::Duration;

use crate::{
    data::{GuildSettingsRepository, MemberBirthdayRepository, RecordLocks},
    error::{directory::DirectoryError, AppError},
    model::MonthDay,
    scheduler::birthday::BirthdayScheduler,
    service::{
        confirmation::{ConfirmationFlow, ConfirmationOutcome},
        directory::{is_yes, Directory, GuildMember, MessageTarget},
        reconcile::all_birthday_messages,
    },
};

/// How long a moderator has to confirm re-adding a previously deleted birthday.
pub const READD_CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);
/// How long a member has to agree to see their birthday in the open channel.
pub const SHOW_IN_CHANNEL_TIMEOUT: Duration = Duration::from_secs(30);
/// Lifetime of a birthday shown in the open channel.
pub const SHOWN_BIRTHDAY_TTL: Duration = Duration::from_secs(5);

/// Longest page produced by [`BirthdayService::list_upcoming`].
const LIST_PAGE_LENGTH: usize = 1900;

const GOOD: &str = ":white_check_mark:";
const BAD: &str = ":negative_squared_cross_mark:";

pub struct BirthdayService<'a> {
    db: &'a DatabaseConnection,
    locks: &'a RecordLocks,
    scheduler: &'a BirthdayScheduler,
    command_prefix: &'a str,
}

impl<'a> BirthdayService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        locks: &'a RecordLocks,
        scheduler: &'a BirthdayScheduler,
        command_prefix: &'a str,
    ) -> Self {
        Self {
            db,
            locks,
            scheduler,
            command_prefix,
        }
    }

    /// Sets the role granted on birthdays.
    pub async fn set_guild_role(&self, guild_id: u64, role_id: u64) -> Result<String, AppError> {
        {
            let _guild = self.locks.guild(guild_id).await;
            GuildSettingsRepository::new(self.db)
                .set_role(guild_id, role_id)
                .await?;
        }

        tracing::info!("Birthday role of guild {} set to {}", guild_id, role_id);

        Ok(format!(
            "{} **Birthday - Role**: <@&{}> has been set as the birthday role!",
            GOOD, role_id
        ))
    }

    /// Sets the announcement channel, or disables announcements with `None`.
    pub async fn set_announce_channel(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
    ) -> Result<String, AppError> {
        {
            let _guild = self.locks.guild(guild_id).await;
            GuildSettingsRepository::new(self.db)
                .set_channel(guild_id, channel_id)
                .await?;
        }

        tracing::info!(
            "Birthday channel of guild {} set to {:?}",
            guild_id,
            channel_id
        );

        Ok(match channel_id {
            Some(channel_id) => format!(
                "{} **Birthday - Channel**: <#{}> has been set as the birthday mention channel!",
                GOOD, channel_id
            ),
            None => format!(
                "{} **Birthday - Channel**: Birthday mentions are now disabled.",
                GOOD
            ),
        })
    }

    /// Flips whether members may set their own birthday.
    pub async fn toggle_self_service(&self, guild_id: u64) -> Result<String, AppError> {
        let allowed = {
            let _guild = self.locks.guild(guild_id).await;
            let repo = GuildSettingsRepository::new(self.db);
            let allowed = !repo.get(guild_id).await?.allow_self_service;
            repo.set_self_service(guild_id, allowed).await?;
            allowed
        };

        tracing::info!("Self-service birthdays in guild {} set to {}", guild_id, allowed);

        let title = "**Birthday - Toggle Self Birthday**";
        Ok(if allowed {
            format!(
                "{} {}: **Enabled**. Members can set their birthdays themselves **ONCE** and \
                 **ONLY IF** their birthdays were not already set.",
                GOOD, title
            )
        } else {
            format!(
                "{} {}: **Disabled**. Members cannot set their birthdays themselves.",
                GOOD, title
            )
        })
    }

    /// Lists stored birthdays in calendar order as `"<Month> <DD>: <name>"` lines.
    ///
    /// Members no longer in the guild are left out. Long lists are split into pages.
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - One message per page
    /// - `Err(AppError)` - Store or directory failure
    pub async fn list_upcoming(
        &self,
        directory: &dyn Directory,
        guild_id: u64,
    ) -> Result<Vec<String>, AppError> {
        let mut dated: Vec<(MonthDay, u64)> = MemberBirthdayRepository::new(self.db)
            .get_all_by_guild(guild_id)
            .await?
            .into_iter()
            .filter_map(|record| record.birthday.map(|birthday| (birthday, record.user_id)))
            .collect();

        if dated.is_empty() {
            return Ok(vec![
                ":warning: **Birthday - List**: There are no birthdates set on this server. \
                 Please add some first!"
                    .to_string(),
            ]);
        }

        dated.sort();

        let mut lines = Vec::with_capacity(dated.len());
        for (birthday, user_id) in dated {
            match directory.member(guild_id, user_id).await {
                Ok(Some(member)) => lines.push(format!("{}: {}", birthday, member.display_name)),
                Ok(None) => {}
                Err(e) => tracing::warn!(
                    "Could not look up member {} in guild {} for the birthday list: {}",
                    user_id,
                    guild_id,
                    e
                ),
            }
        }

        Ok(paginate("**Birthday - List**", &lines))
    }

    /// Stores a member's birthday, defaulting to today.
    ///
    /// If the member's birthday was deleted before, the moderator must confirm the
    /// re-add with `yes` in the same channel. A same-day birthday is celebrated
    /// right away.
    ///
    /// # Arguments
    /// - `directory` - Discord access
    /// - `guild_id` - Guild the command was issued in
    /// - `channel_id` - Channel the command was issued in
    /// - `moderator_id` - User who issued the command
    /// - `member_id` - Member whose birthday is stored
    /// - `birthday` - Date to store; `None` means today
    ///
    /// # Returns
    /// - `Ok(String)` - Reply text
    /// - `Err(AppError)` - Store or directory failure
    pub async fn add_or_update_record(
        &self,
        directory: &dyn Directory,
        guild_id: u64,
        channel_id: u64,
        moderator_id: u64,
        member_id: u64,
        birthday: Option<MonthDay>,
    ) -> Result<String, AppError> {
        let title = "**Birthday - Add**";

        let settings = GuildSettingsRepository::new(self.db).get(guild_id).await?;
        if settings.role_id.is_none() {
            return Ok(not_configured(title));
        }

        let Some(member) = directory.member(guild_id, member_id).await? else {
            return Ok(member_missing(title));
        };

        let birthday = birthday.unwrap_or_else(|| MonthDay::of(self.scheduler.today()));
        let repo = MemberBirthdayRepository::new(self.db);

        let mut guild = self.locks.guild(guild_id).await;
        let mut existing = repo.get(guild_id, member_id).await?;

        if existing.birthday.is_none() && existing.added_before {
            // Released while waiting on the moderator; the record is read again after.
            drop(guild);

            let prompt = ":warning: This user had their birthday previously removed. Are you \
                          sure you still want to re-add them? Please type `yes` to confirm.";
            directory
                .send_message(MessageTarget::Channel(channel_id), prompt, None)
                .await?;

            match directory
                .wait_for_reply(channel_id, moderator_id, READD_CONFIRM_TIMEOUT)
                .await
            {
                None => return Ok("You took too long, not re-adding them.".to_string()),
                Some(reply) if !is_yes(&reply) => {
                    return Ok("Not re-adding them to the birthday list.".to_string())
                }
                Some(_) => {}
            }

            guild = self.locks.guild(guild_id).await;
            existing = repo.get(guild_id, member_id).await?;
        }

        let existed = existing.birthday.is_some();
        repo.set_birthday(guild_id, member_id, birthday).await?;
        drop(guild);

        tracing::info!(
            "{} {} the birthday of {} in guild {} as {}",
            moderator_id,
            if existed { "updated" } else { "added" },
            member_id,
            guild_id,
            birthday
        );

        self.scheduler.trigger_check(directory).await;

        Ok(format!(
            "{} {}: Successfully {} **{}**'s birthday as **{}**. The role will be assigned \
             automatically on this day.",
            GOOD,
            title,
            if existed { "updated" } else { "added" },
            member.display_name,
            birthday
        ))
    }

    /// Removes the birthday role from a member and forgets their birthday.
    ///
    /// The stored record keeps the fact that a birthday existed, so a later re-add
    /// asks for confirmation.
    pub async fn delete_record(
        &self,
        directory: &dyn Directory,
        guild_id: u64,
        member_id: u64,
    ) -> Result<String, AppError> {
        let title = "**Birthday - Delete**";

        let target = self.resolve_target(directory, title, guild_id, member_id).await?;
        let (member, role_id) = match target {
            Target::Ready { member, role_id } => (member, role_id),
            Target::Reply(reply) => return Ok(reply),
        };

        if let Some(reply) =
            revoke_or_explain(directory, title, "remove", &member, guild_id, role_id).await?
        {
            return Ok(reply);
        }

        {
            let _guild = self.locks.guild(guild_id).await;
            MemberBirthdayRepository::new(self.db)
                .clear_birthday(guild_id, member_id)
                .await?;
        }

        tracing::info!("Deleted the birthday of {} in guild {}", member_id, guild_id);

        Ok(format!(
            "{} {}: Deleted birthday of **{}**",
            GOOD, title, member.display_name
        ))
    }

    /// Removes the birthday role from a member, keeping their birthday.
    pub async fn unassign_role(
        &self,
        directory: &dyn Directory,
        guild_id: u64,
        member_id: u64,
    ) -> Result<String, AppError> {
        let title = "**Birthday - Unassign**";

        let target = self.resolve_target(directory, title, guild_id, member_id).await?;
        let (member, role_id) = match target {
            Target::Ready { member, role_id } => (member, role_id),
            Target::Reply(reply) => return Ok(reply),
        };

        if let Some(reply) =
            revoke_or_explain(directory, title, "unassign", &member, guild_id, role_id).await?
        {
            return Ok(reply);
        }

        {
            let _guild = self.locks.guild(guild_id).await;
            MemberBirthdayRepository::new(self.db)
                .set_role_assigned(guild_id, member_id, false)
                .await?;
        }

        tracing::info!(
            "Unassigned {} from the birthday role in guild {}",
            member_id,
            guild_id
        );

        Ok(format!(
            "{} {}: Successfully unassigned **{}** from the birthday role.",
            GOOD, title, member.display_name
        ))
    }

    /// Sends a member their own stored birthday by direct message.
    ///
    /// If direct messages are refused, asks whether to show it in the channel
    /// instead, where it is deleted after a few seconds.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Reply text for the invoking channel
    /// - `Ok(None)` - Birthday was delivered
    /// - `Err(AppError)` - Store or unexpected directory failure
    pub async fn get_own_record(
        &self,
        directory: &dyn Directory,
        guild_id: u64,
        channel_id: u64,
        user_id: u64,
    ) -> Result<Option<String>, AppError> {
        let title = "**Birthday - Get Self's Birthday**";

        let record = MemberBirthdayRepository::new(self.db)
            .get(guild_id, user_id)
            .await?;

        let Some(birthday) = record.birthday else {
            return Ok(Some(format!(
                "{} {}: Your birthday in this server has not been set. Please contact an \
                 administrator/moderator, or, if it is allowed by the server's admins and/or \
                 moderators, try setting it yourself with `{}birthday self set <date>`.",
                BAD, title, self.command_prefix
            )));
        };

        let info = format!("{} {}: Your birthday is ||**{}**||.", GOOD, title, birthday);

        match directory
            .send_message(MessageTarget::Direct(user_id), &info, None)
            .await
        {
            Ok(_) => return Ok(None),
            Err(DirectoryError::PermissionDenied) => {}
            Err(e) => return Err(e.into()),
        }

        let gate = format!(
            ":warning: {}: I would like to DM you your birthday but it seems that you have \
             disabled DMs from this server. Would you still like to continue here? Your \
             birthday will be sent here and deleted after a short delay.\nType **`yes`** to \
             confirm. Anything else will be treated as no.",
            title
        );
        directory
            .send_message(MessageTarget::Channel(channel_id), &gate, None)
            .await?;

        match directory
            .wait_for_reply(channel_id, user_id, SHOW_IN_CHANNEL_TIMEOUT)
            .await
        {
            None => Ok(Some(format!(
                "{} {}: No response detected. Aborting.",
                BAD, title
            ))),
            Some(reply) if !is_yes(&reply) => Ok(Some(format!("{} {}: Aborting.", BAD, title))),
            Some(_) => {
                directory
                    .send_message(
                        MessageTarget::Channel(channel_id),
                        &info,
                        Some(SHOWN_BIRTHDAY_TTL),
                    )
                    .await?;
                Ok(None)
            }
        }
    }

    /// Lets a member set their own birthday, once, after explicit confirmation.
    ///
    /// Only a currently stored birthday blocks this; a birthday deleted by a
    /// moderator does not.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - A precondition failed; reply text for the channel
    /// - `Ok(None)` - The confirmation flow ran and told the member the result
    /// - `Err(AppError)` - Store or unexpected directory failure
    pub async fn set_own_record(
        &self,
        directory: &dyn Directory,
        guild_id: u64,
        channel_id: u64,
        user_id: u64,
        birthday: MonthDay,
    ) -> Result<Option<String>, AppError> {
        let title = "**Birthday - Set Self's Birthday**";

        let settings = GuildSettingsRepository::new(self.db).get(guild_id).await?;
        if !settings.allow_self_service {
            return Ok(Some(format!(
                "{} {}: This function is not enabled. You cannot set your birthday. Please let \
                 an administrator or a moderator know if you believe this function should be \
                 enabled.",
                BAD, title
            )));
        }

        let record = MemberBirthdayRepository::new(self.db)
            .get(guild_id, user_id)
            .await?;
        if record.birthday.is_some() {
            return Ok(Some(format!(
                "{} {}: Your birthday is already set. If you believe it is incorrect, please \
                 contact an admin or a moderator.",
                BAD, title
            )));
        }

        if settings.role_id.is_none() {
            return Ok(Some(format!(
                "{} {}: This server is not configured, please let a server administrator or \
                 moderator know.",
                BAD, title
            )));
        }

        let db = self.db;
        let locks = self.locks;
        let outcome = ConfirmationFlow::new(directory, channel_id, user_id, birthday)
            .run(move || async move {
                let _guild = locks.guild(guild_id).await;
                let repo = MemberBirthdayRepository::new(db);
                // Another dialogue or a moderator may have stored a date meanwhile.
                if repo.get(guild_id, user_id).await?.birthday.is_some() {
                    return Ok(false);
                }
                repo.set_birthday(guild_id, user_id, birthday).await?;
                Ok::<bool, AppError>(true)
            })
            .await?;

        match outcome {
            ConfirmationOutcome::Committed(_) => {
                tracing::info!(
                    "{} set their own birthday in guild {} as {}",
                    user_id,
                    guild_id,
                    birthday
                );
                self.scheduler.trigger_check(directory).await;
            }
            outcome => tracing::debug!(
                "Self-service birthday of {} in guild {} ended as {:?}",
                user_id,
                guild_id,
                outcome
            ),
        }

        Ok(None)
    }

    /// Every announcement message, mentioning the invoker.
    pub fn test_announcements(&self, user_id: u64) -> Vec<String> {
        all_birthday_messages(user_id)
    }

    /// Resolves the configured role and the target member of a moderator command.
    async fn resolve_target(
        &self,
        directory: &dyn Directory,
        title: &str,
        guild_id: u64,
        member_id: u64,
    ) -> Result<Target, AppError> {
        let settings = GuildSettingsRepository::new(self.db).get(guild_id).await?;
        let Some(role_id) = settings.role_id else {
            return Ok(Target::Reply(not_configured(title)));
        };

        Ok(match directory.member(guild_id, member_id).await? {
            Some(member) => Target::Ready { member, role_id },
            None => Target::Reply(member_missing(title)),
        })
    }
}

enum Target {
    Ready { member: GuildMember, role_id: u64 },
    /// Command cannot proceed; reply with this text.
    Reply(String),
}

/// Revokes the birthday role, or explains why it could not be revoked.
///
/// An unknown role counts as revoked. Returns the explanation for a refused
/// revocation, `None` on success.
async fn revoke_or_explain(
    directory: &dyn Directory,
    title: &str,
    verb: &str,
    member: &GuildMember,
    guild_id: u64,
    role_id: u64,
) -> Result<Option<String>, AppError> {
    match directory
        .revoke_role(guild_id, member.user_id, role_id)
        .await
    {
        Ok(()) => Ok(None),
        Err(DirectoryError::PermissionDenied) => {
            tracing::error!(
                "Could not {} {} from the birthday role in guild {}: missing permissions",
                verb,
                member.user_id,
                guild_id
            );
            Ok(Some(format!(
                "{} {}: Could not {} **{}** from the role, the bot does not have enough \
                 permissions to do so! Please make sure that the bot is above the birthday \
                 role, and that it has the Manage Roles permission!",
                BAD, title, verb, member.display_name
            )))
        }
        Err(DirectoryError::NotFound) => {
            tracing::warn!(
                "Birthday role {} of guild {} no longer exists",
                role_id,
                guild_id
            );
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn not_configured(title: &str) -> String {
    format!(
        "{} {}: This server is not configured, please set a role!",
        BAD, title
    )
}

fn member_missing(title: &str) -> String {
    format!("{} {}: That member is not in this server.", BAD, title)
}

/// Splits lines into messages no longer than [`LIST_PAGE_LENGTH`], each headed
/// with the title and its page number.
fn paginate(title: &str, lines: &[String]) -> Vec<String> {
    let mut pages: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in lines {
        if !current.is_empty() && current.len() + line.len() + 1 > LIST_PAGE_LENGTH {
            pages.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }

    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(index, body)| format!(":birthday: {} ({}/{})\n{}", title, index + 1, total, body))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_keeps_short_lists_on_one_page() {
        let lines = vec!["January 01: a".to_string(), "March 03: b".to_string()];
        let pages = paginate("List", &lines);
        assert_eq!(pages, vec![":birthday: List (1/1)\nJanuary 01: a\nMarch 03: b"]);
    }

    #[test]
    fn paginate_splits_long_lists() {
        let lines: Vec<String> = (0..200).map(|i| format!("December 31: member{:03}", i)).collect();
        let pages = paginate("List", &lines);

        assert!(pages.len() > 1);
        assert!(pages.iter().all(|page| page.len() <= LIST_PAGE_LENGTH + 40));
        assert!(pages[0].starts_with(&format!(":birthday: List (1/{})", pages.len())));
        let joined: usize = pages.iter().map(|p| p.matches("member").count()).sum();
        assert_eq!(joined, 200);
    }
}
