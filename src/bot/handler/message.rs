//! Message handler routing prefix commands to the birthday service.

use serenity::all::{Context, Message, Permissions};

use crate::{
    bot::{
        command::{parse_command, BirthdayCommand},
        directory::SerenityDirectory,
        handler::Handler,
    },
    error::AppError,
    service::{
        birthday::BirthdayService,
        directory::{Directory, MessageTarget},
    },
    util::parse::parse_month_day,
};

/// Handle message creation in a channel
pub async fn handle_message(handler: &Handler, ctx: Context, message: Message) {
    // Commands are guild-only; replies in DMs are picked up by collectors
    let Some(guild_id) = message.guild_id else {
        return;
    };
    if message.author.bot {
        return;
    }

    let Some(command) = parse_command(&handler.command_prefix, &message.content) else {
        return;
    };

    let directory = SerenityDirectory::new(ctx.clone(), ctx.cache.current_user().id.get());
    let channel_id = message.channel_id.get();

    if command.requires_moderator() && !is_moderator(&ctx, &message) {
        reply(
            &directory,
            channel_id,
            ":negative_squared_cross_mark: You need the Administrator or Manage Roles \
             permission to use this command.",
        )
        .await;
        return;
    }

    let service = BirthdayService::new(
        &handler.db,
        &handler.locks,
        &handler.scheduler,
        &handler.command_prefix,
    );

    let replies = match run_command(
        &service,
        &directory,
        command,
        guild_id.get(),
        channel_id,
        message.author.id.get(),
    )
    .await
    {
        Ok(replies) => replies,
        Err(e) => {
            tracing::error!(
                "Birthday command {:?} in guild {} failed: {}",
                message.content,
                guild_id,
                e
            );
            vec![":negative_squared_cross_mark: Something went wrong, please try again later."
                .to_string()]
        }
    };

    for text in replies {
        reply(&directory, channel_id, &text).await;
    }
}

/// Runs a parsed command and collects the messages to post in the channel.
async fn run_command(
    service: &BirthdayService<'_>,
    directory: &dyn Directory,
    command: BirthdayCommand,
    guild_id: u64,
    channel_id: u64,
    author_id: u64,
) -> Result<Vec<String>, AppError> {
    let replies = match command {
        BirthdayCommand::SetChannel(channel) => {
            vec![service.set_announce_channel(guild_id, channel).await?]
        }
        BirthdayCommand::SetRole(role_id) => vec![service.set_guild_role(guild_id, role_id).await?],
        BirthdayCommand::Test => service.test_announcements(author_id),
        BirthdayCommand::Add { member_id, date } => {
            let birthday = match date.as_deref().map(parse_month_day).transpose() {
                Ok(birthday) => birthday,
                Err(e) => return Ok(vec![date_error(e)]),
            };
            vec![
                service
                    .add_or_update_record(
                        directory, guild_id, channel_id, author_id, member_id, birthday,
                    )
                    .await?,
            ]
        }
        BirthdayCommand::List => service.list_upcoming(directory, guild_id).await?,
        BirthdayCommand::Unassign(member_id) => {
            vec![service.unassign_role(directory, guild_id, member_id).await?]
        }
        BirthdayCommand::Delete(member_id) => {
            vec![service.delete_record(directory, guild_id, member_id).await?]
        }
        BirthdayCommand::ToggleSelfService => vec![service.toggle_self_service(guild_id).await?],
        BirthdayCommand::GetOwn => service
            .get_own_record(directory, guild_id, channel_id, author_id)
            .await?
            .into_iter()
            .collect(),
        BirthdayCommand::SetOwn(date) => match parse_month_day(&date) {
            Ok(birthday) => service
                .set_own_record(directory, guild_id, channel_id, author_id, birthday)
                .await?
                .into_iter()
                .collect(),
            Err(e) => vec![date_error(e)],
        },
        BirthdayCommand::Usage(usage) => vec![format!("Usage: {}", usage)],
    };

    Ok(replies)
}

fn date_error(error: crate::error::date::DateParseError) -> String {
    format!(":negative_squared_cross_mark: {}", error)
}

/// Administrator or Manage Roles in the guild the message was sent in.
fn is_moderator(ctx: &Context, message: &Message) -> bool {
    message
        .author_permissions(&ctx.cache)
        .is_some_and(|permissions| {
            permissions.intersects(Permissions::ADMINISTRATOR | Permissions::MANAGE_ROLES)
        })
}

async fn reply(directory: &dyn Directory, channel_id: u64, text: &str) {
    if let Err(e) = directory
        .send_message(MessageTarget::Channel(channel_id), text, None)
        .await
    {
        tracing::warn!("Failed to reply in channel {}: {}", channel_id, e);
    }
}
