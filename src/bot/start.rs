use sea_orm::DatabaseConnection;
use serenity::all::{Client, GatewayIntents};
use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    bot::handler::Handler,
    config::Config,
    data::RecordLocks,
    error::AppError,
    scheduler::birthday::BirthdayScheduler,
    service::directory::Directory,
};

/// Starts the Discord bot in a blocking manner
///
/// Creates the client and runs it until shutdown. Should be called from within a
/// tokio::spawn task.
///
/// # Arguments
/// - `config` - Application configuration (token and command prefix)
/// - `db` - Database connection for the command handlers
/// - `locks` - Record locks shared with the scheduler
/// - `scheduler` - Birthday scheduler triggered by commands
/// - `directory_tx` - Filled with the live directory on every ready event
///
/// # Returns
/// - `Ok(())` if the bot starts and runs successfully
/// - `Err(AppError)` if bot initialization or connection fails
pub async fn start_bot(
    config: &Config,
    db: DatabaseConnection,
    locks: Arc<RecordLocks>,
    scheduler: Arc<BirthdayScheduler>,
    directory_tx: watch::Sender<Option<Arc<dyn Directory>>>,
) -> Result<(), AppError> {
    // GUILD_MEMBERS and MESSAGE_CONTENT are privileged intents
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler {
        db,
        locks,
        scheduler,
        command_prefix: config.command_prefix.clone(),
        directory_tx,
    };

    let mut client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
