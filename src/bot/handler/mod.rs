use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Message, Ready};
use serenity::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

use crate::{data::RecordLocks, scheduler::birthday::BirthdayScheduler, service::directory::Directory};

pub mod message;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub locks: Arc<RecordLocks>,
    pub scheduler: Arc<BirthdayScheduler>,
    pub command_prefix: String,
    /// Publishes the live directory to the scheduler on every ready event.
    pub directory_tx: watch::Sender<Option<Arc<dyn Directory>>>,
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.directory_tx, ctx, ready).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(self, ctx, message).await;
    }
}
