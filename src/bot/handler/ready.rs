//! Ready event handler for bot initialization.
//!
//! The ready event fires after every successful gateway handshake, including
//! reconnects. Each time, a fresh [`SerenityDirectory`] is published so the
//! birthday scheduler always works against the current context.

use serenity::all::{Context, Ready};
use std::sync::Arc;
use tokio::sync::watch;

use crate::{bot::directory::SerenityDirectory, service::directory::Directory};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `directory_tx` - Channel the birthday scheduler waits on
/// - `ctx` - Discord context backing the published directory
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(
    directory_tx: &watch::Sender<Option<Arc<dyn Directory>>>,
    ctx: Context,
    ready: Ready,
) {
    tracing::info!(
        "{} is connected to Discord ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );

    let directory: Arc<dyn Directory> = Arc::new(SerenityDirectory::new(ctx, ready.user.id.get()));
    directory_tx.send_replace(Some(directory));
}
