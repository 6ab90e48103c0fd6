//! Birthday bot.
//!
//! Grants a configured role to guild members on their birthday and removes it once
//! the day has passed. Members' birthdays are stored by moderators or, when a guild
//! allows it, set once by the members themselves after an explicit confirmation.
//!
//! # Architecture
//!
//! - **Bot** (`bot/`) - Serenity client, event handlers and the prefix command adapter
//! - **Service Layer** (`service/`) - Reconciliation passes, confirmation flow and command operations
//! - **Scheduler** (`scheduler/`) - Minute job detecting calendar day changes
//! - **Data Layer** (`data/`) - Repositories and the two-tier record locks
//! - **Model Layer** (`model/`) - Domain models
//! - **Error Layer** (`error/`) - Application error types
//!
//! Supporting modules: `config` (environment configuration), `startup` (tracing,
//! database and migrations) and `util` (date and mention parsing).

mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod util;

use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    config::Config,
    data::RecordLocks,
    error::AppError,
    scheduler::birthday::{BirthdayScheduler, LocalClock},
    service::directory::Directory,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;
    let db = startup::connect_to_database(&config).await?;

    let locks = Arc::new(RecordLocks::new());
    let scheduler = Arc::new(BirthdayScheduler::new(
        db.clone(),
        locks.clone(),
        Arc::new(LocalClock),
    ));
    let (directory_tx, directory_rx) = watch::channel::<Option<Arc<dyn Directory>>>(None);

    tracing::info!("Starting birthday bot");

    let scheduler_task = scheduler.clone();
    tokio::spawn(async move {
        if let Err(e) = scheduler_task.start(directory_rx).await {
            tracing::error!("Birthday scheduler error: {}", e);
        }
    });

    let bot_scheduler = scheduler.clone();
    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(&config, db, locks, bot_scheduler, directory_tx).await
        {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }

    tracing::info!("Shutting down");
    scheduler.stop().await?;

    Ok(())
}
