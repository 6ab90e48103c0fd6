//! Error types for the birthday bot.
//!
//! `AppError` is the top-level error returned by services, repositories and startup
//! code. Domain-specific errors (configuration, date parsing, directory operations)
//! live in their own modules and convert into `AppError` where they need to cross
//! layer boundaries.

pub mod config;
pub mod date;
pub mod directory;

use thiserror::Error;

use crate::error::{config::ConfigError, directory::DirectoryError};

/// Top-level application error type.
///
/// Aggregates the errors that can abort an operation. Most variants use `#[from]`
/// so `?` converts automatically. Failures that are expected during normal
/// operation (a member left, a permission is missing) are not represented here;
/// the reconciliation passes handle those per member.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord client error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Directory operation that could not be completed.
    #[error(transparent)]
    DirectoryErr(#[from] DirectoryError),

    /// Unexpected internal state, indicating a bug.
    #[error("{0}")]
    InternalError(String),
}

/// Boxes the error to keep `AppError` small, as `serenity::Error` is very large.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
