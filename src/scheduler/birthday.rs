use chrono::{Days, Local, NaiveDate};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::{
    data::RecordLocks,
    error::AppError,
    service::{
        directory::Directory,
        reconcile::{CycleSummary, ReconciliationEngine},
    },
};

/// Cron expression for the day-boundary check: second 0 of every minute.
const CHECK_SCHEDULE: &str = "0 * * * * *";

/// Receives the live directory once the bot is connected.
pub type DirectoryReceiver = watch::Receiver<Option<Arc<dyn Directory>>>;

/// Source of the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The host clock's local calendar day.
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Runs a reconciliation cycle whenever the local calendar day changes.
///
/// Idle until the bot signals readiness, then reconciles once immediately and
/// afterwards checks the day every minute. [`BirthdayScheduler::trigger_check`]
/// runs a cycle on demand; both paths share the engine's single-flight guard.
pub struct BirthdayScheduler {
    engine: ReconciliationEngine,
    clock: Arc<dyn Clock>,
    last_checked: Mutex<Option<NaiveDate>>,
    cancel: CancellationToken,
    jobs: Mutex<Option<JobScheduler>>,
}

impl BirthdayScheduler {
    pub fn new(db: DatabaseConnection, locks: Arc<RecordLocks>, clock: Arc<dyn Clock>) -> Self {
        let cancel = CancellationToken::new();

        Self {
            engine: ReconciliationEngine::new(db, locks, cancel.clone()),
            clock,
            last_checked: Mutex::new(None),
            cancel,
            jobs: Mutex::new(None),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Waits for the directory, reconciles once and starts the minute job.
    ///
    /// Returns as soon as the job is registered, or without doing anything if
    /// [`Self::stop`] is called first.
    ///
    /// # Arguments
    /// - `ready` - Filled by the ready event handler with the live directory
    ///
    /// # Returns
    /// - `Ok(())` - Scheduler started or stopped before readiness
    /// - `Err(AppError::SchedulerErr)` - Cron job could not be created or started
    pub async fn start(self: Arc<Self>, mut ready: DirectoryReceiver) -> Result<(), AppError> {
        tracing::info!("Waiting for bot to be ready");

        let directory = tokio::select! {
            _ = self.cancel.cancelled() => return Ok(()),
            directory = ready.wait_for(Option::is_some) => match directory {
                Ok(directory) => directory.clone(),
                Err(_) => {
                    tracing::warn!("Bot shut down before becoming ready");
                    return Ok(());
                }
            },
        };
        let Some(directory) = directory else {
            return Ok(());
        };

        tracing::info!("Bot is ready");

        // Restarts must not wait for the next day boundary.
        let yesterday = self.today().checked_sub_days(Days::new(1));
        *self.last_checked.lock().await = yesterday;
        self.tick(directory.as_ref()).await;

        let scheduler = JobScheduler::new().await?;

        let job_self = self.clone();
        let job_ready = ready.clone();
        let job = Job::new_async(CHECK_SCHEDULE, move |_uuid, _lock| {
            let this = job_self.clone();
            let directory = job_ready.borrow().clone();

            Box::pin(async move {
                if let Some(directory) = directory {
                    this.tick(directory.as_ref()).await;
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;
        *self.jobs.lock().await = Some(scheduler);

        tracing::info!("Birthday scheduler started");

        Ok(())
    }

    /// Runs a cycle if the calendar day changed since the last check.
    ///
    /// # Returns
    /// - `Some(CycleSummary)` - Day changed and a cycle ran
    /// - `None` - Same day, or the scheduler is stopping
    pub async fn tick(&self, directory: &dyn Directory) -> Option<CycleSummary> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let today = self.today();
        {
            let mut last_checked = self.last_checked.lock().await;
            if *last_checked == Some(today) {
                return None;
            }
            tracing::debug!("Day changed from {:?} to {}", *last_checked, today);
            *last_checked = Some(today);
        }

        Some(self.engine.run_cycle(directory, today).await)
    }

    /// Runs a cycle now, regardless of the last check.
    ///
    /// Used after a birthday is stored so a same-day birthday is celebrated at once.
    pub async fn trigger_check(&self, directory: &dyn Directory) -> CycleSummary {
        self.engine.run_cycle(directory, self.today()).await
    }

    /// Stops the scheduler.
    ///
    /// A cycle in progress finishes the guild it is on and skips the rest.
    pub async fn stop(&self) -> Result<(), AppError> {
        self.cancel.cancel();

        if let Some(mut scheduler) = self.jobs.lock().await.take() {
            scheduler.shutdown().await?;
        }

        tracing::info!("Birthday scheduler stopped");

        Ok(())
    }
}
