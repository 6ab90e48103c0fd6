//! Record store: repositories and the locking protocol guarding them.
//!
//! Repositories handle database operations for guild settings and member birthday
//! records. They use SeaORM entity models internally and return domain models from
//! [`crate::model`]. Repositories do not lock anything themselves; callers that
//! read-modify-write records hold a guard from [`RecordLocks`] for the duration.

pub mod guild_settings;
pub mod lock;
pub mod member_birthday;

pub use guild_settings::GuildSettingsRepository;
pub use lock::RecordLocks;
pub use member_birthday::MemberBirthdayRepository;

#[cfg(test)]
mod test;
