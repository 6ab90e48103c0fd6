//! Two-tier locking protocol for the record store.
//!
//! - **All guilds** ([`RecordLocks::all_guilds`]): exclusive over every member record
//!   of every guild. Held by the reconciliation passes.
//! - **Guild** ([`RecordLocks::guild`]): exclusive over the member records of one
//!   guild. Held by commands that read-modify-write a member's birthday.
//!
//! A guild guard is the shared half of the all-guilds `RwLock` plus that guild's
//! mutex, always acquired in that order. Holding the all-guilds guard therefore
//! blocks every guild guard, and a guild guard blocks the all-guilds guard while
//! leaving other guilds free. Never request the all-guilds guard while holding a
//! guild guard.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

#[derive(Default)]
pub struct RecordLocks {
    all_guilds: Arc<RwLock<()>>,
    guilds: DashMap<u64, Arc<Mutex<()>>>,
}

/// Exclusive access to all member records of all guilds.
pub struct AllGuildsGuard {
    _all_guilds: OwnedRwLockWriteGuard<()>,
}

/// Exclusive access to the member records of one guild.
pub struct GuildGuard {
    // Dropped first: released in reverse acquisition order.
    _guild: OwnedMutexGuard<()>,
    _all_guilds: OwnedRwLockReadGuard<()>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to every guild's member records.
    pub async fn all_guilds(&self) -> AllGuildsGuard {
        AllGuildsGuard {
            _all_guilds: self.all_guilds.clone().write_owned().await,
        }
    }

    /// Waits for exclusive access to one guild's member records.
    pub async fn guild(&self, guild_id: u64) -> GuildGuard {
        let all_guilds = self.all_guilds.clone().read_owned().await;
        let guild_lock = self.guilds.entry(guild_id).or_default().clone();
        let guild = guild_lock.lock_owned().await;

        GuildGuard {
            _guild: guild,
            _all_guilds: all_guilds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    const BLOCKED: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn all_guilds_blocks_guild_lock() {
        let locks = RecordLocks::new();
        let guard = locks.all_guilds().await;

        assert!(timeout(BLOCKED, locks.guild(1)).await.is_err());

        drop(guard);
        assert!(timeout(BLOCKED, locks.guild(1)).await.is_ok());
    }

    #[tokio::test]
    async fn guild_lock_blocks_all_guilds() {
        let locks = RecordLocks::new();
        let guard = locks.guild(1).await;

        assert!(timeout(BLOCKED, locks.all_guilds()).await.is_err());

        drop(guard);
        assert!(timeout(BLOCKED, locks.all_guilds()).await.is_ok());
    }

    #[tokio::test]
    async fn guild_lock_is_exclusive_per_guild() {
        let locks = RecordLocks::new();
        let _guard = locks.guild(1).await;

        assert!(timeout(BLOCKED, locks.guild(1)).await.is_err());
        assert!(timeout(BLOCKED, locks.guild(2)).await.is_ok());
    }
}
