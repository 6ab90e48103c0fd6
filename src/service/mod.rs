//! Service layer for birthday business logic and orchestration.
//!
//! Sits between the bot adapter and the data layer:
//!
//! - **directory**: the seam to Discord (guilds, members, roles, messages)
//! - **reconcile**: the sweep and add passes keeping birthday roles in sync
//! - **confirmation**: the interactive yes/no dialogue for self-service dates
//! - **birthday**: the operations behind each command, returning reply text

pub mod birthday;
pub mod confirmation;
pub mod directory;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod test;
