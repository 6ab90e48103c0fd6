//! SeaORM entity models for the birthday record store.

pub mod prelude;

pub mod guild_settings;
pub mod member_birthday;
