use crate::data::guild_settings::GuildSettingsRepository;
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod get;
mod set;
