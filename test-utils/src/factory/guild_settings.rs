//! Guild settings factory for creating test settings rows.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test guild settings with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let settings = GuildSettingsFactory::new(&db)
///     .guild_id("987654321")
///     .role_id(Some("555"))
///     .allow_self_service(true)
///     .build()
///     .await?;
/// ```
pub struct GuildSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    role_id: Option<String>,
    channel_id: Option<String>,
    allow_self_service: bool,
}

impl<'a> GuildSettingsFactory<'a> {
    /// Creates a new GuildSettingsFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: auto-incremented
    /// - role_id, channel_id: `None`
    /// - allow_self_service: `false`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
            role_id: None,
            channel_id: None,
            allow_self_service: false,
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn role_id(mut self, role_id: Option<impl Into<String>>) -> Self {
        self.role_id = role_id.map(Into::into);
        self
    }

    pub fn channel_id(mut self, channel_id: Option<impl Into<String>>) -> Self {
        self.channel_id = channel_id.map(Into::into);
        self
    }

    pub fn allow_self_service(mut self, allowed: bool) -> Self {
        self.allow_self_service = allowed;
        self
    }

    /// Builds and inserts the settings row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_settings::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_settings::Model, DbErr> {
        entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            role_id: ActiveValue::Set(self.role_id),
            channel_id: ActiveValue::Set(self.channel_id),
            allow_self_service: ActiveValue::Set(self.allow_self_service),
        }
        .insert(self.db)
        .await
    }
}

/// Creates guild settings with default values.
///
/// Shorthand for `GuildSettingsFactory::new(db).build().await`.
pub async fn create_guild_settings(
    db: &DatabaseConnection,
) -> Result<entity::guild_settings::Model, DbErr> {
    GuildSettingsFactory::new(db).build().await
}
