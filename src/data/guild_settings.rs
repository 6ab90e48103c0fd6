use sea_orm::{sea_query::OnConflict, ActiveValue, DatabaseConnection, DbErr, EntityTrait};

use crate::model::GuildSettings;

/// Repository for per-guild birthday settings.
///
/// Guilds without a row read as [`GuildSettings::unset`]; the row is created by the
/// first write.
pub struct GuildSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildSettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the settings of a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(GuildSettings)` - Stored settings, or defaults if never configured
    /// - `Err(DbErr)` - Database error or unparseable stored ID
    pub async fn get(&self, guild_id: u64) -> Result<GuildSettings, DbErr> {
        entity::prelude::GuildSettings::find_by_id(guild_id.to_string())
            .one(self.db)
            .await?
            .map(GuildSettings::from_entity)
            .unwrap_or_else(|| Ok(GuildSettings::unset(guild_id)))
    }

    /// Sets the role granted to members on their birthday.
    pub async fn set_role(&self, guild_id: u64, role_id: u64) -> Result<GuildSettings, DbErr> {
        let mut settings = self.get(guild_id).await?;
        settings.role_id = Some(role_id);
        self.save(settings).await
    }

    /// Sets or clears the channel birthday announcements are posted to.
    pub async fn set_channel(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
    ) -> Result<GuildSettings, DbErr> {
        let mut settings = self.get(guild_id).await?;
        settings.channel_id = channel_id;
        self.save(settings).await
    }

    /// Enables or disables members setting their own birthday.
    pub async fn set_self_service(
        &self,
        guild_id: u64,
        allowed: bool,
    ) -> Result<GuildSettings, DbErr> {
        let mut settings = self.get(guild_id).await?;
        settings.allow_self_service = allowed;
        self.save(settings).await
    }

    async fn save(&self, settings: GuildSettings) -> Result<GuildSettings, DbErr> {
        let entity = entity::prelude::GuildSettings::insert(entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(settings.guild_id.to_string()),
            role_id: ActiveValue::Set(settings.role_id.map(|id| id.to_string())),
            channel_id: ActiveValue::Set(settings.channel_id.map(|id| id.to_string())),
            allow_self_service: ActiveValue::Set(settings.allow_self_service),
        })
        .on_conflict(
            OnConflict::column(entity::guild_settings::Column::GuildId)
                .update_columns([
                    entity::guild_settings::Column::RoleId,
                    entity::guild_settings::Column::ChannelId,
                    entity::guild_settings::Column::AllowSelfService,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        GuildSettings::from_entity(entity)
    }
}
