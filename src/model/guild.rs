use sea_orm::DbErr;

/// Birthday settings of one Discord guild.
///
/// A guild without a stored row behaves exactly like [`GuildSettings::unset`]:
/// no role, no announcement channel, self-service disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    /// Discord guild ID as a u64.
    pub guild_id: u64,
    /// Role granted to members on their birthday.
    pub role_id: Option<u64>,
    /// Channel birthday announcements are posted to.
    pub channel_id: Option<u64>,
    /// Whether members may set their own birthday once.
    pub allow_self_service: bool,
}

impl GuildSettings {
    /// Default settings for a guild that was never configured.
    pub fn unset(guild_id: u64) -> Self {
        Self {
            guild_id,
            role_id: None,
            channel_id: None,
            allow_self_service: false,
        }
    }

    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The database entity model to convert
    ///
    /// # Returns
    /// - `Ok(GuildSettings)` - Successfully converted model
    /// - `Err(DbErr::Custom)` - Failed to parse one of the stored IDs as u64
    pub fn from_entity(entity: entity::guild_settings::Model) -> Result<Self, DbErr> {
        let guild_id = parse_id("guild_id", &entity.guild_id)?;
        let role_id = entity
            .role_id
            .as_deref()
            .map(|id| parse_id("role_id", id))
            .transpose()?;
        let channel_id = entity
            .channel_id
            .as_deref()
            .map(|id| parse_id("channel_id", id))
            .transpose()?;

        Ok(Self {
            guild_id,
            role_id,
            channel_id,
            allow_self_service: entity.allow_self_service,
        })
    }
}

pub(crate) fn parse_id(column: &str, value: &str) -> Result<u64, DbErr> {
    value
        .parse::<u64>()
        .map_err(|e| DbErr::Custom(format!("Failed to parse {}: {}", column, e)))
}
