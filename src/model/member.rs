use sea_orm::DbErr;

use super::{birthday::MonthDay, guild::parse_id};

/// Birthday record of one member in one guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBirthday {
    /// Discord guild ID as a u64.
    pub guild_id: u64,
    /// Discord user ID as a u64.
    pub user_id: u64,
    /// Stored month and day, if set.
    pub birthday: Option<MonthDay>,
    /// Last known outcome of granting/revoking the birthday role.
    pub role_assigned: bool,
    /// Set once a birthday has ever been stored; survives deletion.
    pub added_before: bool,
}

impl MemberBirthday {
    /// Record of a member that has never been touched.
    pub fn unset(guild_id: u64, user_id: u64) -> Self {
        Self {
            guild_id,
            user_id,
            birthday: None,
            role_assigned: false,
            added_before: false,
        }
    }

    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The database entity model to convert
    ///
    /// # Returns
    /// - `Ok(MemberBirthday)` - Successfully converted model
    /// - `Err(DbErr::Custom)` - Unparseable ID, only one of month/day set, or a
    ///   month/day pair that is not a calendar date
    pub fn from_entity(entity: entity::member_birthday::Model) -> Result<Self, DbErr> {
        let guild_id = parse_id("guild_id", &entity.guild_id)?;
        let user_id = parse_id("user_id", &entity.user_id)?;

        let birthday = match (entity.month, entity.day) {
            (Some(month), Some(day)) => {
                let birthday = u32::try_from(month)
                    .ok()
                    .zip(u32::try_from(day).ok())
                    .and_then(|(month, day)| MonthDay::new(month, day))
                    .ok_or_else(|| {
                        DbErr::Custom(format!("Invalid stored birthday {}/{}", month, day))
                    })?;
                Some(birthday)
            }
            (None, None) => None,
            _ => {
                return Err(DbErr::Custom(format!(
                    "Birthday of user {} in guild {} has only one of month/day set",
                    user_id, guild_id
                )))
            }
        };

        Ok(Self {
            guild_id,
            user_id,
            birthday,
            role_assigned: entity.role_assigned,
            added_before: entity.added_before,
        })
    }
}
