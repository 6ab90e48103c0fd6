//! Member birthday repository for database operations.
//!
//! Stores one row per (guild, member) pair. Rows are created lazily by the first
//! write and never hard-deleted: deleting a birthday clears month and day but keeps
//! the row so `added_before` survives.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::model::{MemberBirthday, MonthDay};

pub struct MemberBirthdayRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MemberBirthdayRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a member's record.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `user_id` - Discord user ID
    ///
    /// # Returns
    /// - `Ok(MemberBirthday)` - Stored record, or an unset record if none exists
    /// - `Err(DbErr)` - Database error or inconsistent stored row
    pub async fn get(&self, guild_id: u64, user_id: u64) -> Result<MemberBirthday, DbErr> {
        self.find(guild_id, user_id)
            .await?
            .map(MemberBirthday::from_entity)
            .unwrap_or_else(|| Ok(MemberBirthday::unset(guild_id, user_id)))
    }

    /// Gets every stored record of a guild, with or without a birthday set.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(Vec<MemberBirthday>)` - All records of the guild
    /// - `Err(DbErr)` - Database error or inconsistent stored row
    pub async fn get_all_by_guild(&self, guild_id: u64) -> Result<Vec<MemberBirthday>, DbErr> {
        entity::prelude::MemberBirthday::find()
            .filter(entity::member_birthday::Column::GuildId.eq(guild_id.to_string()))
            .all(self.db)
            .await?
            .into_iter()
            .map(MemberBirthday::from_entity)
            .collect()
    }

    /// Stores a birthday and marks the record as having been set.
    ///
    /// Leaves `role_assigned` untouched; the reconciliation passes own it.
    pub async fn set_birthday(
        &self,
        guild_id: u64,
        user_id: u64,
        birthday: MonthDay,
    ) -> Result<MemberBirthday, DbErr> {
        let mut record = self.get(guild_id, user_id).await?;
        record.birthday = Some(birthday);
        record.added_before = true;
        self.save(record).await
    }

    /// Clears a member's birthday after their role was removed.
    ///
    /// `added_before` is kept (and forced) true so a later re-add can warn.
    pub async fn clear_birthday(&self, guild_id: u64, user_id: u64) -> Result<MemberBirthday, DbErr> {
        let mut record = self.get(guild_id, user_id).await?;
        record.birthday = None;
        record.role_assigned = false;
        record.added_before = true;
        self.save(record).await
    }

    /// Records the outcome of a role grant or revoke.
    pub async fn set_role_assigned(
        &self,
        guild_id: u64,
        user_id: u64,
        assigned: bool,
    ) -> Result<MemberBirthday, DbErr> {
        let mut record = self.get(guild_id, user_id).await?;
        record.role_assigned = assigned;
        self.save(record).await
    }

    async fn find(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<entity::member_birthday::Model>, DbErr> {
        entity::prelude::MemberBirthday::find()
            .filter(entity::member_birthday::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::member_birthday::Column::UserId.eq(user_id.to_string()))
            .one(self.db)
            .await
    }

    async fn save(&self, record: MemberBirthday) -> Result<MemberBirthday, DbErr> {
        let month = record.birthday.map(|b| b.month() as i32);
        let day = record.birthday.map(|b| b.day() as i32);

        let entity = match self.find(record.guild_id, record.user_id).await? {
            Some(existing) => {
                let mut active: entity::member_birthday::ActiveModel = existing.into();
                active.month = ActiveValue::Set(month);
                active.day = ActiveValue::Set(day);
                active.role_assigned = ActiveValue::Set(record.role_assigned);
                active.added_before = ActiveValue::Set(record.added_before);
                active.update(self.db).await?
            }
            None => {
                entity::member_birthday::ActiveModel {
                    guild_id: ActiveValue::Set(record.guild_id.to_string()),
                    user_id: ActiveValue::Set(record.user_id.to_string()),
                    month: ActiveValue::Set(month),
                    day: ActiveValue::Set(day),
                    role_assigned: ActiveValue::Set(record.role_assigned),
                    added_before: ActiveValue::Set(record.added_before),
                    ..Default::default()
                }
                .insert(self.db)
                .await?
            }
        };

        MemberBirthday::from_entity(entity)
    }
}
