//! Member birthday factory for creating test birthday rows.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test member birthday rows with customizable fields.
///
/// Defaults to a fresh user ID with no birthday set, role not assigned and
/// never added before.
pub struct MemberBirthdayFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    month: Option<i32>,
    day: Option<i32>,
    role_assigned: bool,
    added_before: bool,
}

impl<'a> MemberBirthdayFactory<'a> {
    /// Creates a new MemberBirthdayFactory for a guild.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Discord guild ID the record belongs to
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            user_id: next_id().to_string(),
            month: None,
            day: None,
            role_assigned: false,
            added_before: false,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets month and day, and marks the record as added before.
    pub fn birthday(mut self, month: i32, day: i32) -> Self {
        self.month = Some(month);
        self.day = Some(day);
        self.added_before = true;
        self
    }

    pub fn role_assigned(mut self, assigned: bool) -> Self {
        self.role_assigned = assigned;
        self
    }

    pub fn added_before(mut self, added_before: bool) -> Self {
        self.added_before = added_before;
        self
    }

    /// Builds and inserts the record into the database.
    ///
    /// # Returns
    /// - `Ok(entity::member_birthday::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::member_birthday::Model, DbErr> {
        entity::member_birthday::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            month: ActiveValue::Set(self.month),
            day: ActiveValue::Set(self.day),
            role_assigned: ActiveValue::Set(self.role_assigned),
            added_before: ActiveValue::Set(self.added_before),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a member record with default values in the given guild.
pub async fn create_member_birthday(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<entity::member_birthday::Model, DbErr> {
    MemberBirthdayFactory::new(db, guild_id).build().await
}
