use sea_orm::entity::prelude::*;

/// Stored birthday of a single guild member.
///
/// `month` and `day` are either both set or both null.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "member_birthday")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: String,
    pub user_id: String,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub role_assigned: bool,
    pub added_before: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
