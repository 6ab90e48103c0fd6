use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MemberBirthday::Table)
                    .if_not_exists()
                    .col(pk_auto(MemberBirthday::Id))
                    .col(string(MemberBirthday::GuildId))
                    .col(string(MemberBirthday::UserId))
                    .col(integer_null(MemberBirthday::Month))
                    .col(integer_null(MemberBirthday::Day))
                    .col(boolean(MemberBirthday::RoleAssigned).default(false))
                    .col(boolean(MemberBirthday::AddedBefore).default(false))
                    .index(
                        Index::create()
                            .unique()
                            .name("idx_member_birthday_guild_user_unique")
                            .col(MemberBirthday::GuildId)
                            .col(MemberBirthday::UserId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MemberBirthday::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MemberBirthday {
    Table,
    Id,
    GuildId,
    UserId,
    Month,
    Day,
    RoleAssigned,
    AddedBefore,
}
