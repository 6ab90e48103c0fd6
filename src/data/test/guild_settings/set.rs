use super::*;

/// Tests that the first write creates the settings row.
///
/// Expected: Ok with role stored and other fields at their defaults
#[tokio::test]
async fn set_role_creates_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    let settings = repo.set_role(42, 555).await?;

    assert_eq!(settings.role_id, Some(555));
    assert_eq!(settings.channel_id, None);
    assert!(!settings.allow_self_service);

    let row = entity::prelude::GuildSettings::find_by_id("42".to_string())
        .one(db)
        .await?
        .unwrap();
    assert_eq!(row.role_id.as_deref(), Some("555"));

    Ok(())
}

/// Tests that each setter only changes its own field.
///
/// Expected: Ok with previously stored fields preserved and a single row
#[tokio::test]
async fn setters_preserve_other_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    repo.set_role(42, 555).await?;
    repo.set_channel(42, Some(777)).await?;
    let settings = repo.set_self_service(42, true).await?;

    assert_eq!(settings.role_id, Some(555));
    assert_eq!(settings.channel_id, Some(777));
    assert!(settings.allow_self_service);

    let count = entity::prelude::GuildSettings::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests replacing the configured role.
///
/// Expected: Ok with the new role ID
#[tokio::test]
async fn set_role_overwrites_previous_role() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::guild_settings::GuildSettingsFactory::new(db)
        .role_id(Some("555"))
        .build()
        .await?;
    let guild_id = stored.guild_id.parse().unwrap();

    let repo = GuildSettingsRepository::new(db);
    repo.set_role(guild_id, 666).await?;

    assert_eq!(repo.get(guild_id).await?.role_id, Some(666));

    Ok(())
}

/// Tests clearing the announcement channel.
///
/// Expected: Ok with channel unset
#[tokio::test]
async fn set_channel_none_clears_channel() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::guild_settings::GuildSettingsFactory::new(db)
        .channel_id(Some("777"))
        .build()
        .await?;
    let guild_id = stored.guild_id.parse().unwrap();

    let repo = GuildSettingsRepository::new(db);
    let settings = repo.set_channel(guild_id, None).await?;

    assert_eq!(settings.channel_id, None);
    assert_eq!(repo.get(guild_id).await?.channel_id, None);

    Ok(())
}
