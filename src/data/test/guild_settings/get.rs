use super::*;

/// Tests reading settings of a guild that was never configured.
///
/// Expected: Ok with no role, no channel and self-service disabled
#[tokio::test]
async fn returns_defaults_for_unknown_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    let settings = repo.get(123456789).await?;

    assert_eq!(settings.guild_id, 123456789);
    assert_eq!(settings.role_id, None);
    assert_eq!(settings.channel_id, None);
    assert!(!settings.allow_self_service);

    // Reading must not create a row
    let count = entity::prelude::GuildSettings::find().count(db).await?;
    assert_eq!(count, 0);

    Ok(())
}

/// Tests reading stored settings.
///
/// Expected: Ok with stored IDs parsed as u64
#[tokio::test]
async fn returns_stored_settings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::guild_settings::GuildSettingsFactory::new(db)
        .role_id(Some("555"))
        .channel_id(Some("777"))
        .allow_self_service(true)
        .build()
        .await?;

    let repo = GuildSettingsRepository::new(db);
    let settings = repo.get(stored.guild_id.parse().unwrap()).await?;

    assert_eq!(settings.role_id, Some(555));
    assert_eq!(settings.channel_id, Some(777));
    assert!(settings.allow_self_service);

    Ok(())
}

/// Tests reading a row whose stored role ID is not a snowflake.
///
/// Expected: Err(DbErr::Custom)
#[tokio::test]
async fn fails_for_corrupt_role_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::guild_settings::GuildSettingsFactory::new(db)
        .role_id(Some("not-a-number"))
        .build()
        .await?;

    let repo = GuildSettingsRepository::new(db);
    let result = repo.get(stored.guild_id.parse().unwrap()).await;

    assert!(matches!(result, Err(DbErr::Custom(_))));

    Ok(())
}
