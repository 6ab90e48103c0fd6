use super::*;

/// Tests listing every record of a guild.
///
/// Verifies that records without a birthday are included and that records of
/// other guilds are not.
///
/// Expected: Ok with exactly the guild's records
#[tokio::test]
async fn returns_only_records_of_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member_birthday::MemberBirthdayFactory::new(db, "10")
        .birthday(1, 1)
        .build()
        .await?;
    factory::member_birthday::MemberBirthdayFactory::new(db, "10")
        .added_before(true)
        .build()
        .await?;
    factory::member_birthday::MemberBirthdayFactory::new(db, "20")
        .birthday(3, 3)
        .build()
        .await?;

    let repo = MemberBirthdayRepository::new(db);
    let records = repo.get_all_by_guild(10).await?;

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|record| record.guild_id == 10));
    assert_eq!(
        records.iter().filter(|record| record.birthday.is_some()).count(),
        1
    );

    Ok(())
}

/// Tests listing a guild with no records.
///
/// Expected: Ok with an empty list
#[tokio::test]
async fn returns_empty_for_unknown_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MemberBirthdayRepository::new(db);
    let records = repo.get_all_by_guild(99).await?;

    assert!(records.is_empty());

    Ok(())
}
