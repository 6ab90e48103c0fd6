use super::*;

/// Tests reading a member that has no stored row.
///
/// Expected: Ok with an unset record
#[tokio::test]
async fn returns_unset_record_for_unknown_member() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MemberBirthdayRepository::new(db);
    let record = repo.get(1, 2).await?;

    assert_eq!(record.guild_id, 1);
    assert_eq!(record.user_id, 2);
    assert_eq!(record.birthday, None);
    assert!(!record.role_assigned);
    assert!(!record.added_before);

    Ok(())
}

/// Tests reading a stored birthday.
///
/// Expected: Ok with month and day converted to a MonthDay
#[tokio::test]
async fn returns_stored_birthday() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::member_birthday::MemberBirthdayFactory::new(db, "10")
        .birthday(2, 29)
        .role_assigned(true)
        .build()
        .await?;

    let repo = MemberBirthdayRepository::new(db);
    let record = repo.get(10, stored.user_id.parse().unwrap()).await?;

    assert_eq!(record.birthday, MonthDay::new(2, 29));
    assert!(record.role_assigned);
    assert!(record.added_before);

    Ok(())
}

/// Tests that records are scoped to their guild.
///
/// Expected: Ok with an unset record when reading the same user in another guild
#[tokio::test]
async fn is_scoped_per_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::member_birthday::MemberBirthdayFactory::new(db, "10")
        .birthday(5, 1)
        .build()
        .await?;

    let repo = MemberBirthdayRepository::new(db);
    let record = repo.get(11, stored.user_id.parse().unwrap()).await?;

    assert_eq!(record.birthday, None);
    assert!(!record.added_before);

    Ok(())
}

/// Tests reading a row with only the month set.
///
/// Expected: Err(DbErr::Custom)
#[tokio::test]
async fn fails_for_half_set_birthday() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::member_birthday::create_member_birthday(db, "10").await?;
    let mut active: entity::member_birthday::ActiveModel = stored.clone().into();
    active.month = sea_orm::ActiveValue::Set(Some(4));
    sea_orm::ActiveModelTrait::update(active, db).await?;

    let repo = MemberBirthdayRepository::new(db);
    let result = repo.get(10, stored.user_id.parse().unwrap()).await;

    assert!(matches!(result, Err(DbErr::Custom(_))));

    Ok(())
}
