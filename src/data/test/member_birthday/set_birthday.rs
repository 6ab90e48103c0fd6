use super::*;

/// Tests storing a birthday for a new member.
///
/// Expected: Ok with a single row, added_before set and role not assigned
#[tokio::test]
async fn creates_record() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MemberBirthdayRepository::new(db);
    let record = repo
        .set_birthday(10, 20, MonthDay::new(8, 31).unwrap())
        .await?;

    assert_eq!(record.birthday, MonthDay::new(8, 31));
    assert!(record.added_before);
    assert!(!record.role_assigned);

    let rows = entity::prelude::MemberBirthday::find()
        .filter(entity::member_birthday::Column::GuildId.eq("10"))
        .filter(entity::member_birthday::Column::UserId.eq("20"))
        .all(db)
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].month, Some(8));
    assert_eq!(rows[0].day, Some(31));

    Ok(())
}

/// Tests overwriting an existing birthday.
///
/// Verifies that updating does not create a second row and leaves the role
/// assignment flag alone.
///
/// Expected: Ok with new date and role_assigned unchanged
#[tokio::test]
async fn updates_existing_record_in_place() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::member_birthday::MemberBirthdayFactory::new(db, "10")
        .birthday(1, 15)
        .role_assigned(true)
        .build()
        .await?;
    let user_id: u64 = stored.user_id.parse().unwrap();

    let repo = MemberBirthdayRepository::new(db);
    let record = repo
        .set_birthday(10, user_id, MonthDay::new(12, 24).unwrap())
        .await?;

    assert_eq!(record.birthday, MonthDay::new(12, 24));
    assert!(record.role_assigned);

    let count = entity::prelude::MemberBirthday::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}
