use super::*;

/// Tests clearing a stored birthday.
///
/// Expected: Ok with birthday and role flag cleared while added_before stays set
#[tokio::test]
async fn clears_birthday_and_keeps_history() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::member_birthday::MemberBirthdayFactory::new(db, "10")
        .birthday(6, 6)
        .role_assigned(true)
        .build()
        .await?;
    let user_id: u64 = stored.user_id.parse().unwrap();

    let repo = MemberBirthdayRepository::new(db);
    let record = repo.clear_birthday(10, user_id).await?;

    assert_eq!(record.birthday, None);
    assert!(!record.role_assigned);
    assert!(record.added_before);

    // Row is kept, not deleted
    let row = entity::prelude::MemberBirthday::find()
        .filter(entity::member_birthday::Column::UserId.eq(&stored.user_id))
        .one(db)
        .await?
        .unwrap();
    assert_eq!(row.month, None);
    assert_eq!(row.day, None);
    assert!(row.added_before);

    Ok(())
}
