use super::*;

/// Tests recording a successful grant.
///
/// Expected: Ok with role_assigned set and birthday untouched
#[tokio::test]
async fn marks_role_assigned() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_birthday_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = factory::member_birthday::MemberBirthdayFactory::new(db, "10")
        .birthday(4, 30)
        .build()
        .await?;
    let user_id: u64 = stored.user_id.parse().unwrap();

    let repo = MemberBirthdayRepository::new(db);
    let record = repo.set_role_assigned(10, user_id, true).await?;

    assert!(record.role_assigned);
    assert_eq!(record.birthday, MonthDay::new(4, 30));

    let record = repo.set_role_assigned(10, user_id, false).await?;
    assert!(!record.role_assigned);

    Ok(())
}
