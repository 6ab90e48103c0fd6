use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, context::TestContext};


mod confirmation;

pub(crate) const GUILD: u64 = 10;
pub(crate) const ROLE: u64 = 555;
pub(crate) const CHANNEL: u64 = 777;
pub(crate) const COMMAND_CHANNEL: u64 = 300;
pub(crate) const MEMBER: u64 = 20;
pub(crate) const MODERATOR: u64 = 30;

/// A date in the leap year 2028, so February 29 is always available.
pub(crate) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2028, month, day).unwrap()
}

/// In-memory database with both birthday tables.
///
/// The context is returned alongside a connection handle; keep it alive for the
/// duration of the test.
pub(crate) async fn database() -> (TestContext, DatabaseConnection) {
    let test = TestBuilder::new()
        .with_birthday_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.clone().unwrap();
    (test, db)
}
