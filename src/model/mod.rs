//! Domain models shared by the data, service and bot layers.
//!
//! Repositories convert SeaORM entity models into these types at their boundary,
//! parsing string snowflakes into `u64` and stored month/day columns into
//! [`MonthDay`](birthday::MonthDay).

pub mod birthday;
pub mod guild;
pub mod member;

pub use birthday::MonthDay;
pub use guild::GuildSettings;
pub use member::MemberBirthday;
