//! Factory methods for creating test data.
//!
//! Each table has a `Factory` builder for customization and a `create_*`
//! convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let settings = factory::guild_settings::GuildSettingsFactory::new(&db)
//!     .role_id(Some("555"))
//!     .build()
//!     .await?;
//!
//! let record = factory::member_birthday::MemberBirthdayFactory::new(&db, &settings.guild_id)
//!     .birthday(2, 29)
//!     .role_assigned(true)
//!     .build()
//!     .await?;
//! ```

pub mod guild_settings;
pub mod helpers;
pub mod member_birthday;

pub use guild_settings::create_guild_settings;
pub use member_birthday::create_member_birthday;
