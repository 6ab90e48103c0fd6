pub use super::guild_settings::Entity as GuildSettings;
pub use super::member_birthday::Entity as MemberBirthday;
