mod guild_settings;
mod member_birthday;
