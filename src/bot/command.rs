//! Prefix command parsing.
//!
//! Turns `!birthday <subcommand> [args]` into a [`BirthdayCommand`]. Only the shape of
//! the command is checked here; dates are parsed by the handler so the parser's
//! error text reaches the user.

use crate::util::parse::parse_snowflake;

/// A recognised `birthday` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthdayCommand {
    /// `channel [#channel]`; no channel disables announcements.
    SetChannel(Option<u64>),
    /// `role <@&role>`
    SetRole(u64),
    /// `test`
    Test,
    /// `add <@member> [date]`
    Add { member_id: u64, date: Option<String> },
    /// `list`
    List,
    /// `unassign <@member>`
    Unassign(u64),
    /// `delete <@member>`
    Delete(u64),
    /// `selfbirthday`
    ToggleSelfService,
    /// `self get`
    GetOwn,
    /// `self set <date>`
    SetOwn(String),
    /// Malformed arguments; carries the expected usage.
    Usage(&'static str),
}

impl BirthdayCommand {
    /// Whether only administrators and role managers may run this command.
    pub fn requires_moderator(&self) -> bool {
        !matches!(
            self,
            BirthdayCommand::GetOwn | BirthdayCommand::SetOwn(_) | BirthdayCommand::Usage(_)
        )
    }
}

pub const HELP: &str = "**Birthday commands**\n\
    `birthday channel [#channel]` - set or clear the announcement channel\n\
    `birthday role <@role>` - set the birthday role\n\
    `birthday add <@member> [date]` - store a member's birthday (default today)\n\
    `birthday list` - list stored birthdays\n\
    `birthday unassign <@member>` - remove the birthday role from a member\n\
    `birthday delete <@member>` - remove the role and forget the birthday\n\
    `birthday selfbirthday` - allow or disallow members setting their own birthday\n\
    `birthday test` - preview every announcement\n\
    `birthday self get` - show your birthday\n\
    `birthday self set <date>` - set your birthday once";

/// Parses a message into a birthday command.
///
/// # Arguments
/// - `prefix` - Command prefix, e.g. `!`
/// - `content` - Raw message text
///
/// # Returns
/// - `Some(BirthdayCommand)` - Message is a birthday command (possibly malformed)
/// - `None` - Message is not addressed to the birthday commands
pub fn parse_command(prefix: &str, content: &str) -> Option<BirthdayCommand> {
    let rest = content.trim().strip_prefix(prefix)?;
    let (group, rest) = split_word(rest);
    if !group.eq_ignore_ascii_case("birthday") {
        return None;
    }

    let (subcommand, args) = split_word(rest);
    let command = match subcommand.to_lowercase().as_str() {
        "channel" | "ch" => match args {
            "" => BirthdayCommand::SetChannel(None),
            channel => parse_snowflake(channel)
                .map(|id| BirthdayCommand::SetChannel(Some(id)))
                .unwrap_or(BirthdayCommand::Usage("birthday channel [#channel]")),
        },
        "role" => parse_snowflake(args)
            .map(BirthdayCommand::SetRole)
            .unwrap_or(BirthdayCommand::Usage("birthday role <@role>")),
        "test" => BirthdayCommand::Test,
        "add" | "set" => {
            let (member, date) = split_word(args);
            match parse_snowflake(member) {
                Some(member_id) => BirthdayCommand::Add {
                    member_id,
                    date: (!date.is_empty()).then(|| date.to_string()),
                },
                None => BirthdayCommand::Usage("birthday add <@member> [date]"),
            }
        }
        "list" | "ls" => BirthdayCommand::List,
        "unassign" => parse_snowflake(args)
            .map(BirthdayCommand::Unassign)
            .unwrap_or(BirthdayCommand::Usage("birthday unassign <@member>")),
        "delete" | "del" | "remove" | "rm" => parse_snowflake(args)
            .map(BirthdayCommand::Delete)
            .unwrap_or(BirthdayCommand::Usage("birthday delete <@member>")),
        "selfbirthday" => BirthdayCommand::ToggleSelfService,
        "self" | "me" => {
            let (action, date) = split_word(args);
            match action.to_lowercase().as_str() {
                "get" | "display" | "show" => BirthdayCommand::GetOwn,
                "set" | "add" if !date.is_empty() => BirthdayCommand::SetOwn(date.to_string()),
                _ => BirthdayCommand::Usage("birthday self get | birthday self set <date>"),
            }
        }
        _ => BirthdayCommand::Usage(HELP),
    };

    Some(command)
}

/// Splits off the first whitespace-separated word.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}
