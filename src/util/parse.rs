//! Parsing of free-form user input.
//!
//! [`parse_month_day`] turns birthday text such as `"Feb 29"`, `"february 29th"`,
//! `"2/29"` or `"29.02.1990"` into a [`MonthDay`]. Any year in the text is ignored:
//! the result is always anchored to the leap reference year. Text carrying a
//! non-zero time of day is rejected rather than truncated.
//!
//! [`parse_snowflake`] reads Discord IDs from raw digits or mentions.

use chrono::{Month, Weekday};
use std::str::FromStr;

use crate::{error::date::DateParseError, model::MonthDay};

/// Words that may appear in a date without changing its meaning.
const FILLER_WORDS: [&str; 4] = ["of", "the", "on", "at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number { value: u32, digits: usize, ordinal: bool },
    Month(u32),
    Meridiem { pm: bool },
    /// `hour` is 24-hour once `meridiem` is applied; `minor` is set for a non-zero
    /// minute, second or fraction.
    Time { hour: u32, minor: bool, meridiem: bool },
}

impl Token {
    fn is_non_zero_time(&self) -> bool {
        matches!(*self, Token::Time { hour, minor, .. } if hour != 0 || minor)
    }
}

/// Parses a month and day out of free-form text.
///
/// Accepts numeric `month day` pairs in either order when only one order forms a
/// date (`2/29` and `29/2` are both February 29; `3/4` is read month first),
/// and month names or abbreviations with a day in any position, case-insensitive.
/// Ordinal suffixes, weekday names, commas and a year are tolerated.
///
/// # Returns
/// - `Ok(MonthDay)` - The parsed month and day
/// - `Err(DateParseError::InvalidFormat)` - Not a date, or a date that does not exist
/// - `Err(DateParseError::TimeComponentPresent)` - A valid date with a non-zero time
pub fn parse_month_day(input: &str) -> Result<MonthDay, DateParseError> {
    let lowered = input.trim().to_lowercase();

    let mut tokens = Vec::new();
    for word in lowered
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
    {
        lex_word(word, &mut tokens)?;
    }

    let tokens = attach_meridiems(tokens)?;
    let birthday = resolve_date(&tokens)?;

    if tokens
        .iter()
        .any(Token::is_non_zero_time)
    {
        return Err(DateParseError::TimeComponentPresent);
    }

    Ok(birthday)
}

fn lex_word(word: &str, tokens: &mut Vec<Token>) -> Result<(), DateParseError> {
    if let Some((date, time)) = split_iso_datetime(word) {
        lex_date_part(date, tokens)?;
        tokens.push(lex_time(time)?);
        return Ok(());
    }

    if word.contains(':') {
        tokens.push(lex_time(word)?);
        return Ok(());
    }

    lex_date_part(word, tokens)
}

/// Splits `2020-02-29t10:00:00` at the `t` separating date and time.
fn split_iso_datetime(word: &str) -> Option<(&str, &str)> {
    let index = word.find('t')?;
    let (date, time) = (&word[..index], &word[index + 1..]);

    let digit_before = date.chars().last().is_some_and(|c| c.is_ascii_digit());
    let digit_after = time.chars().next().is_some_and(|c| c.is_ascii_digit());

    (digit_before && digit_after && time.contains(':')).then_some((date, time))
}

fn lex_date_part(part: &str, tokens: &mut Vec<Token>) -> Result<(), DateParseError> {
    for piece in part
        .split(['/', '-', '.'])
        .filter(|piece| !piece.is_empty())
    {
        if let Some(token) = lex_piece(piece)? {
            tokens.push(token);
        }
    }

    Ok(())
}

fn lex_piece(piece: &str) -> Result<Option<Token>, DateParseError> {
    let digits_end = piece
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(piece.len());
    let (digits, suffix) = piece.split_at(digits_end);

    if !digits.is_empty() {
        let value = digits
            .parse::<u32>()
            .map_err(|_| DateParseError::InvalidFormat)?;

        return match suffix {
            "" => Ok(Some(Token::Number {
                value,
                digits: digits.len(),
                ordinal: false,
            })),
            "st" | "nd" | "rd" | "th" => Ok(Some(Token::Number {
                value,
                digits: digits.len(),
                ordinal: true,
            })),
            "am" | "pm" => Ok(Some(Token::Time {
                hour: to_24_hour(value, suffix == "pm")?,
                minor: false,
                meridiem: true,
            })),
            _ => Err(DateParseError::InvalidFormat),
        };
    }

    match piece {
        "am" => Ok(Some(Token::Meridiem { pm: false })),
        "pm" => Ok(Some(Token::Meridiem { pm: true })),
        "sept" => Ok(Some(Token::Month(9))),
        word if FILLER_WORDS.contains(&word) => Ok(None),
        word => {
            if let Ok(month) = Month::from_str(word) {
                Ok(Some(Token::Month(month.number_from_month())))
            } else if Weekday::from_str(word).is_ok() {
                Ok(None)
            } else {
                Err(DateParseError::InvalidFormat)
            }
        }
    }
}

/// Lexes `hh:mm`, `hh:mm:ss`, `hh:mm:ss.ffffff`, optionally followed by `am`/`pm`
/// or a trailing `z`.
fn lex_time(text: &str) -> Result<Token, DateParseError> {
    let text = text.strip_suffix('z').unwrap_or(text);
    let (clock, meridiem) = if let Some(clock) = text.strip_suffix("am") {
        (clock, Some(false))
    } else if let Some(clock) = text.strip_suffix("pm") {
        (clock, Some(true))
    } else {
        (text, None)
    };

    let mut fields = clock.split(':');
    let hour = parse_clock_field(fields.next())?;
    let minute = parse_clock_field(fields.next())?;

    let (second, fraction) = match fields.next() {
        Some(seconds) => {
            let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
            if !fraction.chars().all(|c| c.is_ascii_digit()) {
                return Err(DateParseError::InvalidFormat);
            }
            (
                parse_clock_field(Some(whole))?,
                fraction.chars().any(|c| c != '0'),
            )
        }
        None => (0, false),
    };

    if fields.next().is_some() || minute > 59 || second > 59 {
        return Err(DateParseError::InvalidFormat);
    }

    let hour = match meridiem {
        Some(pm) => to_24_hour(hour, pm)?,
        None if hour > 23 => return Err(DateParseError::InvalidFormat),
        None => hour,
    };

    Ok(Token::Time {
        hour,
        minor: minute != 0 || second != 0 || fraction,
        meridiem: meridiem.is_some(),
    })
}

fn parse_clock_field(field: Option<&str>) -> Result<u32, DateParseError> {
    match field {
        Some(field) if !field.is_empty() && field.len() <= 2 => field
            .parse::<u32>()
            .map_err(|_| DateParseError::InvalidFormat),
        _ => Err(DateParseError::InvalidFormat),
    }
}

fn to_24_hour(hour: u32, pm: bool) -> Result<u32, DateParseError> {
    match (hour, pm) {
        (12, false) => Ok(0),
        (12, true) => Ok(12),
        (1..=11, false) => Ok(hour),
        (1..=11, true) => Ok(hour + 12),
        _ => Err(DateParseError::InvalidFormat),
    }
}

/// Folds a standalone `am`/`pm` into the token before it: a bare number becomes an
/// hour, and a clock time without its own meridiem is read as 12-hour.
fn attach_meridiems(tokens: Vec<Token>) -> Result<Vec<Token>, DateParseError> {
    let mut folded: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            Token::Meridiem { pm } => match folded.pop() {
                Some(Token::Number {
                    value,
                    ordinal: false,
                    ..
                }) => folded.push(Token::Time {
                    hour: to_24_hour(value, pm)?,
                    minor: false,
                    meridiem: true,
                }),
                Some(Token::Time {
                    hour,
                    minor,
                    meridiem: false,
                }) => folded.push(Token::Time {
                    hour: to_24_hour(hour, pm)?,
                    minor,
                    meridiem: true,
                }),
                _ => return Err(DateParseError::InvalidFormat),
            },
            token => folded.push(token),
        }
    }

    Ok(folded)
}

fn resolve_date(tokens: &[Token]) -> Result<MonthDay, DateParseError> {
    let mut months = Vec::new();
    let mut years = 0;
    let mut numbers = Vec::new();

    for token in tokens {
        match *token {
            Token::Month(month) => months.push(month),
            Token::Number { value, digits, .. } if digits >= 3 || value > 31 => years += 1,
            Token::Number { value, ordinal, .. } => numbers.push((value, ordinal)),
            Token::Time { .. } | Token::Meridiem { .. } => {}
        }
    }

    if months.len() > 1 || years > 1 {
        return Err(DateParseError::InvalidFormat);
    }

    let (month, day) = match (months.first(), numbers.as_slice()) {
        (Some(&month), [(day, _)]) => (month, *day),
        // "29 feb 20": the trailing short number is a two-digit year.
        (Some(&month), [(day, _), _]) if years == 0 => (month, *day),
        (None, [first, second]) => order_numeric(*first, *second)?,
        (None, [first, second, _]) if years == 0 => order_numeric(*first, *second)?,
        _ => return Err(DateParseError::InvalidFormat),
    };

    MonthDay::new(month, day).ok_or(DateParseError::InvalidFormat)
}

/// Picks month and day out of two bare numbers, month first when both orders work.
fn order_numeric(
    (first, first_ordinal): (u32, bool),
    (second, second_ordinal): (u32, bool),
) -> Result<(u32, u32), DateParseError> {
    if first <= 12 && !first_ordinal {
        Ok((first, second))
    } else if second <= 12 && !second_ordinal {
        Ok((second, first))
    } else {
        Err(DateParseError::InvalidFormat)
    }
}

/// Reads a Discord ID from raw digits or from a user, role or channel mention
/// (`<@123>`, `<@!123>`, `<@&123>`, `<#123>`).
pub fn parse_snowflake(text: &str) -> Option<u64> {
    let text = text.trim();
    let inner = match text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        Some(mention) => mention
            .strip_prefix("@!")
            .or_else(|| mention.strip_prefix("@&"))
            .or_else(|| mention.strip_prefix('@'))
            .or_else(|| mention.strip_prefix('#'))?,
        None => text,
    };

    inner.parse::<u64>().ok().filter(|id| *id != 0)
}
