use thiserror::Error;

/// Rejection reasons for free-form birthday input.
///
/// These are user input errors. They are shown back to the invoking member and
/// never logged as internal failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParseError {
    /// The text is not a calendar date, or names a date that does not exist.
    #[error("Invalid date!")]
    InvalidFormat,

    /// The text carries a non-zero time of day.
    #[error("Time information should not be supplied!")]
    TimeComponentPresent,
}
