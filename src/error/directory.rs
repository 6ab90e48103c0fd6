use serenity::http::HttpError;
use thiserror::Error;

/// Outcome of a rejected directory (Discord) operation.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The bot lacks the permission for the action, or the recipient refuses
    /// direct messages.
    ///
    /// Usually caused by the configured role sitting above the bot's highest role,
    /// or by the bot missing the Manage Roles permission.
    #[error("Missing permissions for this action")]
    PermissionDenied,

    /// The member, role or channel no longer exists.
    #[error("Target not found")]
    NotFound,

    /// Any other failure (network, rate limit, malformed response).
    #[error(transparent)]
    Other(Box<serenity::Error>),
}

/// Classifies Discord HTTP failures by status code.
///
/// 403 maps to `PermissionDenied` and 404 to `NotFound`; everything else is kept
/// as `Other` with the original error attached.
impl From<serenity::Error> for DirectoryError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(ref response)) = err {
            match response.status_code.as_u16() {
                403 => return DirectoryError::PermissionDenied,
                404 => return DirectoryError::NotFound,
                _ => {}
            }
        }

        DirectoryError::Other(Box::new(err))
    }
}
