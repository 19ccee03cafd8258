use argon2::Error as ArgonError;
use tracing::{event, instrument, Level};
use warp::{
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::Reject,
    Rejection, Reply,
};

#[derive(Debug)]
pub enum Error {
    InvalidId(String),
    MissingParameters,
    NoteNotFound,
    ProfileNotFound,
    AccountNotFound,
    EmailTaken,
    ConfirmationRequired,
    DatabaseQueryError(sqlx::Error),
    ArgonLibraryError(ArgonError),
    WrongPassword,
    CannotIssueToken,
    CannotDecryptToken,
    Unauthorized,
    Forbidden,
    Configuration(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::InvalidId(ref id) => write!(f, "Invalid identifier: {}", id),
            Error::MissingParameters => write!(f, "Title and content are required"),
            Error::NoteNotFound => write!(f, "Note not found"),
            Error::ProfileNotFound => write!(f, "Profile not found"),
            Error::AccountNotFound => write!(f, "Account not found"),
            Error::EmailTaken => write!(f, "An account with this email already exists"),
            Error::ConfirmationRequired => write!(f, "Deletion must be confirmed"),
            Error::DatabaseQueryError(ref e) => {
                write!(f, "Query could not be executed: {}", e)
            }
            Error::ArgonLibraryError(_) => write!(f, "Cannot verify password"),
            Error::WrongPassword => write!(f, "Wrong email or password"),
            Error::CannotIssueToken => write!(f, "Cannot issue session token"),
            Error::CannotDecryptToken => write!(f, "Invalid session token"),
            Error::Unauthorized => write!(f, "No active session"),
            Error::Forbidden => write!(f, "Not allowed"),
            Error::Configuration(ref msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

impl Error {
    /// Status code used when the error reaches a client.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NoteNotFound | Error::ProfileNotFound => StatusCode::NOT_FOUND,
            Error::AccountNotFound
            | Error::WrongPassword
            | Error::CannotDecryptToken
            | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::CannotIssueToken | Error::ArgonLibraryError(_) | Error::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Message safe to show to a user. Database and hashing details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::DatabaseQueryError(sqlx::Error::Database(err))
                if err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Error::EmailTaken.to_string()
            }
            Error::DatabaseQueryError(sqlx::Error::RowNotFound) => "Record not found".to_string(),
            Error::DatabaseQueryError(_) => "Cannot update data".to_string(),
            Error::AccountNotFound => Error::WrongPassword.to_string(),
            other => other.to_string(),
        }
    }
}

const UNIQUE_VIOLATION: &str = "23505";

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        match error {
            Error::DatabaseQueryError(e) => {
                event!(Level::ERROR, "Database query error: {}", e)
            }
            Error::ArgonLibraryError(e) => event!(Level::ERROR, "Argon error: {}", e),
            Error::NoteNotFound | Error::ProfileNotFound | Error::MissingParameters => {
                event!(Level::WARN, "{}", error)
            }
            _ => event!(Level::ERROR, "{}", error),
        }
        Ok(warp::reply::with_status(
            error.public_message(),
            error.status(),
        ))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::ERROR, "{}", error);
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::FORBIDDEN,
        ))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::ERROR, "{}", error);
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
    } else if let Some(error) = r.find::<warp::reject::InvalidQuery>() {
        event!(Level::WARN, "{}", error);
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
    } else if r.find::<warp::reject::MethodNotAllowed>().is_some() {
        Ok(warp::reply::with_status(
            "Method not allowed".to_string(),
            StatusCode::METHOD_NOT_ALLOWED,
        ))
    } else {
        Ok(warp::reply::with_status(
            "Route not found".to_string(),
            StatusCode::NOT_FOUND,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(Error::NoteNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::MissingParameters.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::ConfirmationRequired.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn database_details_stay_private() {
        let err = Error::DatabaseQueryError(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "Cannot update data");
        assert_eq!(
            Error::AccountNotFound.public_message(),
            Error::WrongPassword.to_string()
        );
    }
}
