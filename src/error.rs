use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::{self, status, Responder},
    serde::json::{self, Json},
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// An operation attempted outside its lifecycle window.
    #[error("Wrong phase: {0}")]
    Phase(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// A repeated submission that may only happen once.
    #[error("Duplicate: {0}")]
    Duplicate(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::Phase(_) | Self::Duplicate(_) => Status::Conflict,
            Self::NotFound(_) => Status::NotFound,
            Self::Unauthorized(_) => Status::Unauthorized,
            Self::Forbidden(_) => Status::Forbidden,
            Self::Internal(_) | Self::Db(_) => Status::InternalServerError,
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::ExpiredSignature
                | JwtErrorKind::ImmatureSignature
                | JwtErrorKind::InvalidSignature => Status::Unauthorized,
                _ => Status::BadRequest,
            },
        }
    }

    /// A short machine-readable name for this kind of error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Phase(_) => "phase",
            Self::NotFound(_) => "not_found",
            Self::Duplicate(_) => "duplicate",
            Self::Unauthorized(_) | Self::Jwt(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::Internal(_) | Self::Db(_) => "internal",
        }
    }
}

/// A request body that is not JSON of the expected shape is invalid input.
impl From<json::Error<'_>> for Error {
    fn from(err: json::Error<'_>) -> Self {
        match err {
            json::Error::Io(err) => Self::Validation(format!("Unreadable request body: {err}")),
            json::Error::Parse(_, err) => Self::Validation(format!("Malformed request body: {err}")),
        }
    }
}

/// The JSON body sent with every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    /// A body for a bare status, e.g. from a failed request guard.
    pub fn for_status(status: Status) -> Self {
        let error = match status.code {
            400 => "bad_request",
            401 => "unauthorized",
            403 => "forbidden",
            404 => "not_found",
            422 => "unprocessable",
            _ if status.class() == StatusClass::ServerError => "internal",
            _ => "error",
        };
        Self {
            error: error.to_string(),
            message: status.reason_lossy().to_string(),
        }
    }
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        // Don't leak database internals to clients.
        let message = match err {
            Error::Db(_) => "Database error".to_string(),
            other => other.to_string(),
        };
        Self {
            error: err.kind().to_string(),
            message,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        if status.class() == StatusClass::ServerError {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        status::Custom(status, Json(ErrorBody::from(&self))).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(
            Error::Validation("x".into()).status(),
            Status::BadRequest
        );
        assert_eq!(Error::Phase("x".into()).status(), Status::Conflict);
        assert_eq!(Error::Duplicate("x".into()).status(), Status::Conflict);
        assert_eq!(Error::not_found("x").status(), Status::NotFound);
        assert_eq!(Error::Forbidden("x".into()).status(), Status::Forbidden);
        assert_eq!(
            Error::Internal("x".into()).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn body_carries_kind_and_message() {
        let body = ErrorBody::from(&Error::Phase("applications are closed".into()));
        assert_eq!(body.error, "phase");
        assert_eq!(body.message, "Wrong phase: applications are closed");

        let body = ErrorBody::for_status(Status::Unauthorized);
        assert_eq!(body.error, "unauthorized");
        assert_eq!(body.message, "Unauthorized");
    }

    #[test]
    fn malformed_body_is_invalid() {
        let raw = r#"{"candidacy_id": "one"}"#;
        let parse = json::serde_json::from_str::<json::serde_json::Value>("{").unwrap_err();
        let err = Error::from(json::Error::Parse(raw, parse));
        assert_eq!(err.status(), Status::BadRequest);
        assert_eq!(err.kind(), "validation");
    }
}
