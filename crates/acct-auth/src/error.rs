use std::collections::BTreeMap;

/// Field name to message, for request validation failures.
pub type Fields = BTreeMap<&'static str, String>;

/// Why a bearer credential or a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Header absent or empty. Carries the header name.
    #[error("please provide your {0} token")]
    Missing(&'static str),
    /// Header present but not `Bearer <token>`. Carries the header name.
    #[error("invalid {0} token")]
    Malformed(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Undecodable, or the wrong kind of token for this check.
    #[error("unauthorized: invalid token")]
    InvalidToken,
    #[error("unauthorized: invalid token signature")]
    InvalidSignature,
    #[error("unauthorized: token expired")]
    Expired,
    /// Refresh token is validly signed but no longer the active one.
    #[error("unauthorized: stale refresh token")]
    Stale,
}

impl AuthError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Missing(_) | Self::Malformed(_) | Self::InvalidCredentials => 422,
            Self::InvalidToken | Self::InvalidSignature | Self::Expired | Self::Stale => 401,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation failed")]
    Validation(Fields),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("user not found")]
    NotFound,
    #[error("a user with this email already exists")]
    DuplicateUser,
    /// Request body could not be parsed at all.
    #[error("{0}")]
    Payload(String),
    /// A write that must touch a row touched none.
    #[error("{0}")]
    Server(&'static str),
    #[error("storage failure: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    /// HTTP status this error surfaces as.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::DuplicateUser | Self::Payload(_) => 422,
            Self::Auth(e) => e.status(),
            Self::NotFound => 404,
            Self::Server(_) | Self::Storage(_) | Self::Hashing(_) | Self::Signing(_) => 500,
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self::Hashing(e.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Hashing(e.to_string())
    }
}

#[cfg(feature = "database")]
impl From<acct_pg::PgErr> for Error {
    fn from(e: acct_pg::PgErr) -> Self {
        if e.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION) {
            Self::DuplicateUser
        } else {
            Self::Storage(Box::new(e))
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::*;
    use actix_web::HttpResponse;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    /// Every body mirrors the HTTP status; internals never reach the client.
    impl ResponseError for Error {
        fn status_code(&self) -> StatusCode {
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
        fn error_response(&self) -> HttpResponse {
            let status = self.status();
            let body = match self {
                Self::Validation(fields) => serde_json::json!({ "status": status, "errors": fields }),
                Self::Auth(AuthError::Missing(header) | AuthError::Malformed(header)) => {
                    let errors = Fields::from([(*header, self.to_string())]);
                    serde_json::json!({ "status": status, "errors": errors })
                }
                _ if status >= 500 => {
                    log::error!("request failed: {}", self);
                    serde_json::json!({ "status": status, "message": "internal server error" })
                }
                _ => serde_json::json!({ "status": status, "message": self.to_string() }),
            };
            HttpResponse::build(self.status_code()).json(body)
        }
    }
}
