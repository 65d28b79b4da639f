//! Domain Errors
//!
//! Failures reported by the identity provider and the document store.

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;
pub type StoreResult<T> = Result<T, StoreError>;

/// Identity provider failures, surfaced as form field messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no account exists for this email")]
    NotFound,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("wrong password")]
    WrongPassword,
    #[error("too many attempts, try again later")]
    RateLimited,
    #[error("password is too weak")]
    WeakPassword,
    #[error("invalid display name")]
    InvalidDisplayName,
    /// The refresh token was revoked or expired; the user must sign in again
    #[error("session expired")]
    SessionExpired,
    #[error("authentication failed: {0}")]
    Unknown(String),
}

impl AuthError {
    /// Map an Identity Toolkit error message to a variant.
    ///
    /// Messages may carry a detail suffix, e.g.
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub fn from_provider_code(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or_default().trim();
        match code {
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => AuthError::NotFound,
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::WrongPassword,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::RateLimited,
            "WEAK_PASSWORD" => AuthError::WeakPassword,
            "INVALID_DISPLAY_NAME" => AuthError::InvalidDisplayName,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_DISABLED" => AuthError::SessionExpired,
            _ => AuthError::Unknown(message.to_string()),
        }
    }

    /// Whether the signed-in session can no longer be used
    pub fn ends_session(&self) -> bool {
        matches!(self, AuthError::SessionExpired | AuthError::NotFound)
    }
}

/// Document store failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("store returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("could not decode store response: {0}")]
    Decode(String),
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("not signed in")]
    Unauthenticated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_codes_map_to_variants() {
        assert_eq!(AuthError::from_provider_code("EMAIL_NOT_FOUND"), AuthError::NotFound);
        assert_eq!(AuthError::from_provider_code("INVALID_EMAIL"), AuthError::InvalidEmail);
        assert_eq!(AuthError::from_provider_code("INVALID_PASSWORD"), AuthError::WrongPassword);
        assert_eq!(
            AuthError::from_provider_code("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"),
            AuthError::RateLimited
        );
        assert_eq!(
            AuthError::from_provider_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthError::WeakPassword
        );
        assert_eq!(
            AuthError::from_provider_code("EMAIL_EXISTS"),
            AuthError::Unknown("EMAIL_EXISTS".into())
        );
    }

    #[test]
    fn revoked_refresh_tokens_end_the_session() {
        assert_eq!(AuthError::from_provider_code("TOKEN_EXPIRED"), AuthError::SessionExpired);
        assert_eq!(AuthError::from_provider_code("USER_DISABLED"), AuthError::SessionExpired);
        assert!(AuthError::SessionExpired.ends_session());
        assert!(!AuthError::Unknown("offline".into()).ends_session());
    }
}
