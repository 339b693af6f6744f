//! Error types for the `unsplash-api` crate.
//!
//! A root `Error` struct holding an error kind and an optional source for error
//! chaining, plus helper constructors for the common kinds.

use std::error::Error as StdError;
use std::fmt;

use crate::scope::Scope;

/// Top-level error type for unsplash-api crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in unsplash-api.
///
/// Local conditions (credentials, scope, rate limit, parameters) are always detected
/// before any request leaves the process.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// Application id (or the secret, for the token exchange) is not configured.
    CredentialsMissing,
    /// The locally tracked remaining count reached zero. Carries the hourly limit.
    RateLimitExceeded(u32),
    /// The operation needs a scope that is not in the configured scope set.
    ScopeRequired(Scope),
    /// The response body could not be decoded into the expected type.
    Decode,
    /// Transport failure or a structured error returned by the server.
    Request(String),
    /// The requested page direction has no URL in the current cursor.
    NoPaginationAvailable(String),
    OAuth(OAuthErrorKind),
    Parameter(ParameterErrorKind),
    Storage(StorageErrorKind),
    Http(HttpErrorKind),
}

/// Errors from the authorization-code flow.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    /// The consent flow could not produce an authorization code.
    AuthorizationFailed,
    /// The user dismissed the consent UI.
    Cancelled,
    /// Another `authenticate()` call is already running on this session.
    InProgress,
}

/// Caller-supplied numeric parameters outside the accepted `[1, 30]` range.
#[derive(Debug, PartialEq)]
pub enum ParameterErrorKind {
    WrongCount,
    WrongQuantity,
}

/// Errors from key-value storage backends.
#[derive(Debug, PartialEq)]
pub enum StorageErrorKind {
    Io,
    Serialization,
    EncryptionFailed,
    DecryptionFailed,
}

/// Errors from HTTP client construction.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    InvalidUrl,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::CredentialsMissing => write!(
                f,
                "Unable to make requests. You must configure credentials first."
            ),
            ErrorKind::RateLimitExceeded(limit) => {
                write!(f, "You have reached the limit of {} per hour.", limit)
            }
            ErrorKind::ScopeRequired(scope) => {
                write!(f, "This request requires {} scope.", scope.as_str())
            }
            ErrorKind::Decode => write!(f, "Error decoding json response."),
            ErrorKind::Request(message) => write!(f, "Error in request: {}", message),
            ErrorKind::NoPaginationAvailable(message) => {
                write!(f, "Error getting page: {}", message)
            }
            ErrorKind::OAuth(OAuthErrorKind::AuthorizationFailed) => {
                write!(f, "Could not get authorization code.")
            }
            ErrorKind::OAuth(OAuthErrorKind::Cancelled) => {
                write!(f, "User has cancelled authentication process.")
            }
            ErrorKind::OAuth(OAuthErrorKind::InProgress) => {
                write!(f, "An authentication process is already running.")
            }
            ErrorKind::Parameter(ParameterErrorKind::WrongCount) => {
                write!(f, "Wrong count value. Must be between 1 and 30.")
            }
            ErrorKind::Parameter(ParameterErrorKind::WrongQuantity) => {
                write!(f, "Wrong quantity value. Must be between 1 and 30.")
            }
            ErrorKind::Storage(kind) => write!(f, "Storage error: {:?}", kind),
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors raised while building the client happen before any network call.
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else {
            ErrorKind::Request(err.to_string())
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(err: reqwest_middleware::Error) -> Self {
        Error {
            error_kind: ErrorKind::Request(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Helper function to create request errors.
pub fn request_error(message: impl Into<String>) -> Error {
    ErrorKind::Request(message.into()).into()
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

/// Helper function to create parameter validation errors.
pub fn parameter_error(kind: ParameterErrorKind) -> Error {
    ErrorKind::Parameter(kind).into()
}

/// Helper function to create storage errors.
pub fn storage_error(
    kind: StorageErrorKind,
    source: impl Into<Box<dyn StdError + Send + Sync>>,
) -> Error {
    Error {
        source: Some(source.into()),
        error_kind: ErrorKind::Storage(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err: Error = ErrorKind::RateLimitExceeded(50).into();
        assert_eq!(err.to_string(), "You have reached the limit of 50 per hour.");

        let err: Error = ErrorKind::ScopeRequired(Scope::WriteCollections).into();
        assert_eq!(
            err.to_string(),
            "This request requires write_collections scope."
        );

        let err = parameter_error(ParameterErrorKind::WrongQuantity);
        assert_eq!(
            err.to_string(),
            "Wrong quantity value. Must be between 1 and 30."
        );
    }

    #[test]
    fn test_oauth_error_keeps_message_as_source() {
        let err = oauth_error(OAuthErrorKind::AuthorizationFailed, "missing code");
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::AuthorizationFailed)
        );
        assert_eq!(
            StdError::source(&err).map(|s| s.to_string()),
            Some("missing code".to_string())
        );
    }

    #[test]
    fn test_request_error_has_no_source() {
        let err = request_error("boom");
        assert_eq!(err.error_kind, ErrorKind::Request("boom".to_string()));
        assert!(StdError::source(&err).is_none());
    }
}
