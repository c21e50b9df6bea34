//! Structured error handling for listing operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while listing a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Request parameters are out of range.
    Validation,
    /// Network failure or non-success HTTP status.
    Transport,
    /// Response body could not be decoded.
    Parse,
    /// Request signature could not be produced.
    Signing,
    /// Client configuration is invalid.
    Configuration,
    /// Unknown error occurred.
    #[default]
    Unknown,
}

impl ErrorKind {
    /// Returns whether the facade degrades this error to fallback data.
    ///
    /// Validation errors describe a caller mistake and always propagate.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Validation)
    }
}

/// Structured error type with classification and context tracking.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Creates a new validation error.
    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation)
    }

    /// Creates a new transport error.
    pub fn transport() -> Self {
        Self::new(ErrorKind::Transport)
    }

    /// Creates a new parse error.
    pub fn parse() -> Self {
        Self::new(ErrorKind::Parse)
    }

    /// Creates a new signing error.
    pub fn signing() -> Self {
        Self::new(ErrorKind::Signing)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the human-readable reason, falling back to the full display.
    pub fn reason(&self) -> String {
        self.message.clone().unwrap_or_else(|| self.to_string())
    }

    /// Returns whether the facade degrades this error to fallback data.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

impl From<::reqwest::Error> for Error {
    fn from(err: ::reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Connection failed".to_string()
        } else {
            err.to_string()
        };

        Self::from_source(ErrorKind::Transport, err).with_message(message)
    }
}

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Self::parse()
            .with_message(format!("malformed listing response: {err}"))
            .with_source(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::configuration()
            .with_message(format!("invalid endpoint: {err}"))
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_error_new() {
        let error = Error::new(ErrorKind::Unknown);
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert!(error.message.is_none());
        assert!(error.source.is_none());
    }

    #[test]
    fn test_error_display() {
        let error = Error::transport().with_message("connection reset");

        let display_str = error.to_string();
        assert_eq!(display_str, "[transport]: connection reset");
    }

    #[test]
    fn test_reason_prefers_message() {
        let error = Error::parse().with_message("bad body");
        assert_eq!(error.reason(), "bad body");

        let error = Error::signing();
        assert_eq!(error.reason(), "[signing]");
    }

    #[test]
    fn test_only_validation_is_fatal() {
        assert!(!ErrorKind::Validation.is_recoverable());
        assert!(ErrorKind::Transport.is_recoverable());
        assert!(ErrorKind::Parse.is_recoverable());
        assert!(ErrorKind::Signing.is_recoverable());
        assert!(ErrorKind::Configuration.is_recoverable());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            ErrorKind::from_str("validation").unwrap(),
            ErrorKind::Validation
        );
        assert_eq!(ErrorKind::from_str("parse").unwrap(), ErrorKind::Parse);
        assert!(ErrorKind::from_str("invalid").is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(ErrorKind::default(), ErrorKind::Unknown);
    }
}
