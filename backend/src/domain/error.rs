//! Domain-level error type.
//!
//! Every failure that leaves a domain service is one of these. The payload
//! separates what the client may see (`message`, `details`) from what only the
//! logs may see (`diagnostic`, usually the text of an underlying store, hash
//! or token error). Inbound adapters map [`ErrorCode`] to their own status
//! vocabulary.

use serde::Serialize;
use serde_json::Value;

use crate::domain::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input or a mutation the store refused.
    InvalidRequest,
    /// Missing, malformed, expired or forged bearer token.
    Unauthorized,
    /// Missing entity, failed lookup, or an empty collection.
    NotFound,
    /// Duplicate registration, duplicate contact, or a lost revision race.
    Conflict,
    /// Anything outside the taxonomy above.
    InternalError,
}

/// Domain error payload.
///
/// # Examples
/// ```
/// use showcase::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("No projects found")
///     .with_diagnostic("Error while finding the project requested");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "No projects found");
/// assert_eq!(err.diagnostic(), Some("Error while finding the project requested"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip)]
    diagnostic: Option<String>,
}

impl Error {
    /// Create a new error.
    ///
    /// Captures the current trace identifier if one is in scope so responses
    /// and log lines correlate without extra plumbing.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
            diagnostic: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message that is safe to return to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier captured at construction, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary structured details returned to clients.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Internal cause, never serialised.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Attach a trace identifier.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details for clients.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the internal cause.
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.diagnostic {
            Some(diagnostic) => write!(f, "{} ({diagnostic})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Error {}
