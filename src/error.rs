//! Error types for the AWS provider.
//!
//! Remote failures arrive as [`ApiError`]. Lookup helpers turn the subset of
//! codes that mean "the object is gone" into [`NotFoundError`], and treat a
//! structurally incomplete success response as [`EmptyResultError`]. All of
//! them flow to the host as [`ProviderError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while serving a lifecycle callback.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The remote object no longer exists.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The remote API answered successfully but without the expected data.
    #[error(transparent)]
    EmptyResult(#[from] EmptyResultError),

    /// The remote API returned an error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP transport failed before a response was received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Operation not implemented.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),
}

impl ProviderError {
    /// Get the error message as a string.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(err) => err.to_string(),
            Self::EmptyResult(err) => err.to_string(),
            Self::Api(err) => err.message.clone(),
            Self::Validation(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg)
            | Self::Unimplemented(msg) => msg.clone(),
            Self::Serialization(err) => err.to_string(),
            Self::Transport(err) => err.to_string(),
        }
    }

    /// Whether this error means the remote object is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The remote error behind this failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            Self::NotFound(err) => err.last_error.as_ref(),
            _ => None,
        }
    }
}

/// The closed set of local meanings a remote error code can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed object does not exist.
    NotFound,
    /// The request was rate limited.
    Throttling,
    /// The caller is not allowed to perform the request.
    AccessDenied,
    /// The request was rejected as malformed.
    Validation,
    /// The request conflicts with the current remote state.
    Conflict,
    /// Anything not listed in [`ERROR_CODES`].
    Other,
}

/// Remote error code → local error kind.
///
/// Every service's codes live here so call sites never compare code strings.
pub const ERROR_CODES: &[(&str, ErrorKind)] = &[
    // Resource Groups
    ("NotFoundException", ErrorKind::NotFound),
    ("BadRequestException", ErrorKind::Validation),
    ("ForbiddenException", ErrorKind::AccessDenied),
    ("MethodNotAllowedException", ErrorKind::Validation),
    ("TooManyRequestsException", ErrorKind::Throttling),
    // CloudFront
    ("NoSuchResponseHeadersPolicy", ErrorKind::NotFound),
    ("ResponseHeadersPolicyAlreadyExists", ErrorKind::Conflict),
    ("ResponseHeadersPolicyInUse", ErrorKind::Conflict),
    ("InvalidArgument", ErrorKind::Validation),
    ("AccessDenied", ErrorKind::AccessDenied),
    // CloudSearch
    ("ResourceNotFound", ErrorKind::NotFound),
    ("ResourceAlreadyExists", ErrorKind::Conflict),
    ("InvalidType", ErrorKind::Validation),
    ("DisabledAction", ErrorKind::Validation),
    ("LimitExceeded", ErrorKind::Conflict),
    // Shared
    ("ValidationException", ErrorKind::Validation),
    ("AccessDeniedException", ErrorKind::AccessDenied),
    ("ThrottlingException", ErrorKind::Throttling),
    ("Throttling", ErrorKind::Throttling),
    ("RequestLimitExceeded", ErrorKind::Throttling),
];

/// Look up the local meaning of a remote error code.
pub fn classify(code: &str) -> ErrorKind {
    ERROR_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Other)
}

/// An error returned by a remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code}: {message} (status {status})")]
pub struct ApiError {
    /// The remote error code, e.g. `NotFoundException`.
    pub code: String,
    /// The remote error message.
    pub message: String,
    /// The HTTP status of the response.
    pub status: u16,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
        }
    }

    /// The local meaning of this error's code.
    pub fn kind(&self) -> ErrorKind {
        classify(&self.code)
    }

    /// Whether the transport may retry the request that produced this error.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Throttling || self.status >= 500
    }
}

/// The remote object is gone.
///
/// Carries the remote error (when the API reported one) and the request that
/// produced it, so callers can tell "legitimately absent" from other failures
/// without inspecting messages.
#[derive(Debug, Clone, PartialEq)]
pub struct NotFoundError {
    /// The remote error that signalled absence, if there was one.
    pub last_error: Option<ApiError>,
    /// The request that was issued.
    pub last_request: serde_json::Value,
    /// Extra context when there is no remote error.
    pub message: Option<String>,
}

impl NotFoundError {
    /// Build a not-found signal from a remote error and its request.
    pub fn from_api(last_error: ApiError, last_request: serde_json::Value) -> Self {
        Self {
            last_error: Some(last_error),
            last_request,
            message: None,
        }
    }

    /// Build a not-found signal for a response that proves absence without an error.
    pub fn with_message(message: impl Into<String>, last_request: serde_json::Value) -> Self {
        Self {
            last_error: None,
            last_request,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "couldn't find resource")?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        if let Some(err) = &self.last_error {
            write!(f, ": {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for NotFoundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last_error
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// The remote API succeeded but the response lacked the expected nested data.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("empty result")]
pub struct EmptyResultError {
    /// The request that was issued.
    pub last_request: serde_json::Value,
}

impl EmptyResultError {
    /// Create a new empty-result error for the given request.
    pub fn new(last_request: serde_json::Value) -> Self {
        Self { last_request }
    }
}

/// Classify a failed remote call made by a lookup helper.
///
/// Not-found kinds become [`ProviderError::NotFound`] wrapping the request;
/// everything else passes through unchanged.
pub(crate) fn not_found_or(err: ProviderError, request: &impl Serialize) -> ProviderError {
    match err {
        ProviderError::Api(api) if api.kind() == ErrorKind::NotFound => {
            let last_request = serde_json::to_value(request).unwrap_or(serde_json::Value::Null);
            NotFoundError::from_api(api, last_request).into()
        },
        other => other,
    }
}

/// An [`EmptyResultError`] for the given request.
pub(crate) fn empty_result(request: &impl Serialize) -> ProviderError {
    let last_request = serde_json::to_value(request).unwrap_or(serde_json::Value::Null);
    EmptyResultError::new(last_request).into()
}

/// A [`NotFoundError`] for a response that proves absence without a remote error.
pub(crate) fn not_found(message: impl Into<String>, request: &impl Serialize) -> ProviderError {
    let last_request = serde_json::to_value(request).unwrap_or(serde_json::Value::Null);
    NotFoundError::with_message(message, last_request).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = ProviderError::Validation("invalid input".to_string());
        assert_eq!(format!("{}", err), "Validation error: invalid input");

        let err = ProviderError::UnknownResource("aws_nope".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: aws_nope");

        let err: ProviderError = ApiError::new("NotFoundException", "gone", 404).into();
        assert_eq!(format!("{}", err), "NotFoundException: gone (status 404)");
    }

    #[test]
    fn test_classify_known_codes() {
        assert_eq!(classify("NotFoundException"), ErrorKind::NotFound);
        assert_eq!(classify("NoSuchResponseHeadersPolicy"), ErrorKind::NotFound);
        assert_eq!(classify("ResourceNotFound"), ErrorKind::NotFound);
        assert_eq!(classify("ThrottlingException"), ErrorKind::Throttling);
        assert_eq!(classify("AccessDenied"), ErrorKind::AccessDenied);
        assert_eq!(classify("SomethingElse"), ErrorKind::Other);
    }

    #[test]
    fn test_error_codes_are_unique() {
        for (i, (code, _)) in ERROR_CODES.iter().enumerate() {
            assert!(
                !ERROR_CODES[i + 1..].iter().any(|(other, _)| other == code),
                "duplicate error code {}",
                code
            );
        }
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::new("ThrottlingException", "slow down", 400).is_retryable());
        assert!(ApiError::new("InternalFailure", "oops", 500).is_retryable());
        assert!(!ApiError::new("NotFoundException", "gone", 404).is_retryable());
    }

    #[test]
    fn test_not_found_or_wraps_request() {
        let request = json!({"Id": "abc"});
        let err = not_found_or(
            ApiError::new("NoSuchResponseHeadersPolicy", "no policy", 404).into(),
            &request,
        );

        match err {
            ProviderError::NotFound(nf) => {
                assert_eq!(nf.last_request, request);
                assert_eq!(
                    nf.last_error.map(|e| e.code),
                    Some("NoSuchResponseHeadersPolicy".to_string())
                );
            },
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found_or_passes_other_errors() {
        let err = not_found_or(
            ApiError::new("AccessDenied", "nope", 403).into(),
            &json!({"Id": "abc"}),
        );
        assert!(!err.is_not_found());
        assert_eq!(err.api_error().map(|e| e.code.as_str()), Some("AccessDenied"));
    }

    #[test]
    fn test_message_method() {
        let err = ProviderError::Configuration("invalid config".to_string());
        assert_eq!(err.message(), "invalid config");

        let err: ProviderError = EmptyResultError::new(json!({})).into();
        assert_eq!(err.message(), "empty result");

        let err: ProviderError = NotFoundError::with_message("domain deleted", json!({})).into();
        assert_eq!(err.message(), "couldn't find resource: domain deleted");
        assert!(err.is_not_found());
    }
}
