//! Error types for suggestion and search operations.

use thiserror::Error;

use crate::{SourceKind, SuggestionGroup};

/// Failures reported by a network collaborator.
///
/// Transport errors are always surfaced to the caller; staleness never
/// suppresses them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request never produced a response.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The request did not complete in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response from {url}: {message}")]
    Parse {
        /// Request URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
    /// The service reported an error inside a successful HTTP response.
    #[error("service at {url} reported error {code}: {message}")]
    Service {
        /// Request URL.
        url: String,
        /// Service error code.
        code: i64,
        /// Service error message.
        message: String,
    },
}

/// Failure of a whole suggestion batch.
///
/// One failing adapter fails the batch; no partial list is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestError {
    /// An adapter's backend call failed.
    #[error("{group} suggestions failed: {source}")]
    Source {
        /// Adapter group that failed.
        group: SuggestionGroup,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },
}

/// Failures of the device-location capability.
///
/// Messages are phrased for display to end users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user or platform refused access to the position.
    #[error("your location could not be found because permission was denied")]
    PermissionDenied,
    /// The position could not be determined.
    #[error("your location is currently unavailable: {reason}")]
    Unavailable {
        /// Platform-supplied reason.
        reason: String,
    },
    /// The capability did not answer in time.
    #[error("finding your location took longer than {timeout_secs}s")]
    Timeout {
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
}

/// A source kind name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown suggestion kind {kind:?}")]
pub struct UnknownSourceKind {
    /// The unrecognised name.
    pub kind: String,
}

/// Failures of [`crate::SearchResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A location lookup returned zero candidates.
    #[error("no candidates found for key {key:?}")]
    EmptyResult {
        /// Correlation key that was looked up.
        key: String,
    },
    /// The suggestion kind is not one the resolver understands.
    #[error("unsupported suggestion type {kind:?}")]
    UnsupportedSuggestion {
        /// Kind named by the caller.
        kind: String,
    },
    /// A raw suggestion is missing a field its kind requires.
    #[error("{kind} suggestion is missing {field}")]
    MalformedSuggestion {
        /// Kind named by the caller.
        kind: SourceKind,
        /// Name of the missing field.
        field: &'static str,
    },
    /// A location suggestion names a source that is not configured.
    #[error("suggestion refers to unknown source {index}")]
    UnknownSource {
        /// Offending catalogue index.
        index: usize,
    },
    /// The geocoder call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The device-location capability failed.
    #[error(transparent)]
    Location(#[from] LocationError),
}

impl SearchError {
    /// Message suitable for showing to an end user.
    ///
    /// Location failures explain themselves; everything else collapses to a
    /// generic retry prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Location(err) => {
                let mut message = err.to_string();
                if let Some(first) = message.get(..1) {
                    let upper = first.to_uppercase();
                    message.replace_range(..1, &upper);
                }
                message
            }
            Self::EmptyResult { .. } => "No results were found.".to_owned(),
            _ => "Search is unavailable right now. Please try again later.".to_owned(),
        }
    }
}

impl From<UnknownSourceKind> for SearchError {
    fn from(err: UnknownSourceKind) -> Self {
        Self::UnsupportedSuggestion { kind: err.kind }
    }
}
