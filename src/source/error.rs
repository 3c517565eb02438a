//! Error types for snapshot retrieval.

use thiserror::Error;

/// A payload that parsed as JSON but violates the expected snapshot shape.
///
/// Shape errors are fatal for the cycle that produced them: the charts keep
/// their previous state and the next scheduled cycle retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A series array is not index-aligned with the label array.
    #[error("series `{name}` has {len} samples but labels has {expected}")]
    LengthMismatch {
        name: &'static str,
        len: usize,
        expected: usize,
    },

    /// The snapshot carries neither `totals` nor `summary`.
    #[error("snapshot carries neither totals nor summary")]
    MissingTotals,
}

/// Errors that can occur while fetching a snapshot from the backend.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with a non-success status code.
    #[error("server returned status {0}")]
    Status(u16),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded as the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// File-backed source could not be read.
    #[error("read error: {0}")]
    Read(String),

    /// Decoded payload violates the snapshot shape invariants.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_error_display_names_series() {
        let err = ShapeError::LengthMismatch {
            name: "cpu_usage",
            len: 5,
            expected: 6,
        };
        let msg = err.to_string();
        assert!(msg.contains("cpu_usage"));
        assert!(msg.contains('5'));
        assert!(msg.contains('6'));
    }

    #[test]
    fn shape_error_converts_to_fetch_error() {
        let err: FetchError = ShapeError::MissingTotals.into();
        assert!(matches!(err, FetchError::Shape(ShapeError::MissingTotals)));
    }
}
