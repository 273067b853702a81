//! Unified error type for the windmer library.
//!
//! All failure modes surface at adaptor/construction time: once an operator is
//! built, iteration is total and cannot fail. Library code uses `WindmerError`
//! while test code is free to use `anyhow::Result` for convenience.
//!
//! # Error Categories
//!
//! - **InvalidArgument**: Rejected operator parameters (window size, policy offsets)
//! - **LengthMismatch**: Paired streams of unequal known length
//! - **Io**: File system operations while loading sampling profiles
//! - **Profile**: Malformed or out-of-range sampling profile contents

use std::fmt;
use std::path::PathBuf;

/// Unified error type for the windmer library.
#[derive(Debug)]
pub enum WindmerError {
    /// An operator parameter was rejected at construction.
    InvalidArgument(String),

    /// Two paired streams have different known lengths.
    LengthMismatch { first: usize, second: usize },

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
    },

    /// Malformed or invalid sampling profile.
    Profile { path: PathBuf, detail: String },
}

impl fmt::Display for WindmerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindmerError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            WindmerError::LengthMismatch { first, second } => {
                write!(
                    f,
                    "Paired streams must have the same length (got {} and {})",
                    first, second
                )
            }
            WindmerError::Io {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "I/O error during {} on '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            WindmerError::Profile { path, detail } => {
                write!(f, "Invalid profile '{}': {}", path.display(), detail)
            }
        }
    }
}

impl std::error::Error for WindmerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WindmerError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WindmerError {
    fn from(err: std::io::Error) -> Self {
        WindmerError::Io {
            path: PathBuf::new(),
            operation: "unknown",
            source: err,
        }
    }
}

/// Convenience type alias for Results using WindmerError.
pub type Result<T> = std::result::Result<T, WindmerError>;

// ============================================================================
// Helper constructors
// ============================================================================

impl WindmerError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        WindmerError::InvalidArgument(msg.into())
    }

    /// Create a length-mismatch error for a pair of streams.
    pub fn length_mismatch(first: usize, second: usize) -> Self {
        WindmerError::LengthMismatch { first, second }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        WindmerError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Create a profile error.
    pub fn profile(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        WindmerError::Profile {
            path: path.into(),
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = WindmerError::invalid_argument("window must hold at least two values");
        assert!(err
            .to_string()
            .contains("window must hold at least two values"));
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = WindmerError::length_mismatch(9, 8);
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains('8'));
        assert!(msg.contains("same length"));
    }

    #[test]
    fn test_io_error_display() {
        let err = WindmerError::io(
            "/path/to/profile.toml",
            "read",
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/path/to/profile.toml"));
        assert!(msg.contains("read"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_profile_error_display() {
        let err = WindmerError::profile("/path/to/profile.toml", "window must be at least 2");
        let msg = err.to_string();
        assert!(msg.contains("/path/to/profile.toml"));
        assert!(msg.contains("window must be at least 2"));
    }

    #[test]
    fn test_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err = WindmerError::io("/path", "open", io_err);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: WindmerError = io_err.into();
        match err {
            WindmerError::Io { operation, .. } => assert_eq!(operation, "unknown"),
            _ => panic!("Expected Io variant"),
        }
    }
}
