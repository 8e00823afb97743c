//! Error types for repobundlelib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a discovery or scan call.
///
/// Per-file failures never surface here; they are folded into the
/// classification report as omitted entries.
#[derive(Error, Debug)]
pub enum RepobundleError {
    /// The root does not exist or is not a directory
    #[error("root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    /// The root itself is a symbolic link
    #[error("root is a symbolic link: {0}")]
    RootIsSymlink(PathBuf),

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// A tunable is out of range
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking discovery task panicked or was cancelled
    #[error("discovery task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Errors raised by a [`ContentReader`](crate::reader::ContentReader).
#[derive(Error, Debug)]
pub enum ReadError {
    /// The file could not be stat-ed, opened or read
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The file content is not valid UTF-8
    #[error("'{path}' is not valid UTF-8: {source}")]
    Decode {
        path: String,
        source: std::string::FromUtf8Error,
    },

    /// The relative path escapes the reader root
    #[error("path escapes the repository root: {path}")]
    OutsideRoot { path: String },
}

impl ReadError {
    /// The relative path the failed operation was given.
    pub fn path(&self) -> &str {
        match self {
            ReadError::Io { path, .. }
            | ReadError::Decode { path, .. }
            | ReadError::OutsideRoot { path } => path,
        }
    }

    /// Whether the failure came from decoding rather than I/O.
    pub fn is_decode(&self) -> bool {
        matches!(self, ReadError::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_path() {
        let err = ReadError::OutsideRoot {
            path: "../etc/passwd".to_string(),
        };
        assert_eq!(err.path(), "../etc/passwd");
        assert!(!err.is_decode());
    }

    #[test]
    fn test_decode_error_detected() {
        let source = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err = ReadError::Decode {
            path: "bad.txt".to_string(),
            source,
        };
        assert!(err.is_decode());
        assert!(err.to_string().contains("bad.txt"));
    }

    #[test]
    fn test_root_errors_display_path() {
        let err = RepobundleError::RootIsSymlink(PathBuf::from("/tmp/link"));
        assert_eq!(err.to_string(), "root is a symbolic link: /tmp/link");

        let err = RepobundleError::RootNotDirectory(PathBuf::from("/tmp/file"));
        assert_eq!(err.to_string(), "root is not a directory: /tmp/file");
    }
}
