//! Error types for the course pipeline.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! This ensures composable error handling across crates.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all course operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// No course with this slug
    #[error("Course not found: {slug}")]
    CourseNotFound { slug: String },

    /// No topic with this slug path inside the course
    #[error("Topic not found: {course}/{slug_path}")]
    TopicNotFound { course: String, slug_path: String },

    /// A document reference points at a directory
    #[error("Path is a directory, not a document: {path}")]
    IsDirectory { path: PathBuf },

    /// Invalid file path (outside course root, empty, etc.)
    #[error("Invalid file path: {reason}")]
    InvalidPath { reason: String },

    /// Path traversal attempt detected
    #[error("Path traversal detected: {path}")]
    PathTraversalAttempt { path: PathBuf },

    /// File too large for processing
    #[error("File too large ({size} bytes, max {max} bytes): {path}")]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    /// Front-matter or other parse error
    #[error("Parse error: {reason}")]
    ParseError { reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create a course not found error
    pub fn course_not_found(slug: impl Into<String>) -> Self {
        Error::CourseNotFound { slug: slug.into() }
    }

    /// Create a topic not found error
    pub fn topic_not_found(course: impl Into<String>, slug_path: impl Into<String>) -> Self {
        Error::TopicNotFound {
            course: course.into(),
            slug_path: slug_path.into(),
        }
    }

    /// Create a directory-shaped reference error
    pub fn is_directory(path: impl Into<PathBuf>) -> Self {
        Error::IsDirectory { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            reason: reason.into(),
        }
    }

    /// Create a path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Error::PathTraversalAttempt { path: path.into() }
    }

    /// Create a file too large error
    pub fn file_too_large(path: impl Into<PathBuf>, size: u64, max: u64) -> Self {
        Error::FileTooLarge {
            path: path.into(),
            size,
            max,
        }
    }

    /// Create a parse error
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Error::ParseError {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Whether this error should surface to a reader as "not found".
    ///
    /// Covers missing courses, topics and files, directory-shaped document
    /// references, and paths that try to leave the course root.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileNotFound { .. }
            | Error::CourseNotFound { .. }
            | Error::TopicNotFound { .. }
            | Error::IsDirectory { .. }
            | Error::InvalidPath { .. }
            | Error::PathTraversalAttempt { .. } => true,
            Error::Io(err) => err.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
