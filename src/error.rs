//! Global error handling for codegatherer
//!
//! This module provides a centralized error type shared by the aggregator,
//! the structure renderer and the output writer.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Global error type for codegatherer operations
#[derive(Error, Debug)]
pub enum GathererError {
    /// File system errors without a known path
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File system errors tied to a path
    #[error("IO error at {}: {source}", path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory traversal errors (unlistable directory, broken symlink, loop)
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// No workspace root could be resolved
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// Nothing was selected for aggregation
    #[error("No files or folders selected")]
    EmptySelection,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Regular expression errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GathererError {
    /// Exit code used by the command-line binary
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::WorkspaceNotFound(_) | Self::EmptySelection | Self::Config(_) => 2,
            Self::Io(_) | Self::IoAt { .. } | Self::Walk(_) => 3,
            _ => 1,
        }
    }
}

/// Specialized Result type for codegatherer operations
pub type Result<T> = std::result::Result<T, GathererError>;

/// Creates a GathererError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::GathererError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for attaching a path to I/O errors
pub trait ResultExt<T> {
    /// Wrap an I/O error together with the path it happened at
    fn at_path<P: Into<PathBuf>>(self, path: P) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, io::Error> {
    fn at_path<P: Into<PathBuf>>(self, path: P) -> Result<T> {
        self.map_err(|source| GathererError::IoAt {
            path: path.into(),
            source,
        })
    }
}

// Allow converting GathererError to io::Error for tests returning io::Result
impl From<GathererError> for io::Error {
    fn from(err: GathererError) -> Self {
        match err {
            GathererError::Io(e) => e,
            GathererError::IoAt { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
