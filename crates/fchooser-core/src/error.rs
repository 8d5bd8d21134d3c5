//! Error types for `fchooser-core`.
//!
//! All fallible operations in the core library return [`ChooserResult<T>`],
//! which is an alias for `Result<T, ChooserError>`.

use std::path::PathBuf;

/// Unified error type for all chooser operations.
///
/// Validation variants ([`ParentPath`](ChooserError::ParentPath),
/// [`InvalidPath`](ChooserError::InvalidPath),
/// [`InvalidFileName`](ChooserError::InvalidFileName)) are returned before
/// any state is touched, so a failed call leaves the chooser unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ChooserError {
    /// The path does not fall under the configured sandbox root.
    #[error("{} is not a part of {}", path.display(), sandbox.display())]
    ParentPath {
        /// The offending path.
        path: PathBuf,
        /// The sandbox root it was checked against.
        sandbox: PathBuf,
    },

    /// The path does not exist or is not a directory.
    #[error("{0} does not exist or is not a directory")]
    InvalidPath(PathBuf),

    /// A filename contains a path separator or the `..` token.
    #[error("{0} cannot contain a path separator or '..'")]
    InvalidFileName(String),

    /// A filter pattern is not a valid glob.
    #[error("invalid filter pattern: {0}")]
    InvalidPattern(String),

    /// The process lacks permission to read the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A picked display name is not part of the current listing.
    #[error("no entry named {0} in the current listing")]
    UnknownEntry(String),

    /// The transition needs an open dialog.
    #[error("dialog is not open")]
    DialogClosed,

    /// The pending selection cannot be committed.
    #[error("selection cannot be committed")]
    CommitDisabled,

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// A configuration file does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `fchooser-core`.
pub type ChooserResult<T> = Result<T, ChooserError>;
