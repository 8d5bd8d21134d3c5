//! Event system for communication between the host widget and the core.
//!
//! The host translates user input into [`Command`]s, which
//! [`FileChooser::handle`](crate::FileChooser::handle) processes. After every
//! command the host pulls a fresh [`View`] and renders it. This decoupling
//! allows any frontend to drive the same core logic.

use std::path::PathBuf;

use serde::Serialize;

use crate::fs::entry::DirEntry;

/// An action the host requests the core to perform.
///
/// Commands flow **Host → Core**. The core never creates commands itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the dialog (the select button was clicked while closed).
    Open,
    /// A breadcrumb was chosen. Carries the display path.
    PathChanged(String),
    /// A listing entry was chosen. Carries its display name.
    EntryPicked(String),
    /// The filename field was edited.
    FilenameChanged(String),
    /// The select button was clicked while open.
    CommitRequested,
    /// The cancel button was clicked.
    CancelRequested,
    /// Re-read the current directory.
    Refresh,
}

/// How the committed target relates to what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    /// Nothing has been committed.
    Unselected,
    /// The committed target is an existing file (it would be overwritten).
    Existing,
    /// The committed target does not exist as a file.
    New,
}

/// Everything the host needs to render the widget.
///
/// Paths are in display form: relative to the sandbox root when one is
/// configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub title: String,
    pub dialog_open: bool,
    /// Ancestors of the current directory, leaf first.
    pub breadcrumbs: Vec<PathBuf>,
    pub current_path: PathBuf,
    pub filename: String,
    /// `false` in directory-only mode, where there is no filename field.
    pub filename_visible: bool,
    pub listing: Vec<DirEntry>,
    /// Display name of the listed file matching the filename field.
    pub highlighted: Option<String>,
    pub commit_enabled: bool,
    pub button_label: String,
    pub selection_label: String,
    pub selection_status: SelectionStatus,
    pub rows: usize,
    /// Non-fatal problem from the last listing attempt.
    pub warning: Option<String>,
}
