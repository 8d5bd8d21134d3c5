//! fchooser core library: UI-agnostic file/folder selection logic.
//!
//! `fchooser-core` provides the navigation core of an embeddable file
//! chooser widget. It is intentionally decoupled from any UI framework: a
//! host feeds user events in as [`Command`]s and renders the [`View`] the
//! chooser hands back.
//!
//! # Modules
//!
//! - [`fs`]: Listing entries, directory reads and sandbox path arithmetic.
//! - [`nav`]: The [`FileChooser`] state machine, listings with a display/real name bijection, filtering and sorting.
//! - [`config`]: TOML-based chooser configuration.
//! - [`event`]: Command and view types for Host ↔ Core communication.
//! - [`error`]: Unified error type ([`ChooserError`]) and result alias ([`ChooserResult`]).

pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod nav;

pub use config::settings::{ChooserConfig, PatternSpec};
pub use error::{ChooserError, ChooserResult};
pub use event::{Command, SelectionStatus, View};
pub use fs::entry::{DirEntry, EntryKind};
pub use fs::ops::{list_directory, read_directory, ListOptions};
pub use fs::path::{
    expand_path, has_parent_path, is_valid_filename, normalize_path, root_volumes,
    strip_parent_path, subpaths,
};
pub use nav::chooser::{DialogState, FileChooser, Selection, SelectionCallback};
pub use nav::filter::{filter_by_pattern, filter_hidden, sort_entries, FilterPattern};
pub use nav::listing::{DirIcon, IconPlacement, Listing};

/// Normalises a string to NFC (composed) form.
///
/// macOS stores filenames in NFD (decomposed), which makes accented and
/// Hangul names render as separate code points. This helper re-composes them.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
