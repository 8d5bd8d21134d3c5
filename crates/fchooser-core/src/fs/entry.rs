//! Directory listing entry representation.

use serde::Serialize;

use crate::fs::path::PARENT_TOKEN;

/// What a listed name resolves to on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file (or anything that is not a directory).
    File,
    /// A directory, including the synthetic parent entry.
    Directory,
}

/// A single entry of a directory listing.
///
/// `real_name` is the on-disk name and is what navigation resolves
/// against. `display_name` is what the host renders; it may carry a
/// directory marker and is unique within one [`Listing`](crate::Listing).
///
/// # Examples
///
/// ```
/// use fchooser_core::{DirEntry, EntryKind};
///
/// let entry = DirEntry::new("docs".into(), EntryKind::Directory);
/// assert_eq!(entry.real_name(), "docs");
/// assert_eq!(entry.display_name(), "docs");
/// assert!(entry.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    real_name: String,
    display_name: String,
    kind: EntryKind,
}

impl DirEntry {
    /// Creates an entry whose display name is the NFC form of `real_name`.
    pub fn new(real_name: String, kind: EntryKind) -> Self {
        let display_name = crate::nfc_string(&real_name);
        Self {
            real_name,
            display_name,
            kind,
        }
    }

    /// The synthetic "go up one level" entry.
    pub fn parent() -> Self {
        Self::new(PARENT_TOKEN.to_string(), EntryKind::Directory)
    }

    /// Returns a copy carrying a different display name.
    pub(crate) fn with_display_name(self, display_name: String) -> Self {
        Self {
            display_name,
            ..self
        }
    }

    /// The on-disk name.
    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    /// The name shown to the user.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns `true` for directories and the parent entry.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Returns `true` for the synthetic parent entry.
    pub fn is_parent(&self) -> bool {
        self.is_dir() && self.real_name == PARENT_TOKEN
    }

    /// Returns `true` if the name starts with `.`.
    pub fn is_hidden(&self) -> bool {
        self.real_name.starts_with('.') && !self.is_parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entry_defaults_display_to_real_name() {
        let entry = DirEntry::new("report.txt".to_string(), EntryKind::File);
        assert_eq!(entry.real_name(), "report.txt");
        assert_eq!(entry.display_name(), "report.txt");
        assert!(!entry.is_dir());
        assert!(!entry.is_hidden());
    }

    #[test]
    fn parent_entry_is_a_directory_but_not_hidden() {
        let entry = DirEntry::parent();
        assert!(entry.is_dir());
        assert!(entry.is_parent());
        assert!(!entry.is_hidden());
        assert_eq!(entry.real_name(), "..");
    }

    #[test]
    fn dot_prefixed_names_are_hidden() {
        let entry = DirEntry::new(".config".to_string(), EntryKind::Directory);
        assert!(entry.is_hidden());
        assert!(!entry.is_parent());
    }

    #[test]
    fn display_name_is_nfc_but_real_name_is_untouched() {
        // "e" followed by a combining acute accent (NFD).
        let decomposed = "caf\u{0065}\u{0301}.txt".to_string();
        let entry = DirEntry::new(decomposed.clone(), EntryKind::File);
        assert_eq!(entry.real_name(), decomposed);
        assert_eq!(entry.display_name(), "caf\u{00e9}.txt");
    }

    #[test]
    fn with_display_name_keeps_real_name() {
        let entry = DirEntry::new("docs".to_string(), EntryKind::Directory)
            .with_display_name("[docs]".to_string());
        assert_eq!(entry.real_name(), "docs");
        assert_eq!(entry.display_name(), "[docs]");
        assert_eq!(entry.kind(), EntryKind::Directory);
    }

    #[test]
    fn serializes_kind_in_lowercase() {
        let entry = DirEntry::new("a".to_string(), EntryKind::Directory);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"kind\":\"directory\""));
    }
}
