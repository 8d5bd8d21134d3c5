//! Directory reading operations.

use std::path::Path;

use crate::error::{ChooserError, ChooserResult};
use crate::fs::entry::{DirEntry, EntryKind};
use crate::fs::path::{has_parent, strip_parent_path};
use crate::nav::filter::{filter_by_pattern, filter_dirs, filter_hidden, sort_entries, FilterPattern};
use crate::nav::listing::{DirIcon, Listing};

/// Listing policy applied by [`list_directory`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions<'a> {
    pub show_hidden: bool,
    pub show_only_dirs: bool,
    pub filter: Option<&'a FilterPattern>,
    pub sandbox: Option<&'a Path>,
    pub dir_icon: Option<&'a DirIcon>,
}

/// Reads the immediate contents of a directory and returns them as [`DirEntry`] values.
///
/// Entries are classified by following symlinks; anything that cannot be
/// stat'ed (a dangling link, say) is reported as a file. Names that are
/// not valid UTF-8 are skipped. The returned entries are **unsorted**.
///
/// # Errors
///
/// - [`ChooserError::InvalidPath`]: the path does not exist or is not a directory.
/// - [`ChooserError::PermissionDenied`]: read access is denied.
/// - [`ChooserError::Io`]: any other I/O error.
pub fn read_directory(path: &Path) -> ChooserResult<Vec<DirEntry>> {
    if !path.is_dir() {
        return Err(ChooserError::InvalidPath(path.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ChooserError::PermissionDenied(path.to_path_buf())
        } else {
            ChooserError::Io(e)
        }
    })?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(path = %path.display(), "skipping unreadable entry: {e}");
                continue;
            }
        };
        let name = match dir_entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::debug!("skipping non UTF-8 name: {}", raw.to_string_lossy());
                continue;
            }
        };
        let kind = match std::fs::metadata(dir_entry.path()) {
            Ok(m) if m.is_dir() => EntryKind::Directory,
            _ => EntryKind::File,
        };
        entries.push(DirEntry::new(name, kind));
    }

    Ok(entries)
}

/// Reads `path` and applies the listing policy in `options`.
///
/// Hidden entries are dropped first, then files (when `show_only_dirs`),
/// then files not matching the filter. The result is sorted parent entry,
/// directories, files. The parent entry is injected unless `path` is the
/// sandbox root (or the filesystem root without a sandbox).
///
/// # Errors
///
/// Same as [`read_directory`].
///
/// # Examples
///
/// ```no_run
/// use fchooser_core::{list_directory, ListOptions};
/// use std::path::Path;
///
/// let listing = list_directory(Path::new("/home/user"), &ListOptions::default()).unwrap();
/// for name in listing.display_names() {
///     println!("{name}");
/// }
/// ```
pub fn list_directory(path: &Path, options: &ListOptions<'_>) -> ChooserResult<Listing> {
    let mut entries = filter_hidden(&read_directory(path)?, options.show_hidden);

    if options.show_only_dirs {
        entries = filter_dirs(&entries);
    }
    if let Some(filter) = options.filter {
        entries = filter_by_pattern(&entries, filter);
    }
    if has_parent(&strip_parent_path(path, options.sandbox)) {
        entries.push(DirEntry::parent());
    }

    Ok(Listing::new(sort_entries(&entries), options.dir_icon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::listing::IconPlacement;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("report.txt"), "r").unwrap();
        fs::write(tmp.path().join("paper.PDF"), "p").unwrap();
        fs::write(tmp.path().join(".env"), "e").unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::create_dir(tmp.path().join("Archive")).unwrap();
        tmp
    }

    fn names(listing: &Listing) -> Vec<&str> {
        listing.entries().iter().map(|e| e.real_name()).collect()
    }

    #[test]
    fn read_directory_classifies_entries() {
        let tmp = fixture();
        let entries = read_directory(tmp.path()).unwrap();
        assert_eq!(entries.len(), 6);
        let docs = entries.iter().find(|e| e.real_name() == "docs").unwrap();
        assert!(docs.is_dir());
        let report = entries.iter().find(|e| e.real_name() == "report.txt").unwrap();
        assert!(!report.is_dir());
    }

    #[test]
    fn read_directory_missing_path_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let err = read_directory(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ChooserError::InvalidPath(_)));
    }

    #[test]
    fn read_directory_on_file_is_invalid() {
        let tmp = fixture();
        let err = read_directory(&tmp.path().join("report.txt")).unwrap_err();
        assert!(matches!(err, ChooserError::InvalidPath(_)));
    }

    #[test]
    fn default_listing_hides_dotfiles_and_sorts() {
        let tmp = fixture();
        let listing = list_directory(tmp.path(), &ListOptions::default()).unwrap();
        assert_eq!(
            names(&listing),
            vec!["..", "Archive", "docs", "paper.PDF", "report.txt"]
        );
    }

    #[test]
    fn show_hidden_includes_dotfiles() {
        let tmp = fixture();
        let options = ListOptions {
            show_hidden: true,
            ..Default::default()
        };
        let listing = list_directory(tmp.path(), &options).unwrap();
        assert_eq!(
            names(&listing),
            vec!["..", ".git", "Archive", "docs", ".env", "paper.PDF", "report.txt"]
        );
    }

    #[test]
    fn show_only_dirs_drops_files() {
        let tmp = fixture();
        let options = ListOptions {
            show_only_dirs: true,
            ..Default::default()
        };
        let listing = list_directory(tmp.path(), &options).unwrap();
        assert!(listing.entries().iter().all(DirEntry::is_dir));
        assert_eq!(names(&listing), vec!["..", "Archive", "docs"]);
    }

    #[test]
    fn filter_applies_to_files_only() {
        let tmp = fixture();
        let filter = FilterPattern::new(["*.pdf"]).unwrap();
        let options = ListOptions {
            filter: Some(&filter),
            ..Default::default()
        };
        let listing = list_directory(tmp.path(), &options).unwrap();
        assert_eq!(names(&listing), vec!["..", "Archive", "docs", "paper.PDF"]);
    }

    #[test]
    fn no_parent_entry_at_sandbox_root() {
        let tmp = fixture();
        let options = ListOptions {
            sandbox: Some(tmp.path()),
            ..Default::default()
        };
        let listing = list_directory(tmp.path(), &options).unwrap();
        assert!(listing.by_real_name("..").is_none());

        let inner = list_directory(&tmp.path().join("docs"), &options).unwrap();
        assert_eq!(names(&inner), vec![".."]);
    }

    #[cfg(unix)]
    #[test]
    fn no_parent_entry_at_filesystem_root() {
        let listing = list_directory(Path::new("/"), &ListOptions::default()).unwrap();
        assert!(listing.by_real_name("..").is_none());
    }

    #[test]
    fn dir_icon_decorates_display_names() {
        let tmp = fixture();
        let icon = DirIcon::new("> ", IconPlacement::Prepend);
        let options = ListOptions {
            dir_icon: Some(&icon),
            ..Default::default()
        };
        let listing = list_directory(tmp.path(), &options).unwrap();
        let shown: Vec<&str> = listing.display_names().collect();
        assert_eq!(shown, vec!["> ..", "> Archive", "> docs", "paper.PDF", "report.txt"]);
        assert_eq!(listing.real_name("> docs"), Some("docs"));
    }

    #[test]
    fn listing_twice_is_identical() {
        let tmp = fixture();
        let first = list_directory(tmp.path(), &ListOptions::default()).unwrap();
        let second = list_directory(tmp.path(), &ListOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_listed_as_file() {
        let tmp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("link")).unwrap();
        let entries = read_directory(tmp.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_directory_is_listed_as_directory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("alias")).unwrap();
        let entries = read_directory(tmp.path()).unwrap();
        assert!(entries.iter().all(DirEntry::is_dir));
    }
}
