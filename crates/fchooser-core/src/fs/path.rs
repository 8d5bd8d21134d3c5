//! Pure path arithmetic: ancestor breadcrumbs, sandbox containment and
//! the mapping between real paths and sandbox-relative display paths.
//!
//! Nothing here touches the filesystem except [`subpaths`] (file check)
//! and [`root_volumes`] (drive probing on Windows).

use std::path::{Component, Path, PathBuf};

/// The display form of the sandbox root itself.
pub const ROOT_MARKER: &str = std::path::MAIN_SEPARATOR_STR;

/// The parent-directory token rejected in filenames and used as the
/// synthetic "go up" listing entry.
pub const PARENT_TOKEN: &str = "..";

/// Lexically normalizes `path`: drops `.` components, resolves `..`
/// against the preceding component and never climbs above the root.
///
/// Symlinks are not resolved; use [`std::fs::canonicalize`] for that.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push(PARENT_TOKEN);
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Returns `path` and every ancestor up to the filesystem root, leaf first.
///
/// If `path` is a file, the walk starts at its containing directory. On
/// platforms with several root volumes the other volumes are appended
/// after the topmost ancestor.
pub fn subpaths(path: &Path) -> Vec<PathBuf> {
    let start = match path.parent() {
        Some(parent) if path.is_file() => parent,
        _ => path,
    };

    let mut paths: Vec<PathBuf> = start
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .collect();

    let top = paths.last().cloned();
    paths.extend(
        root_volumes()
            .into_iter()
            .filter(|volume| Some(volume) != top.as_ref()),
    );
    paths
}

/// Returns the mounted root volumes (drive letters on Windows).
#[cfg(windows)]
pub fn root_volumes() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|drive| drive.exists())
        .collect()
}

/// Returns the mounted root volumes. Unix has a single root, which is
/// already part of every ancestor walk.
#[cfg(not(windows))]
pub fn root_volumes() -> Vec<PathBuf> {
    Vec::new()
}

/// Returns `true` if `path` has a parent segment (it is not a root).
pub fn has_parent(path: &Path) -> bool {
    path.parent().is_some()
}

/// Returns `true` if `path` lies inside `root` (inclusive).
///
/// Comparison is per path component, so `/foo2` is not under `/foo`.
/// An unset root contains everything.
pub fn has_parent_path(path: &Path, root: Option<&Path>) -> bool {
    match root {
        None => true,
        Some(root) if root.as_os_str().is_empty() => true,
        Some(root) => path.starts_with(root),
    }
}

/// Converts a real path into its sandbox-relative display form.
///
/// The root itself becomes [`ROOT_MARKER`]; descendants become
/// `ROOT_MARKER` joined with the remainder. Paths outside `root`, and all
/// paths when `root` is unset, are returned unchanged.
pub fn strip_parent_path(path: &Path, root: Option<&Path>) -> PathBuf {
    let Some(root) = root.filter(|r| !r.as_os_str().is_empty()) else {
        return path.to_path_buf();
    };
    match path.strip_prefix(root) {
        Ok(rest) if rest.as_os_str().is_empty() => PathBuf::from(ROOT_MARKER),
        Ok(rest) => Path::new(ROOT_MARKER).join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Inverse of [`strip_parent_path`]: joins a display path onto `root`.
///
/// The result is only lexically joined; callers validate containment on
/// the canonical path afterwards.
pub fn expand_path(display: &Path, root: Option<&Path>) -> PathBuf {
    let Some(root) = root.filter(|r| !r.as_os_str().is_empty()) else {
        return display.to_path_buf();
    };
    let relative: PathBuf = display
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    if relative.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}

/// Returns `false` if `name` contains a path separator or is the `..` token.
///
/// The empty name is valid; it stands for "the directory itself".
pub fn is_valid_filename(name: &str) -> bool {
    !name.contains(std::path::is_separator)
        && !name.split(std::path::is_separator).any(|seg| seg == PARENT_TOKEN)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn normalize_drops_cur_dir_and_resolves_parent() {
        assert_eq!(
            normalize_path(Path::new("/home/./user/../other/")),
            PathBuf::from("/home/other")
        );
    }

    #[test]
    fn normalize_never_climbs_above_root() {
        assert_eq!(normalize_path(Path::new("/../../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn normalize_keeps_leading_parent_on_relative_paths() {
        assert_eq!(normalize_path(Path::new("../a/./b")), PathBuf::from("../a/b"));
    }

    #[test]
    fn subpaths_walks_leaf_to_root() {
        let paths = subpaths(Path::new("/nonexistent/a/b"));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/nonexistent/a/b"),
                PathBuf::from("/nonexistent/a"),
                PathBuf::from("/nonexistent"),
                PathBuf::from("/"),
            ]
        );
    }

    #[test]
    fn subpaths_of_file_starts_at_parent() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("notes.txt");
        fs::write(&file, "x").unwrap();

        let paths = subpaths(&file);
        assert_eq!(paths[0], tmp.path());
        assert_eq!(paths.last().unwrap(), Path::new("/"));
    }

    #[test]
    fn root_has_no_parent() {
        assert!(!has_parent(Path::new("/")));
        assert!(has_parent(Path::new("/docs")));
    }

    #[test]
    fn unset_root_contains_everything() {
        assert!(has_parent_path(Path::new("/etc"), None));
        assert!(has_parent_path(Path::new("/etc"), Some(Path::new(""))));
    }

    #[test]
    fn root_contains_itself_and_descendants() {
        let root = Path::new("/home/user");
        assert!(has_parent_path(Path::new("/home/user"), Some(root)));
        assert!(has_parent_path(Path::new("/home/user/docs/a"), Some(root)));
        assert!(!has_parent_path(Path::new("/home"), Some(root)));
    }

    #[test]
    fn containment_respects_segment_boundaries() {
        assert!(!has_parent_path(Path::new("/foo2"), Some(Path::new("/foo"))));
        assert!(!has_parent_path(
            Path::new("/home/username"),
            Some(Path::new("/home/user"))
        ));
    }

    #[test]
    fn strip_maps_root_to_marker() {
        let root = Path::new("/home/user");
        assert_eq!(strip_parent_path(root, Some(root)), PathBuf::from("/"));
        assert_eq!(
            strip_parent_path(Path::new("/home/user/docs"), Some(root)),
            PathBuf::from("/docs")
        );
    }

    #[test]
    fn strip_without_root_is_identity() {
        assert_eq!(
            strip_parent_path(Path::new("/home/user"), None),
            PathBuf::from("/home/user")
        );
    }

    #[test]
    fn strip_leaves_outside_paths_untouched() {
        assert_eq!(
            strip_parent_path(Path::new("/etc"), Some(Path::new("/home"))),
            PathBuf::from("/etc")
        );
    }

    #[test]
    fn expand_joins_display_path_onto_root() {
        let root = Path::new("/home/user");
        assert_eq!(expand_path(Path::new("/"), Some(root)), PathBuf::from("/home/user"));
        assert_eq!(
            expand_path(Path::new("/docs/2024"), Some(root)),
            PathBuf::from("/home/user/docs/2024")
        );
        assert_eq!(expand_path(Path::new("/docs"), None), PathBuf::from("/docs"));
    }

    #[test]
    fn strip_undoes_expand() {
        let root = Path::new("/srv/data");
        for display in ["/", "/a", "/a/b/c", "/with space/x.txt"] {
            let display = Path::new(display);
            assert_eq!(
                strip_parent_path(&expand_path(display, Some(root)), Some(root)),
                display
            );
        }
    }

    #[test]
    fn crafted_display_path_escapes_only_lexically() {
        let root = Path::new("/home/user");
        let expanded = expand_path(Path::new("/../../etc"), Some(root));
        assert!(!has_parent_path(&normalize_path(&expanded), Some(root)));
    }

    #[test]
    fn valid_filenames() {
        assert!(is_valid_filename(""));
        assert!(is_valid_filename("report.txt"));
        assert!(is_valid_filename("a..b"));
        assert!(is_valid_filename(".hidden"));
    }

    #[test]
    fn traversal_and_separators_are_rejected() {
        assert!(!is_valid_filename(".."));
        assert!(!is_valid_filename("../etc/passwd"));
        assert!(!is_valid_filename("a/b"));
        assert!(!is_valid_filename("/abs"));
    }
}
