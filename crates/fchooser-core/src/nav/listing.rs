//! One directory listing with a guaranteed 1:1 mapping between display
//! names and real names.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::fs::entry::DirEntry;

/// Where the directory marker goes relative to the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPlacement {
    #[default]
    Prepend,
    Append,
}

/// A marker glyph added to directory display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirIcon {
    marker: String,
    placement: IconPlacement,
}

impl DirIcon {
    pub fn new(marker: impl Into<String>, placement: IconPlacement) -> Self {
        Self {
            marker: marker.into(),
            placement,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn placement(&self) -> IconPlacement {
        self.placement
    }

    fn decorate(&self, name: &str) -> String {
        match self.placement {
            IconPlacement::Prepend => format!("{}{}", self.marker, name),
            IconPlacement::Append => format!("{}{}", name, self.marker),
        }
    }
}

/// An ordered listing whose display names are unique.
///
/// If two entries would render identically (for example a file literally
/// named like a decorated directory), the first one in listing order keeps
/// its name and later ones get the lowest free ` (n)` suffix, n >= 2. A
/// suffixed name never takes the natural name of another entry, so a file
/// really called `x (2)` keeps displaying as `x (2)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<DirEntry>,
    by_display: HashMap<String, usize>,
    by_real: HashMap<String, usize>,
}

impl Listing {
    /// Builds a listing from already ordered entries, decorating
    /// directories with `icon` when given.
    pub fn new(entries: Vec<DirEntry>, icon: Option<&DirIcon>) -> Self {
        let decorated: Vec<(DirEntry, String)> = entries
            .into_iter()
            .map(|entry| {
                let base = match icon {
                    Some(icon) if entry.is_dir() => icon.decorate(entry.display_name()),
                    _ => entry.display_name().to_string(),
                };
                (entry, base)
            })
            .collect();
        let natural: HashSet<String> = decorated.iter().map(|(_, base)| base.clone()).collect();

        let mut listing = Self::default();
        for (entry, base) in decorated {
            let display = listing.unique_display_name(base, &natural);
            let index = listing.entries.len();
            listing.by_display.insert(display.clone(), index);
            listing.by_real.insert(entry.real_name().to_string(), index);
            listing.entries.push(entry.with_display_name(display));
        }
        listing
    }

    fn unique_display_name(&self, base: String, natural: &HashSet<String>) -> String {
        if !self.by_display.contains_key(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base} ({n})"))
            .find(|candidate| {
                !self.by_display.contains_key(candidate) && !natural.contains(candidate)
            })
            .unwrap_or(base)
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by the name the user saw.
    pub fn by_display_name(&self, display: &str) -> Option<&DirEntry> {
        self.by_display.get(display).map(|&i| &self.entries[i])
    }

    /// Looks up an entry by its on-disk name.
    pub fn by_real_name(&self, real: &str) -> Option<&DirEntry> {
        self.by_real.get(real).map(|&i| &self.entries[i])
    }

    /// Resolves a display name back to the on-disk name.
    pub fn real_name(&self, display: &str) -> Option<&str> {
        self.by_display_name(display).map(DirEntry::real_name)
    }

    /// Resolves an on-disk name to what the user sees.
    pub fn display_name(&self, real: &str) -> Option<&str> {
        self.by_real_name(real).map(DirEntry::display_name)
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(DirEntry::display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::EntryKind;

    fn dir(name: &str) -> DirEntry {
        DirEntry::new(name.to_string(), EntryKind::Directory)
    }

    fn file(name: &str) -> DirEntry {
        DirEntry::new(name.to_string(), EntryKind::File)
    }

    #[test]
    fn plain_listing_maps_names_to_themselves() {
        let listing = Listing::new(vec![dir("src"), file("a.txt")], None);
        assert_eq!(listing.real_name("src"), Some("src"));
        assert_eq!(listing.display_name("a.txt"), Some("a.txt"));
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn prepended_icon_decorates_directories_only() {
        let icon = DirIcon::new("\u{1F4C1} ", IconPlacement::Prepend);
        let listing = Listing::new(vec![DirEntry::parent(), dir("src"), file("a.txt")], Some(&icon));

        let names: Vec<&str> = listing.display_names().collect();
        assert_eq!(names, vec!["\u{1F4C1} ..", "\u{1F4C1} src", "a.txt"]);
        assert_eq!(listing.real_name("\u{1F4C1} src"), Some("src"));
        assert_eq!(listing.real_name("src"), None);
    }

    #[test]
    fn appended_icon_goes_after_name() {
        let icon = DirIcon::new("/", IconPlacement::Append);
        let listing = Listing::new(vec![dir("docs")], Some(&icon));
        assert_eq!(listing.display_name("docs"), Some("docs/"));
    }

    #[test]
    fn colliding_display_names_are_suffixed() {
        let icon = DirIcon::new("[D] ", IconPlacement::Prepend);
        let listing = Listing::new(vec![dir("x"), file("[D] x")], Some(&icon));

        assert_eq!(listing.real_name("[D] x"), Some("x"));
        assert_eq!(listing.real_name("[D] x (2)"), Some("[D] x"));
        assert_eq!(listing.display_name("[D] x"), Some("[D] x (2)"));
    }

    #[test]
    fn suffix_skips_names_owned_by_later_entries() {
        let icon = DirIcon::new("[d] ", IconPlacement::Prepend);
        let listing = Listing::new(vec![dir("x"), file("[d] x"), file("[d] x (2)")], Some(&icon));

        assert_eq!(listing.display_name("x"), Some("[d] x"));
        assert_eq!(listing.display_name("[d] x"), Some("[d] x (3)"));
        assert_eq!(listing.display_name("[d] x (2)"), Some("[d] x (2)"));
        assert_eq!(listing.len(), 3);
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let listing = Listing::new(vec![file("a")], None);
        assert!(listing.by_display_name("b").is_none());
        assert!(listing.by_real_name("b").is_none());
    }

    #[test]
    fn empty_listing() {
        let listing = Listing::default();
        assert!(listing.is_empty());
        assert_eq!(listing.entries().len(), 0);
    }
}
