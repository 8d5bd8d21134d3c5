//! Sorting and filtering for listing entries.

use glob::{MatchOptions, Pattern};

use crate::error::{ChooserError, ChooserResult};
use crate::fs::entry::DirEntry;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// An ordered set of glob patterns. A name matches if any pattern does.
///
/// Matching is case-insensitive, so `*.PDF` matches `report.pdf`.
///
/// # Examples
///
/// ```
/// use fchooser_core::FilterPattern;
///
/// let filter = FilterPattern::new(["*.pdf", "*.txt"]).unwrap();
/// assert!(filter.matches("Report.PDF"));
/// assert!(!filter.matches("image.png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPattern {
    patterns: Vec<Pattern>,
}

impl FilterPattern {
    /// Compiles every pattern.
    ///
    /// # Errors
    ///
    /// [`ChooserError::InvalidPattern`] if a pattern is not a valid glob or
    /// the set is empty.
    pub fn new<I, S>(patterns: I) -> ChooserResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| ChooserError::InvalidPattern(format!("{p}: {e}")))
            })
            .collect::<ChooserResult<Vec<_>>>()?;

        if patterns.is_empty() {
            return Err(ChooserError::InvalidPattern("empty pattern list".to_string()));
        }
        Ok(Self { patterns })
    }

    /// Returns `true` if `name` matches at least one pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(name, MATCH_OPTIONS))
    }

    /// The source text of each pattern, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Pattern::as_str)
    }
}

/// Orders entries as: parent entry, directories, files.
///
/// Directories and files are each sorted lexicographically by real name.
/// Returns a **new** `Vec`; the input slice is never mutated.
pub fn sort_entries(entries: &[DirEntry]) -> Vec<DirEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        b.is_parent()
            .cmp(&a.is_parent())
            .then_with(|| b.is_dir().cmp(&a.is_dir()))
            .then_with(|| a.real_name().cmp(b.real_name()))
    });
    sorted
}

/// Drops files whose name matches no pattern. Directories always pass so
/// they remain navigable.
pub fn filter_by_pattern(entries: &[DirEntry], filter: &FilterPattern) -> Vec<DirEntry> {
    entries
        .iter()
        .filter(|e| e.is_dir() || filter.matches(e.real_name()))
        .cloned()
        .collect()
}

/// Filters out hidden entries when `show_hidden` is `false`.
///
/// When `show_hidden` is `true` all entries are returned unchanged.
pub fn filter_hidden(entries: &[DirEntry], show_hidden: bool) -> Vec<DirEntry> {
    if show_hidden {
        return entries.to_vec();
    }
    entries.iter().filter(|e| !e.is_hidden()).cloned().collect()
}

/// Keeps only directories.
pub fn filter_dirs(entries: &[DirEntry]) -> Vec<DirEntry> {
    entries.iter().filter(|e| e.is_dir()).cloned().collect()
}
