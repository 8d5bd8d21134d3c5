//! Chooser configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty file (or [`ChooserConfig::default`])
//! yields a chooser rooted at the current working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChooserError, ChooserResult};
use crate::nav::filter::FilterPattern;
use crate::nav::listing::{DirIcon, IconPlacement};

/// Top-level chooser configuration.
///
/// Call [`ChooserConfig::load`] to read from a TOML path, then hand the
/// result to [`FileChooser::new`](crate::FileChooser::new).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChooserConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl ChooserConfig {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`ChooserError::NotFound`] if the file does not exist.
    /// - [`ChooserError::PermissionDenied`] if the file is not readable.
    /// - [`ChooserError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> ChooserResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ChooserError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                ChooserError::PermissionDenied(path.to_path_buf())
            }
            _ => ChooserError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| ChooserError::ConfigParse(e.to_string()))
    }

    /// Shorthand for a config whose default directory is `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            general: GeneralConfig {
                path: Some(path.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Default selection and behaviour flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default directory. Falls back to the sandbox root, then the
    /// current working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub show_hidden: bool,
    /// Commit the defaults immediately on creation and reset.
    #[serde(default)]
    pub select_default: bool,
    /// Refuse to commit a target that already exists as a file.
    #[serde(default)]
    pub new_only: bool,
}

/// What the directory listing shows and where navigation may go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default)]
    pub show_only_dirs: bool,
    #[serde(default)]
    pub filter_pattern: Option<PatternSpec>,
    #[serde(default)]
    pub sandbox_path: Option<PathBuf>,
}

/// Captions and display hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_select_desc")]
    pub select_desc: String,
    #[serde(default = "default_change_desc")]
    pub change_desc: String,
    #[serde(default)]
    pub dir_icon: Option<String>,
    #[serde(default)]
    pub dir_icon_placement: IconPlacement,
    #[serde(default = "default_rows")]
    pub rows: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            select_desc: default_select_desc(),
            change_desc: default_change_desc(),
            dir_icon: None,
            dir_icon_placement: IconPlacement::default(),
            rows: default_rows(),
        }
    }
}

impl UiConfig {
    /// The configured directory marker, if any.
    pub fn icon(&self) -> Option<DirIcon> {
        self.dir_icon
            .as_ref()
            .map(|marker| DirIcon::new(marker.clone(), self.dir_icon_placement))
    }
}

/// A filter pattern as written in TOML: one glob or a list of globs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    One(String),
    Many(Vec<String>),
}

impl PatternSpec {
    /// Compiles the globs.
    ///
    /// # Errors
    ///
    /// [`ChooserError::InvalidPattern`] if any glob is malformed or the
    /// list is empty.
    pub fn compile(&self) -> ChooserResult<FilterPattern> {
        match self {
            Self::One(pattern) => FilterPattern::new([pattern]),
            Self::Many(patterns) => FilterPattern::new(patterns),
        }
    }
}

fn default_select_desc() -> String {
    "Select".to_string()
}

fn default_change_desc() -> String {
    "Change".to_string()
}

fn default_rows() -> usize {
    10
}
