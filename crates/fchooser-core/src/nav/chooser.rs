//! The file chooser selection state machine.
//!
//! A [`FileChooser`] is either `Closed` (only the committed or default
//! selection is shown) or `Open` (the user edits a pending path and
//! filename). Every mutating call finishes by re-deriving the listing and
//! the commit-enablement flag, so the host can render [`FileChooser::view`]
//! right after any call.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::settings::{ChooserConfig, PatternSpec};
use crate::error::{ChooserError, ChooserResult};
use crate::event::{Command, SelectionStatus, View};
use crate::fs::entry::DirEntry;
use crate::fs::ops::{list_directory, ListOptions};
use crate::fs::path::{
    expand_path, has_parent_path, is_valid_filename, normalize_path, strip_parent_path, subpaths,
};
use crate::nav::filter::FilterPattern;
use crate::nav::listing::{DirIcon, Listing};

const NO_SELECTION_LABEL: &str = "No selection";

/// Whether the dialog is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

/// A committed path and filename. Both halves are always set together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    path: PathBuf,
    filename: String,
}

impl Selection {
    pub fn new(path: PathBuf, filename: String) -> Self {
        Self { path, filename }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The directory joined with the filename. An empty filename selects
    /// the directory itself.
    pub fn full_path(&self) -> PathBuf {
        join_filename(&self.path, &self.filename)
    }
}

/// Called with the chooser after every successful [`FileChooser::commit`].
pub type SelectionCallback = Box<dyn FnMut(&FileChooser)>;

/// A UI-agnostic file/folder chooser with optional sandboxing.
///
/// All paths held internally are canonical real paths; display paths
/// relative to the sandbox root exist only in [`View`] and
/// [`Command::PathChanged`].
///
/// # Examples
///
/// ```no_run
/// use fchooser_core::{ChooserConfig, FileChooser};
///
/// let mut chooser = FileChooser::new(&ChooserConfig::at("/home/user")).unwrap();
/// chooser.open();
/// chooser.navigate_to_path("/home/user/docs").unwrap();
/// chooser.pick_entry("report.txt").unwrap();
/// chooser.commit().unwrap();
/// assert!(chooser.selected().is_some());
/// ```
pub struct FileChooser {
    default_path: PathBuf,
    default_filename: String,
    pending_path: PathBuf,
    pending_filename: String,
    committed: Option<Selection>,
    sandbox: Option<PathBuf>,
    show_hidden: bool,
    show_only_dirs: bool,
    filter: Option<FilterPattern>,
    dir_icon: Option<DirIcon>,
    select_default: bool,
    new_only: bool,
    title: String,
    select_desc: String,
    change_desc: String,
    rows: usize,
    state: DialogState,
    listing: Listing,
    /// Directory `listing` was read from. Differs from `pending_path`
    /// while a failed listing leaves stale entries on screen.
    listed_path: PathBuf,
    commit_enabled: bool,
    warning: Option<String>,
    callback: Option<SelectionCallback>,
}

impl FileChooser {
    /// Builds a chooser from `config`, starting `Closed`.
    ///
    /// Without an explicit default path the sandbox root is used, and
    /// without a sandbox the current working directory.
    ///
    /// # Errors
    ///
    /// - [`ChooserError::InvalidPath`] if the default or sandbox path is not a directory.
    /// - [`ChooserError::ParentPath`] if the default path lies outside the sandbox.
    /// - [`ChooserError::InvalidFileName`] if the default filename is invalid.
    /// - [`ChooserError::InvalidPattern`] if the filter pattern does not compile.
    pub fn new(config: &ChooserConfig) -> ChooserResult<Self> {
        let cwd = std::env::current_dir()?;
        let sandbox = config
            .listing
            .sandbox_path
            .as_deref()
            .map(|root| resolve_dir(root, &cwd, None))
            .transpose()?;
        let default_path = match (&config.general.path, &sandbox) {
            (Some(path), _) => resolve_dir(path, &cwd, sandbox.as_deref())?,
            (None, Some(root)) => root.clone(),
            (None, None) => resolve_dir(&cwd, &cwd, None)?,
        };
        validate_filename(&config.general.filename)?;
        let filter = config
            .listing
            .filter_pattern
            .as_ref()
            .map(PatternSpec::compile)
            .transpose()?;

        let mut chooser = Self {
            pending_path: default_path.clone(),
            pending_filename: String::new(),
            default_path,
            default_filename: config.general.filename.clone(),
            committed: None,
            sandbox,
            show_hidden: config.general.show_hidden,
            show_only_dirs: config.listing.show_only_dirs,
            filter,
            dir_icon: config.ui.icon(),
            select_default: config.general.select_default,
            new_only: config.general.new_only,
            title: config.general.title.clone(),
            select_desc: config.ui.select_desc.clone(),
            change_desc: config.ui.change_desc.clone(),
            rows: config.ui.rows,
            state: DialogState::Closed,
            listing: Listing::default(),
            listed_path: PathBuf::new(),
            commit_enabled: false,
            warning: None,
            callback: None,
        };
        chooser.reset_state();
        tracing::debug!(path = %chooser.default_path.display(), "chooser created");
        Ok(chooser)
    }

    /// Opens the dialog, seeding the pending fields from the committed
    /// selection if there is one, else from the defaults. No-op when
    /// already open.
    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.seed_pending();
        self.state = DialogState::Open;
        tracing::debug!(path = %self.pending_path.display(), "dialog opened");
        self.rederive();
    }

    /// Moves the pending directory to `path`.
    ///
    /// Relative paths resolve against the current pending directory.
    ///
    /// # Errors
    ///
    /// - [`ChooserError::DialogClosed`] if the dialog is not open.
    /// - [`ChooserError::ParentPath`] if `path` lies outside the sandbox.
    /// - [`ChooserError::InvalidPath`] if `path` is not an existing directory.
    pub fn navigate_to_path(&mut self, path: impl AsRef<Path>) -> ChooserResult<()> {
        self.require_open()?;
        let path = resolve_dir(path.as_ref(), &self.pending_path, self.sandbox.as_deref())?;
        tracing::debug!(path = %path.display(), "navigate");
        self.pending_path = path;
        self.rederive();
        Ok(())
    }

    /// Handles a click on a listing entry, identified by its display name.
    ///
    /// Names resolve against the directory the listing was read from, which
    /// after a failed listing is not the pending directory. Directories are
    /// navigated into; a file becomes the pending filename and its directory
    /// the pending directory.
    /// An entry that has vanished since it was listed only re-derives the
    /// listing.
    ///
    /// # Errors
    ///
    /// - [`ChooserError::DialogClosed`] if the dialog is not open.
    /// - [`ChooserError::UnknownEntry`] if the name is not in the current listing.
    /// - [`ChooserError::ParentPath`] if a directory resolves outside the sandbox.
    pub fn pick_entry(&mut self, display_name: &str) -> ChooserResult<()> {
        self.require_open()?;
        let real_name = self
            .listing
            .real_name(display_name)
            .map(str::to_string)
            .ok_or_else(|| ChooserError::UnknownEntry(display_name.to_string()))?;
        let target = self.listed_path.join(&real_name);

        match std::fs::metadata(&target) {
            Ok(meta) if meta.is_dir() => match self.navigate_to_path(&target) {
                Err(ChooserError::InvalidPath(_)) => self.entry_vanished(&target),
                result => result,
            },
            Ok(meta) if meta.is_file() && !self.show_only_dirs => {
                tracing::debug!(filename = %real_name, "file picked");
                self.pending_path = self.listed_path.clone();
                self.pending_filename = real_name;
                self.rederive();
                Ok(())
            }
            _ => self.entry_vanished(&target),
        }
    }

    fn entry_vanished(&mut self, target: &Path) -> ChooserResult<()> {
        tracing::debug!(
            path = %target.display(),
            "picked entry is neither file nor directory, re-listing"
        );
        self.rederive();
        Ok(())
    }

    /// Sets the pending filename. Ignored in directory-only mode, where
    /// the pending filename is always empty.
    ///
    /// # Errors
    ///
    /// - [`ChooserError::DialogClosed`] if the dialog is not open.
    /// - [`ChooserError::InvalidFileName`] if `name` contains a separator or `..`.
    pub fn change_filename(&mut self, name: &str) -> ChooserResult<()> {
        self.require_open()?;
        validate_filename(name)?;
        if self.show_only_dirs {
            tracing::debug!("filename ignored in directory-only mode");
            return Ok(());
        }
        self.pending_filename = name.to_string();
        self.rederive();
        Ok(())
    }

    /// Commits the pending path and filename, closes the dialog and runs
    /// the registered callback.
    ///
    /// # Errors
    ///
    /// - [`ChooserError::DialogClosed`] if the dialog is not open.
    /// - [`ChooserError::CommitDisabled`] if [`commit_enabled`](Self::commit_enabled) is `false`.
    pub fn commit(&mut self) -> ChooserResult<()> {
        self.require_open()?;
        if !self.commit_enabled {
            return Err(ChooserError::CommitDisabled);
        }
        self.apply_selection();
        tracing::debug!(
            path = %self.pending_path.display(),
            filename = %self.pending_filename,
            "selection committed"
        );

        if let Some(mut callback) = self.callback.take() {
            callback(self);
            self.callback = Some(callback);
        }
        Ok(())
    }

    /// Closes the dialog and discards the pending fields. Committed and
    /// default values are untouched.
    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
        self.seed_pending();
        tracing::debug!("dialog cancelled");
        self.rederive();
    }

    /// Clears the committed selection, optionally replacing the defaults,
    /// and closes the dialog. With `select_default` the (new) defaults are
    /// committed right away.
    ///
    /// # Errors
    ///
    /// - [`ChooserError::ParentPath`] / [`ChooserError::InvalidPath`] for a bad `path`.
    /// - [`ChooserError::InvalidFileName`] for a bad `filename`.
    ///
    /// Nothing changes when an error is returned.
    pub fn reset(&mut self, path: Option<&Path>, filename: Option<&str>) -> ChooserResult<()> {
        let path = path
            .map(|p| resolve_dir(p, &self.default_path, self.sandbox.as_deref()))
            .transpose()?;
        if let Some(name) = filename {
            validate_filename(name)?;
        }

        if let Some(path) = path {
            self.default_path = path;
        }
        if let Some(name) = filename {
            self.default_filename = name.to_string();
        }
        self.reset_state();
        Ok(())
    }

    /// Re-reads the pending directory without changing any field.
    pub fn refresh(&mut self) {
        self.rederive();
    }

    /// Dispatches a host event to the matching transition.
    ///
    /// # Errors
    ///
    /// Whatever the dispatched transition returns.
    pub fn handle(&mut self, command: Command) -> ChooserResult<()> {
        match command {
            Command::Open => {
                self.open();
                Ok(())
            }
            Command::PathChanged(display) => {
                let path = expand_path(Path::new(&display), self.sandbox.as_deref());
                self.navigate_to_path(path)
            }
            Command::EntryPicked(name) => self.pick_entry(&name),
            Command::FilenameChanged(name) => self.change_filename(&name),
            Command::CommitRequested => self.commit(),
            Command::CancelRequested => {
                self.cancel();
                Ok(())
            }
            Command::Refresh => {
                self.refresh();
                Ok(())
            }
        }
    }

    /// Registers the callback run after every successful commit,
    /// replacing any previous one.
    pub fn register_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&FileChooser) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    fn require_open(&self) -> ChooserResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ChooserError::DialogClosed)
        }
    }

    fn seed_pending(&mut self) {
        let (path, filename) = match &self.committed {
            Some(selection) => (selection.path.clone(), selection.filename.clone()),
            None => (self.default_path.clone(), self.default_filename.clone()),
        };
        self.pending_path = path;
        self.pending_filename = if self.show_only_dirs {
            String::new()
        } else {
            filename
        };
    }

    fn reset_state(&mut self) {
        self.committed = None;
        self.state = DialogState::Closed;
        self.seed_pending();
        self.rederive();
        if self.select_default {
            self.apply_selection();
        }
    }

    fn apply_selection(&mut self) {
        self.committed = Some(Selection::new(
            self.pending_path.clone(),
            self.pending_filename.clone(),
        ));
        self.state = DialogState::Closed;
        self.recompute_commit();
    }

    fn rederive(&mut self) {
        self.refresh_listing();
        self.recompute_commit();
    }

    fn refresh_listing(&mut self) {
        let options = ListOptions {
            show_hidden: self.show_hidden,
            show_only_dirs: self.show_only_dirs,
            filter: self.filter.as_ref(),
            sandbox: self.sandbox.as_deref(),
            dir_icon: self.dir_icon.as_ref(),
        };
        match list_directory(&self.pending_path, &options) {
            Ok(listing) => {
                self.listing = listing;
                self.listed_path = self.pending_path.clone();
                self.warning = None;
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.pending_path.display(),
                    "listing failed, keeping previous entries: {e}"
                );
                self.warning = Some(e.to_string());
            }
        }
    }

    fn recompute_commit(&mut self) {
        self.commit_enabled = self.is_open() && self.can_commit();
    }

    fn can_commit(&self) -> bool {
        let name = self.pending_filename.as_str();
        let names_directory = if self.listed_path == self.pending_path {
            self.listing
                .by_real_name(name)
                .is_some_and(DirEntry::is_dir)
        } else {
            !name.is_empty() && self.pending_path.join(name).is_dir()
        };
        let unchanged = self
            .committed
            .as_ref()
            .is_some_and(|s| s.path == self.pending_path && s.filename == name);
        let filtered_out =
            !self.show_only_dirs && self.filter.as_ref().is_some_and(|f| !f.matches(name));
        let exists = self.new_only && !name.is_empty() && self.pending_path.join(name).is_file();

        !(names_directory || !is_valid_filename(name) || unchanged || filtered_out || exists)
    }

    fn display_path(&self, path: &Path) -> PathBuf {
        strip_parent_path(path, self.sandbox.as_deref())
    }

    /// Snapshot of everything the host renders.
    pub fn view(&self) -> View {
        let sandbox = self.sandbox.as_deref();
        let breadcrumbs = subpaths(&self.pending_path)
            .into_iter()
            .filter(|p| has_parent_path(p, sandbox))
            .map(|p| self.display_path(&p))
            .collect();
        let highlighted = self
            .listing
            .by_real_name(&self.pending_filename)
            .filter(|e| !e.is_dir())
            .map(|e| e.display_name().to_string());
        let (selection_label, selection_status) = match &self.committed {
            None => (NO_SELECTION_LABEL.to_string(), SelectionStatus::Unselected),
            Some(selection) => {
                let full = selection.full_path();
                let status = if full.is_file() {
                    SelectionStatus::Existing
                } else {
                    SelectionStatus::New
                };
                (self.display_path(&full).display().to_string(), status)
            }
        };
        let button_label = if !self.is_open() && self.committed.is_some() {
            &self.change_desc
        } else {
            &self.select_desc
        };

        View {
            title: self.title.clone(),
            dialog_open: self.is_open(),
            breadcrumbs,
            current_path: self.display_path(&self.pending_path),
            filename: self.pending_filename.clone(),
            filename_visible: !self.show_only_dirs,
            listing: self.listing.entries().to_vec(),
            highlighted,
            commit_enabled: self.commit_enabled,
            button_label: button_label.clone(),
            selection_label,
            selection_status,
            rows: self.rows,
            warning: self.warning.clone(),
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    /// The committed path and filename, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.committed.as_ref()
    }

    /// The committed path joined with the committed filename.
    pub fn selected(&self) -> Option<PathBuf> {
        self.committed.as_ref().map(Selection::full_path)
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.committed.as_ref().map(Selection::path)
    }

    pub fn selected_filename(&self) -> Option<&str> {
        self.committed.as_ref().map(Selection::filename)
    }

    /// The default path joined with the default filename.
    pub fn default(&self) -> PathBuf {
        join_filename(&self.default_path, &self.default_filename)
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Replaces the default directory and moves the pending directory there.
    ///
    /// # Errors
    ///
    /// [`ChooserError::ParentPath`] or [`ChooserError::InvalidPath`]; the
    /// chooser is unchanged on error.
    pub fn set_default_path(&mut self, path: impl AsRef<Path>) -> ChooserResult<()> {
        let path = resolve_dir(path.as_ref(), &self.default_path, self.sandbox.as_deref())?;
        self.default_path = path.clone();
        self.pending_path = path;
        self.rederive();
        Ok(())
    }

    pub fn default_filename(&self) -> &str {
        &self.default_filename
    }

    /// Replaces the default filename and the pending filename.
    ///
    /// # Errors
    ///
    /// [`ChooserError::InvalidFileName`]; the chooser is unchanged on error.
    pub fn set_default_filename(&mut self, name: &str) -> ChooserResult<()> {
        validate_filename(name)?;
        self.default_filename = name.to_string();
        if !self.show_only_dirs {
            self.pending_filename = name.to_string();
        }
        self.rederive();
        Ok(())
    }

    pub fn sandbox_path(&self) -> Option<&Path> {
        self.sandbox.as_deref()
    }

    /// Sets or clears the sandbox root and resets the chooser.
    ///
    /// # Errors
    ///
    /// - [`ChooserError::InvalidPath`] if the new root is not a directory.
    /// - [`ChooserError::ParentPath`] if the current default path lies outside it.
    pub fn set_sandbox_path(&mut self, sandbox: Option<&Path>) -> ChooserResult<()> {
        let sandbox = sandbox
            .map(|root| resolve_dir(root, &self.default_path, None))
            .transpose()?;
        ensure_inside(&self.default_path, sandbox.as_deref())?;
        self.sandbox = sandbox;
        self.reset_state();
        Ok(())
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn set_show_hidden(&mut self, show_hidden: bool) {
        self.show_hidden = show_hidden;
        self.rederive();
    }

    pub fn show_only_dirs(&self) -> bool {
        self.show_only_dirs
    }

    /// Switches directory-only mode and resets the chooser.
    pub fn set_show_only_dirs(&mut self, show_only_dirs: bool) {
        self.show_only_dirs = show_only_dirs;
        self.reset_state();
    }

    pub fn filter_pattern(&self) -> Option<&FilterPattern> {
        self.filter.as_ref()
    }

    /// Sets or clears the filename filter and resets the chooser.
    pub fn set_filter_pattern(&mut self, filter: Option<FilterPattern>) {
        self.filter = filter;
        self.reset_state();
    }

    pub fn dir_icon(&self) -> Option<&DirIcon> {
        self.dir_icon.as_ref()
    }

    pub fn set_dir_icon(&mut self, icon: Option<DirIcon>) {
        self.dir_icon = icon;
        self.rederive();
    }

    pub fn new_only(&self) -> bool {
        self.new_only
    }

    pub fn set_new_only(&mut self, new_only: bool) {
        self.new_only = new_only;
        self.recompute_commit();
    }

    pub fn select_default(&self) -> bool {
        self.select_default
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn select_desc(&self) -> &str {
        &self.select_desc
    }

    pub fn set_select_desc(&mut self, desc: impl Into<String>) {
        self.select_desc = desc.into();
    }

    pub fn change_desc(&self) -> &str {
        &self.change_desc
    }

    pub fn set_change_desc(&mut self, desc: impl Into<String>) {
        self.change_desc = desc.into();
    }

    /// Number of visible listing rows. A display hint only.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
    }

    pub fn pending_path(&self) -> &Path {
        &self.pending_path
    }

    pub fn pending_filename(&self) -> &str {
        &self.pending_filename
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Directory the current listing was read from.
    pub fn listed_path(&self) -> &Path {
        &self.listed_path
    }

    pub fn commit_enabled(&self) -> bool {
        self.commit_enabled
    }

    /// The error of the last failed listing attempt, cleared on success.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }
}

impl fmt::Debug for FileChooser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileChooser")
            .field("state", &self.state)
            .field("default_path", &self.default_path)
            .field("default_filename", &self.default_filename)
            .field("pending_path", &self.pending_path)
            .field("pending_filename", &self.pending_filename)
            .field("listed_path", &self.listed_path)
            .field("committed", &self.committed)
            .field("sandbox", &self.sandbox)
            .field("commit_enabled", &self.commit_enabled)
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FileChooser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FileChooser(path='{}', filename='{}', title='{}', show_hidden={}, \
             select_default={}, show_only_dirs={}",
            self.default_path.display(),
            self.default_filename,
            self.title,
            self.show_hidden,
            self.select_default,
            self.show_only_dirs,
        )?;
        if let Some(sandbox) = &self.sandbox {
            write!(f, ", sandbox_path='{}'", sandbox.display())?;
        }
        if let Some(filter) = &self.filter {
            write!(f, ", filter_pattern={:?}", filter.patterns().collect::<Vec<_>>())?;
        }
        write!(f, ")")
    }
}

fn join_filename(path: &Path, filename: &str) -> PathBuf {
    if filename.is_empty() {
        path.to_path_buf()
    } else {
        path.join(filename)
    }
}

fn validate_filename(name: &str) -> ChooserResult<()> {
    if is_valid_filename(name) {
        Ok(())
    } else {
        Err(ChooserError::InvalidFileName(name.to_string()))
    }
}

fn ensure_inside(path: &Path, sandbox: Option<&Path>) -> ChooserResult<()> {
    if has_parent_path(path, sandbox) {
        return Ok(());
    }
    Err(ChooserError::ParentPath {
        path: path.to_path_buf(),
        sandbox: sandbox.map(Path::to_path_buf).unwrap_or_default(),
    })
}

/// Resolves `path` (relative to `base`) to a canonical directory inside
/// `sandbox`.
///
/// Containment is checked on the canonical path, so symlinks cannot
/// escape. A path that cannot be canonicalized is checked lexically
/// first so that outside paths always report `ParentPath`.
fn resolve_dir(path: &Path, base: &Path, sandbox: Option<&Path>) -> ChooserResult<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let lexical = normalize_path(&joined);

    match dunce::canonicalize(&lexical) {
        Ok(canonical) if canonical.is_dir() => {
            ensure_inside(&canonical, sandbox)?;
            Ok(canonical)
        }
        _ => {
            ensure_inside(&lexical, sandbox)?;
            Err(ChooserError::InvalidPath(lexical))
        }
    }
}
