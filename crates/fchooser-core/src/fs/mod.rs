//! File system abstractions for fchooser.
//!
//! This module provides the listing entry type ([`entry::DirEntry`]),
//! directory reads with the listing policy applied ([`ops::list_directory`])
//! and the pure path arithmetic used for sandboxing ([`path`]).

pub mod entry;
pub mod ops;
pub mod path;
