//! Navigation logic for fchooser.
//!
//! This module contains the [`chooser::FileChooser`] selection state machine,
//! the display/real name bijection of a [`listing::Listing`], and entry
//! [`filter`]ing/sorting.

pub mod chooser;
pub mod filter;
pub mod listing;
