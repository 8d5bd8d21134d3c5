//! Configuration management for fchooser.
//!
//! Defaults, listing policy and captions ([`settings::ChooserConfig`]) can be
//! stored as a TOML file and loaded before the chooser is built.

pub mod settings;
