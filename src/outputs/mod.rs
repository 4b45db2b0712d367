//! Console renderings of the store for the CLI.
//!
//! # Submodules
//!
//! - [`text`]: human-readable listing with the featured article first
//! - [`json`]: the snapshot and UI state as pretty-printed JSON

pub mod json;
pub mod text;
