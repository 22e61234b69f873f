//! Rendering and persistence of finished reports.
//!
//! # Submodules
//!
//! - [`console`]: ranked sections as plain text for the terminal
//! - [`json`]: pretty-printed JSON files grouped by date

pub mod console;
pub mod json;
