//! UpdateProgress - keep a course progress table in a README up to date
//!
//! Reads a `progress.json` course record, renders it with [`progresscore`]
//! and replaces the region between the progress markers of a markdown
//! document.
//!
//! ```text
//! # Course
//!
//! [//]: # (Progress algo begin)
//! ...generated tables...
//! [//]: # (Progress algo end)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use updateprogress::{UpdateOptions, update_document};
//!
//! let outcome = update_document(&UpdateOptions {
//!     progress_path: "progress.json".into(),
//!     readme_path: "README.md".into(),
//!     section: "Progress".into(),
//!     dry_run: false,
//! })?;
//! ```

pub mod cli;
pub mod config;
mod update;

pub use update::{UpdateOptions, UpdateOutcome, load_progress_data, render_progress_file, update_document};

/// Default progress file, relative to the working directory
pub const DEFAULT_PROGRESS_FILE: &str = "progress.json";

/// Default document, relative to the working directory
pub const DEFAULT_README_FILE: &str = "README.md";
