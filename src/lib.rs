//! layout-patch - apply a versioned find/replace manifest to source files.
//!
//! This library provides the core functionality for layout-patch, including:
//! - Manifest parsing and validation (plus the builtin layout manifest)
//! - Exact and regex rule compilation, application and match counting
//! - Staged, temp-file-and-rename writes with per-file confirmations
//!
//! # Example
//!
//! ```no_run
//! use layout_patch::manifest::builtin_manifest;
//! use layout_patch::patch::{PatchOptions, Patcher};
//!
//! let manifest = builtin_manifest().unwrap();
//! let patcher = Patcher::new(".", PatchOptions::default());
//! let reports = patcher.run(&manifest, &mut std::io::stdout()).unwrap();
//!
//! for report in &reports {
//!     println!("{}: changed = {}", report.label, report.changed);
//! }
//! ```

pub mod error;
pub mod manifest;
pub mod patch;
pub mod rules;

pub use error::{PatchError, Result};
