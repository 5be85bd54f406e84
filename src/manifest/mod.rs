//! Patch manifests for layout-patch.
//!
//! This module handles:
//! - TOML manifest parsing and validation
//! - The builtin layout manifest shipped with the binary

pub mod builtin;
pub mod parser;
pub mod types;

pub use builtin::{BUILTIN_ORIGIN, builtin_manifest};
pub use parser::{parse_manifest_file, parse_manifest_str};
pub use types::{FileEntry, Manifest, Rule};
