//! Applying manifests to files on disk.
//!
//! This module handles:
//! - Reading and transforming every target before anything is written
//! - Writing each target through a temp file and rename
//! - Confirmation lines and per-rule reports

pub mod patcher;
pub mod writer;

pub use patcher::{FileReport, PatchOptions, Patcher, StagedFile};
pub use writer::{LineEnding, read_text, write_atomic};
