use crate::error::Result;
use crate::manifest::parser::parse_manifest_str;
use crate::manifest::types::Manifest;
use std::path::Path;

/// Name reported for the embedded manifest in errors and `manifest show`.
pub const BUILTIN_ORIGIN: &str = "<builtin:layout.toml>";

const LAYOUT_MANIFEST: &str = include_str!("../../manifests/layout.toml");

/// The layout refresh manifest shipped with the binary.
///
/// Touches the sidebar, the page header and the dashboard layout, in that order.
pub fn builtin_manifest() -> Result<Manifest> {
	parse_manifest_str(LAYOUT_MANIFEST, Path::new(BUILTIN_ORIGIN))
}
