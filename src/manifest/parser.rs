use crate::error::{PatchError, Result};
use crate::manifest::types::Manifest;
use std::path::Path;

/// Parse a manifest file from the given path.
pub fn parse_manifest_file(path: &Path) -> Result<Manifest> {
	let content =
		std::fs::read_to_string(path).map_err(|source| PatchError::ManifestReadError {
			path: path.to_path_buf(),
			source,
		})?;

	parse_manifest_str(&content, path)
}

/// Parse a manifest from a string. `origin` is only used in error messages.
pub fn parse_manifest_str(content: &str, origin: &Path) -> Result<Manifest> {
	let manifest: Manifest =
		toml::from_str(content).map_err(|source| PatchError::ManifestParseError {
			path: origin.to_path_buf(),
			source,
		})?;

	manifest.validate()?;

	Ok(manifest)
}
