use crate::error::{PatchError, Result};
use std::io::Write;
use std::path::Path;

/// Line terminator style of a target file.
///
/// Rules are written with `\n` line breaks, so CRLF files are matched in
/// normalised form and converted back on write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
	#[default]
	Lf,
	CrLf,
}

impl LineEnding {
	/// `CrLf` when every `\n` in `text` is preceded by `\r`.
	///
	/// Files with mixed endings are treated as `Lf` and matched byte for byte.
	pub fn detect(text: &str) -> Self {
		let newlines = text.matches('\n').count();
		if newlines > 0 && text.matches("\r\n").count() == newlines {
			LineEnding::CrLf
		} else {
			LineEnding::Lf
		}
	}

	/// Convert `text` to `\n` line breaks.
	pub fn normalize(self, text: &str) -> String {
		match self {
			LineEnding::Lf => text.to_string(),
			LineEnding::CrLf => text.replace("\r\n", "\n"),
		}
	}

	/// Convert `\n`-normalised text back to this style.
	pub fn restore(self, text: &str) -> String {
		match self {
			LineEnding::Lf => text.to_string(),
			LineEnding::CrLf => text.replace('\n', "\r\n"),
		}
	}
}

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
	let bytes = std::fs::read(path).map_err(|source| PatchError::FileReadError {
		path: path.to_path_buf(),
		source,
	})?;

	String::from_utf8(bytes).map_err(|source| PatchError::InvalidUtf8 {
		path: path.to_path_buf(),
		source,
	})
}

/// Replace the contents of `path` with `contents`.
///
/// The new contents go to a temp file in the same directory which is then
/// renamed over the target, so readers never see a half-written file. The
/// target's permissions are carried over when it already exists. Symlinks
/// are resolved first so the link survives and its target is updated.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
	let write_err = |source: std::io::Error| PatchError::FileWriteError {
		path: path.to_path_buf(),
		source,
	};

	let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

	let dir = match target.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
	tmp.write_all(contents.as_bytes()).map_err(write_err)?;
	tmp.as_file().sync_all().map_err(write_err)?;

	if let Ok(metadata) = std::fs::metadata(&target) {
		tmp.as_file()
			.set_permissions(metadata.permissions())
			.map_err(write_err)?;
	}

	tmp.persist(&target).map_err(|e| write_err(e.error))?;
	Ok(())
}
