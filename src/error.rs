use std::path::PathBuf;

/// Library-level structured errors for layout-patch.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
	#[error("Failed to read manifest: {path}")]
	ManifestReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse manifest: {path}")]
	ManifestParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("Invalid rule `{rule}`: {reason}")]
	InvalidRule { rule: String, reason: String },

	#[error("Failed to read target file: {path}")]
	FileReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Target file is not valid UTF-8: {path}")]
	InvalidUtf8 {
		path: PathBuf,
		#[source]
		source: std::string::FromUtf8Error,
	},

	#[error("Failed to write target file: {path}")]
	FileWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write to output")]
	OutputError {
		#[source]
		source: std::io::Error,
	},

	#[error("Rule `{rule}` matched nothing in {path}")]
	UnmatchedRule { path: PathBuf, rule: String },
}

/// Result type alias using PatchError.
pub type Result<T> = std::result::Result<T, PatchError>;
