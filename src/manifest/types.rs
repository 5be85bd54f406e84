use crate::error::PatchError;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level patch manifest.
///
/// Files are processed in the order they appear.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
	#[serde(default)]
	pub files: Vec<FileEntry>,
}

/// One target file and the rules applied to it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
	/// Path of the target, relative to the run root.
	pub path: PathBuf,

	/// Short name used in logs and the default confirmation line.
	pub label: String,

	/// Line printed after the file has been rewritten.
	pub confirmation: Option<String>,

	/// Rules applied in order, each one seeing the previous one's output.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A single find/replace instruction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
	/// Human-readable summary, used in logs and errors.
	#[serde(default)]
	pub description: String,

	/// Literal text to replace (mutually exclusive with pattern).
	pub find: Option<String>,

	/// Regex to replace (mutually exclusive with find).
	pub pattern: Option<String>,

	/// Replacement text. For pattern rules, `$1`/`${name}` expand capture groups.
	#[serde(default)]
	pub replace: String,

	/// Let `.` match newlines in the pattern.
	#[serde(default)]
	pub dot_all: bool,

	/// Skip the rule when the text already contains this string.
	pub unless_contains: Option<String>,
}

impl FileEntry {
	/// The confirmation line for this file.
	pub fn confirmation_line(&self) -> String {
		match self.confirmation {
			Some(ref line) => line.clone(),
			None => format!("✅ {} updated", self.label),
		}
	}
}

impl Rule {
	/// Name used to refer to this rule in messages.
	pub fn display_name(&self) -> String {
		if !self.description.is_empty() {
			return self.description.clone();
		}
		self.find
			.as_deref()
			.or(self.pattern.as_deref())
			.unwrap_or_default()
			.lines()
			.next()
			.unwrap_or_default()
			.trim()
			.to_string()
	}

	/// Validate that exactly one matcher is set and the flags fit it.
	pub fn validate(&self) -> Result<(), PatchError> {
		match (&self.find, &self.pattern) {
			(Some(_), Some(_)) => Err(PatchError::MutuallyExclusive {
				option1: "find".to_string(),
				option2: "pattern".to_string(),
			}),
			(None, None) => Err(self.invalid("one of `find` or `pattern` is required")),
			(Some(needle), None) if needle.is_empty() => Err(self.invalid("`find` is empty")),
			(Some(_), None) if self.dot_all => {
				Err(self.invalid("`dot_all` only applies to `pattern` rules"))
			}
			(None, Some(pattern)) if pattern.is_empty() => {
				Err(self.invalid("`pattern` is empty"))
			}
			_ => match self.unless_contains {
				Some(ref guard) if guard.is_empty() => {
					Err(self.invalid("`unless_contains` is empty"))
				}
				_ => Ok(()),
			},
		}
	}

	fn invalid(&self, reason: &str) -> PatchError {
		PatchError::InvalidRule {
			rule: self.display_name(),
			reason: reason.to_string(),
		}
	}
}

impl Manifest {
	/// Validate every file entry and rule in this manifest.
	pub fn validate(&self) -> Result<(), PatchError> {
		for file in &self.files {
			if file.path.as_os_str().is_empty() {
				return Err(PatchError::InvalidRule {
					rule: file.label.clone(),
					reason: "file entry has an empty `path`".to_string(),
				});
			}
			for rule in &file.rules {
				rule.validate()?;
			}
		}
		Ok(())
	}

	/// Total number of rules across all files.
	pub fn rule_count(&self) -> usize {
		self.files.iter().map(|f| f.rules.len()).sum()
	}
}
