use crate::error::{PatchError, Result};
use crate::manifest::{FileEntry, Manifest};
use crate::patch::writer::{LineEnding, read_text, write_atomic};
use crate::rules::{RuleOutcome, apply_rules, compile_rules};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Switches for a patch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOptions {
	/// Transform and report, but write nothing.
	pub dry_run: bool,

	/// Treat a rule that matched nothing (and was not guarded) as an error.
	pub strict: bool,
}

/// A file that has been read and transformed but not yet written.
#[derive(Debug, Clone)]
pub struct StagedFile {
	/// Path as written in the manifest.
	pub path: PathBuf,

	/// Path on disk (root joined with `path`).
	pub target: PathBuf,

	/// Manifest label.
	pub label: String,

	/// Line printed once the file is written.
	pub confirmation: String,

	/// Line endings of the file on disk.
	pub line_ending: LineEnding,

	/// True when the rules changed the text.
	pub changed: bool,

	/// The transformed text, in the file's own line endings.
	pub contents: String,

	/// One entry per rule, in order.
	pub outcomes: Vec<RuleOutcome>,
}

/// What happened to one file during a run.
#[derive(Debug, Clone)]
pub struct FileReport {
	pub path: PathBuf,
	pub label: String,
	pub changed: bool,
	pub written: bool,
	pub outcomes: Vec<RuleOutcome>,
}

impl StagedFile {
	/// Total replacements across all rules.
	pub fn replacements(&self) -> usize {
		self.outcomes.iter().map(|o| o.matches).sum()
	}

	fn into_report(self, written: bool) -> FileReport {
		FileReport {
			path: self.path,
			label: self.label,
			changed: self.changed,
			written,
			outcomes: self.outcomes,
		}
	}
}

/// Applies manifests to files below a root directory.
#[derive(Debug, Clone)]
pub struct Patcher {
	root: PathBuf,
	options: PatchOptions,
}

impl Patcher {
	pub fn new(root: impl Into<PathBuf>, options: PatchOptions) -> Self {
		Patcher {
			root: root.into(),
			options,
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Read and transform every file in manifest order.
	///
	/// Nothing is written here, so any read, encoding or pattern error leaves
	/// every target untouched.
	pub fn stage(&self, manifest: &Manifest) -> Result<Vec<StagedFile>> {
		let staged = manifest
			.files
			.iter()
			.map(|entry| self.stage_file(entry))
			.collect::<Result<Vec<_>>>()?;

		for file in &staged {
			for outcome in file.outcomes.iter().filter(|o| o.is_unmatched()) {
				if self.options.strict {
					return Err(PatchError::UnmatchedRule {
						path: file.path.clone(),
						rule: outcome.rule.clone(),
					});
				}
				log::warn!(
					"{}: rule `{}` matched nothing",
					file.path.display(),
					outcome.rule
				);
			}
		}

		Ok(staged)
	}

	fn stage_file(&self, entry: &FileEntry) -> Result<StagedFile> {
		let target = self.root.join(&entry.path);
		let rules = compile_rules(&entry.rules)?;
		let raw = read_text(&target)?;

		let line_ending = LineEnding::detect(&raw);
		if line_ending == LineEnding::Lf && raw.contains("\r\n") {
			log::warn!(
				"{}: mixed line endings, multi-line rules may not match",
				entry.path.display()
			);
		}

		let original = line_ending.normalize(&raw);
		let (contents, outcomes) = apply_rules(&original, &rules);

		let staged = StagedFile {
			path: entry.path.clone(),
			target,
			label: entry.label.clone(),
			confirmation: entry.confirmation_line(),
			line_ending,
			changed: contents != original,
			contents: line_ending.restore(&contents),
			outcomes,
		};
		log::info!(
			"{}: {} rule(s), {} replacement(s)",
			staged.label,
			staged.outcomes.len(),
			staged.replacements()
		);
		Ok(staged)
	}

	/// Write staged files in order, printing each confirmation to `out`.
	///
	/// Stops at the first failure; files written before it keep their new
	/// contents.
	pub fn commit(&self, staged: Vec<StagedFile>, out: &mut dyn Write) -> Result<Vec<FileReport>> {
		let mut reports = Vec::with_capacity(staged.len());

		for file in staged {
			write_atomic(&file.target, &file.contents)?;
			writeln!(out, "{}", file.confirmation)
				.map_err(|source| PatchError::OutputError { source })?;
			reports.push(file.into_report(true));
		}

		Ok(reports)
	}

	/// Stage and commit `manifest`. In dry-run mode only stage and describe.
	pub fn run(&self, manifest: &Manifest, out: &mut dyn Write) -> Result<Vec<FileReport>> {
		let staged = self.stage(manifest)?;

		if !self.options.dry_run {
			return self.commit(staged, out);
		}

		let mut reports = Vec::with_capacity(staged.len());
		for file in staged {
			let verb = if file.changed { "would update" } else { "unchanged" };
			writeln!(
				out,
				"{verb} {} ({} replacement(s))",
				file.path.display(),
				file.replacements()
			)
			.map_err(|source| PatchError::OutputError { source })?;
			reports.push(file.into_report(false));
		}
		Ok(reports)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::manifest::Rule;
	use std::fs;

	fn exact(find: &str, replace: &str) -> Rule {
		Rule {
			find: Some(find.to_string()),
			replace: replace.to_string(),
			..Default::default()
		}
	}

	fn entry(path: &str, label: &str, rules: Vec<Rule>) -> FileEntry {
		FileEntry {
			path: PathBuf::from(path),
			label: label.to_string(),
			confirmation: None,
			rules,
		}
	}

	#[test]
	fn test_run_rewrites_and_confirms_in_order() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.tsx"), "p-4 p-4").unwrap();
		fs::write(dir.path().join("b.tsx"), "bg-dark").unwrap();

		let manifest = Manifest {
			files: vec![
				entry("a.tsx", "A", vec![exact("p-4", "p-3")]),
				entry("b.tsx", "B", vec![exact("bg-dark", "bg-light")]),
			],
		};

		let mut out = Vec::new();
		let reports = Patcher::new(dir.path(), PatchOptions::default())
			.run(&manifest, &mut out)
			.unwrap();

		assert_eq!(fs::read_to_string(dir.path().join("a.tsx")).unwrap(), "p-3 p-3");
		assert_eq!(fs::read_to_string(dir.path().join("b.tsx")).unwrap(), "bg-light");
		assert_eq!(String::from_utf8(out).unwrap(), "✅ A updated\n✅ B updated\n");
		assert_eq!(reports[0].outcomes[0].matches, 2);
		assert!(reports.iter().all(|r| r.written && r.changed));
	}

	#[test]
	fn test_crlf_file_matches_multiline_rule() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(
			dir.path().join("a.tsx"),
			"  return (\r\n    <div className=\"bg-dark\">\r\n",
		)
		.unwrap();

		let manifest = Manifest {
			files: vec![entry(
				"a.tsx",
				"A",
				vec![exact(
					"return (\n    <div className=\"bg-dark\">",
					"return (\n    <div style={{ backgroundColor: bgColor }}>",
				)],
			)],
		};

		let mut out = Vec::new();
		let reports = Patcher::new(dir.path(), PatchOptions::default())
			.run(&manifest, &mut out)
			.unwrap();

		assert_eq!(reports[0].outcomes[0].matches, 1);
		assert_eq!(
			fs::read_to_string(dir.path().join("a.tsx")).unwrap(),
			"  return (\r\n    <div style={{ backgroundColor: bgColor }}>\r\n"
		);
	}

	#[test]
	fn test_dry_run_writes_nothing() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.tsx"), "p-4").unwrap();

		let manifest = Manifest {
			files: vec![entry("a.tsx", "A", vec![exact("p-4", "p-3")])],
		};
		let options = PatchOptions {
			dry_run: true,
			..Default::default()
		};

		let mut out = Vec::new();
		let reports = Patcher::new(dir.path(), options)
			.run(&manifest, &mut out)
			.unwrap();

		assert_eq!(fs::read_to_string(dir.path().join("a.tsx")).unwrap(), "p-4");
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"would update a.tsx (1 replacement(s))\n"
		);
		assert!(!reports[0].written);
	}

	#[test]
	fn test_missing_later_file_leaves_earlier_untouched() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.tsx"), "p-4").unwrap();

		let manifest = Manifest {
			files: vec![
				entry("a.tsx", "A", vec![exact("p-4", "p-3")]),
				entry("missing.tsx", "Missing", vec![exact("x", "y")]),
			],
		};

		let mut out = Vec::new();
		let result = Patcher::new(dir.path(), PatchOptions::default()).run(&manifest, &mut out);

		assert!(matches!(result, Err(PatchError::FileReadError { .. })));
		assert_eq!(fs::read_to_string(dir.path().join("a.tsx")).unwrap(), "p-4");
		assert!(out.is_empty());
	}

	#[test]
	fn test_unmatched_rule_tolerated_by_default() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.tsx"), "p-4").unwrap();

		let manifest = Manifest {
			files: vec![entry(
				"a.tsx",
				"A",
				vec![exact("absent", "x"), exact("p-4", "p-3")],
			)],
		};

		let mut out = Vec::new();
		let reports = Patcher::new(dir.path(), PatchOptions::default())
			.run(&manifest, &mut out)
			.unwrap();

		assert_eq!(fs::read_to_string(dir.path().join("a.tsx")).unwrap(), "p-3");
		assert!(reports[0].outcomes[0].is_unmatched());
	}

	#[test]
	fn test_unmatched_rule_fails_in_strict_mode() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.tsx"), "p-4").unwrap();

		let manifest = Manifest {
			files: vec![entry(
				"a.tsx",
				"A",
				vec![exact("p-4", "p-3"), exact("absent", "x")],
			)],
		};
		let options = PatchOptions {
			strict: true,
			..Default::default()
		};

		let mut out = Vec::new();
		match Patcher::new(dir.path(), options).run(&manifest, &mut out) {
			Err(PatchError::UnmatchedRule { rule, .. }) => assert_eq!(rule, "absent"),
			other => panic!("Expected UnmatchedRule error, got {other:?}"),
		}
		assert_eq!(fs::read_to_string(dir.path().join("a.tsx")).unwrap(), "p-4");
	}

	#[test]
	fn test_guarded_rule_not_unmatched_in_strict_mode() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.tsx"), "import x; useAppSelector").unwrap();

		let guarded = Rule {
			unless_contains: Some("useAppSelector".to_string()),
			..exact("import x;", "import x;\nimport y;")
		};
		let manifest = Manifest {
			files: vec![entry("a.tsx", "A", vec![guarded])],
		};
		let options = PatchOptions {
			strict: true,
			..Default::default()
		};

		let mut out = Vec::new();
		let reports = Patcher::new(dir.path(), options)
			.run(&manifest, &mut out)
			.unwrap();
		assert!(reports[0].outcomes[0].skipped);
		assert!(!reports[0].changed);
	}
}
