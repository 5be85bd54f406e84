use crate::error::{PatchError, Result};
use crate::manifest::Rule;
use regex::{Regex, RegexBuilder};

/// How a compiled rule finds its target.
#[derive(Debug)]
pub enum RuleKind {
	/// Every literal occurrence of `needle`.
	Exact { needle: String },

	/// Every match of `regex`; the replacement may reference capture groups.
	Pattern { regex: Regex },
}

/// A rule ready to be applied to text.
#[derive(Debug)]
pub struct CompiledRule {
	/// Name used in logs and errors.
	pub name: String,

	/// The matcher.
	pub kind: RuleKind,

	/// Replacement text or template.
	pub replacement: String,

	/// Skip the rule when the text already contains this.
	pub guard: Option<String>,
}

impl CompiledRule {
	/// Compile a rule from its manifest form.
	pub fn from_rule(rule: &Rule) -> Result<Self> {
		rule.validate()?;

		let kind = match rule.pattern {
			Some(ref pattern) => {
				let regex = compile_regex(pattern, rule.dot_all)?;
				check_template(&regex, &rule.replace).map_err(|reason| {
					PatchError::InvalidRule {
						rule: rule.display_name(),
						reason,
					}
				})?;
				RuleKind::Pattern { regex }
			}
			None => RuleKind::Exact {
				needle: rule.find.clone().unwrap_or_default(),
			},
		};

		Ok(CompiledRule {
			name: rule.display_name(),
			kind,
			replacement: rule.replace.clone(),
			guard: rule.unless_contains.clone(),
		})
	}

	/// Count the non-overlapping occurrences this rule would replace.
	pub fn count_matches(&self, text: &str) -> usize {
		match self.kind {
			RuleKind::Exact { ref needle } => text.matches(needle.as_str()).count(),
			RuleKind::Pattern { ref regex } => regex.find_iter(text).count(),
		}
	}

	/// Whether the guard string is already present in `text`.
	pub fn is_guarded(&self, text: &str) -> bool {
		self.guard
			.as_deref()
			.is_some_and(|guard| text.contains(guard))
	}
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str, dot_all: bool) -> Result<Regex> {
	RegexBuilder::new(pattern)
		.dot_matches_new_line(dot_all)
		.build()
		.map_err(|source| PatchError::InvalidRegex {
			pattern: pattern.to_string(),
			source,
		})
}

/// Capture group references in a replacement template.
///
/// Follows the regex crate's expansion: `$$` is a literal `$`, `${name}` runs
/// to the closing brace, `$name` takes the longest run of `[_0-9A-Za-z]`, and
/// any other `$` is literal.
fn template_refs(template: &str) -> Vec<&str> {
	let mut refs = Vec::new();
	let mut rest = template;

	while let Some(pos) = rest.find('$') {
		rest = &rest[pos + 1..];

		if let Some(after) = rest.strip_prefix('$') {
			rest = after;
			continue;
		}

		if let Some(braced) = rest.strip_prefix('{') {
			if let Some(end) = braced.find('}') {
				refs.push(&braced[..end]);
				rest = &braced[end + 1..];
			}
			continue;
		}

		let end = rest
			.find(|c: char| c != '_' && !c.is_ascii_alphanumeric())
			.unwrap_or(rest.len());
		if end > 0 {
			refs.push(&rest[..end]);
			rest = &rest[end..];
		}
	}

	refs
}

/// Reject templates that reference a group the regex does not define.
///
/// The regex crate expands unknown groups to an empty string, which would
/// silently delete the matched text.
fn check_template(regex: &Regex, template: &str) -> std::result::Result<(), String> {
	for name in template_refs(template) {
		let known = match name.parse::<usize>() {
			Ok(index) => index < regex.captures_len(),
			Err(_) => regex.capture_names().flatten().any(|n| n == name),
		};
		if !known {
			return Err(format!(
				"replacement references unknown capture group `{name}`"
			));
		}
	}
	Ok(())
}

/// Compile all rules of one file entry, keeping their order.
pub fn compile_rules(rules: &[Rule]) -> Result<Vec<CompiledRule>> {
	rules.iter().map(CompiledRule::from_rule).collect()
}
