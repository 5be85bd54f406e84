use crate::rules::matcher::{CompiledRule, RuleKind};

/// Result of applying one rule to a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
	/// The text after the rule ran.
	pub text: String,

	/// How many occurrences were replaced.
	pub matches: usize,

	/// True when the guard string was present and the rule did not run.
	pub skipped: bool,
}

/// Per-rule record kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
	/// The rule's display name.
	pub rule: String,

	/// Occurrences replaced.
	pub matches: usize,

	/// Whether the guard skipped the rule.
	pub skipped: bool,
}

impl RuleOutcome {
	/// A rule that ran and found nothing to replace.
	pub fn is_unmatched(&self) -> bool {
		!self.skipped && self.matches == 0
	}
}

impl CompiledRule {
	/// Apply this rule to `text`, replacing every occurrence.
	///
	/// A rule with no match returns the text unchanged.
	pub fn apply(&self, text: &str) -> Applied {
		if self.is_guarded(text) {
			return Applied {
				text: text.to_string(),
				matches: 0,
				skipped: true,
			};
		}

		let matches = self.count_matches(text);
		let text = if matches == 0 {
			text.to_string()
		} else {
			match self.kind {
				RuleKind::Exact { ref needle } => text.replace(needle.as_str(), &self.replacement),
				RuleKind::Pattern { ref regex } => regex
					.replace_all(text, self.replacement.as_str())
					.into_owned(),
			}
		};

		Applied {
			text,
			matches,
			skipped: false,
		}
	}
}

/// Apply `rules` in order, feeding each rule the previous rule's output.
pub fn apply_rules(text: &str, rules: &[CompiledRule]) -> (String, Vec<RuleOutcome>) {
	let mut current = text.to_string();
	let mut outcomes = Vec::with_capacity(rules.len());

	for rule in rules {
		let applied = rule.apply(&current);
		log::debug!(
			"rule `{}`: {} match(es){}",
			rule.name,
			applied.matches,
			if applied.skipped { " (skipped)" } else { "" }
		);
		outcomes.push(RuleOutcome {
			rule: rule.name.clone(),
			matches: applied.matches,
			skipped: applied.skipped,
		});
		current = applied.text;
	}

	(current, outcomes)
}
