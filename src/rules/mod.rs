//! Rule compilation and application for layout-patch.
//!
//! This module handles:
//! - Compiling manifest rules into exact or regex matchers
//! - Applying rules in order and counting what each one matched

pub mod matcher;
pub mod rewriter;

pub use matcher::{CompiledRule, RuleKind, compile_rules};
pub use rewriter::{Applied, RuleOutcome, apply_rules};
