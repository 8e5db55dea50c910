use std::sync::Arc;

use crate::diagnostic::{RuleId, Severity, ValidationDiagnostic};

/// Package and public type declaration check
pub mod basic_syntax;
/// Brace count check
pub mod braces;
/// Parenthesis count check
pub mod parentheses;
/// Line-oriented statement terminator check
pub mod semicolon;

pub use basic_syntax::BasicSyntaxRule;
pub use braces::BracesBalancedRule;
pub use parentheses::ParenthesesBalancedRule;
pub use semicolon::SemicolonTerminationRule;

/// A named, stateless check over generated source text.
///
/// Rules only read their input, so they may run in any order or in parallel.
pub trait ValidationRule: Send + Sync {
    /// Stable identifier used by ignore lists.
    fn id(&self) -> RuleId;

    /// Severity of a failure when the rule is not ignored.
    fn severity(&self) -> Severity;

    /// Runs the check.
    fn check(&self, source: &str) -> RuleOutcome;
}

/// Result of running one rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleOutcome {
    /// Findings; empty when the rule passed
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl RuleOutcome {
    /// A passing outcome.
    pub fn pass() -> Self {
        Self::default()
    }

    /// A failing outcome with the given findings.
    pub fn fail(diagnostics: Vec<ValidationDiagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Whether the rule passed.
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The baseline rules in execution order.
pub fn baseline_rules() -> Vec<Arc<dyn ValidationRule>> {
    vec![
        Arc::new(BasicSyntaxRule),
        Arc::new(BracesBalancedRule),
        Arc::new(SemicolonTerminationRule),
        Arc::new(ParenthesesBalancedRule),
    ]
}

/// Counts `open` and `close` characters in `source`.
fn count_pair(source: &str, open: char, close: char) -> (usize, usize) {
    source.chars().fold((0, 0), |(opened, closed), ch| {
        if ch == open {
            (opened + 1, closed)
        } else if ch == close {
            (opened, closed + 1)
        } else {
            (opened, closed)
        }
    })
}
