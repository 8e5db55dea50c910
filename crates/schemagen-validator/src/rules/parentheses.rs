use super::{RuleOutcome, ValidationRule, count_pair};
use crate::diagnostic::{RuleId, Severity, ValidationDiagnostic};

/// Character-level `(` / `)` count. Advisory: a mismatch never fails a report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParenthesesBalancedRule;

impl ValidationRule for ParenthesesBalancedRule {
    fn id(&self) -> RuleId {
        RuleId::ParenthesesBalanced
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, source: &str) -> RuleOutcome {
        let (opened, closed) = count_pair(source, '(', ')');
        if opened == closed {
            return RuleOutcome::pass();
        }
        RuleOutcome::fail(vec![ValidationDiagnostic::new(
            self.id(),
            self.severity(),
            format!("Unbalanced parentheses: {opened} opening, {closed} closing"),
        )])
    }
}
