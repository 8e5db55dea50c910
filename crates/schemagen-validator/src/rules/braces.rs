use super::{RuleOutcome, ValidationRule, count_pair};
use crate::diagnostic::{RuleId, Severity, ValidationDiagnostic};

/// Character-level `{` / `}` count.
///
/// Only detects count mismatches; misplaced but balanced braces pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracesBalancedRule;

impl ValidationRule for BracesBalancedRule {
    fn id(&self) -> RuleId {
        RuleId::BracesBalanced
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, source: &str) -> RuleOutcome {
        let (opened, closed) = count_pair(source, '{', '}');
        if opened == closed {
            return RuleOutcome::pass();
        }
        RuleOutcome::fail(vec![ValidationDiagnostic::new(
            self.id(),
            self.severity(),
            format!("Unbalanced braces: {opened} opening braces, {closed} closing braces"),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced() {
        assert!(BracesBalancedRule.check("class A { void b() { } }").passed());
        assert!(BracesBalancedRule.check("").passed());
    }

    #[test]
    fn test_misplaced_but_balanced_passes() {
        assert!(BracesBalancedRule.check("} class A {").passed());
    }

    #[test]
    fn test_unbalanced_reports_counts() {
        let outcome = BracesBalancedRule.check("class A { void b() { }");
        assert_eq!(
            outcome.diagnostics[0].message,
            "Unbalanced braces: 2 opening braces, 1 closing braces"
        );
    }
}
