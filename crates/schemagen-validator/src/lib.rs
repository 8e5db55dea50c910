//! Heuristic structural validation of generated source text.
//!
//! The validator runs a fixed, ordered set of [`ValidationRule`]s over the
//! rendered output before it is written. Blocking rules fail fast unless their
//! identifier is in the caller's [`RuleIgnoreSet`]; advisory rules only ever
//! add warnings. This is not a parser: the rules are line and character
//! heuristics tuned for Java output.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Rule identifiers, diagnostics and reports.
pub mod diagnostic;
/// Case-insensitive set of ignored rule identifiers.
pub mod ignore;
/// The baseline rule set.
pub mod rules;
/// Destinations for the formatted error report.
pub mod sink;
/// Rule orchestration.
pub mod validator;

pub use diagnostic::{RuleId, Severity, UnknownRule, ValidationDiagnostic, ValidationReport};
pub use ignore::RuleIgnoreSet;
pub use rules::{
    BasicSyntaxRule, BracesBalancedRule, ParenthesesBalancedRule, RuleOutcome,
    SemicolonTerminationRule, ValidationRule, baseline_rules,
};
pub use sink::{FileReportSink, ReportSink};
pub use validator::CodeValidator;
