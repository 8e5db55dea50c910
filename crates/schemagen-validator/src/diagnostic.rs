use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a validation rule, as used in ignore lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    /// Package declaration and public type declaration present
    BasicSyntax,
    /// Equal number of `{` and `}`
    BracesBalanced,
    /// Statements end with `;`
    SemicolonTermination,
    /// Equal number of `(` and `)`
    ParenthesesBalanced,
}

impl RuleId {
    /// Every rule identifier, in default execution order.
    pub const ALL: [Self; 4] = [
        Self::BasicSyntax,
        Self::BracesBalanced,
        Self::SemicolonTermination,
        Self::ParenthesesBalanced,
    ];

    /// Identifier string, e.g. `BRACES_BALANCED`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BasicSyntax => "BASIC_SYNTAX",
            Self::BracesBalanced => "BRACES_BALANCED",
            Self::SemicolonTermination => "SEMICOLON_TERMINATION",
            Self::ParenthesesBalanced => "PARENTHESES_BALANCED",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Returned when parsing an identifier that names no rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown validation rule '{0}'")]
pub struct UnknownRule(pub String);

impl FromStr for RuleId {
    type Err = UnknownRule;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRule(wanted.to_owned()))
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks generation unless the rule is ignored
    Error,
    /// Advisory only
    Warning,
}

/// One finding of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDiagnostic {
    /// Rule that produced the finding
    pub rule: RuleId,
    /// Effective severity after ignore-set downgrading
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// 1-based source line, when the rule is line-oriented
    pub line: Option<usize>,
}

impl ValidationDiagnostic {
    /// Creates a diagnostic without a line number.
    pub fn new(rule: RuleId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity,
            message: message.into(),
            line: None,
        }
    }

    /// Attaches a 1-based line number.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Same finding re-tagged as a warning.
    #[must_use]
    pub fn downgraded(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Whether this diagnostic blocks generation.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}] {}", self.rule, self.message)
    }
}

/// Outcome of one validation run. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` iff no diagnostic has `Error` severity
    passed: bool,
    /// Diagnostics in rule execution order
    diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Builds a report, deriving the pass flag from the diagnostics.
    pub fn from_diagnostics(diagnostics: Vec<ValidationDiagnostic>) -> Self {
        Self {
            passed: !diagnostics.iter().any(ValidationDiagnostic::is_error),
            diagnostics,
        }
    }

    /// Whether generation may proceed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// All diagnostics in execution order.
    pub fn diagnostics(&self) -> &[ValidationDiagnostic] {
        &self.diagnostics
    }

    /// Blocking diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics.iter().filter(|diag| diag.is_error())
    }

    /// Advisory and downgraded diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics.iter().filter(|diag| !diag.is_error())
    }

    /// Multi-line error report with remediation hints, as written to report sinks.
    pub fn format_error_report(&self) -> String {
        let mut report = String::from("Code Validation Errors:\n======================\n\n");
        for diag in self.errors() {
            report.push_str("Code validation error: ");
            report.push_str(&diag.message);
            report.push('\n');
        }
        report.push_str("\nSuggestions for fixing common errors:\n");
        report.push_str(
            "- Missing package declaration: Ensure your template includes a proper package declaration\n",
        );
        report.push_str(
            "- Unbalanced braces: Check for missing closing braces in template conditional blocks\n",
        );
        report.push_str(
            "- Missing semicolons: Add semicolons to field declarations and assignments in templates\n",
        );
        report
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "passed" } else { "failed" };
        write!(
            formatter,
            "validation {status} ({} error(s), {} warning(s))",
            self.errors().count(),
            self.warnings().count()
        )
    }
}
