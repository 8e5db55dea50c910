use std::sync::LazyLock;

use regex::Regex;

use super::{RuleOutcome, ValidationRule};
use crate::diagnostic::{RuleId, Severity, ValidationDiagnostic};

/// `package a.b.c;` on a line of its own.
static PACKAGE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(
        || match Regex::new(r"(?m)^\s*package\s+[A-Za-z_][\w.]*\s*;\s*$") {
            Ok(regex) => regex,
            Err(err) => panic!("Package regex is invalid: {err}"),
        },
    );

/// `public [modifiers] class|interface|enum|record Name`.
static PUBLIC_TYPE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r"\bpublic\s+(?:(?:abstract|final|sealed|static)\s+)*(?:class|interface|enum|record)\s+\w",
    ) {
        Ok(regex) => regex,
        Err(err) => panic!("Type declaration regex is invalid: {err}"),
    }
});

/// Requires a package declaration and a public type declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSyntaxRule;

impl ValidationRule for BasicSyntaxRule {
    fn id(&self) -> RuleId {
        RuleId::BasicSyntax
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, source: &str) -> RuleOutcome {
        let mut diagnostics = Vec::new();
        if !PACKAGE_DECLARATION.is_match(source) {
            diagnostics.push(self.diagnostic("Missing package declaration"));
        }
        if !PUBLIC_TYPE_DECLARATION.is_match(source) {
            diagnostics.push(self.diagnostic("Missing class declaration"));
        }
        RuleOutcome::fail(diagnostics)
    }
}

impl BasicSyntaxRule {
    fn diagnostic(self, message: &str) -> ValidationDiagnostic {
        ValidationDiagnostic::new(self.id(), self.severity(), message)
    }
}
