use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::diagnostic::{Severity, ValidationDiagnostic, ValidationReport};
use crate::ignore::RuleIgnoreSet;
use crate::rules::{ValidationRule, baseline_rules};
use crate::sink::ReportSink;

/// Runs an ordered rule set over generated source text.
///
/// Blocking (`Error`) rules run in order and stop at the first failure that
/// is not ignored. Advisory (`Warning`) rules always run. Holds no mutable
/// state, so one validator can serve concurrent calls.
#[derive(Clone)]
pub struct CodeValidator {
    /// Rules in execution order
    rules: Vec<Arc<dyn ValidationRule>>,
}

impl Default for CodeValidator {
    fn default() -> Self {
        Self::new(baseline_rules())
    }
}

impl CodeValidator {
    /// Creates a validator with a custom rule list.
    pub fn new(rules: Vec<Arc<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    /// Rules in execution order.
    pub fn rules(&self) -> &[Arc<dyn ValidationRule>] {
        &self.rules
    }

    /// Validates `source`.
    ///
    /// A failing rule listed in `ignore` is downgraded: a blocking failure
    /// becomes warnings and an advisory one is dropped. `language_hint` is
    /// recorded for diagnostics only; every rule currently targets Java.
    /// When the report fails and a `sink` is given, the formatted error
    /// report is written to it. Sink failures are logged and never change
    /// the returned report.
    pub fn validate(
        &self,
        source: &str,
        ignore: &RuleIgnoreSet,
        language_hint: &str,
        sink: Option<&dyn ReportSink>,
    ) -> ValidationReport {
        debug!(
            "Validating {} bytes of {language_hint} source with {} rule(s)",
            source.len(),
            self.rules.len()
        );

        let mut diagnostics = Vec::new();
        let mut blocked = false;

        for rule in &self.rules {
            let blocking = rule.severity() == Severity::Error;
            if blocking && blocked {
                continue;
            }

            let outcome = rule.check(source);
            if outcome.passed() {
                continue;
            }

            let ignored = ignore.contains(rule.id());
            match (blocking, ignored) {
                (true, true) => {
                    warn!("[{}] validation failed but was ignored by configuration", rule.id());
                    diagnostics.extend(
                        outcome
                            .diagnostics
                            .into_iter()
                            .map(ValidationDiagnostic::downgraded),
                    );
                }
                (true, false) => {
                    for diag in &outcome.diagnostics {
                        error!("Code validation error: {}", diag.message);
                    }
                    diagnostics.extend(outcome.diagnostics);
                    blocked = true;
                }
                (false, true) => {
                    debug!("[{}] advisory finding suppressed by configuration", rule.id());
                }
                (false, false) => {
                    for diag in &outcome.diagnostics {
                        warn!("{diag}");
                    }
                    diagnostics.extend(outcome.diagnostics);
                }
            }
        }

        let report = ValidationReport::from_diagnostics(diagnostics);
        if let Some(sink) = sink.filter(|_| !report.passed()) {
            emit_report(&report, sink);
        }
        report
    }
}

fn emit_report(report: &ValidationReport, sink: &dyn ReportSink) {
    match sink.write_report(&report.format_error_report()) {
        Ok(()) => info!("Validation errors written to {}", sink.describe()),
        Err(err) => error!(
            "Failed to write validation errors to {}: {err}",
            sink.describe()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::RuleId;
    use crate::rules::{BasicSyntaxRule, RuleOutcome};
    use std::io::{Error as IoError, Result as IoResult};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VALID: &str = "package com.example;\n\npublic class Api {\n    private int count = 0;\n\n    public int next() {\n        count = count + 1;\n        return count;\n    }\n}\n";

    #[derive(Default)]
    struct MemorySink {
        reports: Mutex<Vec<String>>,
    }

    impl ReportSink for MemorySink {
        fn write_report(&self, report: &str) -> IoResult<()> {
            self.reports.lock().unwrap().push(report.to_owned());
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_owned()
        }
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn write_report(&self, _report: &str) -> IoResult<()> {
            Err(IoError::other("disk full"))
        }

        fn describe(&self) -> String {
            "failing".to_owned()
        }
    }

    /// Counts invocations of a blocking rule that always passes.
    struct CountingRule {
        calls: AtomicUsize,
    }

    impl ValidationRule for CountingRule {
        fn id(&self) -> RuleId {
            RuleId::SemicolonTermination
        }

        fn severity(&self) -> Severity {
            Severity::Error
        }

        fn check(&self, _source: &str) -> RuleOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RuleOutcome::pass()
        }
    }

    fn rules_of(report: &ValidationReport) -> Vec<(RuleId, Severity)> {
        report
            .diagnostics()
            .iter()
            .map(|diag| (diag.rule, diag.severity))
            .collect()
    }

    #[test]
    fn test_valid_source_passes_without_errors() {
        let report = CodeValidator::default().validate(VALID, &RuleIgnoreSet::new(), "Java", None);
        assert!(report.passed());
        assert_eq!(report.errors().count(), 0);
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn test_missing_package_short_circuits_blocking_rules() {
        let counting = Arc::new(CountingRule {
            calls: AtomicUsize::new(0),
        });
        let validator = CodeValidator::new(vec![
            Arc::new(BasicSyntaxRule),
            Arc::clone(&counting) as Arc<dyn ValidationRule>,
        ]);
        let source = VALID.replace("package com.example;\n", "");

        let report = validator.validate(&source, &RuleIgnoreSet::new(), "Java", None);

        assert!(!report.passed());
        assert_eq!(rules_of(&report), vec![(RuleId::BasicSyntax, Severity::Error)]);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ignored_braces_become_warning() {
        let source = format!("{VALID}}}\n");
        let ignore: RuleIgnoreSet = ["braces_balanced"].into_iter().collect();

        let report = CodeValidator::default().validate(&source, &ignore, "Java", None);

        assert!(report.passed());
        assert_eq!(
            rules_of(&report),
            vec![(RuleId::BracesBalanced, Severity::Warning)]
        );
        assert!(report.diagnostics()[0].message.starts_with("Unbalanced braces"));
    }

    #[test]
    fn test_parentheses_only_warn() {
        let source = VALID.replace("count + 1;", "(count + 1;");
        let report = CodeValidator::default().validate(&source, &RuleIgnoreSet::new(), "Java", None);
        assert!(report.passed());
        assert_eq!(
            rules_of(&report),
            vec![(RuleId::ParenthesesBalanced, Severity::Warning)]
        );

        let ignore: RuleIgnoreSet = ["PARENTHESES_BALANCED"].into_iter().collect();
        let suppressed = CodeValidator::default().validate(&source, &ignore, "Java", None);
        assert!(suppressed.diagnostics().is_empty());
    }

    #[test]
    fn test_parentheses_still_run_after_blocking_failure() {
        let source = VALID
            .replace("package com.example;\n", "")
            .replace("count + 1;", "(count + 1;");
        let report = CodeValidator::default().validate(&source, &RuleIgnoreSet::new(), "Java", None);
        assert_eq!(
            rules_of(&report),
            vec![
                (RuleId::BasicSyntax, Severity::Error),
                (RuleId::ParenthesesBalanced, Severity::Warning),
            ]
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let source = VALID.replace("private int count = 0;", "private int count = 0");
        let validator = CodeValidator::default();
        let first = validator.validate(&source, &RuleIgnoreSet::new(), "Java", None);
        let second = validator.validate(&source, &RuleIgnoreSet::new(), "Java", None);
        assert_eq!(first, second);
        assert!(!first.passed());
    }

    #[test]
    fn test_language_hint_does_not_change_outcome() {
        let validator = CodeValidator::default();
        let java = validator.validate(VALID, &RuleIgnoreSet::new(), "Java", None);
        let typescript = validator.validate(VALID, &RuleIgnoreSet::new(), "TypeScript", None);
        assert_eq!(java, typescript);
    }

    #[test]
    fn test_sink_receives_report_only_on_failure() {
        let sink = MemorySink::default();
        let validator = CodeValidator::default();

        validator.validate(VALID, &RuleIgnoreSet::new(), "Java", Some(&sink));
        assert!(sink.reports.lock().unwrap().is_empty());

        let broken = VALID.replace("private int count = 0;", "private int count = 0");
        let report = validator.validate(&broken, &RuleIgnoreSet::new(), "Java", Some(&sink));
        assert!(!report.passed());

        let reports = sink.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("Code validation error: Missing semicolon at line 4"));
    }

    #[test]
    fn test_sink_failure_does_not_change_report() {
        let broken = VALID.replace("private int count = 0;", "private int count = 0");
        let validator = CodeValidator::default();
        let with_sink = validator.validate(&broken, &RuleIgnoreSet::new(), "Java", Some(&FailingSink));
        let without = validator.validate(&broken, &RuleIgnoreSet::new(), "Java", None);
        assert_eq!(with_sink, without);
    }
}
