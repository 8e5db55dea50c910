use std::sync::LazyLock;

use regex::Regex;

use super::{RuleOutcome, ValidationRule};
use crate::diagnostic::{RuleId, Severity, ValidationDiagnostic};

/// Primitive and variable declaration keywords.
static DECLARATION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"\b(?:boolean|byte|short|int|long|float|double|char|String|var)\b") {
        Ok(regex) => regex,
        Err(err) => panic!("Declaration keyword regex is invalid: {err}"),
    }
});

/// Trailing `// ...` comment.
static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"//.*$") {
    Ok(regex) => regex,
    Err(err) => panic!("Line comment regex is invalid: {err}"),
});

/// Inline `/* ... */` comment.
static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"/\*.*?\*/") {
    Ok(regex) => regex,
    Err(err) => panic!("Block comment regex is invalid: {err}"),
});

/// Start of a type declaration line.
static TYPE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^(?:public\s+)?(?:(?:abstract|final|sealed|static)\s+)*(?:class|interface|enum|record)\s")
    {
        Ok(regex) => regex,
        Err(err) => panic!("Type header regex is invalid: {err}"),
    }
});

/// Line endings that continue an expression on the next line.
const CONTINUATION_SUFFIXES: [&str; 11] = ["+", "-", "*", "/", "=", "&&", "||", ":", "?", ",", "."];

/// Flags statement-looking lines that lack a `;` terminator.
///
/// Line oriented: tracks brace depth and block comments, skips package and
/// import lines, method and constructor headers, and continuation lines. Only
/// lines inside a type body (depth > 0) are checked as statements; inline
/// `{ ... }` bodies and type header tails are checked on any line. Every
/// offending line is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemicolonTerminationRule;

impl ValidationRule for SemicolonTerminationRule {
    fn id(&self) -> RuleId {
        RuleId::SemicolonTermination
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, source: &str) -> RuleOutcome {
        let (_, diagnostics) = source.lines().enumerate().fold(
            (ScanState::default(), Vec::new()),
            |(state, mut diagnostics), (index, raw)| {
                let (next, finding) = state.step(raw);
                if let Some(statement) = finding {
                    let line_number = index + 1;
                    diagnostics.push(
                        ValidationDiagnostic::new(
                            self.id(),
                            self.severity(),
                            format!("Missing semicolon at line {line_number}: {statement}"),
                        )
                        .at_line(line_number),
                    );
                }
                (next, diagnostics)
            },
        );
        RuleOutcome::fail(diagnostics)
    }
}

/// Scanner state carried from one line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScanState {
    /// Brace nesting depth before the current line, floored at zero
    depth: usize,
    /// Inside a `/* ... */` block spanning lines
    in_block_comment: bool,
}

impl ScanState {
    /// Consumes one line, returning the state for the next line and the
    /// unterminated statement found on this one, if any.
    fn step(self, raw: &str) -> (Self, Option<String>) {
        let line = raw.trim();

        if self.in_block_comment || line.starts_with("/*") {
            let still_open = !line.contains("*/");
            return (
                Self {
                    in_block_comment: still_open,
                    ..self
                },
                None,
            );
        }
        if line == "*" || line.starts_with("* ") {
            return (self, None);
        }

        let (code, opens_comment) = split_code(line);
        let next = Self {
            depth: brace_depth(self.depth, raw),
            in_block_comment: opens_comment,
        };
        (next, unterminated_statement(line, &code, raw, self.depth))
    }
}

fn brace_depth(depth: usize, raw: &str) -> usize {
    raw.chars().fold(depth, |level, ch| match ch {
        '{' => level + 1,
        '}' => level.saturating_sub(1),
        _ => level,
    })
}

fn unterminated_statement(line: &str, code: &str, raw: &str, depth_before: usize) -> Option<String> {
    if code.is_empty() || code.starts_with("package ") || code.starts_with("import ") {
        return None;
    }

    let inline = inline_block_body(raw)
        .filter(|inner| looks_like_statement(inner) && !inner.contains(';'));
    if inline.is_some() {
        return inline;
    }

    if code.ends_with([';', '{', '}']) || is_exempt_signature(code) {
        return None;
    }
    if TYPE_HEADER.is_match(code) {
        return type_header_tail(code);
    }

    (depth_before > 0 && looks_like_statement(code) && !is_continuation(code))
        .then(|| line.to_owned())
}

/// Code part of a trimmed line: `//` and `/* */` comments outside string and
/// char literals removed. The flag is set when a `/*` is left open.
fn split_code(line: &str) -> (String, bool) {
    let mut code = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut quote = None;
    let mut in_comment = false;

    while let Some(ch) = chars.next() {
        if in_comment {
            if ch == '*' && chars.next_if_eq(&'/').is_some() {
                in_comment = false;
            }
            continue;
        }
        if let Some(open) = quote {
            code.push(ch);
            if ch == '\\' {
                code.extend(chars.next());
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        match (ch, chars.peek()) {
            ('/', Some('/')) => break,
            ('/', Some('*')) => {
                chars.next();
                in_comment = true;
            }
            ('"' | '\'', _) => {
                quote = Some(ch);
                code.push(ch);
            }
            _ => code.push(ch),
        }
    }

    (code.trim().to_owned(), in_comment)
}

/// Content between the first `{` and the last `}` of a line, comments removed.
fn inline_block_body(raw: &str) -> Option<String> {
    let open = raw.find('{')?;
    let close = raw.rfind('}')?;
    if close <= open {
        return None;
    }
    let inner = strip_comments(&raw[open + 1..close]);
    (!inner.is_empty()).then_some(inner)
}

/// Statement text following the `{` of a type header such as `class A { int x = 1`.
fn type_header_tail(line: &str) -> Option<String> {
    let brace = line.find('{')?;
    let after_brace = line[brace + 1..].trim();
    let body = after_brace.strip_suffix('}').unwrap_or(after_brace);
    let tail = strip_comments(body);
    (!tail.is_empty() && !tail.ends_with(';') && looks_like_statement(&tail)).then_some(tail)
}

/// Method, constructor and annotation headers are exempt, except a call whose
/// result is assigned and that is missing its terminator.
fn is_exempt_signature(line: &str) -> bool {
    let Some(open) = line.find('(') else {
        return false;
    };
    let assigned_call = line.ends_with(')') && line[..open].contains('=');
    !assigned_call
}

fn looks_like_statement(text: &str) -> bool {
    text.contains('=') || DECLARATION_KEYWORD.is_match(text)
}

/// Ends in a binary operator, a ternary token or a separator. Postfix `++`
/// and `--` complete an expression.
fn is_continuation(code: &str) -> bool {
    if code.ends_with("++") || code.ends_with("--") {
        return false;
    }
    CONTINUATION_SUFFIXES
        .iter()
        .any(|suffix| code.ends_with(suffix))
}

fn strip_comments(text: &str) -> String {
    let without_line = LINE_COMMENT.replace(text.trim(), "");
    BLOCK_COMMENT
        .replace_all(&without_line, "")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings(source: &str) -> Vec<(usize, String)> {
        SemicolonTerminationRule
            .check(source)
            .diagnostics
            .into_iter()
            .map(|diag| (diag.line.unwrap(), diag.message))
            .collect()
    }

    #[test]
    fn test_well_formed_class_passes() {
        let source = r#"package com.example;

import java.util.List;

/**
 * Generated API.
 */
public class Api {
    private static final int LIMIT = 10;
    private String name;
    /* block
       int ignored = 1
    */
    public Api(String name,
               int limit) {
        this.name = name;
    }

    public String greeting()
    {
        String text = "hello " +
            name;
        return text;
    }

    public enum Role {
        ADMIN,
        USER
    }
}
"#;
        assert_eq!(findings(source), vec![]);
    }

    #[test]
    fn test_missing_field_terminator_is_reported_with_line() {
        let source = "public class Api {\n    private String name\n}\n";
        assert_eq!(
            findings(source),
            vec![(2, "Missing semicolon at line 2: private String name".to_owned())]
        );
    }

    #[test]
    fn test_every_offending_line_is_reported() {
        let source = "public class Api {\n    int a = 1\n    int b = 2;\n    long c\n}\n";
        let lines: Vec<usize> = findings(source).into_iter().map(|(line, _)| line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_top_level_lines_are_not_statements() {
        assert_eq!(findings("int stray = 1\n"), vec![]);
    }

    #[test]
    fn test_inline_block_body_is_checked() {
        let source = "public class Api {\n    void reset() { this.count = 0 }\n}\n";
        assert_eq!(
            findings(source),
            vec![(2, "Missing semicolon at line 2: this.count = 0".to_owned())]
        );
    }

    #[test]
    fn test_inline_comment_only_body_passes() {
        let source = "public class Api {\n    void reset() { /* int nothing */ }\n    void run() { // String later\n    }\n}\n";
        assert_eq!(findings(source), vec![]);
    }

    #[test]
    fn test_assigned_call_needs_terminator() {
        let source = "public class Api {\n    void run() {\n        String value = build()\n        String other = build(\n            1);\n    }\n}\n";
        let lines: Vec<usize> = findings(source).into_iter().map(|(line, _)| line).collect();
        assert_eq!(lines, vec![3]);
    }

    #[test]
    fn test_type_header_tail_is_checked() {
        let source = "public class Api {\n    class Inner { int x = 1\n    }\n}\n";
        assert_eq!(
            findings(source),
            vec![(2, "Missing semicolon at line 2: int x = 1".to_owned())]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let source = "public class Api {\r\n    int a = 1;\r\n    int b = 2\r\n}\r\n";
        let lines: Vec<usize> = findings(source).into_iter().map(|(line, _)| line).collect();
        assert_eq!(lines, vec![3]);
    }

    #[test]
    fn test_trailing_comment_does_not_hide_missing_terminator() {
        let source = "public class Api {\n    private int retries = 2 /* default */\n    private int limit = 3 // upper bound\n    private int ok = 4; // fine\n}\n";
        let lines: Vec<usize> = findings(source).into_iter().map(|(line, _)| line).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn test_postfix_operators_end_a_statement() {
        let source = "public class Api {\n    void run() {\n        int next = count--\n        int last = count++\n        int sum = count +\n            1;\n    }\n}\n";
        let lines: Vec<usize> = findings(source).into_iter().map(|(line, _)| line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn test_ternary_and_colon_continuations() {
        let source = "public class Api {\n    void run() {\n        String label = ready ?\n            \"yes\" :\n            \"no\";\n    }\n}\n";
        assert_eq!(findings(source), vec![]);
    }

    #[test]
    fn test_comment_markers_inside_literals_are_code() {
        let source = "public class Api {\n    String url = \"http://example.com\";\n    char slash = '/';\n    String glob = \"/*\";\n    int after = 1\n}\n";
        assert_eq!(
            findings(source),
            vec![(5, "Missing semicolon at line 5: int after = 1".to_owned())]
        );
    }

    #[test]
    fn test_block_comment_opened_after_code_spans_lines() {
        let source = "public class Api {\n    int a = 1; /* note\n       int ignored = 2\n    */\n    int b = 3\n}\n";
        let lines: Vec<usize> = findings(source).into_iter().map(|(line, _)| line).collect();
        assert_eq!(lines, vec![5]);
    }

    #[test]
    fn test_depth_is_floored_at_zero() {
        let state = ScanState::default().step("}}}").0;
        assert_eq!(state.depth, 0);
        let nested = state.step("class A { void b() {").0;
        assert_eq!(nested.depth, 2);
    }
}
