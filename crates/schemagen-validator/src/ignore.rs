use std::collections::HashSet;

use tracing::warn;

use crate::diagnostic::RuleId;

/// Rule identifiers whose failures are downgraded instead of blocking.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleIgnoreSet {
    /// Normalized (trimmed, upper-case) identifiers
    ids: HashSet<String>,
}

impl RuleIgnoreSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct identifiers held.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no identifier is held.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `rule` is ignored.
    pub fn contains(&self, rule: RuleId) -> bool {
        self.ids.contains(rule.as_str())
    }
}

impl<S: AsRef<str>> FromIterator<S> for RuleIgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut ids = HashSet::new();
        for raw in iter {
            let id = raw.as_ref().trim().to_ascii_uppercase();
            if id.is_empty() {
                continue;
            }
            if id.parse::<RuleId>().is_err() {
                warn!("Ignore list names unknown validation rule '{id}'");
            }
            ids.insert(id);
        }
        Self { ids }
    }
}
