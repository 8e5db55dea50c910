use std::collections::BTreeMap;

use reqwest::header::{HeaderName, HeaderValue};
use tracing::warn;

/// Parses `name:value` header specifications into a header map.
///
/// Names and values are trimmed; the value may be empty and may itself
/// contain `:`. Entries without a separator, with an empty name, or whose
/// name or value is not a legal HTTP header are dropped with a warning.
/// Later duplicates replace earlier ones.
pub fn parse_headers<S: AsRef<str>>(specs: &[S]) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for spec in specs {
        let spec = spec.as_ref();
        let Some((name, value)) = spec.split_once(':') else {
            warn!("Skipping malformed header (missing ':'): {spec}");
            continue;
        };

        let name = name.trim();
        if name.is_empty() {
            warn!("Skipping header with empty name");
            continue;
        }
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            warn!("Skipping header with invalid name: {name:?}");
            continue;
        }
        let value = value.trim();
        if HeaderValue::from_str(value).is_err() {
            warn!("Skipping header {name} with invalid value");
            continue;
        }

        headers.insert(name.to_owned(), value.to_owned());
    }

    headers
}
