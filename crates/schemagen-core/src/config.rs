use std::fmt;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::headers::parse_headers;
use crate::request::FetchRequest;

/// Default generated class name.
pub const DEFAULT_CLASS_NAME: &str = "GeneratedGraphqlAPI";
/// Default generated package.
pub const DEFAULT_PACKAGE: &str = "com.example.graphql.generated";
/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "./generated";

/// Target language of the generated bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Java source (`.java`)
    #[default]
    #[serde(alias = "java", alias = "JAVA")]
    Java,
    /// TypeScript source (`.ts`)
    #[serde(alias = "typescript", alias = "Typescript")]
    TypeScript,
}

impl Language {
    /// Human-readable name, also used as the template registry key.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Java => "Java",
            Self::TypeScript => "TypeScript",
        }
    }

    /// File extension used when the template does not declare one.
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Java => ".java",
            Self::TypeScript => ".ts",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.display_name())
    }
}

/// Raw configuration of one generation target, as read from the config file.
///
/// Numeric fields are signed so that negative values survive deserialization
/// and are reported by [`TargetConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// Remote GraphQL endpoint
    pub url: String,
    /// Extra request headers as `name:value` strings
    pub headers: Vec<String>,
    /// Language of the generated source
    pub language: Language,
    /// Generated class name
    pub class_name: String,
    /// Generated package / namespace
    pub package: String,
    /// Directory receiving the generated file
    pub output_dir: String,
    /// Abort the target when a blocking validation rule fails
    pub fail_on_validation_error: bool,
    /// Optional file receiving the validation error report
    pub validation_report_file: Option<PathBuf>,
    /// Rule identifiers whose failures are downgraded to warnings
    pub ignored_validation_rules: Vec<String>,
    /// Connect timeout in milliseconds, 0 for none
    pub connect_timeout_ms: i64,
    /// Socket read timeout in milliseconds, 0 for none
    pub socket_timeout_ms: i64,
    /// Retries after the first attempt for transient failures
    pub max_retries: i64,
    /// Linear backoff base in milliseconds
    pub retry_backoff_ms: i64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            headers: Vec::new(),
            language: Language::default(),
            class_name: DEFAULT_CLASS_NAME.to_owned(),
            package: DEFAULT_PACKAGE.to_owned(),
            output_dir: DEFAULT_OUTPUT_DIR.to_owned(),
            fail_on_validation_error: true,
            validation_report_file: None,
            ignored_validation_rules: Vec::new(),
            connect_timeout_ms: 5000,
            socket_timeout_ms: 5000,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl TargetConfig {
    /// Creates a configuration for `url` with every other field defaulted.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Validates every field and builds the immutable per-target settings.
    ///
    /// # Errors
    /// Returns the first configuration problem found. No I/O is performed.
    pub fn validate(&self) -> Result<ValidatedTarget> {
        if !is_valid_identifier(&self.class_name) {
            return Err(ConfigError::InvalidIdentifier {
                field: "class_name",
                value: self.class_name.clone(),
            });
        }
        if !is_valid_namespace(&self.package) {
            return Err(ConfigError::InvalidNamespace {
                field: "package",
                value: self.package.clone(),
            });
        }

        let connect_timeout = millis("connect_timeout_ms", self.connect_timeout_ms)?;
        let read_timeout = millis("socket_timeout_ms", self.socket_timeout_ms)?;
        let retries = non_negative("max_retries", self.max_retries)?;
        let max_retries = u32::try_from(retries).map_err(|_| ConfigError::TooLarge {
            field: "max_retries",
            value: self.max_retries,
            max: u64::from(u32::MAX),
        })?;
        let backoff_base = millis("retry_backoff_ms", self.retry_backoff_ms)?;

        let request = FetchRequest::new(&self.url)?
            .with_headers(parse_headers(&self.headers))
            .with_connect_timeout(connect_timeout)
            .with_read_timeout(read_timeout)
            .with_max_retries(max_retries)
            .with_backoff_base(backoff_base);

        let validation_report_file = self
            .validation_report_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
            .cloned();

        Ok(ValidatedTarget {
            request,
            language: self.language,
            class_name: self.class_name.clone(),
            package: self.package.clone(),
            output_dir: normalize_dir(&self.output_dir),
            fail_on_validation_error: self.fail_on_validation_error,
            validation_report_file,
            ignored_validation_rules: self
                .ignored_validation_rules
                .iter()
                .map(|rule| rule.trim().to_owned())
                .filter(|rule| !rule.is_empty())
                .collect(),
        })
    }
}

/// Per-target settings after validation. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTarget {
    /// Request used for the single schema fetch of this target
    pub request: FetchRequest,
    /// Language of the generated source
    pub language: Language,
    /// Generated class name
    pub class_name: String,
    /// Generated package / namespace
    pub package: String,
    /// Normalized output directory
    pub output_dir: PathBuf,
    /// Abort on blocking validation failure
    pub fail_on_validation_error: bool,
    /// Optional validation report destination
    pub validation_report_file: Option<PathBuf>,
    /// Trimmed, non-empty ignored rule identifiers
    pub ignored_validation_rules: Vec<String>,
}

/// Top-level layout of the configuration file: a list of `[[targets]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetsFile {
    /// Generation targets, processed independently
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl TargetsFile {
    /// Parses a TOML configuration document.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or lists no targets.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: Self = toml::from_str(content)?;
        if file.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        Ok(file)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Returns `true` if `name` is a valid type identifier for the generated source.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$')
}

/// Returns `true` if `namespace` is a dot-separated list of identifiers.
pub fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty() && namespace.split('.').all(is_valid_identifier)
}

fn non_negative(field: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| ConfigError::Negative { field, value })
}

fn millis(field: &'static str, value: i64) -> Result<Duration> {
    non_negative(field, value).map(Duration::from_millis)
}

fn normalize_dir(dir: &str) -> PathBuf {
    let trimmed = dir.trim();
    if trimmed.is_empty() {
        return PathBuf::from(DEFAULT_OUTPUT_DIR);
    }

    let mut normalized: String = trimmed
        .chars()
        .map(|ch| if ch == '/' || ch == '\\' { MAIN_SEPARATOR } else { ch })
        .collect();
    while normalized.len() > 1 && normalized.ends_with(MAIN_SEPARATOR) {
        normalized.pop();
    }
    PathBuf::from(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::TempDir;

    fn config() -> TargetConfig {
        TargetConfig::new("http://localhost:8080/graphql")
    }

    #[test]
    fn test_defaults_validate() {
        let target = config().validate().unwrap();
        assert_eq!(target.class_name, DEFAULT_CLASS_NAME);
        assert_eq!(target.package, DEFAULT_PACKAGE);
        assert_eq!(target.request.max_retries(), 2);
        assert_eq!(target.request.backoff_base(), Duration::from_millis(500));
        assert_eq!(target.request.connect_timeout(), Duration::from_secs(5));
        assert!(target.fail_on_validation_error);
    }

    #[test]
    fn test_negative_values_are_rejected() {
        let cases: [(&str, fn(&mut TargetConfig)); 4] = [
            ("connect_timeout_ms", |cfg| cfg.connect_timeout_ms = -1),
            ("socket_timeout_ms", |cfg| cfg.socket_timeout_ms = -5),
            ("max_retries", |cfg| cfg.max_retries = -1),
            ("retry_backoff_ms", |cfg| cfg.retry_backoff_ms = -10),
        ];

        for (expected_field, mutate) in cases {
            let mut cfg = config();
            mutate(&mut cfg);
            match cfg.validate() {
                Err(ConfigError::Negative { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("expected negative error for {expected_field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_oversized_max_retries_is_rejected() {
        let mut cfg = config();
        cfg.max_retries = i64::from(u32::MAX) + 1;
        match cfg.validate() {
            Err(ConfigError::TooLarge { field, value, max }) => {
                assert_eq!(field, "max_retries");
                assert_eq!(value, 4_294_967_296);
                assert_eq!(max, u64::from(u32::MAX));
            }
            other => panic!("expected oversized error, got {other:?}"),
        }

        cfg.max_retries = i64::from(u32::MAX);
        assert_eq!(cfg.validate().unwrap().request.max_retries(), u32::MAX);
    }

    #[test]
    fn test_illegal_header_never_reaches_request() {
        let mut cfg = config();
        cfg.headers = vec!["X Bad Name: v".to_owned(), "Authorization: Bearer abc".to_owned()];
        let target = cfg.validate().unwrap();
        assert_eq!(target.request.header_names(), vec!["Authorization".to_owned()]);
    }

    #[test]
    fn test_invalid_identifiers_are_rejected() {
        let mut bad_class = config();
        bad_class.class_name = "1Api".to_owned();
        assert!(matches!(
            bad_class.validate(),
            Err(ConfigError::InvalidIdentifier { .. })
        ));

        let mut bad_package = config();
        bad_package.package = "com..example".to_owned();
        assert!(matches!(
            bad_package.validate(),
            Err(ConfigError::InvalidNamespace { .. })
        ));
    }

    #[test]
    fn test_url_checked_before_anything_else_network_related() {
        let cfg = TargetConfig::new("localhost:8080/graphql");
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            TargetConfig::new("").validate(),
            Err(ConfigError::MissingUrl)
        ));
    }

    #[test]
    fn test_headers_are_parsed_leniently() {
        let mut cfg = config();
        cfg.headers = vec![
            "Authorization: Bearer t".to_owned(),
            "broken".to_owned(),
            ":empty".to_owned(),
        ];
        let target = cfg.validate().unwrap();
        assert_eq!(target.request.header_names(), vec!["Authorization".to_owned()]);
    }

    #[test]
    fn test_output_dir_normalization() {
        assert_eq!(normalize_dir("  "), PathBuf::from(DEFAULT_OUTPUT_DIR));
        let expected: PathBuf = ["out", "gen"].iter().collect();
        assert_eq!(normalize_dir("out/gen///"), expected);
        assert_eq!(normalize_dir("/"), PathBuf::from(MAIN_SEPARATOR.to_string()));
    }

    #[test]
    fn test_ignored_rules_are_trimmed() {
        let mut cfg = config();
        cfg.ignored_validation_rules = vec![" braces_balanced ".to_owned(), "  ".to_owned()];
        let target = cfg.validate().unwrap();
        assert_eq!(target.ignored_validation_rules, vec!["braces_balanced".to_owned()]);
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("Api"));
        assert!(is_valid_identifier("_Api$2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("My-Api"));
        assert!(is_valid_namespace("com.example.api"));
        assert!(!is_valid_namespace("com.example."));
        assert!(!is_valid_namespace(""));
    }

    #[test]
    fn test_targets_file_parsing() {
        let file = TargetsFile::from_toml_str(
            r#"
            [[targets]]
            url = "http://localhost:1/graphql"
            class_name = "Api"
            package = "com.example"
            headers = ["Authorization: Bearer x"]
            ignored_validation_rules = ["PARENTHESES_BALANCED"]

            [[targets]]
            url = "https://other/graphql"
            language = "TypeScript"
            max_retries = -3
            "#,
        )
        .unwrap();

        assert_eq!(file.targets.len(), 2);
        assert_eq!(file.targets[0].class_name, "Api");
        assert_eq!(file.targets[1].language, Language::TypeScript);
        assert_eq!(file.targets[1].package, DEFAULT_PACKAGE);
        assert!(matches!(
            file.targets[1].validate(),
            Err(ConfigError::Negative { .. })
        ));
    }

    #[test]
    fn test_targets_file_requires_targets() {
        assert!(matches!(
            TargetsFile::from_toml_str(""),
            Err(ConfigError::NoTargets)
        ));
        assert!(matches!(
            TargetsFile::from_toml_str("[[targets]]\nunknown_key = 1\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_targets_file_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schemagen.toml");
        write(&path, "[[targets]]\nurl = \"http://localhost/graphql\"\n").unwrap();
        let file = TargetsFile::load(&path).unwrap();
        assert_eq!(file.targets.len(), 1);

        let missing = TargetsFile::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
