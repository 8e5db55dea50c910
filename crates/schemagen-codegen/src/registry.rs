use std::collections::HashMap;

use schemagen_core::Language;
use serde::Serialize;

use crate::error::TemplateError;

/// Identifier of the bundled Java template.
pub const JAVA_TEMPLATE_ID: &str = "java/api.tera";

/// Describes one registered template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    /// Language the template generates
    pub language: Language,
    /// Template version
    pub version: String,
    /// Name the renderer knows the template by
    pub template_id: String,
    /// Extension of the generated file, if the template declares one
    pub file_extension: Option<String>,
}

impl TemplateDescriptor {
    /// Creates a descriptor without a declared extension.
    pub fn new(language: Language, version: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            language,
            version: version.into(),
            template_id: template_id.into(),
            file_extension: None,
        }
    }

    /// Declares the generated file extension, including the leading dot.
    #[must_use]
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = Some(extension.into());
        self
    }

    /// Declared extension, falling back to the language default.
    pub fn extension(&self) -> &str {
        self.file_extension
            .as_deref()
            .unwrap_or_else(|| self.language.default_extension())
    }
}

/// A template with its source and auxiliary builder text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTemplate {
    /// Template metadata
    pub descriptor: TemplateDescriptor,
    /// Template source text
    pub source: String,
    /// Static helper code spliced into the output as `builders`
    pub builders: String,
}

/// Templates by language and version.
///
/// The most recently registered version of a language is its default.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    /// Entries keyed by `(language, version)`
    templates: HashMap<(Language, String), RegisteredTemplate>,
    /// Default version per language
    latest: HashMap<Language, String>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the bundled templates.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(RegisteredTemplate {
            descriptor: TemplateDescriptor::new(Language::Java, "1.0", JAVA_TEMPLATE_ID)
                .with_file_extension(".java"),
            source: include_str!("../templates/java/api.tera").to_owned(),
            builders: include_str!("../templates/java/builders.txt").to_owned(),
        });
        registry
    }

    /// Registers a template, making its version the default for its language.
    pub fn register(&mut self, template: RegisteredTemplate) {
        let language = template.descriptor.language;
        let version = template.descriptor.version.clone();
        self.latest.insert(language, version.clone());
        self.templates.insert((language, version), template);
    }

    /// Default template for `language`.
    ///
    /// # Errors
    /// Returns an error if no template is registered for the language.
    pub fn get(&self, language: Language) -> Result<&RegisteredTemplate, TemplateError> {
        let version = self
            .latest
            .get(&language)
            .ok_or(TemplateError::NotRegistered(language))?;
        self.get_version(language, version)
    }

    /// Template for `language` at `version`.
    ///
    /// # Errors
    /// Returns an error if that version is not registered.
    pub fn get_version(
        &self,
        language: Language,
        version: &str,
    ) -> Result<&RegisteredTemplate, TemplateError> {
        self.templates
            .get(&(language, version.to_owned()))
            .ok_or_else(|| TemplateError::VersionNotRegistered {
                language,
                version: version.to_owned(),
            })
    }

    /// Every registered template.
    pub fn templates(&self) -> impl Iterator<Item = &RegisteredTemplate> {
        self.templates.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_java_only() {
        let registry = TemplateRegistry::builtin();
        let java = registry.get(Language::Java).unwrap();
        assert_eq!(java.descriptor.template_id, JAVA_TEMPLATE_ID);
        assert_eq!(java.descriptor.extension(), ".java");
        assert!(java.builders.contains("class OperationBuilder"));

        assert!(matches!(
            registry.get(Language::TypeScript),
            Err(TemplateError::NotRegistered(Language::TypeScript))
        ));
    }

    #[test]
    fn test_latest_registration_wins() {
        let mut registry = TemplateRegistry::builtin();
        registry.register(RegisteredTemplate {
            descriptor: TemplateDescriptor::new(Language::Java, "2.0", "java/v2.tera"),
            source: "package {{ package }};".to_owned(),
            builders: String::new(),
        });

        assert_eq!(registry.get(Language::Java).unwrap().descriptor.version, "2.0");
        assert_eq!(
            registry.get_version(Language::Java, "1.0").unwrap().descriptor.template_id,
            JAVA_TEMPLATE_ID
        );
        assert!(matches!(
            registry.get_version(Language::Java, "3.0"),
            Err(TemplateError::VersionNotRegistered { .. })
        ));
        assert_eq!(registry.templates().count(), 2);
    }

    #[test]
    fn test_extension_falls_back_to_language_default() {
        let descriptor = TemplateDescriptor::new(Language::TypeScript, "1.0", "ts/api.tera");
        assert_eq!(descriptor.extension(), ".ts");
    }
}
