use std::io::Error as IoError;
use std::path::PathBuf;

use schemagen_core::Language;
use schemagen_fetch::FetchError;
use schemagen_validator::ValidationReport;
use thiserror::Error;

use crate::pipeline::PipelineState;

/// Template lookup and rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template registered for the language
    #[error("Template not found for language: {0}")]
    NotRegistered(Language),

    /// No template registered for the language and version
    #[error("Template not found for language: {language}, version: {version}")]
    VersionNotRegistered {
        /// Requested language
        language: Language,
        /// Requested version
        version: String,
    },

    /// Template source failed to parse or render
    #[error("Template processing failed: {0}")]
    Render(#[from] tera::Error),

    /// Render context could not be serialized
    #[error("Invalid render context: {0}")]
    Context(String),
}

/// Terminal failure of one generation run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Schema could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Fetched body is not an introspection response
    #[error("Failed to decode introspection schema: {0}")]
    Decode(#[from] serde_json::Error),

    /// Template lookup or rendering failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A blocking validation rule failed and was not ignored
    #[error("Generated code validation failed: {0}. See error log for details.")]
    Validation(ValidationReport),

    /// Generated file could not be written
    #[error("Failed to write generated file {path}: {source}")]
    Write {
        /// Target file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: IoError,
    },
}

impl PipelineError {
    /// State that was active when the run failed.
    pub fn failed_in(&self) -> PipelineState {
        match self {
            Self::Fetch(_) => PipelineState::Fetching,
            Self::Decode(_) | Self::Template(_) => PipelineState::Rendering,
            Self::Validation(_) => PipelineState::Validating,
            Self::Write { .. } => PipelineState::Writing,
        }
    }
}
