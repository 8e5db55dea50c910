use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use schemagen_core::{IntrospectionResponse, ValidatedTarget};
use schemagen_validator::{CodeValidator, FileReportSink, ReportSink, RuleIgnoreSet, ValidationReport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, TemplateError};
use crate::registry::TemplateRegistry;
use crate::render::{RenderContext, TemplateRenderer, TeraRenderer};
use crate::source::{HttpSchemaSource, SchemaSource};
use crate::writer::{ArtifactWriter, FsArtifactWriter};

/// Stage of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Retrieving the introspection schema
    Fetching,
    /// Decoding the schema and rendering the template
    Rendering,
    /// Running the code validator
    Validating,
    /// Writing the generated file
    Writing,
    /// Finished successfully
    Done,
    /// Finished with an error
    Failed,
}

impl PipelineState {
    /// Whether `next` may follow `self`. States are never re-entered.
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Fetching, Self::Rendering)
                | (Self::Rendering, Self::Validating)
                | (Self::Validating, Self::Writing)
                | (Self::Writing, Self::Done)
                | (
                    Self::Fetching | Self::Rendering | Self::Validating | Self::Writing,
                    Self::Failed
                )
        )
    }

    /// Whether the run is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fetching => "fetching",
            Self::Rendering => "rendering",
            Self::Validating => "validating",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        formatter.write_str(label)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Path of the written file
    pub path: PathBuf,
    /// Generated source
    pub content: String,
    /// Validation report of the generated source
    pub report: ValidationReport,
    /// States visited, in order
    pub states: Vec<PipelineState>,
}

/// Records state transitions of one run.
struct StateTrail {
    /// Class being generated, for log lines
    label: String,
    /// States visited so far
    visited: Vec<PipelineState>,
}

impl StateTrail {
    fn start(label: &str) -> Self {
        info!("{label}: {}", PipelineState::Fetching);
        Self {
            label: label.to_owned(),
            visited: vec![PipelineState::Fetching],
        }
    }

    fn current(&self) -> PipelineState {
        self.visited
            .last()
            .copied()
            .unwrap_or(PipelineState::Fetching)
    }

    fn advance(&mut self, next: PipelineState) {
        let current = self.current();
        debug_assert!(
            current.can_advance_to(next),
            "illegal transition {current} -> {next}"
        );
        info!("{}: {current} -> {next}", self.label);
        self.visited.push(next);
    }

    fn fail(mut self, err: PipelineError) -> PipelineError {
        self.advance(PipelineState::Failed);
        err
    }
}

/// Fetch → render → validate → write for one validated target.
///
/// Holds only shared, immutable collaborators; clones are cheap and runs
/// are independent.
#[derive(Clone)]
pub struct GenerationPipeline {
    /// Schema retrieval
    source: Arc<dyn SchemaSource>,
    /// Template rendering
    renderer: Arc<dyn TemplateRenderer>,
    /// Artifact output
    writer: Arc<dyn ArtifactWriter>,
    /// Template lookup by language
    registry: Arc<TemplateRegistry>,
    /// Generated code checks
    validator: CodeValidator,
}

impl GenerationPipeline {
    /// Creates a pipeline from explicit collaborators.
    pub fn new(
        source: Arc<dyn SchemaSource>,
        renderer: Arc<dyn TemplateRenderer>,
        writer: Arc<dyn ArtifactWriter>,
        registry: Arc<TemplateRegistry>,
    ) -> Self {
        Self {
            source,
            renderer,
            writer,
            registry,
            validator: CodeValidator::default(),
        }
    }

    /// HTTP fetching, the bundled templates rendered with `tera`, and
    /// filesystem output.
    ///
    /// # Errors
    /// Returns an error if a bundled template fails to parse.
    pub fn standard() -> Result<Self, TemplateError> {
        let registry = TemplateRegistry::builtin();
        let renderer = TeraRenderer::from_registry(&registry)?;
        Ok(Self::new(
            Arc::new(HttpSchemaSource),
            Arc::new(renderer),
            Arc::new(FsArtifactWriter),
            Arc::new(registry),
        ))
    }

    /// Replaces the code validator.
    #[must_use]
    pub fn with_validator(mut self, validator: CodeValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Runs one target to completion.
    ///
    /// # Errors
    /// Returns the failure of the first stage that failed. A failed
    /// validation only fails the run when the target sets
    /// `fail_on_validation_error`.
    pub async fn run(
        &self,
        target: &ValidatedTarget,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome, PipelineError> {
        let mut trail = StateTrail::start(&target.class_name);

        let body = match self.source.load_schema(&target.request, cancel).await {
            Ok(body) => body,
            Err(err) => return Err(trail.fail(err.into())),
        };

        trail.advance(PipelineState::Rendering);
        let (content, extension) = match self.render(target, &body) {
            Ok(rendered) => rendered,
            Err(err) => return Err(trail.fail(err)),
        };

        trail.advance(PipelineState::Validating);
        let report = self.validate(target, &content);
        if !report.passed() {
            if target.fail_on_validation_error {
                return Err(trail.fail(PipelineError::Validation(report)));
            }
            warn!(
                "Generated code for {} failed validation; continuing because fail_on_validation_error is false",
                target.class_name
            );
        }

        trail.advance(PipelineState::Writing);
        let file_name = format!("{}{extension}", target.class_name);
        let path = match self
            .writer
            .write_artifact(&target.output_dir, &file_name, &content)
            .await
        {
            Ok(path) => path,
            Err(source) => {
                let path = target.output_dir.join(&file_name);
                return Err(trail.fail(PipelineError::Write { path, source }));
            }
        };

        trail.advance(PipelineState::Done);
        Ok(GenerationOutcome {
            path,
            content,
            report,
            states: trail.visited,
        })
    }

    /// Decodes the schema and renders it, returning the text and the file
    /// extension the template declares.
    fn render(
        &self,
        target: &ValidatedTarget,
        body: &str,
    ) -> Result<(String, String), PipelineError> {
        let response = IntrospectionResponse::from_json(body)?;
        let template = self.registry.get(target.language)?;
        debug!(
            "Rendering {} with template {} v{}",
            target.class_name, template.descriptor.template_id, template.descriptor.version
        );

        let context = RenderContext {
            class_name: &target.class_name,
            package: &target.package,
            schema: response.schema(),
            builders: &template.builders,
            template: &template.descriptor,
        };
        let content = self
            .renderer
            .render(&template.descriptor.template_id, &context)?;
        Ok((content, template.descriptor.extension().to_owned()))
    }

    fn validate(&self, target: &ValidatedTarget, content: &str) -> ValidationReport {
        let ignore: RuleIgnoreSet = target.ignored_validation_rules.iter().collect();
        let sink = target.validation_report_file.as_ref().map(FileReportSink::new);
        self.validator.validate(
            content,
            &ignore,
            target.language.display_name(),
            sink.as_ref().map(|file| file as &dyn ReportSink),
        )
    }
}
