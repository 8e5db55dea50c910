//! Code generation from GraphQL introspection schemas.
//!
//! [`GenerationPipeline`] drives one target through
//! `Fetching → Rendering → Validating → Writing → Done`, failing fast into
//! `Failed`. Rendering goes through the [`TemplateRenderer`] boundary (backed
//! by `tera`), writing through [`ArtifactWriter`], and schema retrieval
//! through [`SchemaSource`]. [`run_targets`] runs many targets concurrently and
//! reports each one separately.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Multi-target batch runner.
pub mod batch;
/// Codegen error types.
pub mod error;
/// Java naming and type mapping used by the template filters.
pub mod java;
/// Generation state machine.
pub mod pipeline;
/// Template descriptors and the built-in template set.
pub mod registry;
/// Template rendering boundary.
pub mod render;
/// Schema retrieval boundary.
pub mod source;
/// Generated artifact output boundary.
pub mod writer;

pub use batch::{TargetError, TargetFailure, TargetResult, run_targets};
pub use error::{PipelineError, TemplateError};
pub use pipeline::{GenerationOutcome, GenerationPipeline, PipelineState};
pub use registry::{RegisteredTemplate, TemplateDescriptor, TemplateRegistry};
pub use render::{RenderContext, TemplateRenderer, TeraRenderer};
pub use source::{HttpSchemaSource, SchemaSource};
pub use writer::{ArtifactWriter, FsArtifactWriter};
