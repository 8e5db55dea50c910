use std::collections::HashMap;

use schemagen_core::{ConfigError, TargetConfig};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::PipelineError;
use crate::pipeline::{GenerationOutcome, GenerationPipeline};

/// Why one target of a batch failed.
#[derive(Debug, Error)]
pub enum TargetFailure {
    /// Configuration rejected before any I/O
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generation run failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Generation task panicked or was aborted
    #[error("generation task aborted: {0}")]
    Aborted(String),
}

/// Failure of one target, tagged with its position in the batch.
#[derive(Debug, Error)]
#[error("Target #{index} ({url}): {source}")]
pub struct TargetError {
    /// Zero-based index of the target
    pub index: usize,
    /// Endpoint as configured
    pub url: String,
    /// Underlying failure
    #[source]
    pub source: TargetFailure,
}

/// Per-target outcome of a batch, in configuration order.
pub type TargetResult = Result<GenerationOutcome, TargetError>;

/// Validates and generates every target concurrently.
///
/// Each target runs on its own task with a clone of `pipeline`; a target that
/// fails validation or generation does not affect the others. The returned
/// vector has one entry per target, in the order given.
pub async fn run_targets(
    pipeline: &GenerationPipeline,
    targets: &[TargetConfig],
    cancel: &CancellationToken,
) -> Vec<TargetResult> {
    let mut results: Vec<Option<TargetResult>> = targets.iter().map(|_| None).collect();
    let mut join_set = JoinSet::new();
    let mut task_targets = HashMap::new();

    for (index, config) in targets.iter().enumerate() {
        let validated = match config.validate() {
            Ok(validated) => validated,
            Err(err) => {
                error!("Target #{index} rejected: {err}");
                results[index] = Some(Err(TargetError {
                    index,
                    url: config.url.clone(),
                    source: err.into(),
                }));
                continue;
            }
        };

        let task_pipeline = pipeline.clone();
        let task_cancel = cancel.clone();
        let url = config.url.clone();
        let handle = join_set.spawn(async move {
            task_pipeline
                .run(&validated, &task_cancel)
                .await
                .map_err(|err| TargetError {
                    index,
                    url,
                    source: err.into(),
                })
        });
        task_targets.insert(handle.id(), index);
    }

    while let Some(joined) = join_set.join_next_with_id().await {
        let (task_id, outcome) = match joined {
            Ok((task_id, outcome)) => (task_id, Ok(outcome)),
            Err(join_err) => (join_err.id(), Err(join_err.to_string())),
        };
        let Some(&index) = task_targets.get(&task_id) else {
            continue;
        };

        let outcome = outcome.unwrap_or_else(|message| {
            Err(TargetError {
                index,
                url: targets[index].url.clone(),
                source: TargetFailure::Aborted(message),
            })
        });
        match &outcome {
            Ok(generated) => info!("Target #{index} generated {}", generated.path.display()),
            Err(err) => error!("{err}"),
        }
        results[index] = Some(outcome);
    }

    results
        .into_iter()
        .zip(targets)
        .enumerate()
        .map(|(index, (slot, config))| {
            slot.unwrap_or_else(|| {
                Err(TargetError {
                    index,
                    url: config.url.clone(),
                    source: TargetFailure::Aborted("task did not report".to_owned()),
                })
            })
        })
        .collect()
}
