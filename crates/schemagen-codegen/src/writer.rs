use std::io::Result as IoResult;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

/// Persists generated source.
#[async_trait]
pub trait ArtifactWriter: Send + Sync {
    /// Writes `content` to `dir/file_name`, creating `dir` as needed and
    /// replacing any previous file. Returns the written path.
    ///
    /// # Errors
    /// Returns an I/O error if the directory or file cannot be written.
    async fn write_artifact(&self, dir: &Path, file_name: &str, content: &str) -> IoResult<PathBuf>;
}

/// Writes artifacts to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactWriter;

#[async_trait]
impl ArtifactWriter for FsArtifactWriter {
    async fn write_artifact(&self, dir: &Path, file_name: &str, content: &str) -> IoResult<PathBuf> {
        fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        fs::write(&path, content).await?;
        info!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }
}
