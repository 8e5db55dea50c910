use std::fs::{create_dir_all, write};
use std::io::Result as IoResult;
use std::path::{Path, PathBuf};

/// Destination for a formatted validation error report.
pub trait ReportSink: Send + Sync {
    /// Writes the report text.
    ///
    /// # Errors
    /// Returns an I/O error if the report cannot be stored. Callers log it
    /// and carry on.
    fn write_report(&self, report: &str) -> IoResult<()>;

    /// Where the report goes, for log messages.
    fn describe(&self) -> String;
}

/// Writes the report to a file, creating parent directories and replacing
/// any previous content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReportSink {
    /// Report file path
    path: PathBuf,
}

impl FileReportSink {
    /// Creates a sink for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Report file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileReportSink {
    fn write_report(&self, report: &str) -> IoResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        write(&self.path, report)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
