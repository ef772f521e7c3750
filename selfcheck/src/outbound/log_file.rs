//! Submission log adapters.
//!
//! `FileSubmissionLog` appends one timestamped line per message to a plain
//! text file; `TracingSubmissionLog` forwards the same messages as tracing
//! events when no file is configured.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use cap_std::fs::{File, OpenOptions};
use cap_std::{ambient_authority, fs::Dir};
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::ports::SubmissionLog;

/// Failure to open the submission log file.
#[derive(Debug, Error)]
pub enum SubmissionLogError {
    /// The path has no file name component.
    #[error("submission log path `{}` does not name a file", path.display())]
    NotAFile {
        /// Rejected path.
        path: PathBuf,
    },
    /// The parent directory or the file could not be opened.
    #[error("failed to open submission log `{}`: {source}", path.display())]
    Open {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Append-only text log, one `<RFC 3339 local time>: (<level>) <text>` line
/// per message. The file is created when missing and never truncated.
pub struct FileSubmissionLog {
    path: PathBuf,
    file: Mutex<File>,
    clock: Arc<dyn Clock>,
}

impl FileSubmissionLog {
    /// Open `path` for appending, stamping lines with the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionLogError`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SubmissionLogError> {
        Self::open_with_clock(path, Arc::new(DefaultClock))
    }

    /// Open `path` for appending with an injected clock.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionLogError`] when the file cannot be opened.
    pub fn open_with_clock(
        path: impl AsRef<Path>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SubmissionLogError> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| SubmissionLogError::NotAFile {
            path: path.to_path_buf(),
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let open_error = |source| SubmissionLogError::Open {
            path: path.to_path_buf(),
            source,
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(open_error)?;
        let file = dir
            .open_with(file_name, OpenOptions::new().create(true).append(true))
            .map_err(open_error)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            clock,
        })
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, level: &str, text: &str) {
        let line = format!("{}: ({level}) {text}\n", self.clock.local().to_rfc3339());
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = file.write_all(line.as_bytes()) {
            warn!(path = %self.path.display(), error = %error, "submission log write failed");
        }
    }
}

impl SubmissionLog for FileSubmissionLog {
    fn info(&self, text: &str) {
        self.append("info", text);
    }

    fn error(&self, text: &str) {
        self.append("error", text);
    }
}

/// Forwards submission log lines to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSubmissionLog;

impl SubmissionLog for TracingSubmissionLog {
    fn info(&self, text: &str) {
        info!(target: "selfcheck::submission", "{text}");
    }

    fn error(&self, text: &str) {
        error!(target: "selfcheck::submission", "{text}");
    }
}
