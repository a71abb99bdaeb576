use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::pipeline::status::JobStatusSink;

/// Reports stage transitions and batch progress.
///
/// Each message goes to the log, to the job-status sink, and as a
/// timestamped line to the optional progress file. Failing to write the file
/// is logged and otherwise ignored.
pub struct ProgressReporter {
    log_file: Option<PathBuf>,
    status: Arc<dyn JobStatusSink>,
}

impl ProgressReporter {
    pub fn new(log_file: Option<PathBuf>, status: Arc<dyn JobStatusSink>) -> Self {
        Self { log_file, status }
    }

    /// Truncate the progress file at job start
    pub fn reset(&self) {
        let Some(path) = &self.log_file else { return };
        if let Err(e) = std::fs::write(path, "") {
            warn!("Failed to clear progress file {:?}: {}", path, e);
        }
    }

    pub fn report(&self, message: &str) {
        info!("{}", message);
        self.status.set_status(message);
        self.append(message);
    }

    fn append(&self, message: &str) {
        let Some(path) = &self.log_file else { return };

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{} - {}", Local::now().to_rfc3339(), message));

        if let Err(e) = written {
            warn!("Failed to write progress to {:?}: {}", path, e);
        }
    }
}
