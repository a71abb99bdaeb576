use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// External record of a job's progress.
///
/// The pipeline calls these at stage boundaries and at start/end. Sinks own
/// their storage and must not fail the job; errors are theirs to log.
pub trait JobStatusSink: Send + Sync {
    fn set_status(&self, status: &str);

    fn set_started_at(&self, at: DateTime<Utc>);

    fn set_stopped_at(&self, at: DateTime<Utc>, failed: bool);
}

/// Sink that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusSink;

impl JobStatusSink for NoopStatusSink {
    fn set_status(&self, _status: &str) {}

    fn set_started_at(&self, _at: DateTime<Utc>) {}

    fn set_stopped_at(&self, _at: DateTime<Utc>, _failed: bool) {}
}

#[derive(Debug, Clone, Default, Serialize)]
struct StatusRecord {
    job_id: String,
    status: Option<String>,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    failed: bool,
}

/// Sink that rewrites a small JSON document after every update
pub struct JsonFileStatusSink {
    path: PathBuf,
    record: Mutex<StatusRecord>,
}

impl JsonFileStatusSink {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(path: P, job_id: S) -> Self {
        Self {
            path: path.into(),
            record: Mutex::new(StatusRecord {
                job_id: job_id.into(),
                ..StatusRecord::default()
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, apply: impl FnOnce(&mut StatusRecord)) {
        let mut record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        apply(&mut record);

        let written = serde_json::to_vec_pretty(&*record)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&self.path, json).map_err(|e| e.to_string()));

        if let Err(e) = written {
            warn!("Failed to record job status in {:?}: {}", self.path, e);
        }
    }
}

impl JobStatusSink for JsonFileStatusSink {
    fn set_status(&self, status: &str) {
        self.update(|r| r.status = Some(status.to_string()));
    }

    fn set_started_at(&self, at: DateTime<Utc>) {
        self.update(|r| {
            r.started_at = Some(at);
            r.stopped_at = None;
            r.failed = false;
        });
    }

    fn set_stopped_at(&self, at: DateTime<Utc>, failed: bool) {
        self.update(|r| {
            r.stopped_at = Some(at);
            r.failed = failed;
        });
    }
}
