//! # Pipeline Module
//!
//! Stage sequencing for one job: run context, scratch workspace, progress
//! reporting, job-status recording and the orchestrator itself.

pub mod context;
pub mod progress;
pub mod status;
pub mod orchestrator;

pub use context::{JobRequest, RunContext, Workspace};
pub use progress::ProgressReporter;
pub use status::{JobStatusSink, JsonFileStatusSink, NoopStatusSink};
pub use orchestrator::{Pipeline, Stage};
