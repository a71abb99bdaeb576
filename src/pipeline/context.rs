use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{MediaError, Result};
use crate::frames::FrameStore;
use crate::spec::{load_spec, Spec};

/// The three locations a job is started with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub source: PathBuf,
    pub spec: PathBuf,
    pub destination: PathBuf,
}

impl JobRequest {
    pub fn new<P: Into<PathBuf>>(source: P, spec: P, destination: P) -> Self {
        Self {
            source: source.into(),
            spec: spec.into(),
            destination: destination.into(),
        }
    }

    /// Job identifier: the source file name without extension
    pub fn job_id(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "job".to_string())
    }
}

const FRAMES_DIR: &str = "frames";
const MASKS_DIR: &str = "masks";
const IMPORT_DIR: &str = "import";
const EXPORT_DIR: &str = "export";

/// Scratch directories owned by one run.
///
/// Everything is removed when the workspace is dropped, on success, error or
/// panic, unless it was created with `keep` set.
pub struct Workspace {
    dir: Option<TempDir>,
    root: PathBuf,
    keep: bool,
}

impl Workspace {
    pub fn create(work_root: Option<&Path>, keep: bool) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("region-eraser-");
        let dir = match work_root {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        let root = dir.path().to_path_buf();
        for sub in [FRAMES_DIR, MASKS_DIR, IMPORT_DIR, EXPORT_DIR] {
            std::fs::create_dir_all(root.join(sub))?;
        }
        let workspace = Self { dir: Some(dir), root, keep };

        debug!("Created workspace at {:?}", workspace.root);
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Flat store of extracted frames
    pub fn frames(&self) -> FrameStore {
        FrameStore::new(self.root.join(FRAMES_DIR))
    }

    /// Flat store of synthesized masks
    pub fn masks(&self) -> FrameStore {
        FrameStore::new(self.root.join(MASKS_DIR))
    }

    /// Parent of the per-batch frame and mask folders
    pub fn import_dir(&self) -> PathBuf {
        self.root.join(IMPORT_DIR)
    }

    /// Per-batch clips, the concat manifest and the reassembled output
    pub fn export_dir(&self) -> PathBuf {
        self.root.join(EXPORT_DIR)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.keep {
            return;
        }
        if let Some(dir) = self.dir.take() {
            let kept = dir.into_path();
            info!("Keeping workspace for inspection at {:?}", kept);
        }
    }
}

/// Everything later stages need, resolved once before any work starts
pub struct RunContext {
    pub job_id: String,
    pub source: PathBuf,
    pub spec_path: PathBuf,
    pub destination: PathBuf,
    pub spec: Spec,
    pub batch_size: usize,
    pub mask_threads: usize,
    pub workspace: Workspace,
}

impl RunContext {
    /// Resolve paths, parse the spec and create the workspace
    pub fn prepare(request: &JobRequest, config: &PipelineConfig) -> Result<Self> {
        let source = request.source.canonicalize().map_err(|e| MediaError::DecodeFailed {
            reason: format!("cannot open source {}: {}", request.source.display(), e),
        })?;
        let spec_path = absolute(&request.spec)?;
        let destination = absolute(&request.destination)?;

        let spec = load_spec(&spec_path)?;
        let workspace = Workspace::create(config.work_root.as_deref(), config.keep_workdirs)?;

        info!(
            "Job {}: {} spec items, batches of {}",
            request.job_id(), spec.len(), config.batch_size
        );

        Ok(Self {
            job_id: request.job_id(),
            source,
            spec_path,
            destination,
            spec,
            batch_size: config.batch_size,
            mask_threads: config.mask_threads,
            workspace,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
