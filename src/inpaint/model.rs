use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::{ModelError, Result};

/// One model invocation: a batch of frames, their masks, and where the clip goes
#[derive(Debug, Clone)]
pub struct ModelRequest<'a> {
    /// 1-based batch index
    pub batch: usize,
    pub frames_dir: &'a Path,
    pub masks_dir: &'a Path,
    /// Whole frames per second for the output clip
    pub fps: u32,
    pub output: &'a Path,
}

/// A video-completion model that turns a batch of frames plus masks into a clip.
///
/// Implementations block until the clip is written and are assumed to be
/// deterministic for identical inputs.
pub trait InpaintModel: Send + Sync {
    /// Returns the unique name of this model
    fn name(&self) -> &str;

    /// Extension of the clips this model writes
    fn clip_extension(&self) -> &str {
        "mp4"
    }

    /// Inpaint one batch and return the path of the clip it produced
    fn run(&self, request: &ModelRequest<'_>) -> Result<PathBuf>;
}

/// [`InpaintModel`] that launches an external command per batch
pub struct CommandModel {
    config: ModelConfig,
}

impl CommandModel {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Full argument list passed to `config.program`
    pub fn args(&self, request: &ModelRequest<'_>) -> Vec<String> {
        let mut args = self.config.args.clone();
        args.extend([
            self.config.frames_flag.clone(),
            request.frames_dir.display().to_string(),
            self.config.masks_flag.clone(),
            request.masks_dir.display().to_string(),
            self.config.output_flag.clone(),
            request.output.display().to_string(),
            self.config.fps_flag.clone(),
            request.fps.to_string(),
        ]);
        args
    }
}

impl InpaintModel for CommandModel {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn clip_extension(&self) -> &str {
        &self.config.clip_extension
    }

    fn run(&self, request: &ModelRequest<'_>) -> Result<PathBuf> {
        let args = self.args(request);

        let mut command = Command::new(&self.config.program);
        command.args(&args).stdin(Stdio::null());
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        debug!("Running {:?}", command);

        // Output is inherited so the model's own progress streams through
        let status = command.status().map_err(|e| ModelError::LaunchFailed {
            batch: request.batch,
            reason: format!("{}: {}", self.config.program, e),
        })?;

        if !status.success() {
            return Err(ModelError::InvocationFailed {
                batch: request.batch,
                code: status.code(),
            }
            .into());
        }

        if !request.output.is_file() {
            return Err(ModelError::MissingOutput {
                batch: request.batch,
                path: request.output.display().to_string(),
            }
            .into());
        }

        info!("{} finished batch {}", self.name(), request.batch);
        Ok(request.output.to_path_buf())
    }
}
