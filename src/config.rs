use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for Region-Eraser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batching and workspace settings
    pub pipeline: PipelineConfig,

    /// ffmpeg/ffprobe settings
    pub media: MediaConfig,

    /// External inpainting model command
    pub model: ModelConfig,

    /// Progress channel
    pub progress: ProgressConfig,

    /// Job-status record
    pub status: StatusConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.media.validate()?;
        self.model.validate()?;
        Ok(())
    }
}

/// Batching and workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frame/mask pairs per model invocation
    pub batch_size: usize,

    /// Threads used for mask synthesis
    pub mask_threads: usize,

    /// Keep the scratch workspace after the run for inspection
    pub keep_workdirs: bool,

    /// Parent directory for scratch workspaces (system temp dir if unset)
    pub work_root: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 9,
            mask_threads: num_cpus::get(),
            keep_workdirs: false,
            work_root: None,
        }
    }
}

impl PipelineConfig {
    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.batch_size".to_string(),
                value: self.batch_size.to_string()
            }.into());
        }

        if self.mask_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pipeline.mask_threads".to_string(),
                value: self.mask_threads.to_string()
            }.into());
        }

        Ok(())
    }
}

/// External media tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// ffmpeg program
    pub ffmpeg: String,

    /// ffprobe program
    pub ffprobe: String,

    /// Value passed to ffmpeg's `-loglevel`
    pub log_level: String,

    /// Codec for the remuxed audio track
    pub audio_codec: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            log_level: "error".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

impl MediaConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("media.ffmpeg", &self.ffmpeg),
            ("media.ffprobe", &self.ffprobe),
            ("media.audio_codec", &self.audio_codec),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone()
                }.into());
            }
        }
        Ok(())
    }
}

/// Inpainting model command configuration
///
/// Each batch runs
/// `program args... frames_flag <dir> masks_flag <dir> output_flag <clip> fps_flag <fps>`
/// inside `working_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Display name used in logs
    pub name: String,

    pub program: String,

    /// Leading arguments, before the per-batch flags
    pub args: Vec<String>,

    pub working_dir: Option<PathBuf>,

    pub frames_flag: String,
    pub masks_flag: String,
    pub output_flag: String,
    pub fps_flag: String,

    /// Extension of the clip the model writes
    pub clip_extension: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let args = [
            "run", "--live-stream", "-n", "pixa",
            "python", "test.py",
            "--model", "e2fgvi_hq",
            "--ckpt", "release_model/E2FGVI-HQ-CVPR22.pth",
        ];

        Self {
            name: "e2fgvi_hq".to_string(),
            program: "conda".to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            working_dir: Some(PathBuf::from("E2FGVI")),
            frames_flag: "--video".to_string(),
            masks_flag: "--mask".to_string(),
            output_flag: "--savepath".to_string(),
            fps_flag: "--savefps".to_string(),
            clip_extension: "mp4".to_string(),
        }
    }
}

impl ModelConfig {
    fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "model.program".to_string(),
                value: self.program.clone()
            }.into());
        }

        if self.clip_extension.is_empty() || self.clip_extension.contains(['/', '.']) {
            return Err(ConfigError::InvalidValue {
                key: "model.clip_extension".to_string(),
                value: self.clip_extension.clone()
            }.into());
        }

        Ok(())
    }
}

/// Progress channel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Append-only progress file, truncated at job start
    pub log_file: Option<PathBuf>,
}

/// Job-status record configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// JSON status document rewritten at every stage boundary
    pub file: Option<PathBuf>,
}
