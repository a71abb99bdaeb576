use thiserror::Error;

/// Main error type for the Region-Eraser library
#[derive(Error, Debug)]
pub enum EraserError {
    #[error("Spec error: {0}")]
    Spec(#[from] SpecError),

    #[error("Media tool error: {0}")]
    Media(#[from] MediaError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Inpainting model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while reading the region/time spec document
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Failed to read spec document: {path}")]
    ReadFailed { path: String },

    #[error("Malformed spec document: {reason}")]
    Malformed { reason: String },

    #[error("Item {item}: startAt {start} is after endWith {end}")]
    InvertedRange { item: usize, start: u64, end: u64 },

    #[error("Item {item}: frame indices are 1-based, got startAt 0")]
    ZeroStart { item: usize },

    #[error("Item {item}, region {region}: size {w}x{h} must be positive")]
    EmptyRegion { item: usize, region: usize, w: u32, h: u32 },
}

/// External media tool (ffmpeg/ffprobe) failures
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Media tool not available: {program}")]
    ToolMissing { program: String },

    #[error("Frame extraction failed: {reason}")]
    DecodeFailed { reason: String },

    #[error("Encoding failed: {reason}")]
    EncodeFailed { reason: String },

    #[error("Frame rate probe failed: {reason}")]
    ProbeFailed { reason: String },
}

/// Invariant violations between pipeline stages
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No frames were extracted into {path}")]
    EmptyFrameSet { path: String },

    #[error("Frame/mask pairing mismatch at position {position}: frame {frame:?}, mask {mask:?}")]
    PairingMismatch {
        position: usize,
        frame: Option<String>,
        mask: Option<String>,
    },

    #[error("Could not read frame {path}: {reason}")]
    FrameUnreadable { path: String, reason: String },

    #[error("Could not write mask {path}: {reason}")]
    MaskWriteFailed { path: String, reason: String },

    #[error("Batch size must be positive")]
    ZeroBatchSize,
}

/// Inpainting model invocation failures
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to launch model for batch {batch}: {reason}")]
    LaunchFailed { batch: usize, reason: String },

    #[error("Model failed on batch {batch} (exit code {code:?})")]
    InvocationFailed { batch: usize, code: Option<i32> },

    #[error("Model reported success on batch {batch} but wrote no clip at {path}")]
    MissingOutput { batch: usize, path: String },

    #[error("Frame rate {fps} cannot be passed to the model")]
    InvalidFrameRate { fps: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using EraserError
pub type Result<T> = std::result::Result<T, EraserError>;

impl EraserError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Whether the caller can fix this by changing its inputs.
    ///
    /// Nothing in the pipeline is retried; every other error is fatal for the job.
    pub fn is_caller_fixable(&self) -> bool {
        matches!(self, Self::Spec(_) | Self::Config(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Spec(SpecError::ReadFailed { path }) => {
                format!("Could not read spec document '{}'. Please check the file exists.", path)
            }
            Self::Spec(e) => format!("The spec document is invalid: {}", e),
            Self::Media(MediaError::ToolMissing { program }) => {
                format!("'{}' was not found. Please install FFmpeg or set [media] in the config.", program)
            }
            Self::Pipeline(PipelineError::EmptyFrameSet { .. }) => {
                "The source video produced no frames.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_fixable_errors() {
        let spec: EraserError = SpecError::ZeroStart { item: 0 }.into();
        assert!(spec.is_caller_fixable());

        let model: EraserError = ModelError::InvocationFailed { batch: 2, code: Some(1) }.into();
        assert!(!model.is_caller_fixable());

        let pairing: EraserError = PipelineError::PairingMismatch {
            position: 3,
            frame: Some("00000004.png".into()),
            mask: Some("00000005.png".into()),
        }
        .into();
        assert!(!pairing.is_caller_fixable());
    }

    #[test]
    fn test_user_message_mentions_path() {
        let err: EraserError = SpecError::ReadFailed { path: "spec.json".into() }.into();
        assert!(err.user_message().contains("spec.json"));
    }
}
