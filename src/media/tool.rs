use std::fmt;
use std::path::Path;

use crate::error::{MediaError, ModelError, Result};
use crate::frames::FrameStore;

/// Operations the pipeline needs from a media engine.
///
/// Every call blocks until the underlying tool exits. A non-zero exit is
/// fatal and never retried.
pub trait MediaTool: Send + Sync {
    /// Decode every frame of `video` into `frames` as `00000001.png`, `00000002.png`, ...
    fn extract_frames(&self, video: &Path, frames: &FrameStore) -> Result<()>;

    /// Frame rate of the first video stream
    fn probe_frame_rate(&self, video: &Path) -> Result<FrameRate>;

    /// Stream-copy the clips listed in `manifest`, in order, into one video
    fn concat(&self, manifest: &Path, output: &Path) -> Result<()>;

    /// Combine the audio of `audio_from` with the video of `video_from`
    fn mux(&self, audio_from: &Path, video_from: &Path, output: &Path) -> Result<()>;
}

/// Rational frame rate as reported by the container, e.g. `30000/1001`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub num: u64,
    pub den: u64,
}

impl FrameRate {
    pub fn new(num: u64, den: u64) -> Self {
        Self { num, den }
    }

    /// Parse `num/den` or a bare integer
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let (num, den) = match text.split_once('/') {
            Some((num, den)) => (num.trim(), den.trim()),
            None => (text, "1"),
        };

        let invalid = || MediaError::ProbeFailed {
            reason: format!("unparseable frame rate '{}'", text),
        };
        let num: u64 = num.parse().map_err(|_| invalid())?;
        let den: u64 = den.parse().map_err(|_| invalid())?;
        if den == 0 {
            return Err(invalid().into());
        }

        Ok(Self { num, den })
    }

    /// Whole frames per second handed to the model.
    ///
    /// Truncates rather than rounds (29.97 becomes 29), matching earlier runs.
    pub fn truncated(&self) -> Result<u32> {
        let fps = self.num.checked_div(self.den).unwrap_or(0);
        match u32::try_from(fps) {
            Ok(fps) if fps > 0 => Ok(fps),
            _ => Err(ModelError::InvalidFrameRate { fps: self.to_string() }.into()),
        }
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}
