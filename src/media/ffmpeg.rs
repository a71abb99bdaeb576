use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{MediaError, Result};
use crate::frames::FrameStore;
use crate::media::tool::{FrameRate, MediaTool};

/// Lines of stderr kept in error messages
const STDERR_TAIL_LINES: usize = 20;

/// [`MediaTool`] backed by the `ffmpeg` and `ffprobe` command-line programs
pub struct FfmpegTool {
    config: MediaConfig,
}

impl FfmpegTool {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Check that both programs can be launched
    pub fn check_available(&self) -> Result<()> {
        for program in [&self.config.ffmpeg, &self.config.ffprobe] {
            let status = Command::new(program)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();

            if !matches!(status, Ok(status) if status.success()) {
                return Err(MediaError::ToolMissing { program: program.clone() }.into());
            }
        }
        Ok(())
    }

    fn common_args(&self) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            self.config.log_level.clone(),
        ]
    }

    pub fn extract_args(&self, video: &Path, frames: &FrameStore) -> Vec<String> {
        let mut args = self.common_args();
        args.push("-i".to_string());
        args.push(video.display().to_string());
        args.push(frames.output_pattern().display().to_string());
        args
    }

    pub fn probe_args(&self, video: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_streams".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            video.display().to_string(),
        ]
    }

    pub fn concat_args(&self, manifest: &Path, output: &Path) -> Vec<String> {
        let manifest = manifest.display().to_string();
        let output = output.display().to_string();

        let mut args = self.common_args();
        args.extend(
            [
                "-y", "-f", "concat",
                "-safe", "0",
                "-i", manifest.as_str(),
                "-c", "copy",
                output.as_str(),
            ]
            .map(String::from),
        );
        args
    }

    pub fn mux_args(&self, audio_from: &Path, video_from: &Path, output: &Path) -> Vec<String> {
        let audio_from = audio_from.display().to_string();
        let video_from = video_from.display().to_string();
        let output = output.display().to_string();

        let mut args = self.common_args();
        args.extend(
            [
                "-y",
                "-i", audio_from.as_str(),
                "-i", video_from.as_str(),
                "-c:v", "copy",
                "-c:a", self.config.audio_codec.as_str(),
                // Audio is optional so silent sources still produce output
                "-map", "0:a?",
                "-map", "1:v",
                output.as_str(),
            ]
            .map(String::from),
        );
        args
    }

    fn run(&self, program: &str, args: &[String]) -> std::result::Result<Output, String> {
        debug!("Running {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => format!("{} not found", program),
                _ => format!("failed to launch {}: {}", program, e),
            })?;

        if !output.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr_tail(&output.stderr)
            ));
        }
        Ok(output)
    }
}

impl MediaTool for FfmpegTool {
    fn extract_frames(&self, video: &Path, frames: &FrameStore) -> Result<()> {
        std::fs::create_dir_all(frames.dir())?;
        let args = self.extract_args(video, frames);
        self.run(&self.config.ffmpeg, &args)
            .map_err(|reason| MediaError::DecodeFailed { reason })?;

        info!("Extracted frames from {:?} into {:?}", video, frames.dir());
        Ok(())
    }

    fn probe_frame_rate(&self, video: &Path) -> Result<FrameRate> {
        let args = self.probe_args(video);
        let output = self
            .run(&self.config.ffprobe, &args)
            .map_err(|reason| MediaError::ProbeFailed { reason })?;

        let json: Value = serde_json::from_slice(&output.stdout).map_err(|e| MediaError::ProbeFailed {
            reason: format!("invalid ffprobe output: {}", e),
        })?;
        parse_probe_frame_rate(&json)
    }

    fn concat(&self, manifest: &Path, output: &Path) -> Result<()> {
        let args = self.concat_args(manifest, output);
        self.run(&self.config.ffmpeg, &args)
            .map_err(|reason| MediaError::EncodeFailed { reason })?;
        Ok(())
    }

    fn mux(&self, audio_from: &Path, video_from: &Path, output: &Path) -> Result<()> {
        let args = self.mux_args(audio_from, video_from, output);
        self.run(&self.config.ffmpeg, &args)
            .map_err(|reason| MediaError::EncodeFailed { reason })?;
        Ok(())
    }
}

/// Pull `r_frame_rate` of the first video stream out of `ffprobe -print_format json`
pub fn parse_probe_frame_rate(json: &Value) -> Result<FrameRate> {
    let stream = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.get("codec_type").and_then(|t| t.as_str()) == Some("video"))
        })
        .ok_or_else(|| MediaError::ProbeFailed {
            reason: "no video stream found".to_string(),
        })?;

    let rate = stream
        .get("r_frame_rate")
        .and_then(|r| r.as_str())
        .ok_or_else(|| MediaError::ProbeFailed {
            reason: "video stream has no r_frame_rate".to_string(),
        })?;

    FrameRate::parse(rate)
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
