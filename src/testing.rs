//! In-crate fakes for the external collaborators, used by unit tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use image::{Rgb, RgbImage};

use crate::error::{MediaError, ModelError, Result};
use crate::frames::{FrameId, FrameStore, INPAINT};
use crate::inpaint::{InpaintModel, ModelRequest};
use crate::media::{ClipManifest, FrameRate, MediaTool};
use crate::pipeline::JobStatusSink;

/// Write `count` solid-colour PNG frames named `00000001.png`...
pub fn write_frames(dir: &Path, count: u64, width: u32, height: u32) {
    std::fs::create_dir_all(dir).unwrap();
    for i in 1..=count {
        let shade = (i * 7 % 256) as u8;
        let frame = RgbImage::from_pixel(width, height, Rgb([shade, 128, 255 - shade]));
        frame.save(dir.join(FrameId::new(i).file_name())).unwrap();
    }
}

/// Media tool that fabricates frames and treats clips as text files.
///
/// `concat` joins the contents of the listed clips and `mux` copies the
/// joined file, so the final output spells out the frame order.
pub struct FakeMedia {
    frames: u64,
    width: u32,
    height: u32,
    fail_extract: bool,
    fail_concat: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeMedia {
    pub fn new(frames: u64, width: u32, height: u32) -> Self {
        Self {
            frames,
            width,
            height,
            fail_extract: false,
            fail_concat: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_extract(mut self) -> Self {
        self.fail_extract = true;
        self
    }

    pub fn failing_concat(mut self) -> Self {
        self.fail_concat = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MediaTool for FakeMedia {
    fn extract_frames(&self, video: &Path, frames: &FrameStore) -> Result<()> {
        self.record(format!("extract {}", video.display()));
        if self.fail_extract {
            return Err(MediaError::DecodeFailed { reason: "corrupt stream".into() }.into());
        }
        write_frames(frames.dir(), self.frames, self.width, self.height);
        Ok(())
    }

    fn probe_frame_rate(&self, video: &Path) -> Result<FrameRate> {
        self.record(format!("probe {}", video.display()));
        Ok(FrameRate::new(30000, 1001))
    }

    fn concat(&self, manifest: &Path, output: &Path) -> Result<()> {
        self.record(format!("concat {}", manifest.display()));
        if self.fail_concat {
            return Err(MediaError::EncodeFailed { reason: "bad clip".into() }.into());
        }

        let mut joined = String::new();
        if let Ok(manifest) = ClipManifest::read(manifest) {
            for clip in manifest.clips() {
                if let Ok(text) = std::fs::read_to_string(clip) {
                    joined.push_str(&text);
                }
            }
        }
        std::fs::write(output, joined)?;
        Ok(())
    }

    fn mux(&self, audio_from: &Path, video_from: &Path, output: &Path) -> Result<()> {
        self.record(format!("mux {} {}", audio_from.display(), video_from.display()));
        std::fs::copy(video_from, output)?;
        Ok(())
    }
}

/// What the fake model saw for one batch
#[derive(Debug, Clone)]
pub struct BatchRecord {
    pub index: usize,
    pub fps: u32,
    pub frames: Vec<String>,
    /// Inpaint pixel count of each mask, in frame order
    pub inpainted: Vec<usize>,
    pub mask_value_at_origin: Vec<u8>,
}

/// Model that inspects its batch and writes the frame names as the "clip"
#[derive(Default)]
pub struct FakeModel {
    fail_on: Option<usize>,
    batches: Mutex<Vec<BatchRecord>>,
}

impl FakeModel {
    pub fn failing_on(batch: usize) -> Self {
        Self {
            fail_on: Some(batch),
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<BatchRecord> {
        self.batches.lock().unwrap().clone()
    }
}

impl InpaintModel for FakeModel {
    fn name(&self) -> &str {
        "fake"
    }

    fn run(&self, request: &ModelRequest<'_>) -> Result<PathBuf> {
        if self.fail_on == Some(request.batch) {
            return Err(ModelError::InvocationFailed { batch: request.batch, code: Some(1) }.into());
        }

        let names = |dir: &Path| -> Vec<String> {
            FrameStore::new(dir)
                .list()
                .unwrap()
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };
        let frames = names(request.frames_dir);
        assert_eq!(frames, names(request.masks_dir), "batch {} is unpaired", request.batch);

        let mut inpainted = Vec::new();
        let mut mask_value_at_origin = Vec::new();
        for name in &frames {
            let mask = image::open(request.masks_dir.join(name)).unwrap().to_luma8();
            inpainted.push(mask.pixels().filter(|p| p[0] == INPAINT).count());
            mask_value_at_origin.push(mask.get_pixel(0, 0)[0]);
        }

        let clip: String = frames.iter().map(|name| format!("{}\n", name)).collect();
        std::fs::write(request.output, clip)?;

        self.batches.lock().unwrap().push(BatchRecord {
            index: request.batch,
            fps: request.fps,
            frames,
            inpainted,
            mask_value_at_origin,
        });
        Ok(request.output.to_path_buf())
    }
}

/// Status sink that remembers every call
#[derive(Default)]
pub struct RecordingStatus {
    statuses: Mutex<Vec<String>>,
    started: Mutex<Option<DateTime<Utc>>>,
    stopped: Mutex<Option<bool>>,
}

impl RecordingStatus {
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn started(&self) -> bool {
        self.started.lock().unwrap().is_some()
    }

    /// `Some(failed)` once the job stopped
    pub fn stopped(&self) -> Option<bool> {
        *self.stopped.lock().unwrap()
    }
}

impl JobStatusSink for RecordingStatus {
    fn set_status(&self, status: &str) {
        self.statuses.lock().unwrap().push(status.to_string());
    }

    fn set_started_at(&self, at: DateTime<Utc>) {
        *self.started.lock().unwrap() = Some(at);
    }

    fn set_stopped_at(&self, _at: DateTime<Utc>, failed: bool) {
        *self.stopped.lock().unwrap() = Some(failed);
    }
}
