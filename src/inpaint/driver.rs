use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::frames::{Batch, FRAME_ID_WIDTH};
use crate::inpaint::model::{InpaintModel, ModelRequest};
use crate::media::{ClipManifest, FrameRate};
use crate::pipeline::progress::ProgressReporter;

/// Name of the concat manifest written next to the clips
pub const MANIFEST_FILE: &str = "concat.txt";

/// Clips produced for one run, in batch order
#[derive(Debug, Clone)]
pub struct InpaintOutput {
    pub manifest: ClipManifest,
    pub manifest_path: PathBuf,
}

/// Runs the model once per batch, strictly in batch-index order
pub struct InpaintDriver<'a> {
    model: &'a dyn InpaintModel,
    export_dir: &'a Path,
}

impl<'a> InpaintDriver<'a> {
    pub fn new(model: &'a dyn InpaintModel, export_dir: &'a Path) -> Self {
        Self { model, export_dir }
    }

    pub fn clip_path(&self, batch: &Batch) -> PathBuf {
        self.export_dir.join(format!(
            "{:0width$}.{}",
            batch.index,
            self.model.clip_extension(),
            width = FRAME_ID_WIDTH
        ))
    }

    /// Inpaint every batch and write the clip manifest.
    ///
    /// The first failing batch aborts the run; clips already written are
    /// not salvaged.
    pub fn run(&self, batches: &[Batch], frame_rate: FrameRate, progress: &ProgressReporter) -> Result<InpaintOutput> {
        let fps = frame_rate.truncated()?;
        info!(
            "Inpainting {} batches with {} at {} fps (source {})",
            batches.len(), self.model.name(), fps, frame_rate
        );

        let mut ordered: Vec<&Batch> = batches.iter().collect();
        ordered.sort_by_key(|b| b.index);

        let total = ordered.len();
        let mut clips = Vec::with_capacity(total);

        for (n, batch) in ordered.into_iter().enumerate() {
            progress.report(&format!("StageE: Processing batch {}/{}", n + 1, total));

            let output = self.clip_path(batch);
            let request = ModelRequest {
                batch: batch.index,
                frames_dir: &batch.frames_dir,
                masks_dir: &batch.masks_dir,
                fps,
                output: &output,
            };
            clips.push(self.model.run(&request)?);
        }

        let manifest = ClipManifest::new(clips);
        let manifest_path = self.export_dir.join(MANIFEST_FILE);
        manifest.write(&manifest_path)?;

        Ok(InpaintOutput { manifest, manifest_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EraserError, ModelError};
    use crate::pipeline::status::NoopStatusSink;
    use crate::testing::{FakeModel, RecordingStatus};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn batches(import: &Path, count: usize) -> Vec<Batch> {
        (1..=count)
            .map(|index| {
                let batch = Batch {
                    index,
                    frames_dir: import.join(format!("frames_{:08}", index)),
                    masks_dir: import.join(format!("masks_{:08}", index)),
                    len: 0,
                };
                std::fs::create_dir_all(&batch.frames_dir).unwrap();
                std::fs::create_dir_all(&batch.masks_dir).unwrap();
                batch
            })
            .collect()
    }

    #[test]
    fn test_manifest_in_batch_order() {
        let dir = tempdir().unwrap();
        let model = FakeModel::default();
        let mut input = batches(dir.path(), 3);
        input.reverse();

        let status = Arc::new(RecordingStatus::default());
        let progress = ProgressReporter::new(None, status.clone());
        let output = InpaintDriver::new(&model, dir.path())
            .run(&input, FrameRate::new(30000, 1001), &progress)
            .unwrap();

        let expected: Vec<PathBuf> = (1..=3).map(|i| dir.path().join(format!("{:08}.mp4", i))).collect();
        assert_eq!(output.manifest.clips(), expected.as_slice());
        assert_eq!(ClipManifest::read(&output.manifest_path).unwrap(), output.manifest);

        assert_eq!(model.batches().iter().map(|b| b.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(model.batches().iter().all(|b| b.fps == 29));
        assert_eq!(
            status.statuses(),
            vec![
                "StageE: Processing batch 1/3",
                "StageE: Processing batch 2/3",
                "StageE: Processing batch 3/3",
            ]
        );
    }

    #[test]
    fn test_failing_batch_aborts_run() {
        let dir = tempdir().unwrap();
        let model = FakeModel::failing_on(2);
        let input = batches(dir.path(), 3);
        let progress = ProgressReporter::new(None, Arc::new(NoopStatusSink));

        let err = InpaintDriver::new(&model, dir.path())
            .run(&input, FrameRate::new(25, 1), &progress)
            .unwrap_err();

        assert!(matches!(err, EraserError::Model(ModelError::InvocationFailed { batch: 2, .. })));
        assert_eq!(model.batches().len(), 1);
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }
}
