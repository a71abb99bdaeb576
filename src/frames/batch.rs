use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{EraserError, PipelineError, Result};
use crate::frames::store::{FrameStore, FRAME_ID_WIDTH};

/// 1-based batch index of the pair at 0-based `position`
pub fn batch_index(position: usize, batch_size: usize) -> usize {
    position / batch_size + 1
}

/// A run of consecutive frame/mask pairs handed to the model in one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 1-based batch index
    pub index: usize,
    pub frames_dir: PathBuf,
    pub masks_dir: PathBuf,
    pub len: usize,
}

impl Batch {
    fn new(import_dir: &Path, index: usize) -> Self {
        Self {
            index,
            frames_dir: import_dir.join(format!("frames_{:0width$}", index, width = FRAME_ID_WIDTH)),
            masks_dir: import_dir.join(format!("masks_{:0width$}", index, width = FRAME_ID_WIDTH)),
            len: 0,
        }
    }
}

/// Moves frame/mask pairs from the flat stores into per-batch folders
pub struct BatchPartitioner {
    batch_size: usize,
}

impl BatchPartitioner {
    pub fn new(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(PipelineError::ZeroBatchSize.into());
        }
        Ok(Self { batch_size })
    }

    /// Relocate every pair into `import_dir/frames_NNNNNNNN` and
    /// `import_dir/masks_NNNNNNNN`.
    ///
    /// Names are compared before each pair moves. On a mismatch nothing of
    /// that pair is moved, while earlier pairs stay where they were relocated.
    pub fn partition(&self, frames: &FrameStore, masks: &FrameStore, import_dir: &Path) -> Result<Vec<Batch>> {
        let frame_paths = frames.list()?;
        let mask_paths = masks.list()?;
        let count = frame_paths.len().max(mask_paths.len());

        let mut batches: Vec<Batch> = Vec::with_capacity(count.div_ceil(self.batch_size));
        let mut current: Option<Batch> = None;

        for position in 0..count {
            let frame = frame_paths.get(position);
            let mask = mask_paths.get(position);

            let (Some(frame), Some(mask)) = (frame, mask) else {
                return Err(mismatch(position, frame, mask));
            };
            let Some(name) = frame.file_name().filter(|n| Some(*n) == mask.file_name()) else {
                return Err(mismatch(position, Some(frame), Some(mask)));
            };

            let index = batch_index(position, self.batch_size);
            let mut batch = match current.take() {
                Some(batch) if batch.index == index => batch,
                finished => {
                    batches.extend(finished);
                    let batch = Batch::new(import_dir, index);
                    std::fs::create_dir_all(&batch.frames_dir)?;
                    std::fs::create_dir_all(&batch.masks_dir)?;
                    debug!("Opened batch {} at {:?}", index, batch.frames_dir);
                    batch
                }
            };

            std::fs::rename(frame, batch.frames_dir.join(name))?;
            std::fs::rename(mask, batch.masks_dir.join(name))?;
            batch.len += 1;
            current = Some(batch);
        }
        batches.extend(current);

        info!("Partitioned {} pairs into {} batches of up to {}", count, batches.len(), self.batch_size);
        Ok(batches)
    }
}

fn mismatch(position: usize, frame: Option<&PathBuf>, mask: Option<&PathBuf>) -> EraserError {
    let name = |p: Option<&PathBuf>| {
        p.and_then(|p| p.file_name()).map(|n| n.to_string_lossy().into_owned())
    };
    PipelineError::PairingMismatch {
        position,
        frame: name(frame),
        mask: name(mask),
    }
    .into()
}
