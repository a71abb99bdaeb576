use std::path::Path;

use image::{GrayImage, Luma};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{EraserError, PipelineError, Result};
use crate::frames::store::FrameStore;
use crate::spec::Spec;

/// Mask value for pixels left untouched
pub const KEEP: u8 = 0;

/// Mask value for pixels the model must reconstruct
pub const INPAINT: u8 = 255;

/// Render the mask for the 1-based frame `index`.
///
/// Every region active at `index` is painted as [`INPAINT`], clipped to the
/// frame. Painting is a plain overwrite, so overlapping regions form a union.
pub fn render_mask(width: u32, height: u32, spec: &Spec, index: u64) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, Luma([KEEP]));
    let stride = width as usize;
    let pixels: &mut [u8] = &mut *mask;

    for region in spec.active_regions(index) {
        let Some((x0, y0, x1, y1)) = region.clip_to(width, height) else {
            continue;
        };
        for y in y0..y1 {
            let row = y as usize * stride;
            pixels[row + x0 as usize..row + x1 as usize].fill(INPAINT);
        }
    }

    mask
}

/// Writes one mask per extracted frame, named exactly like its frame
pub struct MaskSynthesizer {
    threads: usize,
}

impl MaskSynthesizer {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// Synthesize masks for every frame in `frames` into `masks`.
    ///
    /// Only the first frame is opened, to learn the dimensions. Returns the
    /// number of masks written.
    pub fn synthesize(&self, frames: &FrameStore, masks: &FrameStore, spec: &Spec) -> Result<usize> {
        let frame_paths = frames.list()?;
        let first = frame_paths.first().ok_or_else(|| PipelineError::EmptyFrameSet {
            path: frames.dir().display().to_string(),
        })?;

        let (width, height) = image::image_dimensions(first).map_err(|e| PipelineError::FrameUnreadable {
            path: first.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(
            "Synthesizing {} masks at {}x{} on {} threads",
            frame_paths.len(), width, height, self.threads
        );

        std::fs::create_dir_all(masks.dir())?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| EraserError::generic(format!("Failed to build mask thread pool: {}", e)))?;

        pool.install(|| {
            frame_paths
                .par_iter()
                .enumerate()
                .try_for_each(|(position, frame_path)| {
                    let index = position as u64 + 1;
                    let mask = render_mask(width, height, spec, index);
                    write_mask(&mask, frame_path, masks)
                })
        })?;

        debug!("Wrote {} masks to {:?}", frame_paths.len(), masks.dir());
        Ok(frame_paths.len())
    }
}

fn write_mask(mask: &GrayImage, frame_path: &Path, masks: &FrameStore) -> Result<()> {
    let name = frame_path.file_name().ok_or_else(|| PipelineError::FrameUnreadable {
        path: frame_path.display().to_string(),
        reason: "frame path has no file name".to_string(),
    })?;
    let out = masks.dir().join(name);

    mask.save(&out).map_err(|e| PipelineError::MaskWriteFailed {
        path: out.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}
