use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use crate::{
    config::Config,
    error::Result,
    frames::{BatchPartitioner, MaskSynthesizer},
    inpaint::{InpaintDriver, InpaintModel},
    media::{MediaTool, Reassembler},
    pipeline::{
        context::{JobRequest, RunContext},
        progress::ProgressReporter,
        status::{JobStatusSink, NoopStatusSink},
    },
};

/// Pipeline stages, run strictly in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prepare,
    Extract,
    Masks,
    Batches,
    Inpaint,
    Reassemble,
    Deliver,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Prepare,
        Stage::Extract,
        Stage::Masks,
        Stage::Batches,
        Stage::Inpaint,
        Stage::Reassemble,
        Stage::Deliver,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Prepare => "StageA: Prepare inputs",
            Stage::Extract => "StageB: Extract frames",
            Stage::Masks => "StageC: Synthesize masks",
            Stage::Batches => "StageD: Split batches",
            Stage::Inpaint => "StageE: Inpaint batches",
            Stage::Reassemble => "StageF: Merge batches",
            Stage::Deliver => "StageG: Deliver result",
        }
    }
}

/// Runs one job from source video to repaired video
///
/// The pipeline is strictly sequential:
/// 1. Prepare - resolve paths, parse the spec, create the workspace
/// 2. Extract - decode every frame of the source
/// 3. Masks - one mask per frame from the spec
/// 4. Batches - move frame/mask pairs into fixed-size batch folders
/// 5. Inpaint - one model call per batch, clip manifest in batch order
/// 6. Reassemble - concatenate clips, mux the source audio back in
/// 7. Deliver - copy the result to its destination
pub struct Pipeline {
    config: Config,
    media: Arc<dyn MediaTool>,
    model: Arc<dyn InpaintModel>,
    status: Arc<dyn JobStatusSink>,
}

impl Pipeline {
    /// Create a pipeline that records job status nowhere
    pub fn new(config: Config, media: Arc<dyn MediaTool>, model: Arc<dyn InpaintModel>) -> Self {
        Self {
            config,
            media,
            model,
            status: Arc::new(NoopStatusSink),
        }
    }

    pub fn with_status_sink(mut self, status: Arc<dyn JobStatusSink>) -> Self {
        self.status = status;
        self
    }

    /// Run every stage and return the delivered file.
    ///
    /// Any stage error marks the job failed and is returned unchanged; there
    /// is no retry or resume.
    pub fn run(&self, request: &JobRequest) -> Result<PathBuf> {
        info!("🎬 Starting job {}", request.job_id());
        info!("   Source: {:?}", request.source);
        info!("   Spec: {:?}", request.spec);
        info!("   Output: {:?}", request.destination);

        self.status.set_started_at(Utc::now());
        let progress = ProgressReporter::new(self.config.progress.log_file.clone(), self.status.clone());
        progress.reset();

        let mut stage = Stage::Prepare;
        match self.run_stages(request, &progress, &mut stage) {
            Ok(delivered) => {
                self.status.set_stopped_at(Utc::now(), false);
                info!("🎉 Job complete! Output saved to: {:?}", delivered);
                Ok(delivered)
            }
            Err(e) => {
                error!(stage = stage.label(), "Job {} failed: {}", request.job_id(), e);
                self.status.set_stopped_at(Utc::now(), true);
                Err(e)
            }
        }
    }

    fn run_stages(&self, request: &JobRequest, progress: &ProgressReporter, stage: &mut Stage) -> Result<PathBuf> {
        let mut enter = |next: Stage| {
            *stage = next;
            progress.report(next.label());
        };

        // ==========================================
        // STAGE A: PREPARE
        // ==========================================
        enter(Stage::Prepare);
        let ctx = RunContext::prepare(request, &self.config.pipeline)?;
        let frames = ctx.workspace.frames();
        let masks = ctx.workspace.masks();

        // ==========================================
        // STAGE B: EXTRACT FRAMES
        // ==========================================
        enter(Stage::Extract);
        self.media.extract_frames(&ctx.source, &frames)?;

        // ==========================================
        // STAGE C: SYNTHESIZE MASKS
        // ==========================================
        enter(Stage::Masks);
        let mask_count = MaskSynthesizer::new(ctx.mask_threads).synthesize(&frames, &masks, &ctx.spec)?;
        info!("   ✅ {} frames masked", mask_count);

        // ==========================================
        // STAGE D: SPLIT BATCHES
        // ==========================================
        enter(Stage::Batches);
        let batches = BatchPartitioner::new(ctx.batch_size)?.partition(
            &frames,
            &masks,
            &ctx.workspace.import_dir(),
        )?;

        // ==========================================
        // STAGE E: INPAINT
        // ==========================================
        enter(Stage::Inpaint);
        let frame_rate = self.media.probe_frame_rate(&ctx.source)?;
        let export_dir = ctx.workspace.export_dir();
        let inpainted = InpaintDriver::new(self.model.as_ref(), &export_dir).run(&batches, frame_rate, progress)?;
        info!("   ✅ {} clips written", inpainted.manifest.len());

        // ==========================================
        // STAGE F: REASSEMBLE
        // ==========================================
        enter(Stage::Reassemble);
        let result = Reassembler::new(self.media.as_ref()).reassemble(
            &ctx.source,
            &inpainted.manifest_path,
            &export_dir,
        )?;

        // ==========================================
        // STAGE G: DELIVER
        // ==========================================
        enter(Stage::Deliver);
        deliver(&result, &ctx.destination)
    }
}

fn deliver(result: &Path, destination: &Path) -> Result<PathBuf> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(result, destination)?;
    Ok(destination.to_path_buf())
}
