//! # Region-Eraser
//!
//! Remove time-bounded rectangular regions (watermarks, overlays, burned-in
//! captions) from a video by inpainting them with a video-completion model,
//! then put the original audio back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use region_eraser::{
//!     config::Config,
//!     inpaint::CommandModel,
//!     media::FfmpegTool,
//!     pipeline::{JobRequest, Pipeline},
//! };
//!
//! # fn main() -> region_eraser::Result<()> {
//! let config = Config::default();
//! let media = Arc::new(FfmpegTool::new(config.media.clone()));
//! let model = Arc::new(CommandModel::new(config.model.clone()));
//!
//! let pipeline = Pipeline::new(config, media, model);
//! pipeline.run(&JobRequest::new("input.mp4", "spec.json", "output.mp4"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Data flows one way: video → frames → (frames, masks) → batches →
//! per-batch clips → concatenated clip → final muxed video.
//!
//! - [`spec`] - Region/time spec document
//! - [`frames`] - Frame stores, mask synthesis and batch partitioning
//! - [`media`] - ffmpeg-backed extraction, probing, concatenation and muxing
//! - [`inpaint`] - Model invocation per batch
//! - [`pipeline`] - Run context, progress, job status and the orchestrator
//! - [`config`] - Configuration management
//!
//! ## Plugging in another model
//!
//! Any video-completion model can be used by implementing the
//! [`InpaintModel`](inpaint::InpaintModel) trait:
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use region_eraser::inpaint::{InpaintModel, ModelRequest};
//! use region_eraser::Result;
//!
//! struct MyModel;
//!
//! impl InpaintModel for MyModel {
//!     fn name(&self) -> &str {
//!         "my_model"
//!     }
//!
//!     fn run(&self, request: &ModelRequest<'_>) -> Result<PathBuf> {
//!         // Read request.frames_dir and request.masks_dir, write request.output
//!         Ok(request.output.to_path_buf())
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod frames;
pub mod inpaint;
pub mod media;
pub mod pipeline;
pub mod spec;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{EraserError, Result},
    pipeline::{JobRequest, Pipeline},
    spec::{Region, Spec, SpecItem},
};
