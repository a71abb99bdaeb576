//! # Media Module
//!
//! The external decode/encode/mux engine and the stages built directly on it:
//! frame extraction, frame-rate probing, clip concatenation and audio muxing.

pub mod tool;
pub mod ffmpeg;
pub mod manifest;
pub mod reassemble;

pub use tool::{FrameRate, MediaTool};
pub use ffmpeg::FfmpegTool;
pub use manifest::ClipManifest;
pub use reassemble::Reassembler;
