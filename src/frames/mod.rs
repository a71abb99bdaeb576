//! # Frames Module
//!
//! Flat stores of numbered frame and mask images, mask synthesis, and the
//! relocation of frame/mask pairs into fixed-size batches.

pub mod store;
pub mod mask;
pub mod batch;

pub use store::{FrameId, FrameStore, FRAME_EXTENSION, FRAME_ID_WIDTH};
pub use mask::{render_mask, MaskSynthesizer, INPAINT, KEEP};
pub use batch::{batch_index, Batch, BatchPartitioner};
