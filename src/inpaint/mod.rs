//! # Inpainting Module
//!
//! The video-completion model seen as a black box, and the driver that feeds
//! it one batch at a time.

pub mod model;
pub mod driver;

pub use model::{CommandModel, InpaintModel, ModelRequest};
pub use driver::{InpaintDriver, InpaintOutput};
