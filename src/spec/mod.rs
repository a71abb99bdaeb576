//! # Spec Module
//!
//! The region/time spec: which rectangles to remove during which frame ranges.

pub mod types;
pub mod parser;

pub use types::{Region, Spec, SpecItem};
pub use parser::{parse_spec, load_spec};
