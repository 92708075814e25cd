//! Row filtering stages of the pipeline.

pub mod detection;
pub mod quality;
pub mod significance;

pub use detection::{filter_detection, DetectionResult};
pub use quality::filter_quality;
pub use significance::{filter_significant, DEFAULT_ALPHA};
