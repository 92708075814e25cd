//! Normalization of the abundance matrix.
//!
//! Two sequential, independently invocable transforms:
//!
//! - **log2**: log-transform with non-finite results mapped to missing
//! - **median**: per-sample rescaling to the median of medians
//!
//! When both are applied, the order is log2 first, then median.

pub mod log2;
pub mod median;

pub use log2::log2_transform;
pub use median::median_normalize;
