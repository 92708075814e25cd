//! Post-processing of MaxQuant output (`proteinGroups.txt`).
//!
//! This library turns a raw quantitative proteomics export into a cleaned,
//! normalized, imputed abundance matrix, and further reduces it to the
//! proteins whose abundance differs significantly across sample groups.
//!
//! # Overview
//!
//! The library is organized into small, independently usable modules:
//!
//! - **data**: Core data structures (ProteinGroups, AbundanceMatrix, GroupMap)
//! - **filter**: Row filtering (quality flags, detection rate, significance)
//! - **normalize**: Log2 transform and median normalization
//! - **impute**: Half-minimum imputation of missing values
//! - **test**: Per-protein one-way ANOVA
//! - **color**: Group color assignment for plotting collaborators
//! - **pipeline**: Pipeline composition and execution
//!
//! # Example
//!
//! ```no_run
//! use mq_postprocess::prelude::*;
//!
//! let raw = ProteinGroups::from_tsv("proteinGroups.txt").unwrap();
//! let groups = vec!["Liver".to_string(), "Brain".to_string()];
//!
//! let output = Pipeline::standard("iBAQ ", 0.05)
//!     .run(&raw, &groups)
//!     .unwrap();
//!
//! println!(
//!     "{} significant of {} retained proteins",
//!     output.significant.n_proteins(),
//!     output.normalized.n_proteins()
//! );
//! ```

pub mod color;
pub mod data;
pub mod error;
pub mod filter;
pub mod impute;
pub mod normalize;
pub mod pipeline;
pub mod test;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::color::{map_colors, Rgb, PALETTE};
    pub use crate::data::{
        AbundanceMatrix, GroupMap, ProteinGroups, DEFAULT_INTENSITY_PREFIX, ID_COLUMN,
    };
    pub use crate::error::{MqError, Result};
    pub use crate::filter::{
        filter_detection, filter_quality, filter_significant, DetectionResult, DEFAULT_ALPHA,
    };
    pub use crate::impute::impute_halfmin;
    pub use crate::normalize::{log2_transform, median_normalize};
    pub use crate::pipeline::{
        run_maxquant, Pipeline, PipelineConfig, PipelineOutput, PipelineStep,
    };
    pub use crate::test::{test_anova, AnovaResult, AnovaResultSingle};
}
