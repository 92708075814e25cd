//! Pipeline composition and execution.

mod runner;

pub use runner::{run_maxquant, Pipeline, PipelineConfig, PipelineOutput, PipelineStep};
