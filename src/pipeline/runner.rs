//! Pipeline runner for composing and executing post-processing steps.

use crate::color::{map_colors, Rgb};
use crate::data::{AbundanceMatrix, GroupMap, ProteinGroups, DEFAULT_INTENSITY_PREFIX};
use crate::error::{MqError, Result};
use crate::filter::{
    filter_detection, filter_quality, filter_significant, DetectionResult, DEFAULT_ALPHA,
};
use crate::impute::impute_halfmin;
use crate::normalize::{log2_transform, median_normalize};
use crate::test::AnovaResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A step in the post-processing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineStep {
    /// Drop flagged and multi-ID rows from the raw table.
    FilterQuality,
    /// Slice the identity column plus intensity columns into a matrix.
    SliceIntensity { prefix: String },
    /// Partition sample columns into the caller-supplied groups.
    GroupColumns,
    /// Keep proteins detected in at least half the samples of some group.
    FilterDetection,
    /// Reorder sample columns so group members are contiguous.
    ReorderByGroup,
    /// Log2-transform the matrix.
    Log2Transform,
    /// Median-normalize the matrix.
    MedianNormalize,
    /// Impute missing values with half the global minimum.
    ImputeHalfMin,
    /// Keep proteins passing one-way ANOVA at the given threshold.
    FilterAnova { alpha: f64 },
}

/// Pipeline configuration for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the pipeline.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Steps to execute.
    pub steps: Vec<PipelineStep>,
}

impl PipelineConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(MqError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(MqError::from)
    }
}

/// Everything the pipeline produces for downstream collaborators.
///
/// `normalized` keeps its missing sentinels; `imputed` is the complete copy
/// fed to multivariate methods, and `significant` is its ANOVA-filtered
/// subset. The group map and column colors are in the form plotting
/// collaborators consume directly.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Log2 + median normalized matrix, missing values retained.
    pub normalized: AbundanceMatrix,
    /// Imputed (complete) copy of the normalized matrix.
    pub imputed: AbundanceMatrix,
    /// Imputed matrix restricted to significant proteins.
    pub significant: AbundanceMatrix,
    /// Group -> sample columns partition.
    pub groups: GroupMap,
    /// Detection filter statistics and per-group counts.
    pub detection: DetectionResult,
    /// ANOVA results for every imputed protein.
    pub anova: AnovaResult,
    /// Sample column -> color, cycled over groups.
    pub colors: HashMap<String, Rgb>,
}

/// Builder for constructing and running post-processing pipelines.
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
    name: String,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            name: "unnamed".to_string(),
        }
    }

    /// The standard MaxQuant post-processing pipeline.
    pub fn standard(prefix: &str, alpha: f64) -> Self {
        Self::new()
            .name("maxquant-postprocess")
            .filter_quality()
            .slice_intensity(prefix)
            .group_columns()
            .filter_detection()
            .reorder_by_group()
            .log2_transform()
            .median_normalize()
            .impute_halfmin()
            .filter_anova(alpha)
    }

    /// Create from a config.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            steps: config.steps.clone(),
            name: config.name.clone(),
        }
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Add quality filtering.
    pub fn filter_quality(mut self) -> Self {
        self.steps.push(PipelineStep::FilterQuality);
        self
    }

    /// Add intensity-column slicing.
    pub fn slice_intensity(mut self, prefix: &str) -> Self {
        self.steps.push(PipelineStep::SliceIntensity {
            prefix: prefix.to_string(),
        });
        self
    }

    /// Add column grouping.
    pub fn group_columns(mut self) -> Self {
        self.steps.push(PipelineStep::GroupColumns);
        self
    }

    /// Add detection filtering.
    pub fn filter_detection(mut self) -> Self {
        self.steps.push(PipelineStep::FilterDetection);
        self
    }

    /// Add group-contiguous column reordering.
    pub fn reorder_by_group(mut self) -> Self {
        self.steps.push(PipelineStep::ReorderByGroup);
        self
    }

    /// Add the log2 transform.
    pub fn log2_transform(mut self) -> Self {
        self.steps.push(PipelineStep::Log2Transform);
        self
    }

    /// Add median normalization.
    pub fn median_normalize(mut self) -> Self {
        self.steps.push(PipelineStep::MedianNormalize);
        self
    }

    /// Add half-minimum imputation.
    pub fn impute_halfmin(mut self) -> Self {
        self.steps.push(PipelineStep::ImputeHalfMin);
        self
    }

    /// Add ANOVA significance filtering.
    pub fn filter_anova(mut self, alpha: f64) -> Self {
        self.steps.push(PipelineStep::FilterAnova { alpha });
        self
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> PipelineConfig {
        PipelineConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            steps: self.steps.clone(),
        }
    }

    /// Run the pipeline on a raw table with the given group names.
    pub fn run(&self, raw: &ProteinGroups, group_names: &[String]) -> Result<PipelineOutput> {
        let mut state = PipelineState::new(raw.clone(), group_names.to_vec());

        for (i, step) in self.steps.iter().enumerate() {
            state = state.apply(step).map_err(|e| {
                MqError::Pipeline(format!("Step {} ({:?}) failed: {}", i + 1, step, e))
            })?;
        }

        state.finalize()
    }
}

/// Internal state threaded between pipeline steps.
///
/// Each transform returns a new matrix; the state owns the current value
/// explicitly instead of mutating caller-supplied containers.
struct PipelineState {
    raw: ProteinGroups,
    group_names: Vec<String>,
    matrix: Option<AbundanceMatrix>,
    groups: Option<GroupMap>,
    detection: Option<DetectionResult>,
    imputed: Option<AbundanceMatrix>,
    anova: Option<AnovaResult>,
    significant: Option<AbundanceMatrix>,
}

impl PipelineState {
    fn new(raw: ProteinGroups, group_names: Vec<String>) -> Self {
        Self {
            raw,
            group_names,
            matrix: None,
            groups: None,
            detection: None,
            imputed: None,
            anova: None,
            significant: None,
        }
    }

    fn matrix(&self) -> Result<&AbundanceMatrix> {
        self.matrix
            .as_ref()
            .ok_or_else(|| MqError::Pipeline("Must slice intensity columns first".to_string()))
    }

    fn groups(&self) -> Result<&GroupMap> {
        self.groups
            .as_ref()
            .ok_or_else(|| MqError::Pipeline("Must group columns first".to_string()))
    }

    fn apply(mut self, step: &PipelineStep) -> Result<Self> {
        match step {
            PipelineStep::FilterQuality => {
                self.raw = filter_quality(&self.raw)?;
            }
            PipelineStep::SliceIntensity { prefix } => {
                self.matrix = Some(self.raw.slice_intensity(prefix)?);
            }
            PipelineStep::GroupColumns => {
                let matrix = self.matrix()?;
                self.groups = Some(GroupMap::build(matrix.sample_ids(), &self.group_names)?);
            }
            PipelineStep::FilterDetection => {
                let (filtered, result) = filter_detection(self.matrix()?, self.groups()?)?;
                self.matrix = Some(filtered);
                self.detection = Some(result);
            }
            PipelineStep::ReorderByGroup => {
                let order = self.groups()?.grouped_order();
                self.matrix = Some(self.matrix()?.reorder_samples(&order)?);
            }
            PipelineStep::Log2Transform => {
                self.matrix = Some(log2_transform(self.matrix()?));
            }
            PipelineStep::MedianNormalize => {
                self.matrix = Some(median_normalize(self.matrix()?));
            }
            PipelineStep::ImputeHalfMin => {
                // Fork: the normalized matrix keeps its missing sentinels,
                // downstream multivariate stages work on the imputed copy.
                self.imputed = Some(impute_halfmin(self.matrix()?));
            }
            PipelineStep::FilterAnova { alpha } => {
                let imputed = self.imputed.as_ref().ok_or_else(|| {
                    MqError::Pipeline("Must impute before ANOVA filtering".to_string())
                })?;
                let (significant, anova) = filter_significant(imputed, self.groups()?, *alpha)?;
                self.significant = Some(significant);
                self.anova = Some(anova);
            }
        }
        Ok(self)
    }

    fn finalize(self) -> Result<PipelineOutput> {
        let missing = |what: &str| MqError::Pipeline(format!("Pipeline did not produce {}", what));

        let groups = self.groups.ok_or_else(|| missing("a group mapping"))?;
        let colors = map_colors(&groups);

        Ok(PipelineOutput {
            normalized: self.matrix.ok_or_else(|| missing("a normalized matrix"))?,
            imputed: self.imputed.ok_or_else(|| missing("an imputed matrix"))?,
            significant: self
                .significant
                .ok_or_else(|| missing("a significance-filtered matrix"))?,
            detection: self.detection.ok_or_else(|| missing("detection counts"))?,
            anova: self.anova.ok_or_else(|| missing("ANOVA results"))?,
            groups,
            colors,
        })
    }
}

/// Load a proteinGroups.txt file and run the standard pipeline.
pub fn run_maxquant<P: AsRef<Path>>(
    path: P,
    group_names: &[String],
    prefix: Option<&str>,
    alpha: Option<f64>,
) -> Result<PipelineOutput> {
    let raw = ProteinGroups::from_tsv(path)?;
    let prefix = prefix.unwrap_or(DEFAULT_INTENSITY_PREFIX);
    let alpha = alpha.unwrap_or(DEFAULT_ALPHA);
    Pipeline::standard(prefix, alpha).run(&raw, group_names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::protein_groups::{FLAG_COLUMNS, ID_COLUMN};

    fn create_test_table() -> ProteinGroups {
        let mut headers = vec![ID_COLUMN.to_string()];
        for organ in ["Liver", "Brain"] {
            for rep in 1..=3 {
                headers.push(format!("iBAQ 0{}_{}", rep, organ));
            }
        }
        headers.extend(FLAG_COLUMNS.iter().map(|c| c.to_string()));

        let numeric_row = |id: &str, liver: [f64; 3], brain: [f64; 3], flag: &str| {
            let mut row = vec![id.to_string()];
            row.extend(liver.iter().chain(brain.iter()).map(|v| v.to_string()));
            row.extend([String::new(), String::new(), flag.to_string()]);
            row
        };

        let mut rows = Vec::new();
        // One protein up in liver, one mirrored down, so the per-column
        // medians stay equal and median normalization is the identity here.
        rows.push(numeric_row(
            "P000",
            [1000.0, 1020.0, 980.0],
            [50.0, 51.0, 49.0],
            "",
        ));
        rows.push(numeric_row(
            "P008",
            [50.0, 51.0, 49.0],
            [1000.0, 1020.0, 980.0],
            "",
        ));
        // Seven flat proteins, constant across every sample.
        for i in 1..=7 {
            let v = 200.0 + 100.0 * i as f64;
            rows.push(numeric_row(&format!("P{:03}", i), [v; 3], [v; 3], ""));
        }
        // One contaminant.
        rows.push(numeric_row("P900", [500.0; 3], [500.0; 3], "+"));

        ProteinGroups::new(headers, rows).unwrap()
    }

    fn group_names() -> Vec<String> {
        vec!["Liver".to_string(), "Brain".to_string()]
    }

    #[test]
    fn test_standard_pipeline_run() {
        let raw = create_test_table();
        let output = Pipeline::standard("iBAQ ", 0.05)
            .run(&raw, &group_names())
            .unwrap();

        // Contaminant removed everywhere.
        assert_eq!(output.normalized.n_proteins(), 9);
        assert!(!output.normalized.protein_ids().contains(&"P900".to_string()));

        // Imputed copy is complete.
        assert!(output.imputed.matrix().iter().all(|v| !v.is_nan()));

        // Differential proteins pass, flat ones do not, in input row order.
        assert_eq!(output.significant.protein_ids(), &["P000", "P008"]);

        // Colors cover every grouped column.
        assert_eq!(output.colors.len(), 6);
    }

    #[test]
    fn test_pipeline_builder_config() {
        let pipeline = Pipeline::standard("iBAQ ", 0.05);
        let config = pipeline.to_config(Some("standard run"));
        assert_eq!(config.steps.len(), 9);
        assert_eq!(config.name, "maxquant-postprocess");
    }

    #[test]
    fn test_pipeline_config_yaml_roundtrip() {
        let config = Pipeline::standard("iBAQ ", 0.01).to_config(None);
        let yaml = config.to_yaml().unwrap();
        let parsed = PipelineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.steps.len(), 9);

        let rebuilt = Pipeline::from_config(&parsed);
        let output = rebuilt.run(&create_test_table(), &group_names()).unwrap();
        assert_eq!(output.normalized.n_proteins(), 9);
    }

    #[test]
    fn test_step_ordering_enforced() {
        let raw = create_test_table();
        let result = Pipeline::new()
            .log2_transform()
            .run(&raw, &group_names());
        assert!(matches!(result, Err(MqError::Pipeline(_))));
    }

    #[test]
    fn test_anova_requires_imputation() {
        let raw = create_test_table();
        let result = Pipeline::new()
            .filter_quality()
            .slice_intensity("iBAQ ")
            .group_columns()
            .filter_anova(0.05)
            .run(&raw, &group_names());
        assert!(matches!(result, Err(MqError::Pipeline(_))));
    }

    #[test]
    fn test_bad_group_name_fails() {
        let raw = create_test_table();
        let result = Pipeline::standard("iBAQ ", 0.05)
            .run(&raw, &["Liver".to_string(), "Kidney".to_string()]);
        assert!(result.is_err());
    }
}
