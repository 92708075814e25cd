//! Sample grouping by substring match on column names.

use crate::data::AbundanceMatrix;
use crate::error::{MqError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A partition of sample columns into named groups.
///
/// Built once from the matrix's column names and a caller-supplied ordered
/// list of group names. A column belongs to the first group (in caller
/// order) whose name occurs as a substring of the column name; column order
/// within a group follows the matrix's existing column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMap {
    /// Group names in caller-supplied order.
    groups: Vec<String>,
    /// Group name -> ordered sample column names.
    columns: HashMap<String, Vec<String>>,
}

impl GroupMap {
    /// Partition `sample_ids` across `group_names`.
    ///
    /// Errors if a group matches no column (a silently empty group would
    /// corrupt the detection threshold) or if a column matches no group
    /// (the groups must partition the sample columns). A column matching
    /// several group names goes to the first match in caller order.
    pub fn build(sample_ids: &[String], group_names: &[String]) -> Result<Self> {
        if group_names.is_empty() {
            return Err(MqError::Grouping("No group names supplied".to_string()));
        }

        let mut columns: HashMap<String, Vec<String>> = group_names
            .iter()
            .map(|g| (g.clone(), Vec::new()))
            .collect();

        for sample in sample_ids {
            let group = group_names
                .iter()
                .find(|g| sample.contains(g.as_str()))
                .ok_or_else(|| {
                    MqError::Grouping(format!(
                        "Sample column '{}' matches no group name",
                        sample
                    ))
                })?;
            columns.get_mut(group).unwrap().push(sample.clone());
        }

        for group in group_names {
            if columns[group].is_empty() {
                return Err(MqError::Grouping(format!(
                    "Group '{}' matched no sample columns",
                    group
                )));
            }
        }

        Ok(Self {
            groups: group_names.to_vec(),
            columns,
        })
    }

    /// Group names in caller-supplied order.
    #[inline]
    pub fn group_names(&self) -> &[String] {
        &self.groups
    }

    /// Number of groups.
    #[inline]
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Ordered column names belonging to a group.
    pub fn columns(&self, group: &str) -> Option<&[String]> {
        self.columns.get(group).map(|c| c.as_slice())
    }

    /// All column names concatenated in group order.
    ///
    /// This is the group-contiguous column order used to reorder the matrix
    /// for display and for block-wise significance testing.
    pub fn grouped_order(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| self.columns[g].iter().cloned())
            .collect()
    }

    /// Resolve each group's columns to indices into a matrix.
    ///
    /// Returned in caller group order. Errors if a grouped column is no
    /// longer present in the matrix.
    pub fn indices(&self, matrix: &AbundanceMatrix) -> Result<Vec<(String, Vec<usize>)>> {
        self.groups
            .iter()
            .map(|group| {
                let idx = self.columns[group]
                    .iter()
                    .map(|name| {
                        matrix.column_index(name).ok_or_else(|| {
                            MqError::Grouping(format!(
                                "Grouped column '{}' not found in matrix",
                                name
                            ))
                        })
                    })
                    .collect::<Result<Vec<usize>>>()?;
                Ok((group.clone(), idx))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ids() -> Vec<String> {
        vec![
            "iBAQ 01_Brain".to_string(),
            "iBAQ 01_Liver".to_string(),
            "iBAQ 02_Liver".to_string(),
            "iBAQ 02_Brain".to_string(),
        ]
    }

    #[test]
    fn test_build_partition() {
        let groups = vec!["Liver".to_string(), "Brain".to_string()];
        let map = GroupMap::build(&sample_ids(), &groups).unwrap();

        assert_eq!(map.n_groups(), 2);
        assert_eq!(
            map.columns("Liver").unwrap(),
            &["iBAQ 01_Liver", "iBAQ 02_Liver"]
        );
        // Column order within a group follows matrix order, not sorted order.
        assert_eq!(
            map.columns("Brain").unwrap(),
            &["iBAQ 01_Brain", "iBAQ 02_Brain"]
        );
    }

    #[test]
    fn test_grouped_order_is_contiguous() {
        let groups = vec!["Liver".to_string(), "Brain".to_string()];
        let map = GroupMap::build(&sample_ids(), &groups).unwrap();
        assert_eq!(
            map.grouped_order(),
            vec![
                "iBAQ 01_Liver",
                "iBAQ 02_Liver",
                "iBAQ 01_Brain",
                "iBAQ 02_Brain"
            ]
        );
    }

    #[test]
    fn test_empty_group_is_error() {
        let groups = vec!["Liver".to_string(), "Kidney".to_string()];
        let err = GroupMap::build(&sample_ids(), &groups).unwrap_err();
        assert!(matches!(err, MqError::Grouping(_)));
    }

    #[test]
    fn test_unmatched_column_is_error() {
        let groups = vec!["Liver".to_string()];
        let err = GroupMap::build(&sample_ids(), &groups).unwrap_err();
        assert!(matches!(err, MqError::Grouping(_)));
    }

    #[test]
    fn test_overlap_first_match_wins() {
        // "BrainStem" contains both "Brain" and "Stem"; caller order decides.
        let ids = vec![
            "iBAQ 01_BrainStem".to_string(),
            "iBAQ 01_Stem".to_string(),
        ];
        let groups = vec!["Brain".to_string(), "Stem".to_string()];
        let map = GroupMap::build(&ids, &groups).unwrap();
        assert_eq!(map.columns("Brain").unwrap(), &["iBAQ 01_BrainStem"]);
        assert_eq!(map.columns("Stem").unwrap(), &["iBAQ 01_Stem"]);
    }
}
