//! Group color assignment for plotting collaborators.

use crate::data::GroupMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Fixed six-color palette (evenly spaced hues).
pub const PALETTE: [Rgb; 6] = [
    Rgb { r: 0.86, g: 0.3712, b: 0.34 },
    Rgb { r: 0.8288, g: 0.86, b: 0.34 },
    Rgb { r: 0.34, g: 0.86, b: 0.3712 },
    Rgb { r: 0.34, g: 0.8288, b: 0.86 },
    Rgb { r: 0.3712, g: 0.34, b: 0.86 },
    Rgb { r: 0.86, g: 0.34, b: 0.8288 },
];

/// Map every sample column to a color, cycling the palette over groups in
/// caller group order. All columns of one group share one color.
pub fn map_colors(groups: &GroupMap) -> HashMap<String, Rgb> {
    let mut colors = HashMap::new();
    for (group_idx, group) in groups.group_names().iter().enumerate() {
        let color = PALETTE[group_idx % PALETTE.len()];
        if let Some(columns) = groups.columns(group) {
            for column in columns {
                colors.insert(column.clone(), color);
            }
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_share_group_color() {
        let sample_ids: Vec<String> = vec![
            "iBAQ 01_Liver".to_string(),
            "iBAQ 02_Liver".to_string(),
            "iBAQ 01_Brain".to_string(),
        ];
        let groups =
            GroupMap::build(&sample_ids, &["Liver".to_string(), "Brain".to_string()]).unwrap();
        let colors = map_colors(&groups);

        assert_eq!(colors.len(), 3);
        assert_eq!(colors["iBAQ 01_Liver"], PALETTE[0]);
        assert_eq!(colors["iBAQ 02_Liver"], PALETTE[0]);
        assert_eq!(colors["iBAQ 01_Brain"], PALETTE[1]);
    }

    #[test]
    fn test_palette_cycles() {
        let sample_ids: Vec<String> = (0..7).map(|i| format!("iBAQ 01_G{}", i)).collect();
        let group_names: Vec<String> = (0..7).map(|i| format!("G{}", i)).collect();
        let groups = GroupMap::build(&sample_ids, &group_names).unwrap();
        let colors = map_colors(&groups);

        // Seventh group wraps around to the first palette entry.
        assert_eq!(colors["iBAQ 01_G6"], PALETTE[0]);
    }
}
