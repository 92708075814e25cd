//! Identification-quality filtering of the raw protein groups table.

use crate::data::ProteinGroups;
use crate::error::Result;

/// Remove weakly identified and ambiguous rows.
///
/// Drops every row with any quality flag set to `"+"` (site-only
/// identifications, reverse hits, potential contaminants), then every row
/// whose identity contains the multi-ID separator. An empty result is valid
/// and propagates to downstream stages.
pub fn filter_quality(table: &ProteinGroups) -> Result<ProteinGroups> {
    let keep: Vec<usize> = (0..table.n_rows())
        .filter(|&row| !table.any_flag_set(row) && !table.is_multi_id(row))
        .collect();

    table.subset_rows(&keep)
}
