//! Basic example demonstrating the post-processing pipeline.
//!
//! This example shows how to:
//! 1. Create a synthetic proteinGroups table
//! 2. Run the standard pipeline
//! 3. Examine the resulting matrices and ANOVA results

use mq_postprocess::data::protein_groups::{FLAG_COLUMNS, ID_COLUMN};
use mq_postprocess::prelude::*;

fn main() -> Result<()> {
    println!("=== MaxQuant Post-Processing Example ===\n");

    let raw = create_example_table()?;
    println!("Raw table: {} protein groups", raw.n_rows());

    let groups = vec!["Liver".to_string(), "Brain".to_string()];
    let output = Pipeline::standard(DEFAULT_INTENSITY_PREFIX, DEFAULT_ALPHA).run(&raw, &groups)?;

    println!("After quality filter:   {}", output.detection.n_before);
    println!("After detection filter: {}", output.detection.n_after);
    println!("Significant proteins:   {}", output.significant.n_proteins());
    println!();

    println!("Group layout:");
    for group in output.groups.group_names() {
        let columns = output.groups.columns(group).unwrap_or(&[]);
        println!("  {}: {} columns", group, columns.len());
    }
    println!();

    println!("=== ANOVA Results ===\n");
    println!("{:<12} {:>12} {:>12}", "Protein", "F", "p-value");
    println!("{}", "-".repeat(38));
    for r in &output.anova.results {
        println!(
            "{:<12} {:>12.4} {:>12.4e}",
            r.protein_id, r.f_statistic, r.p_value
        );
    }

    Ok(())
}

/// Build a small in-memory table: two differential proteins (one per
/// direction) and four flat ones.
fn create_example_table() -> Result<ProteinGroups> {
    let mut headers = vec![ID_COLUMN.to_string()];
    for organ in ["Liver", "Brain"] {
        for rep in 1..=3 {
            headers.push(format!("iBAQ 0{}_{}", rep, organ));
        }
    }
    headers.extend(FLAG_COLUMNS.iter().map(|c| c.to_string()));

    let row = |id: &str, liver: [f64; 3], brain: [f64; 3]| {
        let mut cells = vec![id.to_string()];
        cells.extend(liver.iter().chain(brain.iter()).map(|v| v.to_string()));
        cells.extend([String::new(), String::new(), String::new()]);
        cells
    };

    let mut rows = vec![
        row("ALB", [4000.0, 4100.0, 3900.0], [30.0, 32.0, 28.0]),
        row("GFAP", [30.0, 32.0, 28.0], [4000.0, 4100.0, 3900.0]),
    ];
    for (i, base) in [200.0, 400.0, 600.0, 800.0].iter().enumerate() {
        rows.push(row(&format!("HK{}", i + 1), [*base; 3], [*base; 3]));
    }

    ProteinGroups::new(headers, rows)
}
