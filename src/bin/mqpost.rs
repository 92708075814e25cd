//! mqpost - MaxQuant post-processing CLI
//!
//! Command-line interface for the proteinGroups.txt post-processing pipeline.

use clap::{Parser, Subcommand};
use mq_postprocess::data::{GroupMap, ProteinGroups, DEFAULT_INTENSITY_PREFIX};
use mq_postprocess::error::Result;
use mq_postprocess::filter::{filter_quality, DEFAULT_ALPHA};
use mq_postprocess::pipeline::{Pipeline, PipelineOutput};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// MaxQuant proteinGroups.txt post-processing
#[derive(Parser)]
#[command(name = "mqpost")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write result tables
    Run {
        /// Path to proteinGroups.txt
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated group names, in display order (e.g. "Liver,Brain")
        #[arg(short, long)]
        groups: String,

        /// Output directory for result tables (must exist)
        #[arg(short, long)]
        outdir: PathBuf,

        /// Significance threshold for the ANOVA filter
        #[arg(short, long, default_value_t = DEFAULT_ALPHA)]
        alpha: f64,

        /// Feature-type prefix selecting intensity columns
        #[arg(short, long, default_value = DEFAULT_INTENSITY_PREFIX)]
        prefix: String,
    },

    /// Validate the input schema and grouping without writing anything
    Check {
        /// Path to proteinGroups.txt
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated group names
        #[arg(short, long)]
        groups: String,

        /// Feature-type prefix selecting intensity columns
        #[arg(short, long, default_value = DEFAULT_INTENSITY_PREFIX)]
        prefix: String,
    },
}

/// JSON summary written next to the result tables.
#[derive(Serialize)]
struct RunSummary {
    input: String,
    groups: Vec<String>,
    prefix: String,
    alpha: f64,
    n_input: usize,
    n_after_quality: usize,
    n_after_detection: usize,
    n_significant: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            groups,
            outdir,
            alpha,
            prefix,
        } => run(&input, &parse_groups(&groups), &outdir, alpha, &prefix),
        Commands::Check {
            input,
            groups,
            prefix,
        } => check(&input, &parse_groups(&groups), &prefix),
    }
}

fn parse_groups(groups: &str) -> Vec<String> {
    groups
        .split(',')
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}

fn run(
    input: &Path,
    group_names: &[String],
    outdir: &Path,
    alpha: f64,
    prefix: &str,
) -> Result<()> {
    let raw = ProteinGroups::from_tsv(input)?;
    let n_input = raw.n_rows();
    println!("Loaded {} protein groups from {}", n_input, input.display());

    let output = Pipeline::standard(prefix, alpha).run(&raw, group_names)?;

    println!("Quality filter:   {} rows", output.detection.n_before);
    println!("Detection filter: {} rows", output.detection.n_after);
    println!(
        "ANOVA (p <= {}):  {} rows",
        alpha,
        output.significant.n_proteins()
    );

    output.normalized.to_tsv(outdir.join("normalized.tsv"))?;
    output.imputed.to_tsv(outdir.join("imputed.tsv"))?;
    output.significant.to_tsv(outdir.join("significant.tsv"))?;
    write_anova(&output, &outdir.join("anova.tsv"))?;
    write_colors(&output, &outdir.join("colors.tsv"))?;

    let summary = RunSummary {
        input: input.display().to_string(),
        groups: group_names.to_vec(),
        prefix: prefix.to_string(),
        alpha,
        n_input,
        n_after_quality: output.detection.n_before,
        n_after_detection: output.detection.n_after,
        n_significant: output.significant.n_proteins(),
    };
    let summary_file = File::create(outdir.join("summary.json"))?;
    serde_json::to_writer_pretty(BufWriter::new(summary_file), &summary)?;

    println!("Results written to {}", outdir.display());
    Ok(())
}

fn check(input: &Path, group_names: &[String], prefix: &str) -> Result<()> {
    let raw = ProteinGroups::from_tsv(input)?;
    println!("Schema OK: {} rows", raw.n_rows());

    let cleaned = filter_quality(&raw)?;
    println!(
        "Quality filter would retain {} of {} rows",
        cleaned.n_rows(),
        raw.n_rows()
    );

    let matrix = cleaned.slice_intensity(prefix)?;
    println!(
        "Prefix '{}' selects {} sample columns",
        prefix,
        matrix.n_samples()
    );

    let groups = GroupMap::build(matrix.sample_ids(), group_names)?;
    for group in groups.group_names() {
        let columns = groups.columns(group).unwrap_or(&[]);
        println!("  {}: {} columns", group, columns.len());
    }

    println!("Grouping OK");
    Ok(())
}

fn write_anova(output: &PipelineOutput, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "protein_id\tf_statistic\tp_value")?;
    for r in &output.anova.results {
        writeln!(writer, "{}\t{}\t{}", r.protein_id, r.f_statistic, r.p_value)?;
    }
    Ok(())
}

fn write_colors(output: &PipelineOutput, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "column\tgroup\tr\tg\tb")?;
    for group in output.groups.group_names() {
        for column in output.groups.columns(group).unwrap_or(&[]) {
            if let Some(color) = output.colors.get(column) {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}",
                    column, group, color.r, color.g, color.b
                )?;
            }
        }
    }
    Ok(())
}
