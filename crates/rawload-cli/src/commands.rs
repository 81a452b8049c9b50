use anyhow::{Context, Result};
use comfy_table::{CellAlignment, Table};
use tracing::info;

use rawload_cli::pipeline::{PipelineInput, resolve_csv_path, resolve_plan, run_and_deliver};
use rawload_cli::sink::CsvDirectorySink;
use rawload_ingest::{
    CsvReadOptions, load_contract, profile_csv, read_raw_csv, write_profile_report, write_sample,
};
use rawload_validate::Quarantine;

use crate::cli::{LoadArgs, ProfileArgs, SampleArgs, SourceArgs};
use crate::summary::{align_column, apply_table_style, header_cell};
use crate::types::{ColumnSummary, LoadResult};

pub fn run_load(args: &LoadArgs) -> Result<LoadResult> {
    let contract = load_contract(&args.source.config).context("load contract")?;
    let csv_path = resolve_csv_path(
        &contract,
        args.source.csv.as_deref(),
        &args.source.data_dir,
    );
    let quarantine = Quarantine::new(&args.quarantine_dir);
    let mut sink = CsvDirectorySink::new(&args.target_dir);
    let input = PipelineInput {
        contract: &contract,
        csv_path: &csv_path,
        quarantine: Some(&quarantine),
    };

    let (validated, receipt) = run_and_deliver(&input, &mut sink, !args.append, args.dry_run)?;

    let columns = validated
        .table
        .schema()
        .into_iter()
        .map(|(name, kind)| ColumnSummary {
            nulls: validated.table.null_count(&name),
            name,
            kind,
        })
        .collect();
    Ok(LoadResult {
        table_name: validated.plan.table.clone(),
        csv_path,
        rows: validated.table.height(),
        columns,
        duplicates: validated.outcome.duplicates().cloned(),
        delivered: receipt.map(|receipt| (sink.path_for(&validated.plan.table), receipt)),
    })
}

/// Print the resolved plan. No rows are transformed.
pub fn run_plan(args: &SourceArgs) -> Result<()> {
    let contract = load_contract(&args.config).context("load contract")?;
    let csv_path = resolve_csv_path(&contract, args.csv.as_deref(), &args.data_dir);
    let raw = read_raw_csv(&csv_path, &CsvReadOptions::for_contract(&contract))
        .with_context(|| format!("read {}", csv_path.display()))?;
    let plan = resolve_plan(&contract, &raw).context("resolve plan")?;
    let json = serde_json::to_string_pretty(&plan).context("serialize plan")?;
    println!("{json}");
    Ok(())
}

pub fn run_profile(args: &ProfileArgs) -> Result<()> {
    let profile = profile_csv(&args.path, args.delimiter)
        .with_context(|| format!("profile {}", args.path.display()))?;
    let report = write_profile_report(&profile, &args.path, &args.out_dir)
        .context("write profile report")?;
    info!(path = %report.display(), "wrote profile report");

    println!("Source: {}", args.path.display());
    println!("Delimiter: {:?}", profile.delimiter);
    println!(
        "Rows: {} (nulls counted over the first {})",
        profile.row_count, profile.sampled_rows
    );
    println!("Report: {}", report.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Nulls")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (column, nulls) in &profile.null_counts {
        table.add_row(vec![column.clone(), nulls.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_sample(args: &SampleArgs) -> Result<()> {
    let summary = write_sample(&args.input, args.out.as_deref(), args.rows)
        .with_context(|| format!("sample {}", args.input.display()))?;
    println!("Wrote {} rows to {}", summary.rows, summary.path.display());
    Ok(())
}
