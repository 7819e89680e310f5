use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use wc_history::config::EtlConfig;
use wc_history::pipeline::{self, RunReport};
use wc_history::reference::ReferenceData;
use wc_history::{loader, schema};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut config = EtlConfig::from_env();
    config.apply_args(&args);

    let reference = match &config.reference_file {
        Some(path) => ReferenceData::from_json_file(path)?,
        None => ReferenceData::builtin(),
    };
    reference.validate().context("reference data rejected")?;

    let report = pipeline::run(&config, &reference);
    let records = report.records();

    let mut conn = schema::open_db(&config.db_path)?;
    let summary = loader::load(&mut conn, &records)?;

    println!("World Cup history load complete");
    println!("DB: {}", config.db_path.display());
    println!(
        "Sources: {}/{}",
        report.runs.len() - report.failed().count(),
        report.runs.len()
    );
    println!(
        "Matches: {} (plays={}, skipped={})",
        summary.matches, summary.plays, summary.skipped
    );
    println!(
        "Dimensions: teams={} cities={} rounds={} times={}",
        summary.teams, summary.cities, summary.rounds, summary.match_times
    );
    print_sources(&report);

    if let Some(path) = &config.report_path {
        write_report(path, &report)?;
        println!("Report: {}", path.display());
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_sources(report: &RunReport) {
    for item in report.summary() {
        println!(
            "source {}: {} records={} warnings={}",
            item.source,
            item.status,
            item.records,
            item.warnings.values().sum::<usize>()
        );
        if let Some(err) = &item.error {
            println!("  error: {err}");
        }
        for (kind, count) in &item.warnings {
            println!("   - {kind}: {count}");
        }
        if let Some(merge) = item.merge {
            println!(
                "  merge: matched={} dropped_left={} dropped_right={} duplicates={}",
                merge.matched, merge.dropped_left, merge.dropped_right, merge.duplicates_removed
            );
        }
    }
}

fn write_report(path: &std::path::Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let body = serde_json::to_string_pretty(&report.summary())
        .context("serialize run report")?;
    std::fs::write(path, body)
        .with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
