use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use wc_history::config::EtlConfig;
use wc_history::normalize::Normalizer;
use wc_history::reference::ReferenceData;
use wc_history::sources::split_2022::{self, SplitPaths};
use wc_history::warnings::WarningLog;

const KEY_LIMIT: usize = 20;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut config = EtlConfig::from_env();
    config.apply_args(&args);

    let reference = match &config.reference_file {
        Some(path) => ReferenceData::from_json_file(path)?,
        None => ReferenceData::builtin(),
    };
    reference.validate().context("reference data rejected")?;
    let normalizer = Normalizer::new(&reference);

    let paths = config.paths();
    let mut log = WarningLog::new("2022");
    let outcome = split_2022::read(
        SplitPaths {
            matches: &paths.matches_2022,
            venues: &paths.venues_2022,
            stadiums: &paths.stadiums_2022,
        },
        &normalizer,
        &mut log,
    )
    .context("read 2022 split files")?;

    println!("2022 merge report");
    println!("Matched: {}", outcome.records.len());
    println!("Duplicates removed: {}", outcome.duplicates_removed);
    print_keys("base rows without venue", &outcome.dropped_left);
    print_keys("venue rows without base", &outcome.dropped_right);
    println!("Warnings: {}", log.len());
    for (kind, count) in log.count_by_kind() {
        println!("   - {kind}: {count}");
    }
    Ok(())
}

fn print_keys(label: &str, keys: &[String]) {
    println!("Dropped {label}: {}", keys.len());
    for key in keys.iter().take(KEY_LIMIT) {
        println!("   - {key}");
    }
    if keys.len() > KEY_LIMIT {
        println!("   ... {} more", keys.len() - KEY_LIMIT);
    }
}
