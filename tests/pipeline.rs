use std::fs;
use std::path::PathBuf;

use wc_history::config::EtlConfig;
use wc_history::error::SourceError;
use wc_history::loader::load;
use wc_history::pipeline::{SourceKind, run};
use wc_history::reference::ReferenceData;
use wc_history::schema::open_in_memory;

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn config_for(dir: PathBuf, sources: &[SourceKind]) -> EtlConfig {
    EtlConfig {
        data_dir: dir,
        sources: sources.to_vec(),
        ..EtlConfig::default()
    }
}

#[test]
fn all_sources_load_into_one_store() {
    let reference = ReferenceData::builtin();
    let config = config_for(fixtures_dir(), &SourceKind::ALL);
    let report = run(&config, &reference);

    assert_eq!(report.failed().count(), 0);
    let records = report.records();
    assert_eq!(records.len(), 17);

    let mut conn = open_in_memory().expect("in-memory db");
    let summary = load(&mut conn, &records).expect("load");
    assert_eq!(summary.matches, 17);
    assert_eq!(summary.plays, 34);
    assert_eq!(summary.skipped, 0);

    let argentina: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM Teams WHERE team_name = 'argentina'",
            [],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(argentina, 1);
}

#[test]
fn records_follow_request_order() {
    let reference = ReferenceData::builtin();
    let sources = [SourceKind::Json2018, SourceKind::Archive];
    let config = config_for(fixtures_dir(), &sources);
    let report = run(&config, &reference);

    let records = report.records();
    assert_eq!(records.len(), 9);
    assert_eq!(records[0].home_team, "russia");
    assert_eq!(records[3].home_team, "uruguay");
}

#[test]
fn a_missing_file_fails_only_its_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::copy(
        fixtures_dir().join("WorldCupMatches2014.csv"),
        dir.path().join("WorldCupMatches2014.csv"),
    )
    .expect("copy fixture");

    let reference = ReferenceData::builtin();
    let config = config_for(dir.path().to_path_buf(), &SourceKind::ALL);
    let report = run(&config, &reference);

    let failed: Vec<_> = report.failed().map(|(kind, _)| kind).collect();
    assert_eq!(
        failed,
        vec![
            SourceKind::Archive,
            SourceKind::Json2018,
            SourceKind::Split2022,
        ]
    );
    assert!(
        report
            .failed()
            .all(|(_, err)| matches!(err, SourceError::FileMissing { .. }))
    );
    assert_eq!(report.records().len(), 5);
}

#[test]
fn summary_serializes_per_source_status() {
    let reference = ReferenceData::builtin();
    let sources = [SourceKind::Split2022, SourceKind::Legacy2014];
    let config = config_for(fixtures_dir(), &sources);
    let mut report = run(&config, &reference);

    let missing = config_for(fixtures_dir().join("nope"), &[SourceKind::Archive]);
    report.runs.extend(run(&missing, &reference).runs);

    let json = serde_json::to_value(report.summary()).expect("summary");
    let items = json.as_array().expect("array of sources");
    assert_eq!(items.len(), 3);

    assert_eq!(items[0]["source"], "2022");
    assert_eq!(items[0]["status"], "ok");
    assert_eq!(items[0]["records"], 3);
    assert_eq!(items[0]["merge"]["dropped_left"], 1);
    assert_eq!(items[0]["merge"]["dropped_right"], 1);
    assert_eq!(items[0]["warnings"]["merge_drop"], 2);

    assert_eq!(items[1]["source"], "2014");
    assert!(items[1]["merge"].is_null());

    assert_eq!(items[2]["source"], "1930-2010");
    assert_eq!(items[2]["status"], "failed");
    assert!(
        items[2]["error"]
            .as_str()
            .is_some_and(|e| e.contains("WorldCupMatches1930_2010.csv"))
    );
}
