use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info};

use crate::config::{EtlConfig, SourcePaths};
use crate::error::{SourceError, SourceResult};
use crate::merge::MergeOutcome;
use crate::model::CanonicalMatchRecord;
use crate::normalize::Normalizer;
use crate::raw::RawMatchRecord;
use crate::reference::ReferenceData;
use crate::sources::split_2022::SplitPaths;
use crate::sources::{archive, json_2018, legacy_2014, split_2022};
use crate::warnings::WarningLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Legacy2014,
    Json2018,
    Split2022,
    Archive,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Archive,
        SourceKind::Legacy2014,
        SourceKind::Json2018,
        SourceKind::Split2022,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Legacy2014 => "2014",
            SourceKind::Json2018 => "2018",
            SourceKind::Split2022 => "2022",
            SourceKind::Archive => "1930-2010",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub matched: usize,
    pub dropped_left: usize,
    pub dropped_right: usize,
    pub duplicates_removed: usize,
}

impl<T> From<&MergeOutcome<T>> for MergeStats {
    fn from(outcome: &MergeOutcome<T>) -> Self {
        Self {
            matched: outcome.records.len(),
            dropped_left: outcome.dropped_left.len(),
            dropped_right: outcome.dropped_right.len(),
            duplicates_removed: outcome.duplicates_removed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub kind: SourceKind,
    pub records: Vec<CanonicalMatchRecord>,
    pub warnings: WarningLog,
    pub merge: Option<MergeStats>,
}

/// Reads one source to completion and canonicalizes every record.
pub fn run_source(
    kind: SourceKind,
    paths: &SourcePaths,
    normalizer: &Normalizer<'_>,
) -> SourceResult<SourceOutcome> {
    let mut log = WarningLog::new(kind.label());
    let (records, merge) = match kind {
        SourceKind::Legacy2014 => {
            let raw = legacy_2014::read(&paths.legacy_2014)?;
            (canonicalize(raw, normalizer, &mut log), None)
        }
        SourceKind::Json2018 => {
            let raw = json_2018::read(&paths.json_2018)?;
            (canonicalize(raw, normalizer, &mut log), None)
        }
        SourceKind::Archive => {
            let raw = archive::read(&paths.archive)?;
            (canonicalize(raw, normalizer, &mut log), None)
        }
        SourceKind::Split2022 => {
            let outcome = split_2022::read(
                SplitPaths {
                    matches: &paths.matches_2022,
                    venues: &paths.venues_2022,
                    stadiums: &paths.stadiums_2022,
                },
                normalizer,
                &mut log,
            )?;
            let stats = MergeStats::from(&outcome);
            (outcome.records, Some(stats))
        }
    };
    info!(
        source = kind.label(),
        records = records.len(),
        warnings = log.len(),
        "source reconciled"
    );
    Ok(SourceOutcome {
        kind,
        records,
        warnings: log,
        merge,
    })
}

fn canonicalize(
    raw: Vec<RawMatchRecord>,
    normalizer: &Normalizer<'_>,
    log: &mut WarningLog,
) -> Vec<CanonicalMatchRecord> {
    let mut out = Vec::with_capacity(raw.len());
    for (idx, record) in raw.into_iter().enumerate() {
        log.set_row(Some(idx + 1));
        out.push(record.into_canonical(normalizer, log));
    }
    log.set_row(None);
    out
}

#[derive(Debug)]
pub struct SourceRun {
    pub kind: SourceKind,
    pub result: Result<SourceOutcome, SourceError>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub runs: Vec<SourceRun>,
}

impl RunReport {
    /// Records of every successful source, in request order.
    pub fn records(&self) -> Vec<CanonicalMatchRecord> {
        self.runs
            .iter()
            .filter_map(|run| run.result.as_ref().ok())
            .flat_map(|outcome| outcome.records.iter().cloned())
            .collect()
    }

    pub fn failed(&self) -> impl Iterator<Item = (SourceKind, &SourceError)> {
        self.runs
            .iter()
            .filter_map(|run| run.result.as_ref().err().map(|e| (run.kind, e)))
    }

    pub fn summary(&self) -> Vec<SourceSummary> {
        self.runs.iter().map(SourceSummary::from).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: &'static str,
    pub status: &'static str,
    pub error: Option<String>,
    pub records: usize,
    pub warnings: BTreeMap<&'static str, usize>,
    pub merge: Option<MergeStats>,
}

impl From<&SourceRun> for SourceSummary {
    fn from(run: &SourceRun) -> Self {
        match &run.result {
            Ok(outcome) => Self {
                source: run.kind.label(),
                status: "ok",
                error: None,
                records: outcome.records.len(),
                warnings: outcome.warnings.count_by_kind(),
                merge: outcome.merge,
            },
            Err(err) => Self {
                source: run.kind.label(),
                status: "failed",
                error: Some(err.to_string()),
                records: 0,
                warnings: BTreeMap::new(),
                merge: None,
            },
        }
    }
}

/// Processes every configured source; a failing source is recorded and the
/// rest still run.
pub fn run(config: &EtlConfig, reference: &ReferenceData) -> RunReport {
    let normalizer = Normalizer::new(reference);
    let paths = config.paths();
    let mut report = RunReport::default();
    for kind in &config.sources {
        let result = run_source(*kind, &paths, &normalizer);
        if let Err(err) = &result {
            error!(source = kind.label(), "{err}");
        }
        report.runs.push(SourceRun {
            kind: *kind,
            result,
        });
    }
    report
}
