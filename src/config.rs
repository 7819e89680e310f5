use std::path::{Path, PathBuf};

use crate::pipeline::SourceKind;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_DB_PATH: &str = "./db/worldcup.sqlite";

#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub reference_file: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub sources: Vec<SourceKind>,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            reference_file: None,
            report_path: None,
            sources: SourceKind::ALL.to_vec(),
        }
    }
}

impl EtlConfig {
    /// `WC_DATA_DIR`, `WC_DB_PATH`, `WC_REFERENCE_FILE`, `WC_REPORT_PATH` and
    /// `WC_SOURCES`; blank values count as unset.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(dir) = env_path("WC_DATA_DIR") {
            cfg.data_dir = dir;
        }
        if let Some(db) = env_path("WC_DB_PATH") {
            cfg.db_path = db;
        }
        cfg.reference_file = env_path("WC_REFERENCE_FILE");
        cfg.report_path = env_path("WC_REPORT_PATH");
        if let Ok(raw) = std::env::var("WC_SOURCES") {
            let sources = parse_sources(&raw);
            if !sources.is_empty() {
                cfg.sources = sources;
            }
        }
        cfg
    }

    /// Applies `--data-dir`, `--db`, `--reference`, `--report` and `--sources`
    /// in either `--flag value` or `--flag=value` form.
    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(dir) = flag_value(args, "--data-dir") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(db) = flag_value(args, "--db") {
            self.db_path = PathBuf::from(db);
        }
        if let Some(path) = flag_value(args, "--reference") {
            self.reference_file = Some(PathBuf::from(path));
        }
        if let Some(path) = flag_value(args, "--report") {
            self.report_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = flag_value(args, "--sources") {
            let sources = parse_sources(&raw);
            if !sources.is_empty() {
                self.sources = sources;
            }
        }
    }

    pub fn paths(&self) -> SourcePaths {
        SourcePaths::under(&self.data_dir)
    }
}

/// Input file locations, one set per source.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub legacy_2014: PathBuf,
    pub json_2018: PathBuf,
    pub matches_2022: PathBuf,
    pub venues_2022: PathBuf,
    pub stadiums_2022: PathBuf,
    pub archive: PathBuf,
}

impl SourcePaths {
    pub fn under(dir: &Path) -> Self {
        Self {
            legacy_2014: dir.join("WorldCupMatches2014.csv"),
            json_2018: dir.join("data_2018.json"),
            matches_2022: dir.join("WorldCupMatches2022.csv"),
            venues_2022: dir.join("WorldCupMatches2022-venue.csv"),
            stadiums_2022: dir.join("stadium_city_mapping2022.csv"),
            archive: dir.join("WorldCupMatches1930_2010.csv"),
        }
    }
}

pub fn parse_sources(raw: &str) -> Vec<SourceKind> {
    let mut out = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        if let Some(kind) = SourceKind::from_label(part.trim())
            && !out.contains(&kind)
        {
            out.push(kind);
        }
    }
    out
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
