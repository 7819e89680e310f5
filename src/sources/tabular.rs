use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use tracing::warn;

use crate::error::{SourceError, SourceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1 exports, decoded as Windows-1252 (its superset).
    Latin1,
}

/// Reads a required input file. A missing file is the one fatal condition
/// every reader shares.
pub fn read_source_bytes(path: &Path) -> SourceResult<Vec<u8>> {
    if !path.exists() {
        return Err(SourceError::FileMissing {
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Valid UTF-8 is taken as is under either encoding. Anything else is read
/// as Windows-1252, so no byte turns into U+FFFD.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match (std::str::from_utf8(bytes), encoding) {
        (Ok(text), _) => text.to_string(),
        (Err(err), TextEncoding::Utf8) => {
            warn!(
                offset = err.valid_up_to(),
                "invalid UTF-8, decoded as Windows-1252"
            );
            WINDOWS_1252.decode(bytes).0.into_owned()
        }
        (Err(_), TextEncoding::Latin1) => WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}

/// A delimited table held fully in memory. Cells are trimmed; short rows read
/// as blank cells.
#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn read(path: &Path, delimiter: u8, encoding: TextEncoding) -> SourceResult<Self> {
        let bytes = read_source_bytes(path)?;
        Self::parse(path, &decode(&bytes, encoding), delimiter)
    }

    pub fn parse(path: &Path, text: &str, delimiter: u8) -> SourceResult<Self> {
        let csv_err = |source| SourceError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(SourceError::Malformed {
                path: path.to_path_buf(),
                reason: "no header row".to_string(),
            });
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Header position by case-insensitive name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    pub fn require(&self, name: &str) -> SourceResult<usize> {
        self.column(name).ok_or_else(|| SourceError::MissingColumn {
            path: self.path.clone(),
            column: name.to_string(),
        })
    }

    /// The first of several accepted header spellings.
    pub fn require_any(&self, names: &[&str]) -> SourceResult<usize> {
        names
            .iter()
            .find_map(|name| self.column(name))
            .ok_or_else(|| SourceError::MissingColumn {
                path: self.path.clone(),
                column: names.join(" | "),
            })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { cells })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'t> {
    cells: &'t [String],
}

impl<'t> Row<'t> {
    pub fn get(&self, idx: usize) -> Option<&'t str> {
        self.cells
            .get(idx)
            .map(|c| c.as_str())
            .filter(|c| !c.is_empty())
    }

    pub fn get_opt(&self, idx: Option<usize>) -> Option<&'t str> {
        idx.and_then(|i| self.get(i))
    }

    pub fn owned(&self, idx: usize) -> Option<String> {
        self.get(idx).map(str::to_string)
    }
}
