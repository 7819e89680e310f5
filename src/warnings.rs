use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::normalize::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingValue { field: String },
    UnmappedReference { kind: EntityKind, value: String },
    UnparseableDate { field: String, value: String },
    UnparseableScore { field: String, value: String },
    EmptyMerge,
    MergeDrop { side: &'static str, key: String },
    DuplicatesRemoved { count: usize },
}

impl Issue {
    pub fn label(&self) -> &'static str {
        match self {
            Issue::MissingValue { .. } => "missing_value",
            Issue::UnmappedReference { .. } => "unmapped_reference",
            Issue::UnparseableDate { .. } => "unparseable_date",
            Issue::UnparseableScore { .. } => "unparseable_score",
            Issue::EmptyMerge => "empty_merge",
            Issue::MergeDrop { .. } => "merge_drop",
            Issue::DuplicatesRemoved { .. } => "duplicates_removed",
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingValue { field } => write!(f, "{field} missing, replaced by 'unknown'"),
            Issue::UnmappedReference { kind, value } => {
                write!(f, "{} '{value}' unmapped, kept as-is", kind.label())
            }
            Issue::UnparseableDate { field, value } => {
                write!(f, "{field}: cannot parse date '{value}'")
            }
            Issue::UnparseableScore { field, value } => {
                write!(f, "{field}: cannot parse score '{value}'")
            }
            Issue::EmptyMerge => write!(f, "merge produced 0 rows, check teams and dates"),
            Issue::MergeDrop { side, key } => write!(f, "{side} row without counterpart: {key}"),
            Issue::DuplicatesRemoved { count } => write!(f, "removed {count} duplicate rows"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub source: &'static str,
    pub row: Option<usize>,
    pub issue: Issue,
}

/// Warnings accumulated while reconciling one source. Nothing pushed here
/// stops processing.
#[derive(Debug, Clone)]
pub struct WarningLog {
    source: &'static str,
    row: Option<usize>,
    entries: Vec<Warning>,
}

impl WarningLog {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            row: None,
            entries: Vec::new(),
        }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Data rows are 1-based and exclude the header line.
    pub fn set_row(&mut self, row: Option<usize>) {
        self.row = row;
    }

    pub fn push(&mut self, issue: Issue) {
        match self.row {
            Some(row) => warn!(source = self.source, row, "{issue}"),
            None => warn!(source = self.source, "{issue}"),
        }
        self.entries.push(Warning {
            source: self.source,
            row: self.row,
            issue,
        });
    }

    pub fn entries(&self) -> &[Warning] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut out = BTreeMap::new();
        for w in &self.entries {
            *out.entry(w.issue.label()).or_insert(0) += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_records_current_row() {
        let mut log = WarningLog::new("2014");
        log.set_row(Some(3));
        log.push(Issue::MissingValue {
            field: "city".to_string(),
        });
        log.set_row(None);
        log.push(Issue::EmptyMerge);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].row, Some(3));
        assert_eq!(log.entries()[1].row, None);
        assert_eq!(log.count_by_kind().get("missing_value"), Some(&1));
        assert!(log.entries()[0].issue.to_string().contains("city"));
    }
}
