//! Exact-key join of two independently formatted tables that describe the
//! same matches.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::warnings::{Issue, WarningLog};

/// Date token used in a join key when the row's date is missing or unparseable.
pub const SENTINEL_DATE: &str = "NAT";

/// `team_low + "_" + team_high + "_" + date`, independent of which side plays
/// at home and of which file lists which team first.
pub fn build_key(team_a: &str, team_b: &str, date: Option<NaiveDate>) -> String {
    let (low, high) = if team_a <= team_b {
        (team_a, team_b)
    } else {
        (team_b, team_a)
    };
    let date = date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| SENTINEL_DATE.to_string());
    format!("{low}_{high}_{date}")
}

pub trait JoinKeyed {
    fn join_key(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct MergeOutcome<T> {
    pub records: Vec<T>,
    /// Join keys of left rows that found no partner.
    pub dropped_left: Vec<String>,
    /// Join keys of right rows that found no partner.
    pub dropped_right: Vec<String>,
    pub duplicates_removed: usize,
}

impl<T> MergeOutcome<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Inner join on [`JoinKeyed::join_key`]. Every pairing of equal keys is
/// combined (left order first, right order second); unmatched rows are dropped
/// and reported, and exact duplicates in the combined output are removed,
/// keeping the first occurrence.
pub fn merge<A, B, T, F>(
    left: &[A],
    right: &[B],
    log: &mut WarningLog,
    mut combine: F,
) -> MergeOutcome<T>
where
    A: JoinKeyed,
    B: JoinKeyed,
    T: Clone + Eq + Hash,
    F: FnMut(&A, &B, &mut WarningLog) -> T,
{
    let right_keys: Vec<String> = right.iter().map(JoinKeyed::join_key).collect();
    let mut by_key: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, key) in right_keys.iter().enumerate() {
        by_key.entry(key.as_str()).or_default().push(idx);
    }

    let mut joined = Vec::new();
    let mut dropped_left = Vec::new();
    let mut matched_right: HashSet<usize> = HashSet::new();
    for (row, a) in left.iter().enumerate() {
        let key = a.join_key();
        debug!(key = %key, "join key");
        let Some(partners) = by_key.get(key.as_str()) else {
            dropped_left.push(key);
            continue;
        };
        log.set_row(Some(row + 1));
        for &idx in partners {
            matched_right.insert(idx);
            joined.push(combine(a, &right[idx], log));
        }
    }
    log.set_row(None);

    let dropped_right: Vec<String> = right_keys
        .iter()
        .enumerate()
        .filter(|(idx, _)| !matched_right.contains(idx))
        .map(|(_, key)| key.clone())
        .collect();

    let joined_len = joined.len();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(joined_len);
    for record in joined {
        if seen.insert(record.clone()) {
            records.push(record);
        }
    }
    let duplicates_removed = joined_len - records.len();

    let outcome = MergeOutcome {
        records,
        dropped_left,
        dropped_right,
        duplicates_removed,
    };
    report(&outcome, log);
    outcome
}

fn report<T>(outcome: &MergeOutcome<T>, log: &mut WarningLog) {
    for key in &outcome.dropped_left {
        log.push(Issue::MergeDrop {
            side: "left",
            key: key.clone(),
        });
    }
    for key in &outcome.dropped_right {
        log.push(Issue::MergeDrop {
            side: "right",
            key: key.clone(),
        });
    }
    if outcome.duplicates_removed > 0 {
        log.push(Issue::DuplicatesRemoved {
            count: outcome.duplicates_removed,
        });
    }
    if outcome.records.is_empty() {
        log.push(Issue::EmptyMerge);
    }
    info!(
        source = log.source(),
        merged = outcome.records.len(),
        dropped_left = outcome.dropped_left.len(),
        dropped_right = outcome.dropped_right.len(),
        "merge finished"
    );
}
