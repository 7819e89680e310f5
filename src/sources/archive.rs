//! 1930-2010 curated feed: `,`-delimited UTF-8 with a free-text score column
//! instead of separate goal counts.

use std::path::Path;

use crate::error::SourceResult;
use crate::raw::{ArchiveRow, RawMatchRecord};
use crate::sources::tabular::{Table, TextEncoding};

pub fn read(path: &Path) -> SourceResult<Vec<RawMatchRecord>> {
    let table = Table::read(path, b',', TextEncoding::Utf8)?;
    extract(&table)
}

pub fn extract(table: &Table) -> SourceResult<Vec<RawMatchRecord>> {
    let datetime = table.require_any(&["Datetime", "date"])?;
    let round = table.require("round")?;
    let venue = table.require("venue")?;
    let team1 = table.require("team1")?;
    let team2 = table.require("team2")?;
    let score = table.require("score")?;

    Ok(table
        .rows()
        .map(|row| {
            RawMatchRecord::Archive(ArchiveRow {
                datetime: row.owned(datetime),
                round: row.owned(round),
                venue: row.owned(venue),
                team1: row.owned(team1),
                team2: row.owned(team2),
                score: row.owned(score),
            })
        })
        .collect())
}
