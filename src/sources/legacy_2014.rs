//! 2014 export: one `;`-delimited ISO-8859-1 table with a free-text
//! "Win conditions" column carrying penalty shoot-out scores.

use std::path::Path;

use crate::error::SourceResult;
use crate::raw::{Legacy2014Row, RawMatchRecord};
use crate::sources::tabular::{Table, TextEncoding};

pub fn read(path: &Path) -> SourceResult<Vec<RawMatchRecord>> {
    let table = Table::read(path, b';', TextEncoding::Latin1)?;
    extract(&table)
}

pub fn extract(table: &Table) -> SourceResult<Vec<RawMatchRecord>> {
    let datetime = table.require("Datetime")?;
    let stage = table.require("Stage")?;
    let city = table.require("City")?;
    let home_team = table.require("Home Team Name")?;
    let home_goals = table.require("Home Team Goals")?;
    let away_goals = table.require("Away Team Goals")?;
    let away_team = table.require("Away Team Name")?;
    let win_conditions = table.column("Win conditions");

    Ok(table
        .rows()
        .map(|row| {
            RawMatchRecord::Legacy2014(Legacy2014Row {
                datetime: row.owned(datetime),
                stage: row.owned(stage),
                city: row.owned(city),
                home_team: row.owned(home_team),
                away_team: row.owned(away_team),
                home_goals: row.owned(home_goals),
                away_goals: row.owned(away_goals),
                win_conditions: row.get_opt(win_conditions).map(str::to_string),
            })
        })
        .collect())
}
