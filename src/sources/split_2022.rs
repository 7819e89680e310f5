//! 2022 data split across a base match file, a venue/date file and a
//! stadium-to-city mapping. Rows of the first two are paired by
//! [`crate::merge::merge`].

use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::datetime::parse_datetime;
use crate::error::SourceResult;
use crate::merge::{JoinKeyed, MergeOutcome, build_key, merge};
use crate::model::{CanonicalMatchRecord, UNKNOWN};
use crate::normalize::{EntityKind, Normalizer, fold};
use crate::raw::{RawMatchRecord, Split2022Row, non_blank, normalize_teams};
use crate::sources::tabular::{Table, TextEncoding};
use crate::warnings::{Issue, WarningLog};

#[derive(Debug, Clone, Copy)]
pub struct SplitPaths<'a> {
    pub matches: &'a Path,
    pub venues: &'a Path,
    pub stadiums: &'a Path,
}

#[derive(Debug, Clone)]
pub struct BaseRow {
    pub home_team: String,
    pub away_team: String,
    pub date: Option<NaiveDate>,
    pub stage: Option<String>,
    pub home_goals: Option<String>,
    pub away_goals: Option<String>,
}

impl JoinKeyed for BaseRow {
    fn join_key(&self) -> String {
        build_key(&self.home_team, &self.away_team, self.date)
    }
}

#[derive(Debug, Clone)]
pub struct VenueRow {
    pub home_team: String,
    pub away_team: String,
    pub datetime: Option<NaiveDateTime>,
    pub city: Option<String>,
}

impl JoinKeyed for VenueRow {
    fn join_key(&self) -> String {
        build_key(
            &self.home_team,
            &self.away_team,
            self.datetime.map(|dt| dt.date()),
        )
    }
}

pub fn read(
    paths: SplitPaths<'_>,
    normalizer: &Normalizer<'_>,
    log: &mut WarningLog,
) -> SourceResult<MergeOutcome<CanonicalMatchRecord>> {
    let stadiums = Table::read(paths.stadiums, b',', TextEncoding::Utf8)?;
    let matches = Table::read(paths.matches, b',', TextEncoding::Utf8)?;
    let venues = Table::read(paths.venues, b',', TextEncoding::Utf8)?;

    let city_by_stadium = stadium_mapping(&stadiums);
    let base = base_rows(&matches, normalizer, log)?;
    let venue = venue_rows(&venues, &city_by_stadium, normalizer, log)?;
    Ok(merge_rows(&base, &venue, normalizer, log))
}

/// Base rows supply orientation, stage and goals; venue rows supply the
/// kick-off time and the city.
pub fn merge_rows(
    base: &[BaseRow],
    venue: &[VenueRow],
    normalizer: &Normalizer<'_>,
    log: &mut WarningLog,
) -> MergeOutcome<CanonicalMatchRecord> {
    merge(base, venue, log, |b, v, log| {
        RawMatchRecord::Split2022(Split2022Row {
            datetime: v.datetime,
            stage: b.stage.clone(),
            city: v.city.clone(),
            home_team: b.home_team.clone(),
            away_team: b.away_team.clone(),
            home_goals: b.home_goals.clone(),
            away_goals: b.away_goals.clone(),
        })
        .into_canonical(normalizer, log)
    })
}

/// First column stadium, second column city, keyed by folded stadium name.
pub fn stadium_mapping(table: &Table) -> HashMap<String, String> {
    table
        .rows()
        .filter_map(|row| {
            let stadium = fold(row.get(0)?, EntityKind::City);
            let city = row.get(1)?.to_string();
            Some((stadium, city))
        })
        .collect()
}

pub fn base_rows(
    table: &Table,
    normalizer: &Normalizer<'_>,
    log: &mut WarningLog,
) -> SourceResult<Vec<BaseRow>> {
    let team1 = table.require("team1")?;
    let team2 = table.require("team2")?;
    let goals1 = table.require("number of goals team1")?;
    let goals2 = table.require("number of goals team2")?;
    let date = table.require("date")?;
    let category = table.column("category");
    if category.is_none() {
        log.push(Issue::MissingValue {
            field: "category column".to_string(),
        });
    }

    let mut out = Vec::with_capacity(table.len());
    for (idx, row) in table.rows().enumerate() {
        log.set_row(Some(idx + 1));
        let (home_team, away_team) =
            normalize_teams(normalizer, row.get(team1), row.get(team2), log);
        out.push(BaseRow {
            home_team,
            away_team,
            date: parse_key_date(row.get(date), log),
            stage: match category {
                Some(_) => row.get_opt(category).map(str::to_string),
                None => Some(UNKNOWN.to_string()),
            },
            home_goals: row.owned(goals1),
            away_goals: row.owned(goals2),
        });
    }
    log.set_row(None);
    Ok(out)
}

pub fn venue_rows(
    table: &Table,
    city_by_stadium: &HashMap<String, String>,
    normalizer: &Normalizer<'_>,
    log: &mut WarningLog,
) -> SourceResult<Vec<VenueRow>> {
    let home_col = table.require("home_team")?;
    let away_col = table.require("away_team")?;
    let match_time = table.require("match_time")?;
    let venue = table.require("venue")?;

    let mut out = Vec::with_capacity(table.len());
    for (idx, row) in table.rows().enumerate() {
        log.set_row(Some(idx + 1));
        let (home_team, away_team) =
            normalize_teams(normalizer, row.get(home_col), row.get(away_col), log);
        let datetime = parse_key_datetime(row.get(match_time), log);
        let city = match row.get(venue) {
            Some(stadium) => match city_by_stadium.get(&fold(stadium, EntityKind::City)) {
                Some(city) => Some(city.clone()),
                None => {
                    log.push(Issue::UnmappedReference {
                        kind: EntityKind::City,
                        value: stadium.to_string(),
                    });
                    Some(UNKNOWN.to_string())
                }
            },
            None => None,
        };
        out.push(VenueRow {
            home_team,
            away_team,
            datetime,
            city,
        });
    }
    log.set_row(None);
    Ok(out)
}

fn parse_key_datetime(raw: Option<&str>, log: &mut WarningLog) -> Option<NaiveDateTime> {
    let Some(value) = non_blank(raw) else {
        log.push(Issue::MissingValue {
            field: "match_time".to_string(),
        });
        return None;
    };
    let parsed = parse_datetime(value);
    if parsed.is_none() {
        log.push(Issue::UnparseableDate {
            field: "match_time".to_string(),
            value: value.to_string(),
        });
    }
    parsed
}

fn parse_key_date(raw: Option<&str>, log: &mut WarningLog) -> Option<NaiveDate> {
    let Some(value) = non_blank(raw) else {
        log.push(Issue::MissingValue {
            field: "date".to_string(),
        });
        return None;
    };
    let parsed = parse_datetime(value).map(|dt| dt.date());
    if parsed.is_none() {
        log.push(Issue::UnparseableDate {
            field: "date".to_string(),
            value: value.to_string(),
        });
    }
    parsed
}
