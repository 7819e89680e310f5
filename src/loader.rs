use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction, params};
use tracing::{info, warn};

use crate::model::{CanonicalMatchRecord, Position, UNKNOWN};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub matches: usize,
    pub plays: usize,
    pub teams: usize,
    pub cities: usize,
    pub rounds: usize,
    pub match_times: usize,
    /// Records whose two sides resolved to the same team.
    pub skipped: usize,
}

/// Name to surrogate id for one dimension. Ids are assigned here, so they are
/// known before the row that references them is written.
#[derive(Debug, Default)]
struct Registry {
    ids: HashMap<String, i64>,
    next_id: i64,
}

impl Registry {
    fn resolve<F>(&mut self, name: &str, create: F) -> Result<i64>
    where
        F: FnOnce(i64) -> Result<()>,
    {
        if let Some(id) = self.ids.get(name) {
            return Ok(*id);
        }
        let id = self.next_id + 1;
        create(id)?;
        self.next_id = id;
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Scoped to a single load; never shared between loads.
#[derive(Debug, Default)]
pub struct DimensionCache {
    teams: Registry,
    cities: Registry,
    rounds: Registry,
    times: Registry,
}

/// Dimension ids of one record. Only [`resolve`] produces it, and fact rows
/// can only be written from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIds {
    pub round_id: i64,
    pub city_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub time_id: i64,
}

/// Loads canonical records into an empty store in one transaction.
pub fn load(conn: &mut Connection, records: &[CanonicalMatchRecord]) -> Result<LoadSummary> {
    let tx = conn.transaction().context("begin load transaction")?;
    let mut cache = DimensionCache::default();
    let mut summary = LoadSummary::default();
    let mut match_id = 0i64;

    for record in records {
        if record.home_team == record.away_team {
            warn!(team = %record.home_team, "both sides resolve to the same team, match skipped");
            summary.skipped += 1;
            continue;
        }
        let ids = resolve(&tx, &mut cache, record)?;
        match_id += 1;
        summary.plays += insert_facts(&tx, match_id, record, &ids)?;
        summary.matches += 1;
    }

    tx.commit().context("commit load transaction")?;
    summary.teams = cache.teams.len();
    summary.cities = cache.cities.len();
    summary.rounds = cache.rounds.len();
    summary.match_times = cache.times.len();
    info!(
        matches = summary.matches,
        plays = summary.plays,
        teams = summary.teams,
        skipped = summary.skipped,
        "load finished"
    );
    Ok(summary)
}

/// Phase one: create-or-reuse every dimension row the record refers to.
pub fn resolve(
    tx: &Transaction<'_>,
    cache: &mut DimensionCache,
    record: &CanonicalMatchRecord,
) -> Result<ResolvedIds> {
    let round_id = cache.rounds.resolve(&record.stage, |id| {
        tx.execute(
            "INSERT INTO Rounds(round_id, round_name) VALUES (?1, ?2)",
            params![id, record.stage],
        )
        .context("insert round")?;
        Ok(())
    })?;
    let city_id = cache.cities.resolve(&record.city, |id| {
        tx.execute(
            "INSERT INTO City(city_id, city_name) VALUES (?1, ?2)",
            params![id, record.city],
        )
        .context("insert city")?;
        Ok(())
    })?;
    let home_team_id = resolve_team(tx, cache, &record.home_team)?;
    let away_team_id = resolve_team(tx, cache, &record.away_team)?;

    let time_key = record.datetime_key().unwrap_or_else(|| UNKNOWN.into());
    let time_id = cache.times.resolve(&time_key, |id| {
        let parts = record.date_parts();
        tx.execute(
            "INSERT INTO MatchTime(time_id, date, day, month, year) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                record.datetime_key(),
                parts.map(|(d, _, _)| d),
                parts.map(|(_, m, _)| m),
                parts.map(|(_, _, y)| y),
            ],
        )
        .context("insert match time")?;
        Ok(())
    })?;

    Ok(ResolvedIds {
        round_id,
        city_id,
        home_team_id,
        away_team_id,
        time_id,
    })
}

fn resolve_team(tx: &Transaction<'_>, cache: &mut DimensionCache, name: &str) -> Result<i64> {
    cache.teams.resolve(name, |id| {
        tx.execute(
            "INSERT INTO Teams(team_id, team_name) VALUES (?1, ?2)",
            params![id, name],
        )
        .context("insert team")?;
        Ok(())
    })
}

/// Phase two: the match header, then exactly one Plays row per side.
pub fn insert_facts(
    tx: &Transaction<'_>,
    match_id: i64,
    record: &CanonicalMatchRecord,
    ids: &ResolvedIds,
) -> Result<usize> {
    tx.execute(
        "INSERT INTO Matches(match_id, round_id, city_id, time_id) VALUES (?1, ?2, ?3, ?4)",
        params![match_id, ids.round_id, ids.city_id, ids.time_id],
    )
    .context("insert match")?;

    let mut inserted = 0;
    for (position, team_id) in [
        (Position::Home, ids.home_team_id),
        (Position::Away, ids.away_team_id),
    ] {
        let (_, goals, result) = record.side(position);
        let (side, result) = (position.as_str(), result.as_str());
        tx.execute(
            "INSERT INTO Plays(match_id, team_id, position, goal_nb, result)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![match_id, team_id, side, goals, result],
        )
        .context("insert plays")?;
        inserted += 1;
    }
    Ok(inserted)
}
