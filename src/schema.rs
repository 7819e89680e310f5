use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn = Connection::open(path)
        .with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
    init_schema(&conn)?;
    Ok(conn)
}

/// The fixed destination schema: four dimension tables, the `Matches` fact
/// header and its `Plays` detail rows.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS Teams (
            team_id INTEGER PRIMARY KEY,
            team_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS MatchTime (
            time_id INTEGER PRIMARY KEY,
            date TEXT NULL,
            day INTEGER NULL,
            month INTEGER NULL,
            year INTEGER NULL
        );
        CREATE TABLE IF NOT EXISTS Rounds (
            round_id INTEGER PRIMARY KEY,
            round_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS City (
            city_id INTEGER PRIMARY KEY,
            city_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS Matches (
            match_id INTEGER PRIMARY KEY,
            round_id INTEGER NOT NULL REFERENCES Rounds(round_id),
            city_id INTEGER NOT NULL REFERENCES City(city_id),
            time_id INTEGER NOT NULL REFERENCES MatchTime(time_id)
        );
        CREATE TABLE IF NOT EXISTS Plays (
            match_id INTEGER NOT NULL REFERENCES Matches(match_id),
            team_id INTEGER NOT NULL REFERENCES Teams(team_id),
            position TEXT NOT NULL,
            goal_nb INTEGER NULL,
            result TEXT NOT NULL,
            PRIMARY KEY (match_id, team_id)
        );
        CREATE INDEX IF NOT EXISTS idx_plays_team ON Plays(team_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}
