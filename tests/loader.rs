use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use wc_history::loader::load;
use wc_history::model::{CanonicalMatchRecord, MatchResult};
use wc_history::schema::open_in_memory;

fn at(y: i32, m: u32, d: u32, h: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(h, 0, 0)
}

fn record(
    datetime: Option<NaiveDateTime>,
    stage: &str,
    city: &str,
    home: (&str, Option<u32>, MatchResult),
    away: (&str, Option<u32>, MatchResult),
) -> CanonicalMatchRecord {
    CanonicalMatchRecord {
        datetime,
        stage: stage.to_string(),
        city: city.to_string(),
        home_team: home.0.to_string(),
        away_team: away.0.to_string(),
        home_goals: home.1,
        away_goals: away.1,
        home_result: home.2,
        away_result: away.2,
    }
}

fn sample() -> Vec<CanonicalMatchRecord> {
    vec![
        record(
            at(2014, 6, 12, 17),
            "group",
            "sao paulo",
            ("brazil", Some(3), MatchResult::Winner),
            ("croatia", Some(1), MatchResult::Loser),
        ),
        record(
            at(2014, 6, 17, 16),
            "group",
            "fortaleza",
            ("brazil", Some(0), MatchResult::Draw),
            ("mexico", Some(0), MatchResult::Draw),
        ),
        record(
            None,
            "unknown",
            "unknown",
            ("croatia", None, MatchResult::Unknown),
            ("mexico", None, MatchResult::Unknown),
        ),
    ]
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).expect("count")
}

#[test]
fn one_dimension_row_per_canonical_name() {
    let mut conn = open_in_memory().expect("in-memory db");
    let summary = load(&mut conn, &sample()).expect("load");

    assert_eq!(summary.matches, 3);
    assert_eq!(summary.plays, 6);
    assert_eq!(summary.teams, 3);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM Teams"), 3);
    let brazil = count(
        &conn,
        "SELECT COUNT(*) FROM Teams WHERE team_name = 'brazil'",
    );
    assert_eq!(brazil, 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM Rounds"), 2);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM City"), 3);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM MatchTime"), 3);

    let brazil_plays = count(
        &conn,
        "SELECT COUNT(*) FROM Plays p JOIN Teams t ON t.team_id = p.team_id
         WHERE t.team_name = 'brazil'",
    );
    assert_eq!(brazil_plays, 2);
}

#[test]
fn every_match_has_a_home_and_an_away_row() {
    let mut conn = open_in_memory().expect("in-memory db");
    load(&mut conn, &sample()).expect("load");

    let mut stmt = conn
        .prepare(
            "SELECT m.match_id, COUNT(p.team_id),
                    SUM(p.position = 'home'), SUM(p.position = 'away')
             FROM Matches m JOIN Plays p ON p.match_id = m.match_id
             GROUP BY m.match_id",
        )
        .expect("prepare");
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("rows");
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| *r == (2, 1, 1)));

    let violations = conn
        .prepare("PRAGMA foreign_key_check")
        .expect("prepare")
        .query_map([], |_| Ok(()))
        .expect("query")
        .count();
    assert_eq!(violations, 0);
}

#[test]
fn plays_rows_carry_goals_and_results() {
    let mut conn = open_in_memory().expect("in-memory db");
    load(&mut conn, &sample()).expect("load");

    let (goals, result): (Option<i64>, String) = conn
        .query_row(
            "SELECT p.goal_nb, p.result FROM Plays p JOIN Teams t ON t.team_id = p.team_id
             WHERE t.team_name = 'croatia' AND p.position = 'away'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("croatia away row");
    assert_eq!(goals, Some(1));
    assert_eq!(result, "loser");

    let (goals, result): (Option<i64>, String) = conn
        .query_row(
            "SELECT p.goal_nb, p.result FROM Plays p JOIN Teams t ON t.team_id = p.team_id
             WHERE t.team_name = 'croatia' AND p.position = 'home'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("croatia home row");
    assert_eq!(goals, None);
    assert_eq!(result, "unknown");
}

#[test]
fn match_time_splits_date_parts() {
    let mut conn = open_in_memory().expect("in-memory db");
    load(&mut conn, &sample()).expect("load");

    let (date, day, month, year): (String, i64, i64, i64) = conn
        .query_row(
            "SELECT date, day, month, year FROM MatchTime WHERE date LIKE '2014-06-12%'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .expect("dated row");
    assert_eq!(date, "2014-06-12 17:00:00");
    assert_eq!((day, month, year), (12, 6, 2014));

    let undated = count(
        &conn,
        "SELECT COUNT(*) FROM MatchTime WHERE date IS NULL AND year IS NULL",
    );
    assert_eq!(undated, 1);
}

#[test]
fn same_team_on_both_sides_is_skipped() {
    let mut records = sample();
    records.push(record(
        None,
        "group",
        "unknown",
        ("unknown", None, MatchResult::Unknown),
        ("unknown", None, MatchResult::Unknown),
    ));
    let mut conn = open_in_memory().expect("in-memory db");
    let summary = load(&mut conn, &records).expect("load");

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.matches, 3);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM Matches"), 3);
    let unknown = count(
        &conn,
        "SELECT COUNT(*) FROM Teams WHERE team_name = 'unknown'",
    );
    assert_eq!(unknown, 0);
}

#[test]
fn file_store_is_created_with_parent_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("db").join("worldcup.sqlite");
    let mut conn = wc_history::schema::open_db(&path).expect("open file db");
    load(&mut conn, &sample()).expect("load");
    drop(conn);

    let reopened = Connection::open(&path).expect("reopen");
    assert_eq!(count(&reopened, "SELECT COUNT(*) FROM Matches"), 3);
}
