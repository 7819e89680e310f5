//! 2018 document: team and stadium lookup arrays plus `groups` and
//! `knockout` maps whose entries reference them by id.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{SourceError, SourceResult};
use crate::raw::{Json2018Row, RawMatchRecord};
use crate::sources::tabular::{TextEncoding, decode, read_source_bytes};

pub fn read(path: &Path) -> SourceResult<Vec<RawMatchRecord>> {
    let bytes = read_source_bytes(path)?;
    let text = decode(&bytes, TextEncoding::Utf8);
    let value: Value = serde_json::from_str(text.trim()).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    extract(path, &value)
}

pub fn extract(path: &Path, doc: &Value) -> SourceResult<Vec<RawMatchRecord>> {
    let malformed = |reason: &str| SourceError::Malformed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    let teams = lookup(doc, "teams", "name")
        .ok_or_else(|| malformed("missing 'teams' array"))?;
    let stadiums = lookup(doc, "stadiums", "city")
        .ok_or_else(|| malformed("missing 'stadiums' array"))?;

    let mut out = Vec::new();
    for section in ["groups", "knockout"] {
        let Some(rounds) = doc.get(section).and_then(|v| v.as_object()) else {
            return Err(malformed(&format!("missing '{section}' object")));
        };
        // Document order; serde_json is built with `preserve_order`.
        for round in rounds.values() {
            let label = round.get("name").and_then(|v| v.as_str());
            let Some(matches) = round.get("matches").and_then(|v| v.as_array()) else {
                continue;
            };
            for m in matches {
                let row = parse_match(m, label, &teams, &stadiums);
                out.push(RawMatchRecord::Json2018(row));
            }
        }
    }
    Ok(out)
}

fn parse_match(
    m: &Value,
    round_label: Option<&str>,
    teams: &HashMap<String, String>,
    stadiums: &HashMap<String, String>,
) -> Json2018Row {
    let referenced = |field: &str, table: &HashMap<String, String>| {
        m.get(field)
            .and_then(id_key)
            .and_then(|id| table.get(&id).cloned())
    };
    let home_penalty = m.get("home_penalty").and_then(as_u32_any);
    let away_penalty = m.get("away_penalty").and_then(as_u32_any);
    let shootout = match (home_penalty, away_penalty) {
        (Some(h), Some(a)) => Some(format!("{h}-{a}")),
        _ => None,
    };

    Json2018Row {
        datetime: m.get("date").and_then(|v| v.as_str()).map(str::to_string),
        stage: round_label.map(str::to_string),
        city: referenced("stadium", stadiums),
        home_team: referenced("home_team", teams),
        away_team: referenced("away_team", teams),
        home_goals: m.get("home_result").and_then(as_u32_any),
        away_goals: m.get("away_result").and_then(as_u32_any),
        shootout,
    }
}

/// `id -> field` for an array of objects, ids rendered as strings so numeric
/// and textual ids compare equal.
fn lookup(doc: &Value, array: &str, field: &str) -> Option<HashMap<String, String>> {
    let items = doc.get(array)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| {
                let id = id_key(item.get("id")?)?;
                let value = item.get(field)?.as_str()?.to_string();
                Some((id, value))
            })
            .collect(),
    )
}

fn id_key(v: &Value) -> Option<String> {
    if let Some(n) = v.as_u64() {
        return Some(n.to_string());
    }
    let s = v.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn as_u32_any(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok();
    }
    v.as_str()?.trim().parse::<u32>().ok()
}
