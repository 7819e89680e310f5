use chrono::NaiveDateTime;

use crate::datetime::parse_datetime;
use crate::model::CanonicalMatchRecord;
use crate::normalize::{EntityKind, Normalizer};
use crate::outcome::{derive_result, split_score_text};
use crate::warnings::{Issue, WarningLog};

#[derive(Debug, Clone, Default)]
pub struct Legacy2014Row {
    pub datetime: Option<String>,
    pub stage: Option<String>,
    pub city: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_goals: Option<String>,
    pub away_goals: Option<String>,
    pub win_conditions: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Json2018Row {
    pub datetime: Option<String>,
    pub stage: Option<String>,
    pub city: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub shootout: Option<String>,
}

/// A base-file row joined with its venue-file row. Team names were already
/// canonicalized to build the join key.
#[derive(Debug, Clone, Default)]
pub struct Split2022Row {
    pub datetime: Option<NaiveDateTime>,
    pub stage: Option<String>,
    pub city: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<String>,
    pub away_goals: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArchiveRow {
    pub datetime: Option<String>,
    pub round: Option<String>,
    pub venue: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub score: Option<String>,
}

/// Source-shaped record as extracted by a reader, before canonicalization.
#[derive(Debug, Clone)]
pub enum RawMatchRecord {
    Legacy2014(Legacy2014Row),
    Json2018(Json2018Row),
    Split2022(Split2022Row),
    Archive(ArchiveRow),
}

impl RawMatchRecord {
    pub fn into_canonical(
        self,
        normalizer: &Normalizer<'_>,
        log: &mut WarningLog,
    ) -> CanonicalMatchRecord {
        match self {
            RawMatchRecord::Legacy2014(row) => {
                let stage = normalizer.normalize(row.stage.as_deref(), EntityKind::Stage, log);
                let city = normalizer.normalize_city_geo(row.city.as_deref(), log);
                let (home_team, away_team) = normalize_teams(
                    normalizer,
                    row.home_team.as_deref(),
                    row.away_team.as_deref(),
                    log,
                );
                let home_goals = parse_goals(row.home_goals.as_deref(), "home goals", log);
                let away_goals = parse_goals(row.away_goals.as_deref(), "away goals", log);
                finish(
                    parse_optional_datetime(row.datetime.as_deref(), log),
                    stage,
                    city,
                    home_team,
                    away_team,
                    home_goals,
                    away_goals,
                    non_blank(row.win_conditions.as_deref()),
                )
            }
            RawMatchRecord::Json2018(row) => {
                let stage = normalizer.normalize(row.stage.as_deref(), EntityKind::Stage, log);
                let city = normalizer.normalize(row.city.as_deref(), EntityKind::City, log);
                let (home_team, away_team) = normalize_teams(
                    normalizer,
                    row.home_team.as_deref(),
                    row.away_team.as_deref(),
                    log,
                );
                finish(
                    parse_optional_datetime(row.datetime.as_deref(), log),
                    stage,
                    city,
                    home_team,
                    away_team,
                    row.home_goals,
                    row.away_goals,
                    row.shootout.as_deref(),
                )
            }
            RawMatchRecord::Split2022(row) => {
                let stage = normalizer.normalize(row.stage.as_deref(), EntityKind::Stage, log);
                let city = normalizer.normalize(row.city.as_deref(), EntityKind::City, log);
                let home_goals = parse_goals(row.home_goals.as_deref(), "home goals", log);
                let away_goals = parse_goals(row.away_goals.as_deref(), "away goals", log);
                finish(
                    row.datetime,
                    stage,
                    city,
                    row.home_team,
                    row.away_team,
                    home_goals,
                    away_goals,
                    None,
                )
            }
            RawMatchRecord::Archive(row) => {
                let stage = normalizer.normalize_round(row.round.as_deref(), log);
                let city = normalizer.normalize(row.venue.as_deref(), EntityKind::City, log);
                let (home_team, away_team) =
                    normalize_teams(normalizer, row.team1.as_deref(), row.team2.as_deref(), log);
                let (goals, shootout) = match non_blank(row.score.as_deref()) {
                    Some(score) => {
                        let (goals, shootout) = split_score_text(score);
                        if goals.is_none() {
                            log.push(Issue::UnparseableScore {
                                field: "score".to_string(),
                                value: score.to_string(),
                            });
                        }
                        (goals, shootout)
                    }
                    None => {
                        log.push(Issue::MissingValue {
                            field: "score".to_string(),
                        });
                        (None, None)
                    }
                };
                finish(
                    parse_optional_datetime(row.datetime.as_deref(), log),
                    stage,
                    city,
                    home_team,
                    away_team,
                    goals.map(|(h, _)| h),
                    goals.map(|(_, a)| a),
                    shootout.as_deref(),
                )
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn finish(
    datetime: Option<NaiveDateTime>,
    stage: String,
    city: String,
    home_team: String,
    away_team: String,
    home_goals: Option<u32>,
    away_goals: Option<u32>,
    shootout: Option<&str>,
) -> CanonicalMatchRecord {
    let (home_result, away_result) = derive_result(home_goals, away_goals, shootout);
    CanonicalMatchRecord {
        datetime,
        stage,
        city,
        home_team,
        away_team,
        home_goals,
        away_goals,
        home_result,
        away_result,
    }
}

pub(crate) fn normalize_teams(
    normalizer: &Normalizer<'_>,
    home: Option<&str>,
    away: Option<&str>,
    log: &mut WarningLog,
) -> (String, String) {
    (
        normalizer.normalize_field(home, EntityKind::Team, "home team", log),
        normalizer.normalize_field(away, EntityKind::Team, "away team", log),
    )
}

pub(crate) fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn parse_optional_datetime(
    raw: Option<&str>,
    log: &mut WarningLog,
) -> Option<NaiveDateTime> {
    let Some(value) = non_blank(raw) else {
        log.push(Issue::MissingValue {
            field: "datetime".to_string(),
        });
        return None;
    };
    let parsed = parse_datetime(value);
    if parsed.is_none() {
        log.push(Issue::UnparseableDate {
            field: "datetime".to_string(),
            value: value.to_string(),
        });
    }
    parsed
}

/// Goal counts arrive as text; `"3"` and `"3.0"` both count, anything else
/// becomes `None` with a warning.
pub(crate) fn parse_goals(raw: Option<&str>, field: &str, log: &mut WarningLog) -> Option<u32> {
    let Some(value) = non_blank(raw) else {
        log.push(Issue::MissingValue {
            field: field.to_string(),
        });
        return None;
    };
    if let Ok(n) = value.parse::<u32>() {
        return Some(n);
    }
    let parsed = value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
        .map(|f| f as u32);
    if parsed.is_none() {
        log.push(Issue::UnparseableScore {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchResult;
    use crate::reference::ReferenceData;

    #[test]
    fn legacy_row_uses_win_conditions_for_ties() {
        let reference = ReferenceData::builtin();
        let normalizer = Normalizer::new(&reference);
        let mut log = WarningLog::new("2014");
        let record = RawMatchRecord::Legacy2014(Legacy2014Row {
            datetime: Some("28 Jun 2014 - 13:00".to_string()),
            stage: Some("Round of 16".to_string()),
            city: Some("Belo Horizonte ".to_string()),
            home_team: Some("Brazil".to_string()),
            away_team: Some("Chile".to_string()),
            home_goals: Some("1".to_string()),
            away_goals: Some("1".to_string()),
            win_conditions: Some("Brazil win on penalties (3 - 2) ".to_string()),
        })
        .into_canonical(&normalizer, &mut log);

        assert_eq!(record.stage, "round of 16");
        assert_eq!(record.city, "belo horizonte");
        assert_eq!(record.home_result, MatchResult::Winner);
        assert_eq!(record.away_result, MatchResult::Loser);
    }

    #[test]
    fn parse_goals_handles_floats_and_garbage() {
        let mut log = WarningLog::new("test");
        assert_eq!(parse_goals(Some("3.0"), "home goals", &mut log), Some(3));
        assert_eq!(parse_goals(Some(" 2 "), "home goals", &mut log), Some(2));
        assert!(log.is_empty());
        assert_eq!(parse_goals(Some("n/a"), "home goals", &mut log), None);
        assert_eq!(parse_goals(None, "away goals", &mut log), None);
        assert_eq!(log.count_by_kind().get("unparseable_score"), Some(&1));
        assert_eq!(log.count_by_kind().get("missing_value"), Some(&1));
    }
}
