use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::MatchResult;

static SCORE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[-–]\s*(\d+)").expect("score regex"));

/// Results for (home, away). Goals decide first; the shootout text only
/// breaks a regulation draw and is ignored otherwise.
pub fn derive_result(
    home_goals: Option<u32>,
    away_goals: Option<u32>,
    shootout: Option<&str>,
) -> (MatchResult, MatchResult) {
    let (Some(home), Some(away)) = (home_goals, away_goals) else {
        return (MatchResult::Unknown, MatchResult::Unknown);
    };
    let home_result = if home > away {
        MatchResult::Winner
    } else if home < away {
        MatchResult::Loser
    } else {
        MatchResult::Draw
    };
    if home_result != MatchResult::Draw {
        return (home_result, home_result.opposite());
    }

    match shootout.and_then(parse_shootout) {
        Some((h, a)) if h > a => (MatchResult::Winner, MatchResult::Loser),
        Some((h, a)) if h < a => (MatchResult::Loser, MatchResult::Winner),
        _ => (MatchResult::Draw, MatchResult::Draw),
    }
}

/// First `<int> - <int>` pair in free text, e.g. `"Brazil win on penalties (3 - 2)"`.
pub fn parse_shootout(text: &str) -> Option<(u32, u32)> {
    score_pairs(text).next()
}

/// Goal pair of a free-text score such as `"2-1"` or `"1 – 1"`.
pub fn parse_score(text: &str) -> Option<(u32, u32)> {
    score_pairs(text).next()
}

/// Splits an archive score string into the regulation pair and, when the text
/// mentions penalties and carries a second pair, the shootout pair rendered
/// back as `"h-a"`.
pub fn split_score_text(text: &str) -> (Option<(u32, u32)>, Option<String>) {
    let mut pairs = score_pairs(text);
    let goals = pairs.next();
    let shootout = if text.to_ascii_lowercase().contains("pen") {
        pairs.next().map(|(h, a)| format!("{h}-{a}"))
    } else {
        None
    };
    (goals, shootout)
}

fn score_pairs(text: &str) -> impl Iterator<Item = (u32, u32)> + '_ {
    SCORE_PAIR.captures_iter(text).filter_map(|caps| {
        let home = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let away = caps.get(2)?.as_str().parse::<u32>().ok()?;
        Some((home, away))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_shootout_accepts_punctuation_and_en_dash() {
        assert_eq!(parse_shootout("4-3"), Some((4, 3)));
        assert_eq!(
            parse_shootout("Netherlands win on penalties (4 - 3) "),
            Some((4, 3))
        );
        assert_eq!(parse_shootout("(5 – 6)"), Some((5, 6)));
        assert_eq!(parse_shootout("win after extra time"), None);
        assert_eq!(parse_shootout(""), None);
    }

    #[test]
    fn split_score_text_finds_penalty_pair() {
        assert_eq!(split_score_text("2-1"), (Some((2, 1)), None));
        assert_eq!(
            split_score_text("1-1 (a.e.t., 4-3 pen.)"),
            (Some((1, 1)), Some("4-3".to_string()))
        );
        assert_eq!(split_score_text("1-1 (3-0 agg)"), (Some((1, 1)), None));
        assert_eq!(split_score_text("awarded"), (None, None));
    }
}
