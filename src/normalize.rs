use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::UNKNOWN;
use crate::reference::ReferenceData;
use crate::warnings::{Issue, WarningLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Team,
    City,
    Stage,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Team => "team",
            EntityKind::City => "city",
            EntityKind::Stage => "stage",
        }
    }
}

/// Text folding shared by every lookup: lower case, diacritics removed,
/// whitespace collapsed. Team and city names are further restricted to
/// `[a-z0-9 -]`. `fold(fold(s)) == fold(s)` for every input.
pub fn fold(raw: &str, kind: EntityKind) -> String {
    let lowered = raw.to_lowercase();
    let stripped = lowered.nfd().filter(|c| !is_combining_mark(*c));

    let mut out = String::with_capacity(raw.len());
    match kind {
        EntityKind::Team | EntityKind::City => {
            for ch in stripped {
                if ch == '_' || ch.is_whitespace() {
                    out.push(' ');
                } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
                    out.push(ch);
                }
            }
        }
        EntityKind::Stage => out.extend(stripped),
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Folded stage label with everything outside `[a-z0-9]` removed, so
/// `"Third-place match"` and `"thirdplacematch"` share a key.
pub fn compact_key(folded: &str) -> String {
    let mut key = folded.to_string();
    key.retain(|c| c.is_ascii_alphanumeric());
    key
}

/// Resolves free-text team, city and stage values to canonical names.
/// Unknown values degrade to their folded form with a warning, never an error.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'r> {
    reference: &'r ReferenceData,
}

impl<'r> Normalizer<'r> {
    pub fn new(reference: &'r ReferenceData) -> Self {
        Self { reference }
    }

    pub fn normalize(&self, raw: Option<&str>, kind: EntityKind, log: &mut WarningLog) -> String {
        self.normalize_field(raw, kind, kind.label(), log)
    }

    pub fn normalize_field(
        &self,
        raw: Option<&str>,
        kind: EntityKind,
        field: &str,
        log: &mut WarningLog,
    ) -> String {
        let Some(folded) = self.fold_present(raw, kind, field, log) else {
            return UNKNOWN.to_string();
        };
        match self.lookup(&folded, kind) {
            Some(canonical) => canonical,
            None => {
                log.push(Issue::UnmappedReference {
                    kind,
                    value: folded.clone(),
                });
                folded
            }
        }
    }

    /// City normalization that also prefers the gazetteer spelling of a
    /// city when the folded value (after aliasing) is a known place.
    pub fn normalize_city_geo(&self, raw: Option<&str>, log: &mut WarningLog) -> String {
        let Some(folded) = self.fold_present(raw, EntityKind::City, "city", log) else {
            return UNKNOWN.to_string();
        };
        let aliased = self.lookup(&folded, EntityKind::City);
        let candidate = aliased.as_deref().unwrap_or(&folded);
        if let Some(place) = self.reference.gazetteer.lookup(candidate) {
            return place.to_string();
        }
        match aliased {
            Some(canonical) => canonical,
            None => {
                log.push(Issue::UnmappedReference {
                    kind: EntityKind::City,
                    value: folded.clone(),
                });
                folded
            }
        }
    }

    /// Round labels of the 1930-2010 feed: exact stage lookup first, then the
    /// compact key, so spacing and punctuation variants still resolve.
    pub fn normalize_round(&self, raw: Option<&str>, log: &mut WarningLog) -> String {
        let Some(folded) = self.fold_present(raw, EntityKind::Stage, "round", log) else {
            return UNKNOWN.to_string();
        };
        if let Some(canonical) = self.lookup(&folded, EntityKind::Stage) {
            return canonical;
        }
        let key = compact_key(&folded);
        if let Some(target) = self.reference.stages.get_compact(&key) {
            debug!(from = folded.as_str(), to = target, "compact round");
            return target.to_string();
        }
        log.push(Issue::UnmappedReference {
            kind: EntityKind::Stage,
            value: folded.clone(),
        });
        folded
    }

    fn fold_present(
        &self,
        raw: Option<&str>,
        kind: EntityKind,
        field: &str,
        log: &mut WarningLog,
    ) -> Option<String> {
        let folded = raw.map(|r| fold(r, kind)).unwrap_or_default();
        if folded.is_empty() {
            log.push(Issue::MissingValue {
                field: field.to_string(),
            });
            return None;
        }
        Some(folded)
    }

    fn lookup(&self, folded: &str, kind: EntityKind) -> Option<String> {
        if folded == UNKNOWN {
            return Some(UNKNOWN.to_string());
        }
        let table = self.reference.aliases(kind);
        if let Some(target) = table.get(folded) {
            debug!(kind = kind.label(), from = folded, to = target, "alias");
            return Some(target.to_string());
        }
        table.is_target(folded).then(|| folded.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_accents_and_punctuation() {
        assert_eq!(fold("  Côte d'Ivoire ", EntityKind::Team), "cote divoire");
        assert_eq!(fold("Rio_de_Janeiro", EntityKind::City), "rio de janeiro");
        assert_eq!(fold("St. Petersburg", EntityKind::City), "st petersburg");
        assert_eq!(fold("Quarter-Finals", EntityKind::Stage), "quarter-finals");
        assert_eq!(fold("Round  of\t16", EntityKind::Stage), "round of 16");
    }

    #[test]
    fn compact_key_drops_spacing_and_punctuation() {
        assert_eq!(compact_key("third-place match"), "thirdplacematch");
        assert_eq!(compact_key("semi - finals"), "semifinals");
        assert_eq!(compact_key("round of16"), "roundof16");
    }

    #[test]
    fn fold_is_a_fixed_point() {
        for raw in [
            "São Paulo ",
            "rn\">Bosnia and Herzegovina",
            "Group  A",
            "MÜNCHEN",
            "ß-Ø",
        ] {
            for kind in [EntityKind::Team, EntityKind::City, EntityKind::Stage] {
                let once = fold(raw, kind);
                assert_eq!(fold(&once, kind), once, "{raw:?} as {kind:?}");
            }
        }
    }
}
