use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::normalize::{EntityKind, compact_key, fold};

/// Exact-match mapping from a folded variant to its canonical form.
#[derive(Debug, Clone)]
pub struct AliasTable {
    kind: EntityKind,
    entries: HashMap<String, String>,
    targets: HashSet<String>,
    compact: HashMap<String, String>,
}

impl AliasTable {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            targets: HashSet::new(),
            compact: HashMap::new(),
        }
    }

    pub fn with_pairs(kind: EntityKind, pairs: &[(&str, &str)]) -> Self {
        let mut table = Self::new(kind);
        for (from, to) in pairs {
            table.insert(from, to);
        }
        table
    }

    /// Both sides are folded, so lookups can use the folded input directly.
    pub fn insert(&mut self, from: &str, to: &str) {
        let key = fold(from, self.kind);
        if key.is_empty() {
            return;
        }
        let target = fold(to, self.kind);
        self.compact.insert(compact_key(&key), target.clone());
        self.compact
            .entry(compact_key(&target))
            .or_insert_with(|| target.clone());
        self.targets.insert(target.clone());
        self.entries.insert(key, target);
    }

    /// Registers a canonical name that has no variants of its own.
    pub fn insert_canonical(&mut self, name: &str) {
        let name = fold(name, self.kind);
        if !name.is_empty() {
            self.targets.insert(name);
        }
    }

    pub fn get(&self, folded: &str) -> Option<&str> {
        self.entries.get(folded).map(String::as_str)
    }

    /// Lookup by [`compact_key`], for labels whose spacing or punctuation
    /// differs from every exact key.
    pub fn get_compact(&self, key: &str) -> Option<&str> {
        self.compact.get(key).map(String::as_str)
    }

    /// Canonical forms count as known values even without an alias entry.
    pub fn is_target(&self, folded: &str) -> bool {
        self.targets.contains(folded)
    }

    fn validate(&self) -> Result<()> {
        for (from, to) in &self.entries {
            if let Some(next) = self.entries.get(to)
                && next != to
            {
                return Err(anyhow!(
                    "{} alias '{from}' -> '{to}' is not final ('{to}' -> '{next}')",
                    self.kind.label()
                ));
            }
            if to.is_empty() {
                let kind = self.kind.label();
                return Err(anyhow!("{kind} alias '{from}' has an empty target"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerEntry {
    pub name: String,
    #[serde(default)]
    pub alternates: Vec<String>,
}

/// Geographic reference set of city names. Lookups are a linear scan over
/// folded names and alternates.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: Vec<(String, Vec<String>)>,
}

impl Gazetteer {
    pub fn push(&mut self, entry: &GazetteerEntry) {
        let name = fold(&entry.name, EntityKind::City);
        if name.is_empty() {
            return;
        }
        let alternates = entry
            .alternates
            .iter()
            .map(|a| fold(a, EntityKind::City))
            .filter(|a| !a.is_empty())
            .collect();
        self.entries.push((name, alternates));
    }

    pub fn lookup(&self, folded: &str) -> Option<&str> {
        for (name, alternates) in &self.entries {
            if name == folded || alternates.iter().any(|a| a == folded) {
                return Some(name.as_str());
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub teams: AliasTable,
    pub cities: AliasTable,
    pub stages: AliasTable,
    pub gazetteer: Gazetteer,
}

#[derive(Debug, Default, Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    teams: HashMap<String, String>,
    #[serde(default)]
    cities: HashMap<String, String>,
    #[serde(default)]
    stages: HashMap<String, String>,
    #[serde(default)]
    gazetteer: Vec<GazetteerEntry>,
}

impl ReferenceData {
    pub fn builtin() -> Self {
        let mut gazetteer = Gazetteer::default();
        for (name, alternates) in HOST_CITIES {
            gazetteer.push(&GazetteerEntry {
                name: (*name).to_string(),
                alternates: alternates.iter().map(|a| (*a).to_string()).collect(),
            });
        }
        let mut teams = AliasTable::with_pairs(EntityKind::Team, TEAM_ALIASES);
        for name in TEAMS {
            teams.insert_canonical(name);
        }
        let mut cities = AliasTable::with_pairs(EntityKind::City, CITY_ALIASES);
        for (name, _) in HOST_CITIES {
            cities.insert_canonical(name);
        }
        Self {
            teams,
            cities,
            stages: AliasTable::with_pairs(EntityKind::Stage, STAGE_ALIASES),
            gazetteer,
        }
    }

    /// Builtin tables extended (and overridden) by a JSON reference file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read reference file {}", path.display()))?;
        Self::builtin().extended_with_json(&raw)
    }

    pub fn extended_with_json(mut self, raw: &str) -> Result<Self> {
        let file: ReferenceFile = serde_json::from_str(raw).context("bad reference json")?;
        for (from, to) in &file.teams {
            self.teams.insert(from, to);
        }
        for (from, to) in &file.cities {
            self.cities.insert(from, to);
        }
        for (from, to) in &file.stages {
            self.stages.insert(from, to);
        }
        for entry in &file.gazetteer {
            self.gazetteer.push(entry);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn aliases(&self, kind: EntityKind) -> &AliasTable {
        match kind {
            EntityKind::Team => &self.teams,
            EntityKind::City => &self.cities,
            EntityKind::Stage => &self.stages,
        }
    }

    /// Every alias target must be a fixed point, otherwise normalizing twice
    /// could move a value again.
    pub fn validate(&self) -> Result<()> {
        self.teams.validate()?;
        self.cities.validate()?;
        self.stages.validate()?;
        for (name, _) in &self.gazetteer.entries {
            if let Some(to) = self.cities.get(name)
                && to != name
            {
                return Err(anyhow!("gazetteer city '{name}' is also a city alias for '{to}'"));
            }
            if let Some(owner) = self.gazetteer.lookup(name)
                && owner != name
            {
                return Err(anyhow!(
                    "gazetteer city '{name}' is listed as an alternate of '{owner}'"
                ));
            }
        }
        Ok(())
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

const TEAM_ALIASES: &[(&str, &str)] = &[
    ("usa", "united states"),
    ("united states of america", "united states"),
    ("ir iran", "iran"),
    ("iran islamic republic", "iran"),
    ("korea republic", "south korea"),
    ("republic of korea", "south korea"),
    ("korea dpr", "north korea"),
    ("cote divoire", "ivory coast"),
    ("cte divoire", "ivory coast"),
    ("rnbosnia and herzegovina", "bosnia and herzegovina"),
    ("rnrepublic of ireland", "republic of ireland"),
    ("rnserbia and montenegro", "serbia and montenegro"),
    ("rntrinidad and tobago", "trinidad and tobago"),
    ("rnunited arab emirates", "united arab emirates"),
    ("ireland", "republic of ireland"),
    ("germany fr", "west germany"),
    ("german dr", "east germany"),
    ("czech republic", "czechia"),
    ("china pr", "china"),
    ("dutch east indies", "indonesia"),
    ("zaire", "dr congo"),
    ("soviet union", "ussr"),
];

const TEAMS: &[&str] = &[
    "algeria",
    "angola",
    "argentina",
    "australia",
    "austria",
    "belgium",
    "bolivia",
    "bosnia and herzegovina",
    "brazil",
    "bulgaria",
    "cameroon",
    "canada",
    "chile",
    "china",
    "colombia",
    "costa rica",
    "croatia",
    "cuba",
    "czechia",
    "czechoslovakia",
    "denmark",
    "dr congo",
    "east germany",
    "ecuador",
    "egypt",
    "el salvador",
    "england",
    "france",
    "germany",
    "ghana",
    "greece",
    "haiti",
    "honduras",
    "hungary",
    "iceland",
    "indonesia",
    "iran",
    "iraq",
    "israel",
    "italy",
    "ivory coast",
    "jamaica",
    "japan",
    "kuwait",
    "mexico",
    "morocco",
    "netherlands",
    "new zealand",
    "nigeria",
    "north korea",
    "northern ireland",
    "norway",
    "panama",
    "paraguay",
    "peru",
    "poland",
    "portugal",
    "qatar",
    "republic of ireland",
    "romania",
    "russia",
    "saudi arabia",
    "scotland",
    "senegal",
    "serbia",
    "serbia and montenegro",
    "slovakia",
    "slovenia",
    "south africa",
    "south korea",
    "spain",
    "sweden",
    "switzerland",
    "togo",
    "trinidad and tobago",
    "tunisia",
    "turkey",
    "ukraine",
    "united arab emirates",
    "united states",
    "uruguay",
    "ussr",
    "wales",
    "west germany",
    "yugoslavia",
];

const CITY_ALIASES: &[(&str, &str)] = &[
    ("rio", "rio de janeiro"),
    ("so paulo", "sao paulo"),
    ("brasilia df", "brasilia"),
    ("natal rn", "natal"),
    ("cuiaba mt", "cuiaba"),
    ("st petersburg", "saint petersburg"),
    ("moskva", "moscow"),
    ("ar-rayyan", "al rayyan"),
    ("doha qatar", "doha"),
    ("lusail city", "lusail"),
];

const STAGE_ALIASES: &[(&str, &str)] = &[
    ("group", "group"),
    ("group stage", "group"),
    ("groupstage", "group"),
    ("group a", "group"),
    ("group b", "group"),
    ("group c", "group"),
    ("group d", "group"),
    ("group e", "group"),
    ("group f", "group"),
    ("group g", "group"),
    ("group h", "group"),
    ("group 1", "group"),
    ("group 2", "group"),
    ("group 3", "group"),
    ("group 4", "group"),
    ("preliminary round", "group"),
    ("first round", "group"),
    ("round of 16", "round of 16"),
    ("roundof16", "round of 16"),
    ("round16", "round of 16"),
    ("round 16", "round of 16"),
    ("round_16", "round of 16"),
    ("quarter-final", "quarter-final"),
    ("quarter-finals", "quarter-final"),
    ("quarterfinal", "quarter-final"),
    ("quarterfinals", "quarter-final"),
    ("quarter final", "quarter-final"),
    ("quarter finals", "quarter-final"),
    ("semi-final", "semi-final"),
    ("semi-finals", "semi-final"),
    ("semifinal", "semi-final"),
    ("semifinals", "semi-final"),
    ("semi final", "semi-final"),
    ("semi finals", "semi-final"),
    ("play-off for third place", "play-off for third place"),
    ("third place", "play-off for third place"),
    ("third place match", "play-off for third place"),
    ("thirdplacematch", "play-off for third place"),
    ("third place play-off", "play-off for third place"),
    ("match for third place", "play-off for third place"),
    ("playofforthirdplace", "play-off for third place"),
    ("final round", "final-round"),
    ("finalround", "final-round"),
    ("final-round", "final-round"),
    ("final", "final"),
];

const HOST_CITIES: &[(&str, &[&str])] = &[
    ("Rio de Janeiro", &["Rio"]),
    ("Sao Paulo", &["São Paulo"]),
    ("Belo Horizonte", &[]),
    ("Brasilia", &["Brasília"]),
    ("Fortaleza", &[]),
    ("Salvador", &[]),
    ("Recife", &[]),
    ("Natal", &[]),
    ("Manaus", &[]),
    ("Cuiaba", &["Cuiabá"]),
    ("Curitiba", &[]),
    ("Porto Alegre", &[]),
    ("Moscow", &["Moskva"]),
    ("Saint Petersburg", &["St. Petersburg", "Sankt-Peterburg"]),
    ("Kaliningrad", &[]),
    ("Kazan", &[]),
    ("Nizhny Novgorod", &["Nizhniy Novgorod"]),
    ("Samara", &[]),
    ("Volgograd", &[]),
    ("Saransk", &[]),
    ("Rostov-on-Don", &["Rostov-na-Donu", "Rostov"]),
    ("Sochi", &[]),
    ("Yekaterinburg", &["Ekaterinburg"]),
    ("Doha", &[]),
    ("Lusail", &[]),
    ("Al Rayyan", &["Ar-Rayyan"]),
    ("Al Khor", &[]),
    ("Al Wakrah", &[]),
    ("Johannesburg", &[]),
    ("Cape Town", &[]),
    ("Durban", &[]),
    ("Munich", &["München", "Muenchen"]),
    ("Berlin", &[]),
    ("Cologne", &["Köln", "Koeln"]),
    ("Seoul", &[]),
    ("Yokohama", &[]),
    ("Paris", &["Saint-Denis"]),
    ("Montevideo", &[]),
    ("Mexico City", &["Ciudad de Mexico", "Mexico D.F."]),
    ("Buenos Aires", &[]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_consistent() {
        let data = ReferenceData::builtin();
        data.validate().expect("builtin data validates");
        assert_eq!(data.teams.get("usa"), Some("united states"));
        assert_eq!(data.stages.get("round16"), Some("round of 16"));
        assert_eq!(
            data.gazetteer.lookup("sankt-peterburg"),
            Some("saint petersburg")
        );
        assert_eq!(data.stages.get_compact("semifinals"), Some("semi-final"));
    }

    #[test]
    fn json_file_extends_builtin_tables() {
        let data = ReferenceData::builtin()
            .extended_with_json(
                r#"{ "teams": { "Holland": "Netherlands" },
                     "gazetteer": [{ "name": "Göteborg", "alternates": ["Gothenburg"] }] }"#,
            )
            .expect("valid reference json");
        assert_eq!(data.teams.get("holland"), Some("netherlands"));
        assert_eq!(data.teams.get("usa"), Some("united states"));
        assert_eq!(data.gazetteer.lookup("gothenburg"), Some("goteborg"));
    }

    #[test]
    fn chained_aliases_are_rejected() {
        let err = ReferenceData::builtin()
            .extended_with_json(r#"{ "teams": { "united states": "america" } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("not final"));
    }
}
