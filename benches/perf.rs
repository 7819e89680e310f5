use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::NaiveDate;
use wc_history::merge::{JoinKeyed, build_key, merge};
use wc_history::normalize::{EntityKind, Normalizer};
use wc_history::outcome::derive_result;
use wc_history::reference::ReferenceData;
use wc_history::warnings::WarningLog;

const RAW_TEAMS: &[&str] = &[
    "USA",
    "Korea Republic",
    "Côte d'Ivoire",
    "rn\">Bosnia and Herzegovina",
    "Germany FR",
    "Brazil",
    "IR Iran",
    "Atlantis",
];

const RAW_CITIES: &[&str] = &[
    "São Paulo ",
    "Rio De Janeiro",
    "Sankt-Peterburg",
    "Natal RN",
    "Nowhere",
];

#[derive(Clone)]
struct Row {
    a: String,
    b: String,
    date: Option<NaiveDate>,
    n: usize,
}

impl JoinKeyed for Row {
    fn join_key(&self) -> String {
        build_key(&self.a, &self.b, self.date)
    }
}

fn sample_rows(count: usize, reversed: bool) -> Vec<Row> {
    let base = NaiveDate::from_ymd_opt(2022, 11, 20);
    (0..count)
        .map(|n| {
            let (a, b) = (format!("team{}", n % 32), format!("team{}", (n + 7) % 32));
            let (a, b) = if reversed { (b, a) } else { (a, b) };
            let offset = chrono::Days::new((n / 16) as u64);
            Row {
                a,
                b,
                date: base.and_then(|d| d.checked_add_days(offset)),
                n,
            }
        })
        .collect()
}

fn bench_normalize_teams(c: &mut Criterion) {
    let reference = ReferenceData::builtin();
    let normalizer = Normalizer::new(&reference);
    c.bench_function("normalize_teams", |b| {
        b.iter(|| {
            let mut log = WarningLog::new("bench");
            for raw in RAW_TEAMS {
                let raw = Some(black_box(*raw));
                black_box(normalizer.normalize(raw, EntityKind::Team, &mut log));
            }
        })
    });
}

fn bench_normalize_city_geo(c: &mut Criterion) {
    let reference = ReferenceData::builtin();
    let normalizer = Normalizer::new(&reference);
    c.bench_function("normalize_city_geo", |b| {
        b.iter(|| {
            let mut log = WarningLog::new("bench");
            for raw in RAW_CITIES {
                let raw = Some(black_box(*raw));
                black_box(normalizer.normalize_city_geo(raw, &mut log));
            }
        })
    });
}

fn bench_derive_result(c: &mut Criterion) {
    c.bench_function("derive_result_shootout", |b| {
        b.iter(|| {
            black_box(derive_result(
                black_box(Some(1)),
                black_box(Some(1)),
                black_box(Some("Brazil win on penalties (3 - 2)")),
            ))
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let left = sample_rows(64, false);
    let right = sample_rows(64, true);
    c.bench_function("merge_64x64", |b| {
        b.iter(|| {
            let mut log = WarningLog::new("bench");
            let outcome = merge(
                black_box(&left),
                black_box(&right),
                &mut log,
                |l, r, _| (l.n, r.n),
            );
            black_box(outcome.records.len());
        })
    });
}

criterion_group!(
    perf,
    bench_normalize_teams,
    bench_normalize_city_geo,
    bench_derive_result,
    bench_merge
);
criterion_main!(perf);
