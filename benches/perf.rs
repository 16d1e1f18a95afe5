use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::NaiveDate;
use serde_json::Value;

use league_slotting::fixtures::generate_round_one;
use league_slotting::grouping::partition_groups;
use league_slotting::results::match_records;
use league_slotting::roster::{Player, normalize_roster};
use league_slotting::standings::{aggregate_standings, standings_from_json};
use league_slotting::{ScoreReport, SlottingConfig, SlottingDay};

fn sample_roster(n: usize) -> Vec<Player> {
    let records: Vec<Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "_id": format!("u{i}"),
                "firstName": format!("First{i}"),
                "lastName": format!("Last{i}"),
                "email": format!("player{i}@club.io"),
                "dupr_rating": ((i * 7919) % 400) as f64 / 100.0 + 2.0,
            })
        })
        .collect();
    normalize_roster(&records)
}

fn sample_config() -> SlottingConfig {
    SlottingConfig {
        date: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
        ..SlottingConfig::default()
    }
}

fn scored_day(n: usize) -> SlottingDay {
    let mut day = SlottingDay::new(&sample_roster(n), sample_config());
    let ids: Vec<String> = day.round_one.fixtures().map(|f| f.id.clone()).collect();
    for (idx, id) in ids.into_iter().enumerate() {
        day.report_score(&ScoreReport {
            match_id: id,
            score_team_1: 11,
            score_team_2: (idx % 11) as u32,
        })
        .unwrap();
    }
    day.generate_round_two().unwrap();
    day
}

fn bench_partition_and_round_one(c: &mut Criterion) {
    let roster = sample_roster(2_000);
    let cfg = sample_config();
    c.bench_function("partition_round_one_2000", |b| {
        b.iter(|| {
            let partition = partition_groups(black_box(&roster));
            let round = generate_round_one(&partition.groups, &cfg);
            black_box(round.fixtures().count());
        })
    });
}

fn bench_round_two(c: &mut Criterion) {
    let day = scored_day(2_000);
    c.bench_function("round_two_2000", |b| {
        b.iter(|| {
            let mut day = day.clone();
            let round = day.generate_round_two().unwrap();
            black_box(round.groups.len());
        })
    });
}

fn bench_standings(c: &mut Criterion) {
    let day = scored_day(2_000);
    let payload = serde_json::to_value(day.to_payload("L1", "Bench League")).unwrap();
    let raw = payload.to_string();

    c.bench_function("standings_from_records", |b| {
        let records = match_records(&payload);
        b.iter(|| {
            let table = aggregate_standings(black_box(&records));
            black_box(table.len());
        })
    });

    c.bench_function("standings_from_json", |b| {
        b.iter(|| {
            let table = standings_from_json(black_box(&raw)).unwrap();
            black_box(table.len());
        })
    });
}

criterion_group!(
    benches,
    bench_partition_and_round_one,
    bench_round_two,
    bench_standings
);
criterion_main!(benches);
