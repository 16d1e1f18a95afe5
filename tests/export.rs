use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use league_slotting::export::export_league_workbook;
use league_slotting::results::match_records;
use league_slotting::roster::parse_roster_json;
use league_slotting::standings::aggregate_standings;
use league_slotting::{ScoreReport, SlottingConfig, SlottingDay};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn scored_day() -> SlottingDay {
    let roster = parse_roster_json(&read_fixture("roster.json")).expect("fixture should parse");
    let config = SlottingConfig {
        date: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
        ..SlottingConfig::default()
    };
    let mut day = SlottingDay::new(&roster, config);
    let ids: Vec<String> = day.round_one.fixtures().map(|f| f.id.clone()).collect();
    for (idx, id) in ids.into_iter().enumerate() {
        day.report_score(&ScoreReport {
            match_id: id,
            score_team_1: 11,
            score_team_2: idx as u32,
        })
        .expect("fixture exists");
    }
    day
}

fn temp_workbook(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("league_slotting_{}_{name}.xlsx", std::process::id()))
}

#[test]
fn exports_groups_rounds_and_standings() {
    let mut day = scored_day();
    day.generate_round_two().expect("round 1 is complete");
    let payload = serde_json::to_value(day.to_payload("L1", "Tuesday Ladder")).expect("serialize");
    let standings = aggregate_standings(&match_records(&payload));

    let path = temp_workbook("full");
    let report = export_league_workbook(&path, &day, &standings).expect("workbook should save");

    assert_eq!(report.groups, 2);
    assert_eq!(report.players, 9);
    assert_eq!(report.fixtures, 9);
    assert_eq!(report.standings, 9);
    assert_eq!(report.sheets, ["Groups", "Round 1", "Round 2", "Standings"]);

    let written = fs::metadata(&path).expect("workbook should exist");
    assert!(written.len() > 0);
    let _ = fs::remove_file(&path);
}

#[test]
fn export_before_round_two_has_one_round_sheet() {
    let day = scored_day();
    let path = temp_workbook("round_one");
    let report = export_league_workbook(&path, &day, &[]).expect("workbook should save");

    assert_eq!(report.fixtures, 8);
    assert_eq!(report.standings, 0);
    assert_eq!(report.sheets, ["Groups", "Round 1", "Standings"]);
    let _ = fs::remove_file(&path);
}
