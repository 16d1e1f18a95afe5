use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::day::SlottingDay;
use crate::fixtures::{MatchFixture, Round};
use crate::grouping::Group;
use crate::roster::Player;
use crate::standings::StandingEntry;

pub struct ExportReport {
    pub groups: usize,
    pub players: usize,
    pub fixtures: usize,
    pub standings: usize,
    /// Worksheet names in workbook order.
    pub sheets: Vec<String>,
}

/// Write the day's groups, every round's fixtures and the standings table to
/// one workbook.
pub fn export_league_workbook(
    path: &Path,
    day: &SlottingDay,
    standings: &[StandingEntry],
) -> Result<ExportReport> {
    let mut group_rows = vec![vec![
        "Group".to_string(),
        "Seat".to_string(),
        "Player ID".to_string(),
        "Player".to_string(),
        "Rating".to_string(),
    ]];
    for group in &day.partition.groups {
        group_rows.extend(group_rows_for(group));
    }

    let mut workbook = Workbook::new();
    let mut sheets = vec!["Groups".to_string()];
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Groups")?;
        write_rows(sheet, &group_rows)?;
    }

    let mut fixtures = 0usize;
    for round in day.rounds() {
        let rows = fixture_rows(round);
        fixtures += rows.len().saturating_sub(1);
        let name = format!("Round {}", round.number);
        let sheet = workbook.add_worksheet();
        sheet.set_name(&name)?;
        write_rows(sheet, &rows)?;
        sheets.push(name);
    }

    let mut standing_rows = vec![vec![
        "Rank".to_string(),
        "Player ID".to_string(),
        "Player".to_string(),
        "Total Score".to_string(),
        "Matches".to_string(),
    ]];
    for (idx, entry) in standings.iter().enumerate() {
        standing_rows.push(vec![
            (idx + 1).to_string(),
            entry.player_id.clone(),
            entry.display_name.clone(),
            entry.total_score.to_string(),
            entry.matches_played.to_string(),
        ]);
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Standings")?;
        write_rows(sheet, &standing_rows)?;
    }
    sheets.push("Standings".to_string());

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        groups: day.partition.groups.len(),
        players: group_rows.len().saturating_sub(1),
        fixtures,
        standings: standings.len(),
        sheets,
    })
}

fn group_rows_for(group: &Group) -> Vec<Vec<String>> {
    group
        .players
        .iter()
        .enumerate()
        .map(|(seat, p)| {
            vec![
                group.level.to_string(),
                (seat + 1).to_string(),
                p.id.clone(),
                p.display_name.clone(),
                format!("{:.2}", p.rating),
            ]
        })
        .collect()
}

fn fixture_rows(round: &Round) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Group".to_string(),
        "Match".to_string(),
        "Time".to_string(),
        "Court".to_string(),
        "Team 1".to_string(),
        "Team 2".to_string(),
        "Sitting".to_string(),
        "Score 1".to_string(),
        "Score 2".to_string(),
    ]];
    for group in &round.groups {
        for fixture in &group.fixtures {
            rows.push(fixture_row(group.level, fixture));
        }
    }
    rows
}

fn fixture_row(level: u32, f: &MatchFixture) -> Vec<String> {
    let names = |team: &[Player; 2]| {
        format!("{} & {}", team[0].display_name, team[1].display_name)
    };
    vec![
        level.to_string(),
        f.id.clone(),
        f.scheduled_time.format("%H:%M").to_string(),
        f.court.clone(),
        names(&f.team_one),
        names(&f.team_two),
        f.sitting_player
            .as_ref()
            .map(|p| p.display_name.clone())
            .unwrap_or_default(),
        opt_to_string(f.score_one),
        opt_to_string(f.score_two),
    ]
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
