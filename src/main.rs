use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_slotting::fixtures::ScoreReport;
use league_slotting::payload::RoundOutput;
use league_slotting::player_stats::{player_matches, player_stats};
use league_slotting::results::parse_results_json;
use league_slotting::roster::parse_roster_json;
use league_slotting::standings::aggregate_standings;
use league_slotting::{SlottingConfig, SlottingDay, SlottingError};

const USAGE: &str = "usage: league_slotting <command>
  slot <roster.json>
  score <day.json> <match_id> <score_team_1> <score_team_2>
  round2 <day.json>
  rounds <day.json>
  payload <day.json> [--league-id ID] [--league-name NAME]
  standings <results.json>
  stats <results.json> <player_id>
  export <day.json> <results.json> <out.xlsx>";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    match command.as_str() {
        "slot" => {
            let roster = parse_roster_json(&read(positional(rest, 0)?)?)?;
            let day = SlottingDay::new(&roster, SlottingConfig::from_env());
            print_json(&day)
        }
        "score" => {
            let path = positional(rest, 0)?;
            let mut day = load_day(path)?;
            let report = ScoreReport {
                match_id: positional(rest, 1)?.to_string(),
                score_team_1: parse_score(positional(rest, 2)?)?,
                score_team_2: parse_score(positional(rest, 3)?)?,
            };
            day.report_score(&report)?;
            print_json(&day)
        }
        "round2" => {
            let mut day = load_day(positional(rest, 0)?)?;
            let outcome = day.generate_round_two().map(|_| ());
            match outcome {
                Ok(()) => print_json(&day),
                Err(SlottingError::RoundIncomplete { unscored }) => {
                    eprintln!("round 1 is not finished; missing scores for:");
                    for id in &unscored {
                        eprintln!(" - {id}");
                    }
                    std::process::exit(1);
                }
                Err(err) => Err(err.into()),
            }
        }
        "rounds" => {
            let day = load_day(positional(rest, 0)?)?;
            let rounds: Vec<RoundOutput> =
                day.rounds().into_iter().map(RoundOutput::from_round).collect();
            print_json(&rounds)
        }
        "payload" => {
            let day = load_day(positional(rest, 0)?)?;
            let league_id = flag_value(rest, "--league-id").unwrap_or_default();
            let league_name = flag_value(rest, "--league-name").unwrap_or_default();
            print_json(&day.to_payload(&league_id, &league_name))
        }
        "standings" => {
            let records = parse_results_json(&read(positional(rest, 0)?)?)?;
            print_json(&aggregate_standings(&records))
        }
        "stats" => {
            let records = parse_results_json(&read(positional(rest, 0)?)?)?;
            let player_id = positional(rest, 1)?;
            print_json(&serde_json::json!({
                "stats": player_stats(&records, player_id),
                "matches": player_matches(&records, player_id),
            }))
        }
        "export" => {
            let day = load_day(positional(rest, 0)?)?;
            let records = parse_results_json(&read(positional(rest, 1)?)?)?;
            let out = PathBuf::from(positional(rest, 2)?);
            let report = league_slotting::export::export_league_workbook(
                &out,
                &day,
                &aggregate_standings(&records),
            )?;
            println!("Export complete: {}", out.display());
            println!("Groups: {}", report.groups);
            println!("Players: {}", report.players);
            println!("Fixtures: {}", report.fixtures);
            println!("Standings rows: {}", report.standings);
            Ok(())
        }
        other => bail!("unknown command `{other}`\n{USAGE}"),
    }
}

/// Positional arguments skip `--flag value` pairs.
fn positional(args: &[String], idx: usize) -> Result<&str> {
    let mut plain = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            if !arg.contains('=') {
                iter.next();
            }
            continue;
        }
        plain.push(arg.as_str());
    }
    plain
        .get(idx)
        .copied()
        .with_context(|| format!("missing argument #{}\n{USAGE}", idx + 1))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(flag).and_then(|v| v.strip_prefix('=')) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn parse_score(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .with_context(|| format!("invalid score `{raw}`"))
}

fn read(path: &str) -> Result<String> {
    fs::read_to_string(Path::new(path)).with_context(|| format!("failed reading {path}"))
}

fn load_day(path: &str) -> Result<SlottingDay> {
    serde_json::from_str(&read(path)?).with_context(|| format!("invalid slotting day in {path}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}
