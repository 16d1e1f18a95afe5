use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::results::{MatchRecord, Participant, TeamRecord};

const TBD: &str = "TBD";

const SCHEDULE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_matches: u32,
    pub wins: u32,
    pub losses: u32,
    /// Percentage in `0.0..=100.0`.
    pub win_rate: f64,
    pub best_partner: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Upcoming,
    Completed,
}

/// One match as seen from a single player's side of the net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchView {
    pub match_id: Option<String>,
    pub round_id: Option<String>,
    pub group_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub court: String,
    pub status: MatchStatus,
    pub my_team: Vec<Participant>,
    pub opponents: Vec<Participant>,
    pub my_score: i64,
    pub opponent_score: i64,
}

fn sides<'a>(record: &'a MatchRecord, player_id: &str) -> Option<(&'a TeamRecord, &'a TeamRecord)> {
    if record.team_one.contains(player_id) {
        Some((&record.team_one, &record.team_two))
    } else if record.team_two.contains(player_id) {
        Some((&record.team_two, &record.team_one))
    } else {
        None
    }
}

/// Win/loss record over completed matches. A draw counts as a loss.
pub fn player_stats(records: &[MatchRecord], player_id: &str) -> PlayerStats {
    let player_id = player_id.to_lowercase();
    let mut total = 0u32;
    let mut wins = 0u32;
    // (partner id, partner name, shared wins) in first-win order
    let mut partners: Vec<(String, String, u32)> = Vec::new();

    for record in records.iter().filter(|r| r.is_completed()) {
        let Some((mine, theirs)) = sides(record, &player_id) else {
            continue;
        };
        total += 1;
        if mine.score <= theirs.score {
            continue;
        }
        wins += 1;
        for partner in mine.players.iter().filter(|p| p.id != player_id) {
            match partners.iter_mut().find(|(id, _, _)| *id == partner.id) {
                Some((_, _, count)) => *count += 1,
                None => partners.push((partner.id.clone(), partner.display_name.clone(), 1)),
            }
        }
    }

    let mut best: Option<(&str, u32)> = None;
    for (_, name, count) in &partners {
        if best.is_none_or(|(_, max)| *count > max) {
            best = Some((name.as_str(), *count));
        }
    }

    PlayerStats {
        total_matches: total,
        wins,
        losses: total - wins,
        win_rate: if total > 0 {
            f64::from(wins) / f64::from(total) * 100.0
        } else {
            0.0
        },
        best_partner: best.map(|(name, _)| name.to_string()),
    }
}

pub fn player_matches(records: &[MatchRecord], player_id: &str) -> Vec<PlayerMatchView> {
    let player_id = player_id.to_lowercase();
    records
        .iter()
        .filter_map(|record| {
            let (mine, theirs) = sides(record, &player_id)?;
            let (date, time) = split_schedule(record.date.as_deref(), record.time.as_deref());
            Some(PlayerMatchView {
                match_id: record.match_id.clone(),
                round_id: record.round_id.clone(),
                group_id: record.group_id.clone(),
                date,
                time,
                court: record.court.clone().unwrap_or_else(|| TBD.to_string()),
                status: if record.is_completed() {
                    MatchStatus::Completed
                } else {
                    MatchStatus::Upcoming
                },
                my_team: mine.players.clone(),
                opponents: theirs.players.clone(),
                my_score: mine.score,
                opponent_score: theirs.score,
            })
        })
        .collect()
}

pub fn upcoming_matches(records: &[MatchRecord], player_id: &str) -> Vec<PlayerMatchView> {
    player_matches(records, player_id)
        .into_iter()
        .filter(|m| m.status == MatchStatus::Upcoming)
        .collect()
}

pub fn completed_matches(records: &[MatchRecord], player_id: &str) -> Vec<PlayerMatchView> {
    player_matches(records, player_id)
        .into_iter()
        .filter(|m| m.status == MatchStatus::Completed)
        .collect()
}

/// `2025-03-08T09:20:00` (optionally with fractional seconds or an offset
/// such as `Z`) splits into the date and `09:20` as written; a bare time is
/// kept as given.
fn split_schedule(date: Option<&str>, time: Option<&str>) -> (Option<NaiveDate>, String) {
    let mut day = date.and_then(|d| {
        NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok()
    });
    let Some(raw) = time else {
        return (day, TBD.to_string());
    };
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| {
            SCHEDULE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        });
    match parsed {
        Some(dt) => {
            day = day.or(Some(dt.date()));
            (day, dt.format("%H:%M").to_string())
        }
        None => (day, raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_schedule_handles_iso_and_bare_times() {
        let (date, time) = split_schedule(None, Some("2025-03-08T09:20:00"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 8));
        assert_eq!(time, "09:20");

        let (date, time) = split_schedule(Some("2025-03-09"), Some("10:40"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 9));
        assert_eq!(time, "10:40");

        assert_eq!(split_schedule(None, None), (None, TBD.to_string()));
    }

    #[test]
    fn split_schedule_handles_js_timestamps() {
        let (date, time) = split_schedule(None, Some("2025-03-08T09:20:00.000Z"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 8));
        assert_eq!(time, "09:20");

        let (date, time) = split_schedule(None, Some("2025-03-08T18:05:30+02:00"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 8));
        assert_eq!(time, "18:05");

        let (_, time) = split_schedule(None, Some("2025-03-08T07:45:12.250"));
        assert_eq!(time, "07:45");
    }
}
