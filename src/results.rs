use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::{as_i64_any, non_empty, pick_f64, pick_string, pick_value};
use crate::roster::{Player, normalize_roster};

const UNKNOWN_NAME: &str = "Unknown";

/// A player reference resolved out of a result record. `id` is lower-cased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub display_name: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub players: Vec<Participant>,
    pub score: i64,
}

impl TeamRecord {
    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }
}

/// Canonical shape of one persisted match, whatever shape it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: Option<String>,
    pub round_id: Option<String>,
    pub group_id: Option<String>,
    pub team_one: TeamRecord,
    pub team_two: TeamRecord,
    pub sitting_player: Option<Participant>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub court: Option<String>,
}

impl MatchRecord {
    /// An explicit status decides; without one, any positive score means the
    /// match was played.
    pub fn is_completed(&self) -> bool {
        match self.status.as_deref() {
            Some(status) => {
                status.eq_ignore_ascii_case("completed") || status.eq_ignore_ascii_case("finished")
            }
            None => self.team_one.score > 0 || self.team_two.score > 0,
        }
    }

    pub fn teams(&self) -> [&TeamRecord; 2] {
        [&self.team_one, &self.team_two]
    }
}

/// Which list of a result document gets consulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultShape<'a> {
    Flat(&'a [Value]),
    Nested(&'a [Value]),
    Empty,
}

/// A bare array or a non-empty `matches` list wins; otherwise `rounds`.
pub fn detect_shape(root: &Value) -> ResultShape<'_> {
    if let Value::Array(items) = root {
        return ResultShape::Flat(items);
    }
    let non_empty_list = |key: &str| {
        root.get(key)
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
    };
    if let Some(matches) = non_empty_list("matches") {
        return ResultShape::Flat(matches);
    }
    if let Some(rounds) = non_empty_list("rounds") {
        return ResultShape::Nested(rounds);
    }
    ResultShape::Empty
}

pub fn parse_results_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid results json")?;
    Ok(match_records(&root))
}

/// Flatten a result document into canonical records.
///
/// Resubmissions of the same fixture are collapsed so the latest one
/// replaces earlier ones in place.
pub fn match_records(root: &Value) -> Vec<MatchRecord> {
    let lookup = roster_lookup(root);
    let mut records = Vec::new();

    match detect_shape(root) {
        ResultShape::Flat(items) => {
            for item in items {
                records.extend(parse_match(item, None, None, &lookup));
            }
        }
        ResultShape::Nested(rounds) => {
            for round in rounds {
                let round_id = pick_string(round, &["round_id", "roundId", "id"]);
                for group in list(round, &["group", "groups"]) {
                    let group_id = pick_string(group, &["group_id", "groupId", "id"]);
                    for item in list(group, &["match", "matches"]) {
                        records.extend(parse_match(
                            item,
                            round_id.as_deref(),
                            group_id.as_deref(),
                            &lookup,
                        ));
                    }
                }
            }
        }
        ResultShape::Empty => {}
    }

    let records = dedup_submissions(records);
    tracing::debug!(records = records.len(), "normalized match records");
    records
}

fn list<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    pick_value(value, keys)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

type SubmissionKey = (Option<String>, Option<String>, String, Option<String>);

/// Resubmissions of one fixture share round, group, match id and scheduled
/// time. Generated ids repeat across rounds and league days, so the id alone
/// does not identify a fixture.
fn submission_key(record: &MatchRecord) -> Option<SubmissionKey> {
    let id = record.match_id.clone()?;
    Some((
        record.round_id.clone(),
        record.group_id.clone(),
        id,
        record.time.clone(),
    ))
}

fn dedup_submissions(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut slot_by_key: HashMap<SubmissionKey, usize> = HashMap::new();
    let mut out: Vec<MatchRecord> = Vec::with_capacity(records.len());
    for record in records {
        let Some(key) = submission_key(&record) else {
            out.push(record);
            continue;
        };
        if let Some(&slot) = slot_by_key.get(&key) {
            tracing::debug!(match_id = %key.2, "replacing duplicate submission");
            out[slot] = record;
        } else {
            slot_by_key.insert(key, out.len());
            out.push(record);
        }
    }
    out
}

fn roster_lookup(root: &Value) -> HashMap<String, Player> {
    let Some(players) = root.get("players").and_then(Value::as_array) else {
        return HashMap::new();
    };
    normalize_roster(players)
        .into_iter()
        .filter(|p| !p.email.is_empty())
        .map(|p| (p.email.to_lowercase(), p))
        .collect()
}

fn parse_match(
    item: &Value,
    round_id: Option<&str>,
    group_id: Option<&str>,
    lookup: &HashMap<String, Player>,
) -> Option<MatchRecord> {
    let match_id = pick_string(item, &["match_id", "_id", "id"]);
    let (Some(t1), Some(t2)) = (
        pick_value(item, &["team_one", "team1"]),
        pick_value(item, &["team_two", "team2"]),
    ) else {
        tracing::warn!(
            match_id = match_id.as_deref().unwrap_or("?"),
            "skipping match with missing team data"
        );
        return None;
    };

    Some(MatchRecord {
        match_id,
        round_id: pick_string(item, &["round_id"]).or_else(|| round_id.map(str::to_string)),
        group_id: pick_string(item, &["group_id"]).or_else(|| group_id.map(str::to_string)),
        team_one: parse_team(t1, lookup),
        team_two: parse_team(t2, lookup),
        sitting_player: pick_value(item, &["sitting_player", "siting_player"])
            .and_then(|p| parse_participant(p, lookup)),
        status: pick_string(item, &["match_status", "status"]),
        date: pick_string(item, &["date"]),
        time: pick_string(item, &["time"]),
        court: pick_string(item, &["court_number", "court"]),
    })
}

fn parse_team(team: &Value, lookup: &HashMap<String, Player>) -> TeamRecord {
    let players = [
        pick_value(team, &["player_one", "player1"]),
        pick_value(team, &["player_two", "player2"]),
    ]
    .into_iter()
    .flatten()
    .filter_map(|p| parse_participant(p, lookup))
    .collect();
    let score = team.get("score").and_then(as_i64_any).unwrap_or(0);
    TeamRecord { players, score }
}

/// A reference is either a bare email string or an embedded player object.
fn parse_participant(raw: &Value, lookup: &HashMap<String, Player>) -> Option<Participant> {
    if let Some(email) = raw.as_str() {
        let email = non_empty(email)?;
        let id = email.to_lowercase();
        let known = lookup.get(&id);
        return Some(Participant {
            display_name: known
                .map(|p| p.display_name.clone())
                .unwrap_or_else(|| email.to_string()),
            rating: known.map(|p| p.rating).unwrap_or(0.0),
            id,
        });
    }
    if !raw.is_object() {
        return None;
    }

    let id = pick_string(raw, &["email", "id"])?.to_lowercase();
    let known = lookup.get(&id);
    let first = pick_string(raw, &["firstName"]);
    let display_name = pick_string(raw, &["name"])
        .or_else(|| {
            first.map(|first| {
                let last = pick_string(raw, &["lastName"]).unwrap_or_default();
                format!("{first} {last}").trim().to_string()
            })
        })
        .or_else(|| known.map(|p| p.display_name.clone()))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let rating = pick_f64(raw, &["dupr_rating", "rating"])
        .filter(|r| *r != 0.0)
        .or_else(|| known.map(|p| p.rating))
        .unwrap_or(0.0);

    Some(Participant {
        id,
        display_name,
        rating,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flat_list_wins_when_non_empty() {
        let root = json!({"matches": [{}], "rounds": [{}]});
        assert!(matches!(detect_shape(&root), ResultShape::Flat(_)));
        let root = json!({"matches": [], "rounds": [{}]});
        assert!(matches!(detect_shape(&root), ResultShape::Nested(_)));
        assert_eq!(detect_shape(&json!({})), ResultShape::Empty);
    }

    #[test]
    fn explicit_status_overrides_score_inference() {
        let root = json!({"matches": [
            {"match_id": "a", "match_status": "Scheduled",
             "team_one": {"player_one": "x@a.io", "score": 11}, "team_two": {"score": 3}},
            {"match_id": "b", "status": "FINISHED",
             "team_one": {"score": 0}, "team_two": {"score": 0}}
        ]});
        let records = match_records(&root);
        assert!(!records[0].is_completed());
        assert!(records[1].is_completed());
    }

    #[test]
    fn string_reference_uses_roster_name() {
        let lookup = roster_lookup(&json!({"players": [
            {"email": "Ana@Club.io", "firstName": "Ana", "lastName": "Lopez", "dupr_rating": 4.1}
        ]}));
        let p = parse_participant(&json!("ana@club.io"), &lookup).unwrap();
        assert_eq!(p.id, "ana@club.io");
        assert_eq!(p.display_name, "Ana Lopez");
        assert_eq!(p.rating, 4.1);

        let stranger = parse_participant(&json!("Who@Club.io"), &lookup).unwrap();
        assert_eq!(stranger.id, "who@club.io");
        assert_eq!(stranger.display_name, "Who@Club.io");
    }

    #[test]
    fn object_reference_without_identity_is_dropped() {
        let lookup = HashMap::new();
        assert!(parse_participant(&json!({"name": "Ghost"}), &lookup).is_none());
        assert!(parse_participant(&json!(""), &lookup).is_none());
        let p = parse_participant(&json!({"id": "P7"}), &lookup).unwrap();
        assert_eq!(p.id, "p7");
        assert_eq!(p.display_name, UNKNOWN_NAME);
    }
}
