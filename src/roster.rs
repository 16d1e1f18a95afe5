use std::collections::HashSet;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::{as_f64_any, pick_string};

pub const UNKNOWN_PLAYER: &str = "Unknown Player";

const GENERATED_ID_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub display_name: String,
    pub rating: f64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl Player {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, rating: f64) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            rating,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
        }
    }

    /// The identity results are keyed on downstream: email when known, else id.
    pub fn contact_key(&self) -> &str {
        if self.email.is_empty() {
            &self.id
        } else {
            &self.email
        }
    }
}

/// Parse a roster body. Accepts a bare array, `{ "players": [...] }` or
/// `{ "data": [...] }`; empty bodies and `null` give an empty roster.
pub fn parse_roster_json(raw: &str) -> Result<Vec<Player>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid roster json")?;
    let records = match &root {
        Value::Array(items) => items.as_slice(),
        Value::Object(_) => root
            .get("players")
            .or_else(|| root.get("data"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };
    Ok(normalize_roster(records))
}

/// Turn loosely-typed player records into canonical players.
///
/// Total over its input: no record is dropped and nothing is rejected.
pub fn normalize_roster(records: &[Value]) -> Vec<Player> {
    let mut rng = rand::thread_rng();
    let mut seen: HashSet<String> = records
        .iter()
        .filter_map(|r| pick_string(r, &["id", "_id"]))
        .collect();

    let players: Vec<Player> = records
        .iter()
        .map(|record| normalize_player(record, &mut seen, &mut rng))
        .collect();
    tracing::debug!(players = players.len(), "normalized roster");
    players
}

fn normalize_player(record: &Value, seen: &mut HashSet<String>, rng: &mut impl Rng) -> Player {
    let first_name = pick_string(record, &["firstName"]).unwrap_or_default();
    let last_name = pick_string(record, &["lastName"]).unwrap_or_default();
    let email = pick_string(record, &["email"]).unwrap_or_default();

    let display_name = if !first_name.is_empty() && !last_name.is_empty() {
        format!("{first_name} {last_name}")
    } else {
        pick_string(record, &["name", "userName"]).unwrap_or_else(|| UNKNOWN_PLAYER.to_string())
    };

    let id = pick_string(record, &["id", "_id"]).unwrap_or_else(|| {
        let fresh = unique_token(seen, rng);
        seen.insert(fresh.clone());
        fresh
    });

    let rating = ["rating", "dupr_rating", "dupr"]
        .iter()
        .find_map(|key| record.get(*key).and_then(as_f64_any))
        .unwrap_or(0.0);

    Player {
        id,
        display_name,
        rating,
        first_name,
        last_name,
        email,
    }
}

fn unique_token(seen: &HashSet<String>, rng: &mut impl Rng) -> String {
    loop {
        let token: String = (0..GENERATED_ID_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        if !seen.contains(&token) {
            return token;
        }
    }
}
