use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::results::{MatchRecord, parse_results_json};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub player_id: String,
    pub display_name: String,
    pub total_score: i64,
    pub matches_played: u32,
}

/// Cumulative per-player table over every completed match.
///
/// Both players of a team are credited with that team's score and one match
/// played. Recomputed from scratch on each call, so the same records always
/// give the same table. Sorted by total score, descending; ties keep the
/// order in which players first appeared.
pub fn aggregate_standings(records: &[MatchRecord]) -> Vec<StandingEntry> {
    let mut slot_by_id: HashMap<&str, usize> = HashMap::new();
    let mut table: Vec<StandingEntry> = Vec::new();

    for record in records.iter().filter(|r| r.is_completed()) {
        for team in record.teams() {
            for player in &team.players {
                let slot = *slot_by_id.entry(player.id.as_str()).or_insert_with(|| {
                    table.push(StandingEntry {
                        player_id: player.id.clone(),
                        display_name: player.display_name.clone(),
                        total_score: 0,
                        matches_played: 0,
                    });
                    table.len() - 1
                });
                let entry = &mut table[slot];
                entry.total_score = entry.total_score.saturating_add(team.score);
                entry.matches_played = entry.matches_played.saturating_add(1);
            }
        }
    }

    table.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    tracing::debug!(players = table.len(), "aggregated standings");
    table
}

pub fn standings_from_json(raw: &str) -> Result<Vec<StandingEntry>> {
    let records = parse_results_json(raw)?;
    Ok(aggregate_standings(&records))
}
