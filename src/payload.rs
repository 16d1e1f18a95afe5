use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fixtures::{MatchFixture, Round};
use crate::roster::Player;

// Per-round output handed to a persistence collaborator.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutput {
    pub round_id: String,
    pub groups: Vec<GroupOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutput {
    pub group_level: u32,
    pub matches: Vec<MatchOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutput {
    pub match_id: String,
    pub team_one: TeamOutput,
    pub team_two: TeamOutput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitting_player: Option<String>,
    pub time: String,
    pub court: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamOutput {
    pub player_one: String,
    pub player_two: String,
    pub score: Option<u32>,
}

impl RoundOutput {
    pub fn from_round(round: &Round) -> Self {
        Self {
            round_id: round.round_id.clone(),
            groups: round
                .groups
                .iter()
                .map(|g| GroupOutput {
                    group_level: g.level,
                    matches: g.fixtures.iter().map(match_output).collect(),
                })
                .collect(),
        }
    }
}

fn match_output(f: &MatchFixture) -> MatchOutput {
    let team = |players: &[Player; 2], score| TeamOutput {
        player_one: players[0].id.clone(),
        player_two: players[1].id.clone(),
        score,
    };
    MatchOutput {
        match_id: f.id.clone(),
        team_one: team(&f.team_one, f.score_one),
        team_two: team(&f.team_two, f.score_two),
        sitting_player: f.sitting_player.as_ref().map(|p| p.id.clone()),
        time: f.scheduled_time.format("%H:%M").to_string(),
        court: f.court.clone(),
    }
}

// Nested league document (rounds -> groups -> matches). The standings
// aggregator reads this shape back.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRoundPayload {
    pub league_id: String,
    pub league_name: String,
    pub rounds: Vec<RoundItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundItem {
    pub round_id: String,
    pub group: Vec<GroupItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupItem {
    pub group_id: String,
    pub group_name: String,
    #[serde(rename = "match")]
    pub matches: Vec<MatchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchItem {
    pub match_id: String,
    pub team_one: TeamItem,
    pub team_two: TeamItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitting_player: Option<TeamMember>,
    pub time: String,
    pub court_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamItem {
    pub team_id: String,
    pub team_name: String,
    pub player_one: TeamMember,
    pub player_two: TeamMember,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl From<&Player> for TeamMember {
    fn from(p: &Player) -> Self {
        Self {
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            email: p.contact_key().to_string(),
            name: p.display_name.clone(),
        }
    }
}

impl LeagueRoundPayload {
    pub fn build(
        league_id: impl Into<String>,
        league_name: impl Into<String>,
        date: NaiveDate,
        rounds: &[&Round],
    ) -> Self {
        Self {
            league_id: league_id.into(),
            league_name: league_name.into(),
            rounds: rounds
                .iter()
                .filter(|r| !r.is_empty())
                .map(|r| RoundItem {
                    round_id: r.round_id.clone(),
                    group: r
                        .groups
                        .iter()
                        .map(|g| GroupItem {
                            group_id: format!("G{}", g.level),
                            group_name: format!("Group {}", g.level),
                            matches: g.fixtures.iter().map(|f| match_item(f, date)).collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Unreported scores go out as 0 with no status; a scored fixture is marked
/// completed so a 0-0 result still counts downstream.
fn match_item(f: &MatchFixture, date: NaiveDate) -> MatchItem {
    let team = |suffix: u8, players: &[Player; 2], score: Option<u32>| TeamItem {
        team_id: format!("{}-t{suffix}", f.id),
        team_name: format!("Team {suffix}"),
        player_one: TeamMember::from(&players[0]),
        player_two: TeamMember::from(&players[1]),
        score: score.unwrap_or(0),
    };
    MatchItem {
        match_id: f.id.clone(),
        team_one: team(1, &f.team_one, f.score_one),
        team_two: team(2, &f.team_two, f.score_two),
        sitting_player: f.sitting_player.as_ref().map(TeamMember::from),
        time: format!("{}T{}", date.format("%Y-%m-%d"), f.scheduled_time.format("%H:%M:%S")),
        court_number: f.court.clone(),
        match_status: f.is_scored().then(|| "completed".to_string()),
    }
}
