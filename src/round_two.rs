use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SlottingConfig;
use crate::error::SlottingError;
use crate::fixtures::{FIVE_PLAYER_PATTERN, GroupFixtures, MatchFixture, Round, seat_fixtures};
use crate::grouping::Group;
use crate::roster::Player;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub player: Player,
    pub round_points: u32,
}

pub fn can_generate_round_two(round_one: &Round) -> bool {
    round_one.is_complete()
}

/// Sum each player's team score over the fixtures they played in.
/// Every group member starts at zero, so sitters and no-shows still rank.
pub fn points_by_player(players: &[Player], fixtures: &[MatchFixture]) -> HashMap<String, u32> {
    let mut points: HashMap<String, u32> = players.iter().map(|p| (p.id.clone(), 0)).collect();
    for fixture in fixtures {
        for (player, score) in fixture.player_scores() {
            let total = points.entry(player.id.clone()).or_insert(0);
            *total = total.saturating_add(score.unwrap_or(0));
        }
    }
    points
}

/// Rank a group by round points, then by rating, both descending.
pub fn rerank_group(group: &Group, fixtures: &[MatchFixture]) -> Vec<RankedPlayer> {
    let points = points_by_player(&group.players, fixtures);
    let mut ranked: Vec<RankedPlayer> = group
        .players
        .iter()
        .map(|p| RankedPlayer {
            round_points: points.get(&p.id).copied().unwrap_or(0),
            player: p.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.round_points
            .cmp(&a.round_points)
            .then_with(|| b.player.rating.total_cmp(&a.player.rating))
    });
    ranked
}

/// Reseed every 5-player group from its round-1 results and seat the new
/// ranking into the first match of the 5-player pattern.
///
/// Refuses until every round-1 fixture carries both scores. Groups of 4 are
/// not carried into round 2.
pub fn generate_round_two(
    groups: &[Group],
    round_one: &Round,
    cfg: &SlottingConfig,
) -> Result<Round, SlottingError> {
    if round_one.is_empty() {
        return Err(SlottingError::RoundNotStarted);
    }
    let unscored = round_one.unscored_fixture_ids();
    if !unscored.is_empty() {
        return Err(SlottingError::RoundIncomplete { unscored });
    }

    let seats = &FIVE_PLAYER_PATTERN[..1];
    let out: Vec<GroupFixtures> = groups
        .iter()
        .filter(|g| g.len() == 5)
        .map(|group| {
            let ranked: Vec<Player> = rerank_group(group, round_one.fixtures_for_level(group.level))
                .into_iter()
                .map(|r| r.player)
                .collect();
            GroupFixtures {
                level: group.level,
                fixtures: seat_fixtures(group.level, 2, &ranked, seats, cfg.round_two_start, cfg),
            }
        })
        .collect();

    tracing::debug!(groups = out.len(), "generated round 2");
    Ok(Round::new(2, out))
}
