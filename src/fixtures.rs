use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::config::SlottingConfig;
use crate::error::SlottingError;
use crate::grouping::Group;
use crate::roster::Player;

/// One match of an abstract schedule, expressed in seat ranks
/// (0 = strongest player of the group).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seating {
    pub team_one: [usize; 2],
    pub team_two: [usize; 2],
    pub sitting: Option<usize>,
}

const fn seat(team_one: [usize; 2], team_two: [usize; 2], sitting: Option<usize>) -> Seating {
    Seating {
        team_one,
        team_two,
        sitting,
    }
}

/// Five matches; every rank sits out exactly once.
pub const FIVE_PLAYER_PATTERN: [Seating; 5] = [
    seat([0, 3], [1, 2], Some(4)),
    seat([0, 1], [2, 4], Some(3)),
    seat([1, 4], [2, 3], Some(0)),
    seat([0, 2], [3, 4], Some(1)),
    seat([0, 4], [1, 3], Some(2)),
];

/// Three matches; every pair of ranks partners exactly once.
pub const FOUR_PLAYER_PATTERN: [Seating; 3] = [
    seat([0, 1], [2, 3], None),
    seat([0, 2], [1, 3], None),
    seat([0, 3], [1, 2], None),
];

pub fn seat_pattern(group_size: usize) -> Option<&'static [Seating]> {
    match group_size {
        5 => Some(&FIVE_PLAYER_PATTERN),
        4 => Some(&FOUR_PLAYER_PATTERN),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchFixture {
    pub id: String,
    pub team_one: [Player; 2],
    pub team_two: [Player; 2],
    pub sitting_player: Option<Player>,
    pub score_one: Option<u32>,
    pub score_two: Option<u32>,
    pub scheduled_time: NaiveTime,
    pub court: String,
}

impl MatchFixture {
    pub fn is_scored(&self) -> bool {
        self.score_one.is_some() && self.score_two.is_some()
    }

    /// Each on-court player paired with the score of the team they played on.
    pub fn player_scores(&self) -> impl Iterator<Item = (&Player, Option<u32>)> + '_ {
        self.team_one
            .iter()
            .map(|p| (p, self.score_one))
            .chain(self.team_two.iter().map(|p| (p, self.score_two)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFixtures {
    pub level: u32,
    pub fixtures: Vec<MatchFixture>,
}

/// A round's structure is fixed at creation; only fixture scores change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round_id: String,
    pub number: u32,
    pub groups: Vec<GroupFixtures>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub match_id: String,
    pub score_team_1: u32,
    pub score_team_2: u32,
}

impl Round {
    pub fn new(number: u32, groups: Vec<GroupFixtures>) -> Self {
        Self {
            round_id: format!("R{number}"),
            number,
            groups,
        }
    }

    pub fn fixtures(&self) -> impl Iterator<Item = &MatchFixture> + '_ {
        self.groups.iter().flat_map(|g| g.fixtures.iter())
    }

    pub fn fixtures_for_level(&self, level: u32) -> &[MatchFixture] {
        self.groups
            .iter()
            .find(|g| g.level == level)
            .map(|g| g.fixtures.as_slice())
            .unwrap_or_default()
    }

    pub fn fixture(&self, match_id: &str) -> Option<&MatchFixture> {
        self.fixtures().find(|f| f.id == match_id)
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures().next().is_none()
    }

    /// True iff the round has fixtures and every one of them is scored.
    pub fn is_complete(&self) -> bool {
        !self.is_empty() && self.fixtures().all(MatchFixture::is_scored)
    }

    pub fn unscored_fixture_ids(&self) -> Vec<String> {
        self.fixtures()
            .filter(|f| !f.is_scored())
            .map(|f| f.id.clone())
            .collect()
    }

    /// Record both sides of a result. A fixture accepts exactly one report.
    pub fn report_score(&mut self, report: &ScoreReport) -> Result<&MatchFixture, SlottingError> {
        let fixture = self
            .groups
            .iter_mut()
            .flat_map(|g| g.fixtures.iter_mut())
            .find(|f| f.id == report.match_id)
            .ok_or_else(|| SlottingError::UnknownMatch(report.match_id.clone()))?;
        if fixture.score_one.is_some() || fixture.score_two.is_some() {
            return Err(SlottingError::AlreadyScored(report.match_id.clone()));
        }
        fixture.score_one = Some(report.score_team_1);
        fixture.score_two = Some(report.score_team_2);
        tracing::debug!(
            match_id = %report.match_id,
            score_one = report.score_team_1,
            score_two = report.score_team_2,
            "recorded score"
        );
        Ok(fixture)
    }
}

pub fn fixture_id(level: u32, round: u32, index: usize) -> String {
    format!("g{level}-r{round}-m{index}")
}

/// Lay `seats` over an already ranked roster.
///
/// Fixtures are spaced `slot_minutes` apart from `start`, all on the
/// configured court, with scores unset.
pub(crate) fn seat_fixtures(
    level: u32,
    round: u32,
    ranked: &[Player],
    seats: &[Seating],
    start: NaiveTime,
    cfg: &SlottingConfig,
) -> Vec<MatchFixture> {
    let pick = |rank: usize| ranked[rank].clone();
    seats
        .iter()
        .enumerate()
        .map(|(idx, s)| MatchFixture {
            id: fixture_id(level, round, idx + 1),
            team_one: s.team_one.map(pick),
            team_two: s.team_two.map(pick),
            sitting_player: s.sitting.map(pick),
            score_one: None,
            score_two: None,
            scheduled_time: start + cfg.slot_offset(idx),
            court: cfg.court.clone(),
        })
        .collect()
}

/// Seat ranks are recomputed from rating so an out-of-order group still runs
/// the canonical schedule. Ties keep their stored order.
pub(crate) fn rank_by_rating(group: &Group) -> Vec<Player> {
    let mut ranked = group.players.clone();
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ranked
}

pub fn round_one_fixtures(
    group: &Group,
    cfg: &SlottingConfig,
) -> Result<Vec<MatchFixture>, SlottingError> {
    let seats = seat_pattern(group.len()).ok_or(SlottingError::UnsupportedGroupSize {
        level: group.level,
        size: group.len(),
    })?;
    let ranked = rank_by_rating(group);
    Ok(seat_fixtures(
        group.level,
        1,
        &ranked,
        seats,
        cfg.round_one_start,
        cfg,
    ))
}

/// Round 1 for every group. Groups without a seat pattern (the degenerate
/// single-group fallback) get no fixtures.
pub fn generate_round_one(groups: &[Group], cfg: &SlottingConfig) -> Round {
    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        match round_one_fixtures(group, cfg) {
            Ok(fixtures) => out.push(GroupFixtures {
                level: group.level,
                fixtures,
            }),
            Err(err) => tracing::warn!(level = group.level, "skipping group: {err}"),
        }
    }
    Round::new(1, out)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn pairs(team: [usize; 2]) -> (usize, usize) {
        (team[0].min(team[1]), team[0].max(team[1]))
    }

    #[test]
    fn five_pattern_sits_each_rank_once() {
        let sitters: HashSet<usize> = FIVE_PLAYER_PATTERN
            .iter()
            .filter_map(|s| s.sitting)
            .collect();
        assert_eq!(sitters, (0..5).collect());
        for s in FIVE_PLAYER_PATTERN {
            let mut seats: Vec<usize> = s.team_one.iter().chain(&s.team_two).copied().collect();
            seats.extend(s.sitting);
            seats.sort_unstable();
            assert_eq!(seats, [0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn four_pattern_partners_each_pair_once() {
        let mut seen = HashSet::new();
        for s in FOUR_PLAYER_PATTERN {
            assert!(s.sitting.is_none());
            assert!(seen.insert(pairs(s.team_one)));
            assert!(seen.insert(pairs(s.team_two)));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn fixture_ids_are_one_based() {
        assert_eq!(fixture_id(3, 1, 1), "g3-r1-m1");
        assert_eq!(fixture_id(1, 2, 5), "g1-r2-m5");
    }
}
