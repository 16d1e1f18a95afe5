use serde::{Deserialize, Serialize};

use crate::config::SlottingConfig;
use crate::error::SlottingError;
use crate::fixtures::{MatchFixture, Round, ScoreReport, generate_round_one};
use crate::grouping::{Partition, partition_groups};
use crate::payload::LeagueRoundPayload;
use crate::roster::Player;
use crate::round_two::generate_round_two;

/// One league day: the partition, round 1, and round 2 once it exists.
///
/// Every transition returns a `Result` instead of mutating silently; callers
/// serialize "report score" then "generate round 2" for a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlottingDay {
    pub config: SlottingConfig,
    pub partition: Partition,
    pub round_one: Round,
    #[serde(default)]
    pub round_two: Option<Round>,
}

impl SlottingDay {
    pub fn new(roster: &[Player], config: SlottingConfig) -> Self {
        let partition = partition_groups(roster);
        let round_one = generate_round_one(&partition.groups, &config);
        tracing::info!(
            players = roster.len(),
            groups = partition.groups.len(),
            fixtures = round_one.fixtures().count(),
            "slotted league day"
        );
        Self {
            config,
            partition,
            round_one,
            round_two: None,
        }
    }

    /// Scores go to whichever round owns the match id.
    pub fn report_score(&mut self, report: &ScoreReport) -> Result<&MatchFixture, SlottingError> {
        let in_round_two = self
            .round_two
            .as_ref()
            .is_some_and(|r| r.fixture(&report.match_id).is_some());
        match self.round_two.as_mut() {
            Some(round) if in_round_two => round.report_score(report),
            _ => self.round_one.report_score(report),
        }
    }

    pub fn can_generate_round_two(&self) -> bool {
        self.round_one.is_complete()
    }

    /// Build round 2 from the finished round 1. Regenerating replaces any
    /// previous round 2.
    pub fn generate_round_two(&mut self) -> Result<&Round, SlottingError> {
        let round = generate_round_two(&self.partition.groups, &self.round_one, &self.config)?;
        Ok(&*self.round_two.insert(round))
    }

    pub fn rounds(&self) -> Vec<&Round> {
        std::iter::once(&self.round_one)
            .chain(self.round_two.as_ref())
            .collect()
    }

    pub fn to_payload(&self, league_id: &str, league_name: &str) -> LeagueRoundPayload {
        LeagueRoundPayload::build(league_id, league_name, self.config.date, &self.rounds())
    }
}
