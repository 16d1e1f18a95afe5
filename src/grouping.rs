use serde::{Deserialize, Serialize};

use crate::roster::Player;

/// A skill tier. Level 1 holds the highest-rated players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub level: u32,
    /// Descending by rating at creation time; index is the seat rank.
    pub players: Vec<Player>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionLayout {
    Empty,
    Balanced {
        groups_of_five: usize,
        groups_of_four: usize,
    },
    /// No 5a + 4b split exists; everyone shares one group of arbitrary size.
    SingleGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub groups: Vec<Group>,
    pub layout: PartitionLayout,
}

impl Partition {
    pub fn is_degenerate(&self) -> bool {
        matches!(self.layout, PartitionLayout::SingleGroup)
    }
}

/// Largest count of 5-groups such that the remainder splits into 4-groups.
pub fn split_sizes(n: usize) -> Option<(usize, usize)> {
    (0..=n / 5)
        .rev()
        .find(|fives| (n - 5 * fives) % 4 == 0)
        .map(|fives| (fives, (n - 5 * fives) / 4))
}

/// Sort the roster by rating and cut it into contiguous groups of 5, then 4.
///
/// Ties keep their input order, so a fixed roster always yields the same
/// groups and levels.
pub fn partition_groups(roster: &[Player]) -> Partition {
    if roster.is_empty() {
        return Partition {
            groups: Vec::new(),
            layout: PartitionLayout::Empty,
        };
    }

    let mut sorted = roster.to_vec();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let Some((fives, fours)) = split_sizes(sorted.len()) else {
        tracing::warn!(
            players = sorted.len(),
            "roster size has no 4/5 split; using a single group"
        );
        return Partition {
            groups: vec![Group {
                level: 1,
                players: sorted,
            }],
            layout: PartitionLayout::SingleGroup,
        };
    };

    let sizes = std::iter::repeat_n(5, fives).chain(std::iter::repeat_n(4, fours));
    let mut remaining = sorted.into_iter();
    let groups: Vec<Group> = sizes
        .zip(1u32..)
        .map(|(size, level)| Group {
            level,
            players: remaining.by_ref().take(size).collect(),
        })
        .collect();

    tracing::debug!(
        groups_of_five = fives,
        groups_of_four = fours,
        "partitioned roster"
    );
    Partition {
        groups,
        layout: PartitionLayout::Balanced {
            groups_of_five: fives,
            groups_of_four: fours,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sizes_prefers_fives() {
        assert_eq!(split_sizes(0), Some((0, 0)));
        assert_eq!(split_sizes(4), Some((0, 1)));
        assert_eq!(split_sizes(9), Some((1, 1)));
        assert_eq!(split_sizes(16), Some((0, 4)));
        assert_eq!(split_sizes(17), Some((1, 3)));
        assert_eq!(split_sizes(18), Some((2, 2)));
        assert_eq!(split_sizes(20), Some((4, 0)));
    }

    #[test]
    fn split_sizes_has_no_answer_for_small_odd_rosters() {
        for n in [1, 2, 3, 6, 7, 11] {
            assert_eq!(split_sizes(n), None, "n = {n}");
        }
        for n in 12..200 {
            assert!(split_sizes(n).is_some(), "n = {n}");
        }
    }
}
