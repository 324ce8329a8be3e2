//! Entrant and Standing data structures.

use serde::{Deserialize, Serialize};

/// Separator used when synthesizing a team name from its two members.
pub const TEAM_SEPARATOR: &str = " + ";

/// A competitor unit: an individual (1v1) or a synthesized two-person team (2v2).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub name: String,
    /// Individuals making up a team. Empty for a solo entrant.
    #[serde(default)]
    pub members: Vec<String>,
    /// Position in registration order; last tie-break for standings.
    #[serde(default)]
    pub registration: usize,
}

impl Entrant {
    /// A single individual.
    pub fn solo(name: impl Into<String>, registration: usize) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            registration,
        }
    }

    /// A two-person team named "first + second".
    pub fn team(first: impl Into<String>, second: impl Into<String>, registration: usize) -> Self {
        let first = first.into();
        let second = second.into();
        Self {
            name: format!("{first}{TEAM_SEPARATOR}{second}"),
            members: vec![first, second],
            registration,
        }
    }

    /// Whether this entrant was built from two individuals.
    pub fn is_team(&self) -> bool {
        self.members.len() > 1
    }

    /// The individuals behind this entrant.
    ///
    /// Uses the stored members when present and falls back to splitting the
    /// synthesized "A + B" name otherwise.
    pub fn individuals(&self) -> Vec<String> {
        if !self.members.is_empty() {
            return self.members.clone();
        }
        self.name
            .split(TEAM_SEPARATOR)
            .map(str::to_string)
            .collect()
    }

    /// Membership as an order-independent key, for comparing pairings.
    pub fn pairing_key(&self) -> Vec<String> {
        let mut key = self.individuals();
        key.sort();
        key
    }
}

/// Aggregate group-stage statistics for one entrant. Always derived from the
/// group's match list, never edited directly.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub registration: usize,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    /// Totals are wider than a single score so a group of large results cannot overflow.
    pub goals_for: u64,
    pub goals_against: u64,
    pub goal_difference: i64,
    pub points: u32,
    /// 1-based rank within the group, set once the table is sorted.
    pub rank: Option<usize>,
}

impl Standing {
    /// An empty line for `entrant`.
    pub fn new(entrant: &Entrant) -> Self {
        Self {
            name: entrant.name.clone(),
            registration: entrant.registration,
            ..Self::default()
        }
    }

    /// Record one played match from this entrant's point of view.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for = self.goals_for.saturating_add(u64::from(scored));
        self.goals_against = self.goals_against.saturating_add(u64::from(conceded));
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                self.points += 3;
            }
            std::cmp::Ordering::Equal => {
                self.drawn += 1;
                self.points += 1;
            }
            std::cmp::Ordering::Less => self.lost += 1,
        }
        self.goal_difference = signed(self.goals_for).saturating_sub(signed(self.goals_against));
    }
}

fn signed(total: u64) -> i64 {
    i64::try_from(total).unwrap_or(i64::MAX)
}
