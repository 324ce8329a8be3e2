//! Group and knockout matches.

use crate::models::entrant::Entrant;
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for a match (group or knockout).
pub type MatchId = String;

/// Id prefix that marks the third-place match.
pub const THIRD_PLACE_PREFIX: &str = "match_third_place_";

/// Final score of a played match, home side first.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    /// Most goals one side may be credited with in a single match.
    pub const MAX_GOALS: u32 = u32::MAX;

    /// Build a score from raw submitted values.
    pub fn from_submitted(home: i64, away: i64) -> Result<Self, TournamentError> {
        Ok(Self {
            home: goals(home)?,
            away: goals(away)?,
        })
    }

    pub fn is_draw(&self) -> bool {
        self.home == self.away
    }
}

fn goals(submitted: i64) -> Result<u32, TournamentError> {
    if submitted < 0 {
        return Err(TournamentError::NegativeScore);
    }
    u32::try_from(submitted).map_err(|_| TournamentError::ScoreOutOfRange {
        max: Score::MAX_GOALS,
    })
}

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

/// A round-robin match inside a group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupMatch {
    pub id: MatchId,
    pub home: String,
    pub away: String,
    /// None if not yet played.
    pub score: Option<Score>,
}

impl GroupMatch {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            id: format!("match_{}", Uuid::new_v4()),
            home: home.into(),
            away: away.into(),
            score: None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }
}

/// Whether a knockout match belongs to the main bracket or is the consolation match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutKind {
    #[default]
    Bracket,
    ThirdPlace,
}

/// A single-elimination match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnockoutMatch {
    pub id: MatchId,
    /// 0 = first knockout round.
    pub round: u32,
    /// Position within the round.
    pub index: u32,
    pub kind: KnockoutKind,
    pub home: Option<Entrant>,
    pub away: Option<Entrant>,
    pub score: Option<Score>,
    pub winner: Option<Entrant>,
}

impl KnockoutMatch {
    /// Bracket match; later rounds start with empty slots.
    pub fn new(round: u32, index: u32, home: Option<Entrant>, away: Option<Entrant>) -> Self {
        Self {
            id: format!("match_{}", Uuid::new_v4()),
            round,
            index,
            kind: KnockoutKind::Bracket,
            home,
            away,
            score: None,
            winner: None,
        }
    }

    /// Round-0 walkover; `entrant` is already the winner.
    pub fn bye(round: u32, index: u32, entrant: Entrant) -> Self {
        let mut m = Self::new(round, index, Some(entrant.clone()), None);
        m.winner = Some(entrant);
        m
    }

    /// Third-place match, sharing the final's round index.
    pub fn third_place(round: u32, home: Option<Entrant>, away: Option<Entrant>) -> Self {
        Self {
            id: format!("{THIRD_PLACE_PREFIX}{}", Uuid::new_v4()),
            round,
            index: 0,
            kind: KnockoutKind::ThirdPlace,
            home,
            away,
            score: None,
            winner: None,
        }
    }

    pub fn is_third_place(&self) -> bool {
        self.kind == KnockoutKind::ThirdPlace
    }

    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }

    /// Walkover: one entrant, no opponent, decided without a score.
    pub fn is_bye(&self) -> bool {
        self.score.is_none() && self.winner.is_some()
    }

    /// Entrant occupying `side`, if filled.
    pub fn slot(&self, side: Side) -> Option<&Entrant> {
        match side {
            Side::Home => self.home.as_ref(),
            Side::Away => self.away.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Option<Entrant> {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    /// The entrant that did not win, once played.
    pub fn loser(&self) -> Option<&Entrant> {
        let winner = self.winner.as_ref()?;
        if self.home.as_ref() == Some(winner) {
            self.away.as_ref()
        } else {
            self.home.as_ref()
        }
    }
}
