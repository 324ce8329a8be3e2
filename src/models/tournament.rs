//! Tournament aggregate, its lifecycle stage and format.

use crate::models::entrant::Entrant;
use crate::models::game::{GroupMatch, KnockoutMatch, MatchId};
use crate::models::group::Group;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Broad category of a [`TournamentError`], used by callers to pick a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed input; nothing was changed.
    Validation,
    /// Operation invoked out of sequence; nothing was changed.
    Precondition,
    /// Referenced tournament or match does not exist.
    NotFound,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TournamentError {
    #[error("Need at least {required} entrants (got {actual})")]
    NotEnoughEntrants { required: usize, actual: usize },
    #[error("Entrant names cannot be empty")]
    EmptyEntrantName,
    /// Names are unique, case-insensitive.
    #[error("An entrant named {0:?} already exists")]
    DuplicateEntrantName(String),
    #[error("A 2v2 tournament needs an even number of entrants (got {0})")]
    OddEntrantCount(usize),
    #[error("Cannot split {entities} entrants into {requested} groups")]
    InvalidGroupCount { requested: usize, entities: usize },
    #[error("Scores cannot be negative")]
    NegativeScore,
    #[error("Scores cannot exceed {max} goals")]
    ScoreOutOfRange { max: u32 },
    #[error("Knockout matches cannot end in a draw")]
    DrawNotAllowed,
    #[error("A bracket needs at least one qualifier (got {0})")]
    InvalidBracketSize(usize),
    #[error("Not all group matches have been played")]
    IncompleteGroupStage,
    #[error("Cannot {action} while the tournament is in the {stage} stage")]
    InvalidStage {
        action: &'static str,
        stage: TournamentStage,
    },
    #[error("The bracket cannot be redrawn once a knockout match has been played")]
    KnockoutAlreadyStarted,
    #[error("Match {0} does not have both sides decided yet")]
    MatchNotReady(MatchId),
    /// A different winner would invalidate matches already filled from this result.
    #[error("Match {0} already has a winner; a correction may not change it")]
    WinnerLocked(MatchId),
    #[error("The current knockout round is not finished")]
    RoundIncomplete,
    #[error("The final has already been generated")]
    BracketComplete,
    #[error("This action is only available in 2v2 tournaments")]
    PairedFormatOnly,
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),
    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            NotEnoughEntrants { .. }
            | EmptyEntrantName
            | DuplicateEntrantName(_)
            | OddEntrantCount(_)
            | InvalidGroupCount { .. }
            | NegativeScore
            | ScoreOutOfRange { .. }
            | DrawNotAllowed
            | InvalidBracketSize(_) => ErrorKind::Validation,
            IncompleteGroupStage
            | InvalidStage { .. }
            | KnockoutAlreadyStarted
            | MatchNotReady(_)
            | WinnerLocked(_)
            | RoundIncomplete
            | BracketComplete
            | PairedFormatOnly => ErrorKind::Precondition,
            MatchNotFound(_) | TournamentNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament. Transitions only move forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStage {
    /// Round-robin groups are being played.
    #[default]
    Groups,
    /// Qualifiers drawn into the bracket; knockout matches in progress.
    Knockout,
    /// Final (and third-place match, when there is one) decided.
    Finished,
}

impl fmt::Display for TournamentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TournamentStage::Groups => "groups",
            TournamentStage::Knockout => "knockout",
            TournamentStage::Finished => "finished",
        })
    }
}

/// Solo (1v1) or paired (2v2) play.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum TournamentFormat {
    #[default]
    #[serde(rename = "1v1")]
    Solo,
    /// Entrants are paired into teams, and teams are reshuffled between stages.
    #[serde(rename = "2v2")]
    Paired,
}

/// Full tournament state: entrants, groups, bracket, and outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    /// Registered individuals, in registration order.
    pub entrants: Vec<String>,
    pub groups: Vec<Group>,
    /// Entrants drawn into the bracket (reshuffled teams in 2v2).
    pub qualifiers: Vec<Entrant>,
    pub knockout_matches: Vec<KnockoutMatch>,
    pub winner: Option<Entrant>,
    pub third_place: Option<Entrant>,
    pub stage: TournamentStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Empty tournament in the groups stage; see `create_tournament` for the validated entry point.
    pub fn new(name: impl Into<String>, format: TournamentFormat, entrants: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            entrants,
            groups: Vec::new(),
            qualifiers: Vec::new(),
            knockout_matches: Vec::new(),
            winner: None,
            third_place: None,
            stage: TournamentStage::Groups,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_paired(&self) -> bool {
        self.format == TournamentFormat::Paired
    }

    /// Refresh `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Require a given stage before `action`.
    pub fn expect_stage(
        &self,
        stage: TournamentStage,
        action: &'static str,
    ) -> Result<(), TournamentError> {
        if self.stage != stage {
            return Err(TournamentError::InvalidStage {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    /// Locate a group match: (group index, match index).
    pub fn find_group_match(&self, match_id: &str) -> Option<(usize, usize)> {
        self.groups.iter().enumerate().find_map(|(g, group)| {
            group
                .matches
                .iter()
                .position(|m| m.id == match_id)
                .map(|m| (g, m))
        })
    }

    pub fn group_match(&self, match_id: &str) -> Option<&GroupMatch> {
        self.find_group_match(match_id)
            .map(|(g, m)| &self.groups[g].matches[m])
    }

    pub fn knockout_match_position(&self, match_id: &str) -> Option<usize> {
        self.knockout_matches.iter().position(|m| m.id == match_id)
    }

    pub fn third_place_match(&self) -> Option<&KnockoutMatch> {
        self.knockout_matches.iter().find(|m| m.is_third_place())
    }

    pub fn all_group_matches_played(&self) -> bool {
        self.groups.iter().all(Group::is_complete)
    }

    pub fn any_knockout_played(&self) -> bool {
        self.knockout_matches.iter().any(KnockoutMatch::is_played)
    }

    /// Number of group-stage entities (teams in 2v2).
    pub fn entity_count(&self) -> usize {
        self.groups.iter().map(|g| g.entrants.len()).sum()
    }
}
