//! Data structures for the football tournament: entrants, groups, matches, tournament state.

mod entrant;
mod game;
mod group;
mod tournament;

pub use entrant::{Entrant, Standing, TEAM_SEPARATOR};
pub use game::{GroupMatch, KnockoutKind, KnockoutMatch, MatchId, Score, Side, THIRD_PLACE_PREFIX};
pub use group::Group;
pub use tournament::{
    ErrorKind, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStage,
};
