//! Score submission by match id, for callers that do not know which stage a match belongs to.

use crate::logic::bracket::record_knockout_score;
use crate::logic::groups::record_group_score;
use crate::models::{Tournament, TournamentError};

/// Record a score for any match: group matches are looked up first, then knockout matches.
pub fn record_score(
    tournament: &mut Tournament,
    match_id: &str,
    home: i64,
    away: i64,
) -> Result<(), TournamentError> {
    if tournament.find_group_match(match_id).is_some() {
        record_group_score(tournament, match_id, home, away).map(|_| ())
    } else {
        record_knockout_score(tournament, match_id, home, away)
    }
}
