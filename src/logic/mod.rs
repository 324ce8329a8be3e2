//! Tournament business logic: setup, group stage, qualification, knockout bracket, 2v2 reshuffles.

mod bracket;
mod groups;
mod qualification;
mod reshuffle;
mod scoring;
mod setup;
mod standings;

pub use bracket::{generate_bracket, record_knockout_score, redraw_bracket, total_rounds};
pub use groups::{
    auto_group_count, pair_into_teams, partition_into_groups, record_group_score, TARGET_GROUP_SIZE,
};
pub use qualification::{complete_group_stage, qualifier_target, select_qualifiers};
pub use reshuffle::{
    dissolve, generate_next_round, reshuffle, reshuffle_avoiding, MAX_RESHUFFLE_ATTEMPTS,
};
pub use scoring::record_score;
pub use setup::{create_tournament, validate_entrants, NewTournament, MIN_ENTRANTS};
pub use standings::{compare_standings, compute_standings, refresh_standings};
