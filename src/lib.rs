//! Football tournament web app: library with models and business logic.

pub mod config;
pub mod export;
pub mod logic;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use export::standings_csv;
pub use logic::{
    complete_group_stage, create_tournament, generate_bracket, generate_next_round,
    partition_into_groups, record_group_score, record_knockout_score, record_score,
    redraw_bracket, select_qualifiers, NewTournament,
};
pub use models::{
    Entrant, ErrorKind, Group, GroupMatch, KnockoutKind, KnockoutMatch, MatchId, Score, Standing,
    Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStage,
};
pub use store::{MemoryStore, TournamentStore};
