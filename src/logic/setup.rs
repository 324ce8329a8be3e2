//! Setup: validate registrations and create a tournament with its groups drawn.

use crate::logic::groups::partition_into_groups;
use crate::models::{Tournament, TournamentError, TournamentFormat};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashSet;

/// Fewest entrants a tournament can start with.
pub const MIN_ENTRANTS: usize = 4;

/// Registration request for a new tournament.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewTournament {
    #[serde(default)]
    pub name: Option<String>,
    pub entrants: Vec<String>,
    /// Explicit number of groups; chosen automatically when absent.
    #[serde(default)]
    pub group_count: Option<usize>,
    #[serde(default)]
    pub format: TournamentFormat,
}

/// Trim names and check count, emptiness, uniqueness (case-insensitive) and 2v2 parity.
pub fn validate_entrants(
    entrants: &[String],
    format: TournamentFormat,
) -> Result<Vec<String>, TournamentError> {
    let names: Vec<String> = entrants.iter().map(|n| n.trim().to_string()).collect();
    if names.len() < MIN_ENTRANTS {
        return Err(TournamentError::NotEnoughEntrants {
            required: MIN_ENTRANTS,
            actual: names.len(),
        });
    }
    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        if name.is_empty() {
            return Err(TournamentError::EmptyEntrantName);
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(TournamentError::DuplicateEntrantName(name.clone()));
        }
    }
    if format == TournamentFormat::Paired && names.len() % 2 != 0 {
        return Err(TournamentError::OddEntrantCount(names.len()));
    }
    Ok(names)
}

/// Create a tournament in the groups stage with its groups and fixtures drawn.
pub fn create_tournament<R: Rng + ?Sized>(
    request: NewTournament,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let entrants = validate_entrants(&request.entrants, request.format)?;
    let groups = partition_into_groups(&entrants, request.group_count, request.format, rng)?;
    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Tournament {}", Utc::now().format("%d/%m/%Y")));

    let mut tournament = Tournament::new(name, request.format, entrants);
    tournament.groups = groups;
    log::info!(
        "Created tournament {} ({} entrants, {} groups)",
        tournament.id,
        tournament.entrants.len(),
        tournament.groups.len()
    );
    Ok(tournament)
}
