//! 2v2 team reshuffling: teams are dissolved into individuals and re-paired between
//! the group stage and the bracket, and again between knockout rounds.

use crate::logic::groups::pair_into_teams;
use crate::models::{Entrant, KnockoutMatch, Tournament, TournamentError, TournamentStage};
use rand::Rng;
use std::collections::HashSet;

/// Attempts at finding pairs that never played together before settling for a repeat.
pub const MAX_RESHUFFLE_ATTEMPTS: usize = 50;

/// Break teams back into their individuals, in team order.
pub fn dissolve(teams: &[Entrant]) -> Vec<String> {
    teams.iter().flat_map(Entrant::individuals).collect()
}

/// Dissolve `teams`, shuffle the individuals, and pair them into new teams.
pub fn reshuffle<R: Rng + ?Sized>(teams: &[Entrant], rng: &mut R) -> Vec<Entrant> {
    pair_into_teams(&dissolve(teams), rng)
}

/// Like [`reshuffle`], retrying up to `attempts` times to avoid recreating any team in
/// `previous` (keys from [`Entrant::pairing_key`]). Falls back to the last draw.
pub fn reshuffle_avoiding<R: Rng + ?Sized>(
    teams: &[Entrant],
    previous: &HashSet<Vec<String>>,
    attempts: usize,
    rng: &mut R,
) -> Vec<Entrant> {
    let mut candidate = reshuffle(teams, rng);
    for attempt in 1..attempts {
        let repeats = candidate
            .iter()
            .filter(|t| t.is_team() && previous.contains(&t.pairing_key()))
            .count();
        if repeats == 0 {
            return candidate;
        }
        log::debug!("Reshuffle attempt {attempt}: {repeats} repeated pair(s), drawing again");
        candidate = reshuffle(teams, rng);
    }
    if candidate
        .iter()
        .any(|t| t.is_team() && previous.contains(&t.pairing_key()))
    {
        log::warn!("No fresh pairing found in {attempts} attempts; keeping a repeated pair");
    }
    candidate
}

/// 2v2: once every match of the current round has a winner (byes included), pair the
/// winning players into new teams for the next round. After the semi-finals the losing
/// players are re-paired into the third-place match as well.
pub fn generate_next_round<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if !tournament.is_paired() {
        return Err(TournamentError::PairedFormatOnly);
    }
    tournament.expect_stage(TournamentStage::Knockout, "generate the next round")?;

    let current_round = tournament
        .knockout_matches
        .iter()
        .filter(|m| !m.is_third_place())
        .map(|m| m.round)
        .max()
        .ok_or(TournamentError::BracketComplete)?;
    let current: Vec<&KnockoutMatch> = tournament
        .knockout_matches
        .iter()
        .filter(|m| !m.is_third_place() && m.round == current_round)
        .collect();
    // Byes carry a winner without a score.
    if !current.iter().all(|m| m.winner.is_some()) {
        return Err(TournamentError::RoundIncomplete);
    }

    let winners: Vec<Entrant> = current.iter().filter_map(|m| m.winner.clone()).collect();
    if winners.len() < 2 {
        return Err(TournamentError::BracketComplete);
    }
    let losers: Vec<Entrant> = current.iter().filter_map(|m| m.loser().cloned()).collect();
    let semi_finals = current.len() == 2;

    let next_round = current_round + 1;
    let teams = reshuffle(&winners, rng);
    let mut new_matches: Vec<KnockoutMatch> = teams
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            KnockoutMatch::new(next_round, i as u32, Some(pair[0].clone()), Some(pair[1].clone()))
        })
        .collect();

    if semi_finals {
        let consolation = reshuffle(&losers, rng);
        if let [home, away] = consolation.as_slice() {
            new_matches.push(KnockoutMatch::third_place(
                next_round,
                Some(home.clone()),
                Some(away.clone()),
            ));
        }
    }

    log::info!(
        "Tournament {}: round {next_round} drawn with {} reshuffled match(es)",
        tournament.id,
        new_matches.len()
    );
    tournament.knockout_matches.extend(new_matches);
    tournament.touch();
    Ok(())
}
