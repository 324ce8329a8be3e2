//! Qualification: closing the group stage and choosing who advances to the bracket.

use crate::logic::bracket::generate_bracket;
use crate::logic::reshuffle::{reshuffle_avoiding, MAX_RESHUFFLE_ATTEMPTS};
use crate::logic::standings::{compare_standings, refresh_standings};
use crate::models::{Entrant, Group, Standing, Tournament, TournamentError, TournamentStage};
use rand::Rng;
use std::collections::HashSet;

/// Smallest bracket the policy will cut down to.
const MIN_TARGET: usize = 4;

/// How many entities advance out of `entities` spread over `groups` groups.
///
/// Fixed policy: up to 8 entities → 4, up to 16 → 8, otherwise 16 from 24 upwards and 8
/// below. The target is then halved (not below 4) while more than one group would see
/// every one of its entities qualify. Nine entities in three groups therefore get 4.
pub fn qualifier_target(entities: usize, groups: usize) -> usize {
    let mut target = if entities <= 8 {
        4
    } else if entities <= 16 {
        8
    } else if entities >= 24 {
        16
    } else {
        8
    };
    while target > MIN_TARGET && target > (entities + 1).saturating_sub(groups) {
        target /= 2;
    }
    target
}

/// Pick qualifiers from finished groups, refreshing each group's table on the way.
///
/// When the target splits evenly over the groups, each group sends its top `target / groups`.
/// Otherwise every group sends its top `floor(target / groups)` and the remaining places go
/// to the best of everybody else, ranked like a table.
pub fn select_qualifiers(groups: &mut [Group]) -> Vec<Entrant> {
    if groups.is_empty() {
        return Vec::new();
    }
    let entities: usize = groups.iter().map(|g| g.entrants.len()).sum();
    let target = qualifier_target(entities, groups.len());
    let per_group = target / groups.len();

    let mut qualified: Vec<Entrant> = Vec::with_capacity(target);
    let mut pool: Vec<(Standing, Entrant)> = Vec::new();
    for group in groups.iter_mut() {
        let table = refresh_standings(group).to_vec();
        for (i, standing) in table.into_iter().enumerate() {
            let Some(entrant) = group.entrant(&standing.name).cloned() else {
                continue;
            };
            if i < per_group {
                qualified.push(entrant);
            } else {
                pool.push((standing, entrant));
            }
        }
    }

    if target % groups.len() != 0 {
        let needed = target.saturating_sub(qualified.len());
        pool.sort_by(|(a, _), (b, _)| compare_standings(a, b));
        qualified.extend(pool.into_iter().take(needed).map(|(_, e)| e));
    }

    qualified.truncate(target);
    log::info!(
        "{} of {entities} entities qualify (target {target}, {} groups)",
        qualified.len(),
        groups.len()
    );
    qualified
}

/// Close the group stage: pick qualifiers, reshuffle teams in 2v2, and draw the bracket.
///
/// Requires every group match to be played. In 2v2 only the first knockout round is drawn.
pub fn complete_group_stage<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    tournament.expect_stage(TournamentStage::Groups, "complete the group stage")?;
    if !tournament.all_group_matches_played() {
        return Err(TournamentError::IncompleteGroupStage);
    }

    let mut groups = tournament.groups.clone();
    let mut qualifiers = select_qualifiers(&mut groups);

    if tournament.is_paired() {
        log::info!("2v2: dissolving {} qualified teams and drawing new pairs", qualifiers.len());
        let previous: HashSet<Vec<String>> = groups
            .iter()
            .flat_map(|g| g.entrants.iter().map(Entrant::pairing_key))
            .collect();
        qualifiers = reshuffle_avoiding(&qualifiers, &previous, MAX_RESHUFFLE_ATTEMPTS, rng);
    }

    let matches = generate_bracket(&qualifiers, tournament.is_paired(), rng)?;

    tournament.groups = groups;
    tournament.qualifiers = qualifiers;
    tournament.knockout_matches = matches;
    tournament.stage = TournamentStage::Knockout;
    tournament.touch();
    log::info!(
        "Tournament {}: group stage complete, {} knockout matches drawn",
        tournament.id,
        tournament.knockout_matches.len()
    );
    Ok(())
}
