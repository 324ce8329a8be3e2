//! Group stage: partitioning entrants into groups and recording group match scores.

use crate::logic::standings::refresh_standings;
use crate::models::{
    Entrant, Group, Score, Standing, Tournament, TournamentError, TournamentFormat, TournamentStage,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Preferred number of entities per group when no group count is given.
pub const TARGET_GROUP_SIZE: usize = 4;

/// Shuffle individuals and pair them consecutively into teams.
///
/// An odd leftover becomes a one-person entrant; callers reject odd counts before this point.
pub fn pair_into_teams<R: Rng + ?Sized>(individuals: &[String], rng: &mut R) -> Vec<Entrant> {
    let mut pool = individuals.to_vec();
    pool.shuffle(rng);
    pool.chunks(2)
        .enumerate()
        .map(|(i, pair)| match pair {
            [first, second] => Entrant::team(first, second, i),
            [single] => Entrant::solo(single, i),
            _ => unreachable!("chunks(2) yields one or two items"),
        })
        .collect()
}

/// Number of groups for `entities` when none was requested.
///
/// Aims for groups of four. When that leaves one or two stragglers and at least three
/// full groups exist, uses fewer, slightly larger groups instead.
pub fn auto_group_count(entities: usize) -> usize {
    let full = entities / TARGET_GROUP_SIZE;
    let remainder = entities % TARGET_GROUP_SIZE;
    if full >= 3 && matches!(remainder, 1 | 2) {
        full
    } else {
        entities.div_ceil(TARGET_GROUP_SIZE).max(1)
    }
}

/// Split entrants into balanced, labelled groups with every pairing scheduled.
///
/// In paired format the individuals are first shuffled into teams. Group sizes differ by
/// at most one; the first `entities % groups` groups take the extra entity.
pub fn partition_into_groups<R: Rng + ?Sized>(
    entrants: &[String],
    group_count: Option<usize>,
    format: TournamentFormat,
    rng: &mut R,
) -> Result<Vec<Group>, TournamentError> {
    let mut entities: Vec<Entrant> = match format {
        TournamentFormat::Solo => entrants
            .iter()
            .enumerate()
            .map(|(i, name)| Entrant::solo(name, i))
            .collect(),
        TournamentFormat::Paired => pair_into_teams(entrants, rng),
    };
    let total = entities.len();

    let groups = match group_count {
        None | Some(0) => {
            let n = auto_group_count(total);
            log::info!("Automatic grouping: {total} entities -> {n} groups");
            n
        }
        Some(n) => {
            // Every group needs at least one match.
            if total / n < 2 {
                return Err(TournamentError::InvalidGroupCount {
                    requested: n,
                    entities: total,
                });
            }
            log::info!("Requested grouping: {total} entities -> {n} groups");
            n
        }
    };

    entities.shuffle(rng);

    let base = total / groups;
    let remainder = total % groups;
    let mut rest = entities.into_iter();
    Ok((0..groups)
        .map(|i| {
            let size = if i < remainder { base + 1 } else { base };
            Group::new(Group::label(i), rest.by_ref().take(size).collect())
        })
        .collect())
}

/// Record a group match score and return the group's refreshed table.
///
/// Re-submitting the stored score is a no-op. A different score overwrites the old one
/// while the tournament is still in the group stage.
pub fn record_group_score(
    tournament: &mut Tournament,
    match_id: &str,
    home: i64,
    away: i64,
) -> Result<Vec<Standing>, TournamentError> {
    let (g, m) = tournament
        .find_group_match(match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;
    let score = Score::from_submitted(home, away)?;

    if tournament.groups[g].matches[m].score == Some(score) {
        log::debug!("Group match {match_id}: identical score resubmitted, nothing to do");
        return Ok(tournament.groups[g].standings.clone());
    }
    tournament.expect_stage(TournamentStage::Groups, "record a group score")?;

    let group = &mut tournament.groups[g];
    group.matches[m].score = Some(score);
    let standings = refresh_standings(group).to_vec();
    tournament.touch();
    Ok(standings)
}
