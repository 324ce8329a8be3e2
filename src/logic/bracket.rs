//! Knockout stage: bracket generation, redraw, and result propagation.

use crate::models::{
    Entrant, KnockoutMatch, Score, Side, Tournament, TournamentError, TournamentStage,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Rounds needed for `qualifiers` entrants: ceil(log2(n)).
pub fn total_rounds(qualifiers: usize) -> u32 {
    if qualifiers <= 1 {
        0
    } else {
        usize::BITS - (qualifiers - 1).leading_zeros()
    }
}

/// Draw a single-elimination bracket from `qualifiers` in random order.
///
/// Round 0 is seeded; later rounds start empty and fill as winners advance. When the
/// count is not a power of two, round 0 is padded to the next one with byes: the bye
/// holder wins without playing and, in a full bracket, already sits in round 1. With four
/// or more qualifiers a third-place match is added at the final's round index. With
/// `single_round` only round 0 is produced (2v2, where teams change every round).
pub fn generate_bracket<R: Rng + ?Sized>(
    qualifiers: &[Entrant],
    single_round: bool,
    rng: &mut R,
) -> Result<Vec<KnockoutMatch>, TournamentError> {
    let n = qualifiers.len();
    if n == 0 {
        return Err(TournamentError::InvalidBracketSize(n));
    }
    if n == 1 {
        return Ok(Vec::new());
    }

    let size = n.next_power_of_two();
    let first_round = size / 2;
    // Even slots first, so two byes only meet in round 1 when they must.
    let bye_slots: HashSet<usize> = (0..first_round)
        .step_by(2)
        .chain((1..first_round).step_by(2))
        .take(size - n)
        .collect();

    let mut seeded = qualifiers.to_vec();
    seeded.shuffle(rng);
    let mut seeded = seeded.into_iter();

    let mut matches: Vec<KnockoutMatch> = Vec::with_capacity(size);
    for i in 0..first_round {
        let Some(home) = seeded.next() else { break };
        if bye_slots.contains(&i) {
            matches.push(KnockoutMatch::bye(0, i as u32, home));
        } else {
            matches.push(KnockoutMatch::new(0, i as u32, Some(home), seeded.next()));
        }
    }
    if !bye_slots.is_empty() {
        log::debug!("Bracket of {n}: {} bye(s) in round 0", bye_slots.len());
    }

    if !single_round {
        let mut round = 0;
        let mut in_round = first_round / 2;
        while in_round >= 1 {
            round += 1;
            matches.extend((0..in_round).map(|i| KnockoutMatch::new(round, i as u32, None, None)));
            in_round /= 2;
        }
        if n >= 4 {
            matches.push(KnockoutMatch::third_place(total_rounds(n) - 1, None, None));
        }

        let walkovers: Vec<(u32, Option<Entrant>)> = matches
            .iter()
            .filter(|m| m.is_bye())
            .map(|m| (m.index, m.winner.clone()))
            .collect();
        for (index, winner) in walkovers {
            place_winner(&mut matches, 0, index, winner);
        }
    }
    Ok(matches)
}

/// Redraw the bracket from the same qualifiers. Only allowed before any knockout match is played.
pub fn redraw_bracket<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.stage == TournamentStage::Groups {
        return Err(TournamentError::InvalidStage {
            action: "redraw the bracket",
            stage: tournament.stage,
        });
    }
    if tournament.any_knockout_played() {
        return Err(TournamentError::KnockoutAlreadyStarted);
    }
    let matches = generate_bracket(&tournament.qualifiers, tournament.is_paired(), rng)?;
    tournament.knockout_matches = matches;
    tournament.winner = None;
    tournament.third_place = None;
    tournament.stage = TournamentStage::Knockout;
    tournament.touch();
    log::info!("Tournament {}: bracket redrawn", tournament.id);
    Ok(())
}

/// Record a knockout score and move the winner (and semi-final loser) along.
///
/// Draws are rejected. Re-submitting the stored score is a no-op; a corrected score is
/// accepted only if it keeps the same winner.
pub fn record_knockout_score(
    tournament: &mut Tournament,
    match_id: &str,
    home: i64,
    away: i64,
) -> Result<(), TournamentError> {
    let pos = tournament
        .knockout_match_position(match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;
    let score = Score::from_submitted(home, away)?;

    let m = &tournament.knockout_matches[pos];
    if m.score == Some(score) {
        log::debug!("Knockout match {match_id}: identical score resubmitted, nothing to do");
        return Ok(());
    }
    if score.is_draw() {
        return Err(TournamentError::DrawNotAllowed);
    }
    let (Some(home_entrant), Some(away_entrant)) = (&m.home, &m.away) else {
        return Err(TournamentError::MatchNotReady(m.id.clone()));
    };
    let winner = if score.home > score.away {
        home_entrant.clone()
    } else {
        away_entrant.clone()
    };

    if m.is_played() {
        if m.winner.as_ref() != Some(&winner) {
            return Err(TournamentError::WinnerLocked(m.id.clone()));
        }
        tournament.knockout_matches[pos].score = Some(score);
        tournament.touch();
        return Ok(());
    }

    let m = &mut tournament.knockout_matches[pos];
    m.score = Some(score);
    m.winner = Some(winner);
    if tournament.is_paired() {
        settle_paired_result(tournament, pos);
    } else {
        advance(tournament, pos);
    }
    finish_if_decided(tournament);
    tournament.touch();
    Ok(())
}

/// Propagate a decided match through a fully generated bracket.
fn advance(tournament: &mut Tournament, pos: usize) {
    let m = &tournament.knockout_matches[pos];
    let (round, index) = (m.round, m.index);
    let winner = m.winner.clone();
    let loser = m.loser().cloned();

    if m.is_third_place() {
        tournament.third_place = winner;
        return;
    }

    let rounds = total_rounds(tournament.qualifiers.len());
    if round + 1 == rounds {
        tournament.winner = winner;
        return;
    }

    if round + 2 == rounds {
        if let Some(third) = tournament
            .knockout_matches
            .iter_mut()
            .find(|m| m.is_third_place())
        {
            for side in [Side::Home, Side::Away] {
                let slot = third.slot_mut(side);
                if slot.is_none() {
                    *slot = loser;
                    break;
                }
            }
        }
    }

    place_winner(&mut tournament.knockout_matches, round, index, winner);
}

/// Put the winner of match (`round`, `index`) into its slot one round later.
fn place_winner(matches: &mut [KnockoutMatch], round: u32, index: u32, winner: Option<Entrant>) {
    let side = if index % 2 == 0 { Side::Home } else { Side::Away };
    if let Some(next) = matches
        .iter_mut()
        .find(|m| !m.is_third_place() && m.round == round + 1 && m.index == index / 2)
    {
        *next.slot_mut(side) = winner;
    }
}

/// In 2v2 nothing propagates: later rounds are drawn by `generate_next_round`.
fn settle_paired_result(tournament: &mut Tournament, pos: usize) {
    let m = &tournament.knockout_matches[pos];
    if m.is_third_place() {
        tournament.third_place = m.winner.clone();
        return;
    }
    let round = m.round;
    let in_round = tournament
        .knockout_matches
        .iter()
        .filter(|k| !k.is_third_place() && k.round == round)
        .count();
    if in_round == 1 {
        tournament.winner = tournament.knockout_matches[pos].winner.clone();
    }
}

/// Mark the tournament finished once the champion and, if contested, third place are known.
fn finish_if_decided(tournament: &mut Tournament) {
    let Some(winner) = &tournament.winner else {
        return;
    };
    let third_decided = tournament
        .third_place_match()
        .map_or(true, KnockoutMatch::is_played);
    if third_decided && tournament.stage != TournamentStage::Finished {
        log::info!("Tournament {}: won by {}", tournament.id, winner.name);
        tournament.stage = TournamentStage::Finished;
    }
}
