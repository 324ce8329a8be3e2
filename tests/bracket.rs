//! Integration tests for knockout bracket generation and advancement.

use football_tournament_web::logic::total_rounds;
use football_tournament_web::{
    generate_bracket, record_knockout_score, record_score, redraw_bracket, Entrant, KnockoutMatch,
    Tournament, TournamentError, TournamentFormat, TournamentStage,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn qualifiers(n: usize) -> Vec<Entrant> {
    (0..n).map(|i| Entrant::solo(format!("Q{i}"), i)).collect()
}

fn knockout(n: usize, rng: &mut StdRng) -> Tournament {
    let qualifiers = qualifiers(n);
    let mut t = Tournament::new(
        "Cup",
        TournamentFormat::Solo,
        qualifiers.iter().map(|q| q.name.clone()).collect(),
    );
    t.knockout_matches = generate_bracket(&qualifiers, false, rng).unwrap();
    t.qualifiers = qualifiers;
    t.stage = TournamentStage::Knockout;
    t
}

fn bracket_match(t: &Tournament, round: u32, index: u32) -> &KnockoutMatch {
    t.knockout_matches
        .iter()
        .find(|m| !m.is_third_place() && m.round == round && m.index == index)
        .unwrap()
}

fn id_of(t: &Tournament, round: u32, index: u32) -> String {
    bracket_match(t, round, index).id.clone()
}

fn third_id(t: &Tournament) -> String {
    t.third_place_match().unwrap().id.clone()
}

#[test]
fn total_rounds_is_ceil_log2() {
    assert_eq!(total_rounds(1), 0);
    assert_eq!(total_rounds(2), 1);
    assert_eq!(total_rounds(3), 2);
    assert_eq!(total_rounds(4), 2);
    assert_eq!(total_rounds(8), 3);
    assert_eq!(total_rounds(16), 4);
}

#[test]
fn power_of_two_brackets_have_halving_rounds_and_third_place() {
    let mut rng = StdRng::seed_from_u64(31);
    for n in [2usize, 4, 8, 16] {
        let matches = generate_bracket(&qualifiers(n), false, &mut rng).unwrap();
        let bracket: Vec<&KnockoutMatch> = matches.iter().filter(|m| !m.is_third_place()).collect();
        let third: Vec<&KnockoutMatch> = matches.iter().filter(|m| m.is_third_place()).collect();
        assert_eq!(bracket.len(), n - 1);
        assert_eq!(third.len(), usize::from(n >= 4));

        let rounds = total_rounds(n);
        for round in 1..rounds {
            let this = bracket.iter().filter(|m| m.round == round).count();
            let prev = bracket.iter().filter(|m| m.round == round - 1).count();
            assert_eq!(this * 2, prev);
        }
        if let Some(third) = third.first() {
            assert_eq!(third.round, rounds - 1);
            assert!(third.home.is_none() && third.away.is_none());
        }

        let seeded: HashSet<&str> = bracket
            .iter()
            .filter(|m| m.round == 0)
            .flat_map(|m| [m.home.as_ref(), m.away.as_ref()])
            .map(|e| e.unwrap().name.as_str())
            .collect();
        assert_eq!(seeded.len(), n);
        assert!(bracket
            .iter()
            .filter(|m| m.round > 0)
            .all(|m| m.home.is_none() && m.away.is_none()));
    }
}

#[test]
fn single_round_mode_only_draws_round_zero() {
    let mut rng = StdRng::seed_from_u64(32);
    let matches = generate_bracket(&qualifiers(8), true, &mut rng).unwrap();
    assert_eq!(matches.len(), 4);
    assert!(matches.iter().all(|m| m.round == 0 && !m.is_third_place()));
}

#[test]
fn empty_bracket_is_rejected() {
    let mut rng = StdRng::seed_from_u64(33);
    assert_eq!(
        generate_bracket(&[], false, &mut rng),
        Err(TournamentError::InvalidBracketSize(0))
    );
    assert!(generate_bracket(&qualifiers(1), false, &mut rng)
        .unwrap()
        .is_empty());
}

#[test]
fn uneven_counts_are_padded_with_byes() {
    let mut rng = StdRng::seed_from_u64(41);
    for n in [3usize, 5, 6, 7, 12] {
        let size = n.next_power_of_two();
        let matches = generate_bracket(&qualifiers(n), false, &mut rng).unwrap();
        let bracket: Vec<&KnockoutMatch> = matches.iter().filter(|m| !m.is_third_place()).collect();
        assert_eq!(bracket.len(), size - 1, "{n} qualifiers");
        assert_eq!(
            matches.iter().filter(|m| m.is_third_place()).count(),
            usize::from(n >= 4)
        );

        let first: Vec<&KnockoutMatch> = bracket.iter().copied().filter(|m| m.round == 0).collect();
        assert_eq!(first.len(), size / 2);
        let byes: Vec<&KnockoutMatch> = first.iter().copied().filter(|m| m.is_bye()).collect();
        assert_eq!(byes.len(), size - n, "{n} qualifiers");

        let seeded: HashSet<&str> = first
            .iter()
            .flat_map(|m| [m.home.as_ref(), m.away.as_ref()])
            .flatten()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(seeded.len(), n);

        for bye in byes {
            assert!(bye.away.is_none());
            assert_eq!(bye.winner, bye.home);
            let next = bracket
                .iter()
                .find(|m| m.round == 1 && m.index == bye.index / 2)
                .unwrap();
            let slot = if bye.index % 2 == 0 { &next.home } else { &next.away };
            assert_eq!(slot, &bye.winner);
        }
    }
}

/// Score every match that has both sides, home winning, until nothing is left to play.
fn play_out(t: &mut Tournament) {
    loop {
        let ready = t
            .knockout_matches
            .iter()
            .find(|m| !m.is_played() && m.home.is_some() && m.away.is_some())
            .map(|m| m.id.clone());
        let Some(id) = ready else { break };
        record_knockout_score(t, &id, 1, 0).unwrap();
    }
}

#[test]
fn three_qualifiers_reach_a_final_without_third_place() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut t = knockout(3, &mut rng);
    assert!(t.third_place_match().is_none());

    let bye = t.knockout_matches.iter().find(|m| m.is_bye()).unwrap().clone();
    assert_eq!(
        record_knockout_score(&mut t, &bye.id, 1, 0),
        Err(TournamentError::MatchNotReady(bye.id.clone()))
    );

    play_out(&mut t);
    assert_eq!(t.stage, TournamentStage::Finished);
    assert_eq!(t.winner, bracket_match(&t, 1, 0).winner);
    assert!(t.third_place.is_none());
}

#[test]
fn six_qualifiers_play_through_byes_to_third_place() {
    let mut rng = StdRng::seed_from_u64(43);
    let mut t = knockout(6, &mut rng);
    // Byes are not results: the draw can still be redone.
    redraw_bracket(&mut t, &mut rng).unwrap();

    play_out(&mut t);
    assert_eq!(t.stage, TournamentStage::Finished);
    assert!(t.winner.is_some());
    assert!(t.third_place.is_some());
    assert_ne!(t.winner, t.third_place);
    let played = t.knockout_matches.iter().filter(|m| m.is_played()).count();
    // Two round-0 matches, two semi-finals, the final and third place.
    assert_eq!(played, 6);
}

#[test]
fn four_qualifiers_play_through_to_finished() {
    let mut rng = StdRng::seed_from_u64(34);
    let mut t = knockout(4, &mut rng);
    assert_eq!(t.knockout_matches.len(), 4);

    let semi_0 = bracket_match(&t, 0, 0).clone();
    let semi_1 = bracket_match(&t, 0, 1).clone();
    record_knockout_score(&mut t, &semi_0.id, 2, 1).unwrap();
    record_knockout_score(&mut t, &semi_1.id, 0, 3).unwrap();

    let final_match = bracket_match(&t, 1, 0);
    assert_eq!(final_match.home, semi_0.home);
    assert_eq!(final_match.away, semi_1.away);
    let third = t.third_place_match().unwrap();
    assert_eq!(third.home, semi_0.away);
    assert_eq!(third.away, semi_1.home);

    let id = id_of(&t, 1, 0);
    record_knockout_score(&mut t, &id, 1, 0).unwrap();
    assert_eq!(t.winner, semi_0.home);
    // The third-place match is still open.
    assert_eq!(t.stage, TournamentStage::Knockout);

    let id = third_id(&t);
    record_knockout_score(&mut t, &id, 0, 4).unwrap();
    assert_eq!(t.third_place, semi_1.home);
    assert_eq!(t.stage, TournamentStage::Finished);
}

#[test]
fn eight_qualifiers_propagate_by_index_parity() {
    let mut rng = StdRng::seed_from_u64(35);
    let mut t = knockout(8, &mut rng);
    for index in 0..4 {
        let id = id_of(&t, 0, index);
        record_score(&mut t, &id, 1, 0).unwrap();
    }
    for index in 0..2 {
        let semi = bracket_match(&t, 1, index);
        assert_eq!(semi.home, bracket_match(&t, 0, index * 2).winner);
        assert_eq!(semi.away, bracket_match(&t, 0, index * 2 + 1).winner);
    }
    assert!(t.third_place_match().unwrap().home.is_none());

    let id = id_of(&t, 1, 0);
    record_score(&mut t, &id, 2, 0).unwrap();
    let id = id_of(&t, 1, 1);
    record_score(&mut t, &id, 2, 0).unwrap();
    let third = t.third_place_match().unwrap();
    assert!(third.home.is_some() && third.away.is_some());

    let id = third_id(&t);
    record_score(&mut t, &id, 1, 0).unwrap();
    assert_eq!(t.stage, TournamentStage::Knockout);
    let id = id_of(&t, 2, 0);
    record_score(&mut t, &id, 0, 1).unwrap();
    assert_eq!(t.stage, TournamentStage::Finished);
    assert_eq!(t.winner, bracket_match(&t, 2, 0).away);
    assert!(t.third_place.is_some());
}

#[test]
fn draws_are_rejected_in_every_round() {
    let mut rng = StdRng::seed_from_u64(36);
    let mut t = knockout(4, &mut rng);
    let before = t.clone();
    let semi = id_of(&t, 0, 0);
    assert_eq!(
        record_knockout_score(&mut t, &semi, 1, 1),
        Err(TournamentError::DrawNotAllowed)
    );
    assert_eq!(t, before);

    record_knockout_score(&mut t, &semi, 1, 0).unwrap();
    let id = id_of(&t, 0, 1);
    record_knockout_score(&mut t, &id, 1, 0).unwrap();
    for id in [id_of(&t, 1, 0), third_id(&t)] {
        assert_eq!(
            record_knockout_score(&mut t, &id, 0, 0),
            Err(TournamentError::DrawNotAllowed)
        );
    }
}

#[test]
fn identical_resubmission_is_a_no_op() {
    let mut rng = StdRng::seed_from_u64(37);
    let mut t = knockout(4, &mut rng);
    let semi = id_of(&t, 0, 0);
    record_knockout_score(&mut t, &semi, 3, 2).unwrap();
    let before = t.clone();
    record_knockout_score(&mut t, &semi, 3, 2).unwrap();
    assert_eq!(t, before);
}

#[test]
fn corrections_may_not_change_the_winner() {
    let mut rng = StdRng::seed_from_u64(38);
    let mut t = knockout(4, &mut rng);
    let semi = id_of(&t, 0, 0);
    record_knockout_score(&mut t, &semi, 3, 2).unwrap();

    assert_eq!(
        record_knockout_score(&mut t, &semi, 0, 1),
        Err(TournamentError::WinnerLocked(semi.clone()))
    );
    record_knockout_score(&mut t, &semi, 4, 0).unwrap();
    let m = bracket_match(&t, 0, 0);
    assert_eq!(m.score.map(|s| (s.home, s.away)), Some((4, 0)));
    assert_eq!(bracket_match(&t, 1, 0).home, m.home);
}

#[test]
fn later_rounds_wait_for_both_sides() {
    let mut rng = StdRng::seed_from_u64(39);
    let mut t = knockout(4, &mut rng);
    let final_id = id_of(&t, 1, 0);
    assert_eq!(
        record_knockout_score(&mut t, &final_id, 1, 0),
        Err(TournamentError::MatchNotReady(final_id.clone()))
    );
    assert!(matches!(
        record_knockout_score(&mut t, "match_nope", 1, 0),
        Err(TournamentError::MatchNotFound(_))
    ));
    let semi = id_of(&t, 0, 0);
    assert_eq!(
        record_knockout_score(&mut t, &semi, 2, -3),
        Err(TournamentError::NegativeScore)
    );
    assert_eq!(
        record_knockout_score(&mut t, &semi, 5_000_000_000, 0),
        Err(TournamentError::ScoreOutOfRange { max: u32::MAX })
    );
    assert!(!bracket_match(&t, 0, 0).is_played());
}

#[test]
fn redraw_only_before_any_knockout_result() {
    let mut rng = StdRng::seed_from_u64(40);
    let mut t = knockout(8, &mut rng);
    let old_ids: HashSet<String> = t.knockout_matches.iter().map(|m| m.id.clone()).collect();

    redraw_bracket(&mut t, &mut rng).unwrap();
    assert_eq!(t.knockout_matches.len(), 8);
    assert!(t.knockout_matches.iter().all(|m| !old_ids.contains(&m.id)));
    let seeded: HashSet<String> = t
        .knockout_matches
        .iter()
        .filter(|m| m.round == 0)
        .flat_map(|m| [m.home.clone(), m.away.clone()])
        .map(|e| e.unwrap().name)
        .collect();
    let expected: HashSet<String> = t.qualifiers.iter().map(|q| q.name.clone()).collect();
    assert_eq!(seeded, expected);

    let id = id_of(&t, 0, 0);
    record_knockout_score(&mut t, &id, 1, 0).unwrap();
    assert_eq!(
        redraw_bracket(&mut t, &mut rng),
        Err(TournamentError::KnockoutAlreadyStarted)
    );

    let mut groups_stage = Tournament::new("Early", TournamentFormat::Solo, Vec::new());
    assert!(matches!(
        redraw_bracket(&mut groups_stage, &mut rng),
        Err(TournamentError::InvalidStage { .. })
    ));
}
