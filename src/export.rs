//! CSV export of group standings.

use crate::models::Tournament;
use serde::Serialize;

#[derive(Serialize)]
struct StandingRow<'a> {
    group: &'a str,
    rank: usize,
    entrant: &'a str,
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    goals_for: u64,
    goals_against: u64,
    goal_difference: i64,
    points: u32,
}

/// One row per entrant per group, in table order, with a header line.
pub fn standings_csv(tournament: &Tournament) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for group in &tournament.groups {
        for (i, s) in group.standings.iter().enumerate() {
            writer.serialize(StandingRow {
                group: &group.name,
                rank: s.rank.unwrap_or(i + 1),
                entrant: &s.name,
                played: s.played,
                won: s.won,
                drawn: s.drawn,
                lost: s.lost,
                goals_for: s.goals_for,
                goals_against: s.goals_against,
                goal_difference: s.goal_difference,
                points: s.points,
            })?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
