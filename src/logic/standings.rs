//! Group standings: recomputed from scratch from the group's match list.

use crate::models::{Group, Standing};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Table order: points, goal difference, goals for (all descending), then registration order.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference.cmp(&a.goal_difference))
        .then(b.goals_for.cmp(&a.goals_for))
        .then(a.registration.cmp(&b.registration))
}

/// Compute the table for `group`, best first, with 1-based ranks.
///
/// Only played matches count. A match naming someone outside the group is ignored.
pub fn compute_standings(group: &Group) -> Vec<Standing> {
    let mut table: Vec<Standing> = group.entrants.iter().map(Standing::new).collect();
    let index: HashMap<&str, usize> = group
        .entrants
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name.as_str(), i))
        .collect();

    for m in &group.matches {
        let Some(score) = m.score else { continue };
        let (Some(&home), Some(&away)) = (index.get(m.home.as_str()), index.get(m.away.as_str()))
        else {
            continue;
        };
        table[home].record(score.home, score.away);
        table[away].record(score.away, score.home);
    }

    table.sort_by(compare_standings);
    for (i, s) in table.iter_mut().enumerate() {
        s.rank = Some(i + 1);
    }
    table
}

/// Recompute and store the group's table.
pub fn refresh_standings(group: &mut Group) -> &[Standing] {
    group.standings = compute_standings(group);
    &group.standings
}
