//! Group (round-robin pool).

use crate::models::entrant::{Entrant, Standing};
use crate::models::game::GroupMatch;
use serde::{Deserialize, Serialize};

/// A labelled pool with a fixed set of entrants and every pairing between them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Label: "A", "B", ...
    pub name: String,
    pub entrants: Vec<Entrant>,
    pub matches: Vec<GroupMatch>,
    /// Last computed table, best first.
    pub standings: Vec<Standing>,
}

impl Group {
    /// Create a group and generate all C(n, 2) pending matches.
    pub fn new(name: impl Into<String>, entrants: Vec<Entrant>) -> Self {
        let mut matches = Vec::with_capacity(entrants.len() * entrants.len().saturating_sub(1) / 2);
        for (i, home) in entrants.iter().enumerate() {
            for away in &entrants[i + 1..] {
                matches.push(GroupMatch::new(&home.name, &away.name));
            }
        }
        let standings = entrants.iter().map(Standing::new).collect();
        Self {
            name: name.into(),
            entrants,
            matches,
            standings,
        }
    }

    /// Label for the group at `index` (0 → "A").
    pub fn label(index: usize) -> String {
        let mut label = String::new();
        let mut n = index;
        loop {
            label.insert(0, (b'A' + (n % 26) as u8) as char);
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        label
    }

    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(|m| m.is_played())
    }

    pub fn entrant(&self, name: &str) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.name == name)
    }
}
