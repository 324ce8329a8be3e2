//! Persistence seam: the engine works on a loaded copy and hands it back to a store.
//!
//! There is no version token, so concurrent writers to one tournament race and the last
//! save wins.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Load/save of whole tournament aggregates.
pub trait TournamentStore: Send + Sync {
    fn load(&self, id: TournamentId) -> Result<Tournament, TournamentError>;
    fn save(&self, tournament: Tournament);
    fn delete(&self, id: TournamentId) -> Result<(), TournamentError>;
    /// Most recently created first.
    fn list_recent(&self, limit: usize) -> Vec<Tournament>;
}

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct Entry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory store; entries are dropped by [`MemoryStore::purge_inactive`].
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<TournamentId, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove tournaments not touched within `timeout`. Returns how many were removed.
    pub fn purge_inactive(&self, timeout: Duration) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.last_activity.elapsed() < timeout);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TournamentStore for MemoryStore {
    /// Loading counts as activity.
    fn load(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        entry.last_activity = Instant::now();
        Ok(entry.tournament.clone())
    }

    fn save(&self, tournament: Tournament) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            tournament.id,
            Entry {
                tournament,
                last_activity: Instant::now(),
            },
        );
    }

    fn delete(&self, id: TournamentId) -> Result<(), TournamentError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .remove(&id)
            .map(|_| ())
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    fn list_recent(&self, limit: usize) -> Vec<Tournament> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Tournament> = entries.values().map(|e| e.tournament.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        all
    }
}
