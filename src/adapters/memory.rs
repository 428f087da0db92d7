use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::model::{PersistedCandidate, SkillRating, Team, TeamMember};
use crate::domain::ports::{CandidateRepository, TeamRepository};
use crate::utils::error::Result;

/// In-memory candidate/team storage backing the CLI and the tests. Clones
/// share the same underlying records.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    candidates: RwLock<Vec<PersistedCandidate>>,
    teams: RwLock<Vec<Team>>,
    next_candidate_id: RwLock<u64>,
    next_team_id: RwLock<u64>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_candidate(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        skills: Vec<SkillRating>,
    ) -> u64 {
        let id = {
            let mut next = self.inner.next_candidate_id.write();
            *next += 1;
            *next
        };
        self.inner.candidates.write().push(PersistedCandidate {
            id,
            name: name.into(),
            email: email.into(),
            skills,
        });
        id
    }

    /// Bulk insert keeping the ids already assigned by the loader.
    pub fn insert_candidates(&self, candidates: Vec<PersistedCandidate>) {
        let max_id = candidates.iter().map(|c| c.id).max().unwrap_or(0);
        {
            let mut next = self.inner.next_candidate_id.write();
            if max_id > *next {
                *next = max_id;
            }
        }
        self.inner.candidates.write().extend(candidates);
    }

    pub fn candidate_count(&self) -> usize {
        self.inner.candidates.read().len()
    }

    pub fn team_count(&self) -> usize {
        self.inner.teams.read().len()
    }
}

impl CandidateRepository for InMemoryRegistry {
    async fn list_candidates(&self) -> Result<Vec<PersistedCandidate>> {
        let mut candidates = self.inner.candidates.read().clone();
        candidates.sort_by_key(|c| c.id);
        Ok(candidates)
    }
}

#[async_trait]
impl TeamRepository for InMemoryRegistry {
    async fn teams_for_project(&self, project_id: u64) -> Result<Vec<Team>> {
        Ok(self
            .inner
            .teams
            .read()
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_team(
        &self,
        project_id: u64,
        members: Vec<TeamMember>,
        degraded: bool,
    ) -> Result<Team> {
        let id = {
            let mut next = self.inner.next_team_id.write();
            *next += 1;
            *next
        };
        let team = Team {
            id,
            project_id,
            created_at: Utc::now(),
            members,
            degraded,
        };
        self.inner.teams.write().push(team.clone());
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_ids_are_sequential() {
        let registry = InMemoryRegistry::new();
        let a = registry.add_candidate("Alice", "alice@example.com", vec![]);
        let b = registry.add_candidate("Bob", "bob@example.com", vec![]);
        assert_eq!(a, 1);
        assert_eq!(b, 2);

        let listed = tokio_test::block_on(registry.list_candidates()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, 1);
    }

    #[test]
    fn test_bulk_insert_preserves_loader_ids() {
        let registry = InMemoryRegistry::new();
        registry.insert_candidates(vec![PersistedCandidate {
            id: 10,
            name: "Carol".to_string(),
            email: "carol@example.com".to_string(),
            skills: vec![],
        }]);
        // Subsequent ids continue past the loaded maximum
        let next = registry.add_candidate("Dave", "dave@example.com", vec![]);
        assert_eq!(next, 11);
    }

    #[test]
    fn test_teams_are_scoped_by_project() {
        let registry = InMemoryRegistry::new();
        tokio_test::block_on(registry.create_team(1, vec![], false)).unwrap();
        tokio_test::block_on(registry.create_team(2, vec![], false)).unwrap();

        let for_one = tokio_test::block_on(registry.teams_for_project(1)).unwrap();
        assert_eq!(for_one.len(), 1);
        assert_eq!(for_one[0].project_id, 1);
        assert_eq!(registry.team_count(), 2);
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = InMemoryRegistry::new();
        let clone = registry.clone();
        registry.add_candidate("Alice", "alice@example.com", vec![]);
        assert_eq!(clone.candidate_count(), 1);
    }
}
