use crate::domain::model::{PersistedCandidate, Team, TeamMember};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Enumerates the persisted candidate pool. Implementations own the records;
/// the engine only reads snapshots.
pub trait CandidateRepository: Send + Sync {
    fn list_candidates(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<PersistedCandidate>>> + Send;
}

/// Scoring configuration owned by the caller (CLI flags or settings file).
pub trait MatchConfig: Send + Sync {
    fn graph_file(&self) -> &str;
    fn max_path_weight(&self) -> f64;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn teams_for_project(&self, project_id: u64) -> Result<Vec<Team>>;
    async fn create_team(
        &self,
        project_id: u64,
        members: Vec<TeamMember>,
        degraded: bool,
    ) -> Result<Team>;
}
