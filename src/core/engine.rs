use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use crate::core::scorer::Scorer;
use crate::domain::model::{
    validate_batch, Candidate, CandidateScore, ExternalCandidate, MatchOutcome, ProjectSnapshot,
    TeamMember, VirtualTeam,
};
use crate::domain::ports::{CandidateRepository, TeamRepository};
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::Validate;

/// Where the candidates for one match invocation come from.
pub enum CandidateSource {
    /// Enumerate all persisted candidates from storage.
    Pool,
    /// A finite list supplied with the request; scored but never stored.
    Provided(Vec<ExternalCandidate>),
}

/// Ranks candidates against a project and selects a size-constrained team.
///
/// Safe to invoke concurrently across projects and for the same project: the
/// persisted check-then-create runs under a per-project async lock so repeated
/// identical matches can never create duplicate team records.
pub struct MatchEngine<C, T> {
    candidates: C,
    teams: T,
    scorer: Scorer,
    locks: ProjectLocks,
}

#[derive(Default)]
struct ProjectLocks {
    inner: Mutex<HashMap<u64, Arc<AsyncMutex<()>>>>,
}

impl ProjectLocks {
    fn for_project(&self, project_id: u64) -> Arc<AsyncMutex<()>> {
        self.inner.lock().entry(project_id).or_default().clone()
    }
}

impl<C: CandidateRepository, T: TeamRepository> MatchEngine<C, T> {
    pub fn new(candidates: C, teams: T, scorer: Scorer) -> Self {
        Self {
            candidates,
            teams,
            scorer,
            locks: ProjectLocks::default(),
        }
    }

    pub async fn match_project(
        &self,
        project: &ProjectSnapshot,
        source: CandidateSource,
    ) -> Result<MatchOutcome> {
        project.validate()?;

        if project.requirements.is_empty() {
            // Nothing to score against
            return Err(MatchError::InsufficientCandidates {
                needed: project.min_participants,
                available: 0,
            });
        }

        match source {
            CandidateSource::Provided(batch) => self.match_provided(project, batch).await,
            CandidateSource::Pool => self.match_pool(project).await,
        }
    }

    async fn match_provided(
        &self,
        project: &ProjectSnapshot,
        batch: Vec<ExternalCandidate>,
    ) -> Result<MatchOutcome> {
        // 先整批驗證，任何一筆不合法就整批拒絕，不做部分處理
        validate_batch(&batch)?;

        let candidates: Vec<Candidate> = batch
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| Candidate::External { index, candidate })
            .collect();

        let selected = self.rank_and_select(project, candidates)?;
        let members = selected.iter().map(to_member).collect();

        debug!(project_id = project.id, "Virtual match completed");
        Ok(MatchOutcome::Virtual(VirtualTeam {
            project_id: project.id,
            members,
            degraded: self.scorer.degraded(),
        }))
    }

    async fn match_pool(&self, project: &ProjectSnapshot) -> Result<MatchOutcome> {
        let pool = self.candidates.list_candidates().await?;
        let candidates = pool.into_iter().map(Candidate::Persisted).collect();
        let selected = self.rank_and_select(project, candidates)?;

        let member_ids: BTreeSet<u64> = selected
            .iter()
            .filter_map(|(candidate, _)| candidate.persisted_id())
            .collect();
        let members: Vec<TeamMember> = selected.iter().map(to_member).collect();

        // Check-then-create is one serialized unit per project.
        let lock = self.locks.for_project(project.id);
        let _guard = lock.lock().await;

        for team in self.teams.teams_for_project(project.id).await? {
            if team.member_ids() == member_ids {
                debug!(
                    team_id = team.id,
                    project_id = project.id,
                    "Identical member set already persisted, returning existing team"
                );
                return Ok(MatchOutcome::Persisted(team));
            }
        }

        let team = self
            .teams
            .create_team(project.id, members, self.scorer.degraded())
            .await?;
        info!(
            team_id = team.id,
            project_id = project.id,
            members = team.members.len(),
            "Team created"
        );
        Ok(MatchOutcome::Persisted(team))
    }

    /// Score every candidate, keep the qualifying ones (aggregate > 0), rank
    /// them and enforce the size bounds.
    fn rank_and_select(
        &self,
        project: &ProjectSnapshot,
        candidates: Vec<Candidate>,
    ) -> Result<Vec<(Candidate, CandidateScore)>> {
        let mut ranked = Vec::new();
        for candidate in candidates {
            let score = self.scorer.score(&candidate, &project.requirements)?;
            if score.total > 0.0 {
                ranked.push((candidate, score));
            }
        }

        // Descending by score; equal scores fall back to candidate identity
        // order (id ascending / batch input order) so repeated runs rank the
        // same regardless of how the storage backend iterates.
        ranked.sort_by(|a, b| {
            b.1.total
                .total_cmp(&a.1.total)
                .then_with(|| a.0.id().cmp(&b.0.id()))
        });

        let target = project
            .requirements
            .len()
            .min(project.max_participants)
            .min(ranked.len());

        if target < project.min_participants {
            return Err(MatchError::InsufficientCandidates {
                needed: project.min_participants,
                available: target,
            });
        }

        ranked.truncate(target);
        Ok(ranked)
    }
}

fn to_member((candidate, score): &(Candidate, CandidateScore)) -> TeamMember {
    TeamMember {
        candidate_id: candidate.persisted_id(),
        name: candidate.name().to_string(),
        email: candidate.email().to_string(),
        score: score.total,
        breakdown: score.breakdown.clone(),
    }
}
