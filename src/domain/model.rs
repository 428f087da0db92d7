use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{self, Validate};

/// 把技能名稱轉成圖節點的標準形式（小寫、分隔符號換成連字號）
pub fn canonical_graph_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '_'], "-")
}

/// A skill a candidate holds, with its raw proficiency value.
///
/// Proficiency in (0,1] is a fraction of the 1-5 scale and is multiplied by 5
/// before use; values already in [1,5] are used as-is. Exactly 1.0 is the top
/// of the fractional range, never raw level 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRating {
    #[serde(alias = "skill_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_name: Option<String>,
    pub level: f64,
}

impl SkillRating {
    pub fn graph_name(&self) -> String {
        self.graph_name
            .clone()
            .unwrap_or_else(|| canonical_graph_name(&self.name))
    }

    pub fn effective_level(&self) -> f64 {
        effective_level(self.level)
    }
}

pub fn effective_level(raw: f64) -> f64 {
    if raw > 0.0 && raw <= 1.0 {
        raw * 5.0
    } else {
        raw
    }
}

/// A (skill, required level) pair a project needs. Level is on the 1-5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub skill_id: u64,
    pub skill_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_name: Option<String>,
    pub level: u8,
}

impl Requirement {
    pub fn graph_name(&self) -> String {
        self.graph_name
            .clone()
            .unwrap_or_else(|| canonical_graph_name(&self.skill_name))
    }
}

/// Read-only view of a project as supplied by the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub id: u64,
    pub min_participants: usize,
    pub max_participants: usize,
    pub requirements: Vec<Requirement>,
}

impl Validate for ProjectSnapshot {
    fn validate(&self) -> Result<()> {
        if self.min_participants == 0 {
            return Err(MatchError::MalformedInput {
                field: "project.min_participants".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_participants > self.max_participants {
            return Err(MatchError::MalformedInput {
                field: "project.max_participants".to_string(),
                reason: format!(
                    "max_participants ({}) must not be smaller than min_participants ({})",
                    self.max_participants, self.min_participants
                ),
            });
        }
        Ok(())
    }
}

/// Candidate record owned by storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedCandidate {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub skills: Vec<SkillRating>,
}

/// Candidate supplied with a request. Has no identity in storage and its
/// proficiency values must all lie within [0,1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalCandidate {
    pub name: String,
    pub email: String,
    pub skills: Vec<SkillRating>,
}

impl ExternalCandidate {
    /// 逐欄驗證；index 用來指出整批輸入中的第幾筆
    pub fn validate_entry(&self, index: usize) -> Result<()> {
        validation::validate_candidate_name(&format!("candidates[{}].name", index), &self.name)?;
        validation::validate_email(&format!("candidates[{}].email", index), &self.email)?;
        for (pos, skill) in self.skills.iter().enumerate() {
            if skill.name.trim().is_empty() {
                return Err(MatchError::MalformedInput {
                    field: format!("candidates[{}].skills[{}].name", index, pos),
                    reason: "skill name cannot be empty".to_string(),
                });
            }
            if !(0.0..=1.0).contains(&skill.level) {
                return Err(MatchError::MalformedInput {
                    field: format!("candidates[{}].skills[{}].level", index, pos),
                    reason: format!("value {} is outside [0,1]", skill.level),
                });
            }
        }
        Ok(())
    }
}

/// Reject the whole batch on the first violation; nothing is scored after a
/// failure here.
pub fn validate_batch(batch: &[ExternalCandidate]) -> Result<()> {
    for (index, candidate) in batch.iter().enumerate() {
        candidate.validate_entry(index)?;
    }
    Ok(())
}

/// The two candidate sources share one scoring contract.
#[derive(Debug, Clone)]
pub enum Candidate {
    Persisted(PersistedCandidate),
    External {
        index: usize,
        candidate: ExternalCandidate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CandidateId {
    Persisted(u64),
    External(usize),
}

impl Candidate {
    pub fn id(&self) -> CandidateId {
        match self {
            Candidate::Persisted(c) => CandidateId::Persisted(c.id),
            Candidate::External { index, .. } => CandidateId::External(*index),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Candidate::Persisted(c) => &c.name,
            Candidate::External { candidate, .. } => &candidate.name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Candidate::Persisted(c) => &c.email,
            Candidate::External { candidate, .. } => &candidate.email,
        }
    }

    pub fn skills(&self) -> &[SkillRating] {
        match self {
            Candidate::Persisted(c) => &c.skills,
            Candidate::External { candidate, .. } => &candidate.skills,
        }
    }

    pub fn persisted_id(&self) -> Option<u64> {
        match self {
            Candidate::Persisted(c) => Some(c.id),
            Candidate::External { .. } => None,
        }
    }
}

/// Per-requirement audit record. Reproducible from the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub requirement_skill: String,
    pub required_level: u8,
    pub matched_skill: Option<String>,
    pub effective_level: f64,
    pub weight: f64,
    pub adjusted: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
}

/// Aggregate result of scoring one candidate against all requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub total: f64,
    pub breakdown: Vec<ScoreBreakdown>,
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<u64>,
    pub name: String,
    pub email: String,
    pub score: f64,
    pub breakdown: Vec<ScoreBreakdown>,
}

/// Persisted team. Membership is fixed at creation and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub project_id: u64,
    pub created_at: DateTime<Utc>,
    pub members: Vec<TeamMember>,
    pub degraded: bool,
}

impl Team {
    /// Member identity set, order-independent. The idempotence comparison key.
    pub fn member_ids(&self) -> BTreeSet<u64> {
        self.members.iter().filter_map(|m| m.candidate_id).collect()
    }
}

/// Match result that only exists in the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualTeam {
    pub project_id: u64,
    pub members: Vec<TeamMember>,
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    Persisted(Team),
    Virtual(VirtualTeam),
}

impl MatchOutcome {
    pub fn members(&self) -> &[TeamMember] {
        match self {
            MatchOutcome::Persisted(team) => &team.members,
            MatchOutcome::Virtual(team) => &team.members,
        }
    }

    pub fn degraded(&self) -> bool {
        match self {
            MatchOutcome::Persisted(team) => team.degraded,
            MatchOutcome::Virtual(team) => team.degraded,
        }
    }
}
