use std::sync::Arc;

use tracing::trace;

use crate::core::graph::SkillGraph;
use crate::core::resolver;
use crate::domain::model::{Candidate, CandidateScore, Requirement, ScoreBreakdown};
use crate::domain::ports::MatchConfig;
use crate::utils::error::{MatchError, Result};

/// Scores one candidate against a project's requirement set.
///
/// Holds the process-wide graph handle (or `None` in degraded mode) together
/// with the normalization constant, so the hot path never reloads or re-reads
/// configuration.
pub struct Scorer {
    graph: Option<Arc<SkillGraph>>,
    max_path_weight: f64,
}

impl Scorer {
    pub fn new(graph: Option<Arc<SkillGraph>>, max_path_weight: f64) -> Self {
        Self {
            graph,
            max_path_weight,
        }
    }

    pub fn from_config<C: MatchConfig>(config: &C, graph: Option<Arc<SkillGraph>>) -> Self {
        Self::new(graph, config.max_path_weight())
    }

    /// Degraded mode restricts resolution to exact matches only. Not an
    /// error; it is surfaced on every result for observability.
    pub fn degraded(&self) -> bool {
        self.graph.is_none()
    }

    pub fn score(
        &self,
        candidate: &Candidate,
        requirements: &[Requirement],
    ) -> Result<CandidateScore> {
        let mut breakdown = Vec::with_capacity(requirements.len());

        for req in requirements {
            let found = resolver::resolve(
                req,
                candidate.skills(),
                self.graph.as_deref(),
                self.max_path_weight,
            );

            let entry = match found.matched {
                Some(skill) => {
                    let effective = skill.effective_level();
                    // requiredLevel 0 is an invalid configuration, scored as
                    // zero rather than crashing.
                    let adjusted = if req.level == 0 {
                        0.0
                    } else {
                        (found.weight * (effective / f64::from(req.level)).min(1.0))
                            .clamp(0.0, found.weight)
                    };
                    ScoreBreakdown {
                        requirement_skill: req.skill_name.clone(),
                        required_level: req.level,
                        matched_skill: Some(skill.name.clone()),
                        effective_level: effective,
                        weight: found.weight,
                        adjusted,
                        path: found.path,
                    }
                }
                None => ScoreBreakdown {
                    requirement_skill: req.skill_name.clone(),
                    required_level: req.level,
                    matched_skill: None,
                    effective_level: 0.0,
                    weight: 0.0,
                    adjusted: 0.0,
                    path: None,
                },
            };
            breakdown.push(entry);
        }

        // Programming-level invariant, not user-facing validation.
        if breakdown.len() != requirements.len() {
            return Err(MatchError::VectorLengthMismatch {
                expected: requirements.len(),
                actual: breakdown.len(),
            });
        }

        let total = breakdown.iter().map(|b| b.adjusted).sum();
        trace!(
            candidate = candidate.name(),
            total,
            degraded = self.degraded(),
            "Candidate scored"
        );

        Ok(CandidateScore {
            total,
            breakdown,
            degraded: self.degraded(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::DEFAULT_MAX_PATH_WEIGHT;
    use crate::domain::model::{PersistedCandidate, SkillRating};

    fn graph() -> Arc<SkillGraph> {
        Arc::new(
            SkillGraph::from_json_str(
                r#"{
                    "nodes": ["python", "machine-learning", "deep-learning"],
                    "edges": [
                        {"source": "python", "target": "machine-learning", "weight": 2.5},
                        {"source": "machine-learning", "target": "deep-learning", "weight": 10.0}
                    ]
                }"#,
            )
            .unwrap(),
        )
    }

    fn candidate(skills: Vec<(&str, f64)>) -> Candidate {
        Candidate::Persisted(PersistedCandidate {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            skills: skills
                .into_iter()
                .map(|(name, level)| SkillRating {
                    name: name.to_string(),
                    graph_name: None,
                    level,
                })
                .collect(),
        })
    }

    fn requirement(name: &str, level: u8) -> Requirement {
        Requirement {
            skill_id: 1,
            skill_name: name.to_string(),
            graph_name: None,
            level,
        }
    }

    #[test]
    fn test_exact_skill_at_full_level_scores_one() {
        // Python at 1.0 normalizes to 5.0; required level 5 -> 1.0 * min(5/5, 1)
        let scorer = Scorer::new(Some(graph()), DEFAULT_MAX_PATH_WEIGHT);
        let result = scorer
            .score(&candidate(vec![("Python", 1.0)]), &[requirement("Python", 5)])
            .unwrap();

        assert_eq!(result.total, 1.0);
        assert_eq!(result.breakdown.len(), 1);
        let entry = &result.breakdown[0];
        assert_eq!(entry.matched_skill.as_deref(), Some("Python"));
        assert_eq!(entry.effective_level, 5.0);
        assert_eq!(entry.weight, 1.0);
        assert!(!result.degraded);
    }

    #[test]
    fn test_related_skill_scores_by_distance_and_level_ratio() {
        // Deep Learning is 10.0 from machine-learning; effective level 3 vs required 4.
        let scorer = Scorer::new(Some(graph()), DEFAULT_MAX_PATH_WEIGHT);
        let result = scorer
            .score(
                &candidate(vec![("Deep Learning", 3.0)]),
                &[requirement("Machine Learning", 4)],
            )
            .unwrap();

        let weight = 1.0 - 10.0 / DEFAULT_MAX_PATH_WEIGHT;
        let expected = weight * 0.75;
        assert!((result.total - expected).abs() < 1e-9);

        let entry = &result.breakdown[0];
        assert_eq!(entry.matched_skill.as_deref(), Some("Deep Learning"));
        assert_eq!(entry.effective_level, 3.0);
        assert!((entry.weight - weight).abs() < 1e-9);
    }

    #[test]
    fn test_overqualified_candidate_caps_at_weight() {
        let scorer = Scorer::new(Some(graph()), DEFAULT_MAX_PATH_WEIGHT);
        let result = scorer
            .score(&candidate(vec![("Python", 1.0)]), &[requirement("Python", 2)])
            .unwrap();
        // 5.0 / 2 caps at 1, adjusted never exceeds the weight
        assert_eq!(result.total, 1.0);
    }

    #[test]
    fn test_required_level_zero_scores_zero() {
        let scorer = Scorer::new(Some(graph()), DEFAULT_MAX_PATH_WEIGHT);
        let result = scorer
            .score(&candidate(vec![("Python", 1.0)]), &[requirement("Python", 0)])
            .unwrap();
        assert_eq!(result.total, 0.0);
        assert_eq!(result.breakdown[0].adjusted, 0.0);
        // The match itself is still recorded for the audit trail
        assert_eq!(result.breakdown[0].matched_skill.as_deref(), Some("Python"));
    }

    #[test]
    fn test_unresolved_requirement_recorded_as_absent() {
        let scorer = Scorer::new(Some(graph()), DEFAULT_MAX_PATH_WEIGHT);
        let result = scorer
            .score(
                &candidate(vec![("Python", 0.8)]),
                &[requirement("Python", 4), requirement("Cobol", 3)],
            )
            .unwrap();

        assert_eq!(result.breakdown.len(), 2);
        assert!(result.breakdown[0].matched_skill.is_some());
        assert!(result.breakdown[1].matched_skill.is_none());
        assert_eq!(result.breakdown[1].adjusted, 0.0);
    }

    #[test]
    fn test_aggregate_is_sum_of_adjusted_scores() {
        let scorer = Scorer::new(Some(graph()), DEFAULT_MAX_PATH_WEIGHT);
        let result = scorer
            .score(
                &candidate(vec![("Python", 1.0), ("Deep Learning", 3.0)]),
                &[
                    requirement("Python", 5),
                    requirement("Machine Learning", 4),
                ],
            )
            .unwrap();

        // Python resolves machine-learning too (distance 2.5 beats 10.0), and
        // its effective level 5 caps the ratio at 1.
        let py_weight = 1.0 - 2.5 / DEFAULT_MAX_PATH_WEIGHT;
        let expected = 1.0 + py_weight;
        assert!((result.total - expected).abs() < 1e-9);
    }

    #[test]
    fn test_degraded_mode_only_exact_matches() {
        let scorer = Scorer::new(None, DEFAULT_MAX_PATH_WEIGHT);
        let result = scorer
            .score(
                &candidate(vec![("Python", 1.0), ("Deep Learning", 3.0)]),
                &[
                    requirement("Python", 5),
                    requirement("Machine Learning", 4),
                ],
            )
            .unwrap();

        assert!(result.degraded);
        assert_eq!(result.total, 1.0);
        assert!(result.breakdown[1].matched_skill.is_none());
    }

    #[test]
    fn test_breakdown_length_matches_requirement_count() {
        let scorer = Scorer::new(Some(graph()), DEFAULT_MAX_PATH_WEIGHT);
        let requirements = vec![
            requirement("Python", 3),
            requirement("Machine Learning", 2),
            requirement("Cobol", 4),
        ];
        let result = scorer
            .score(&candidate(vec![("Python", 0.5)]), &requirements)
            .unwrap();
        assert_eq!(result.breakdown.len(), requirements.len());
    }
}
