use crate::core::graph::SkillGraph;
use crate::domain::model::{Requirement, SkillRating};

/// Maximum meaningful semantic distance in the skill graph. Matches at or
/// beyond this distance score zero. Tunable per deployment; must stay > 0.
pub const DEFAULT_MAX_PATH_WEIGHT: f64 = 26.3452;

/// Best-matching candidate skill for one requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillMatch {
    pub matched: Option<SkillRating>,
    pub weight: f64,
    pub path: Option<Vec<String>>,
}

impl SkillMatch {
    pub fn none() -> Self {
        Self {
            matched: None,
            weight: 0.0,
            path: None,
        }
    }
}

/// Resolve the closest skill a candidate holds for one requirement.
///
/// An exact canonical-name match always dominates graph-based matches and
/// carries weight 1.0. Otherwise every candidate skill is measured against
/// the requirement through the graph and normalized as
/// `max(0, 1 - distance / max_path_weight)`. Ties keep the lexicographically
/// first candidate skill name, so results do not depend on storage iteration
/// order. No graph, or no reachable skill, yields `none` with weight 0 --
/// that is a signal ("no usable skill"), not an error.
pub fn resolve(
    requirement: &Requirement,
    skills: &[SkillRating],
    graph: Option<&SkillGraph>,
    max_path_weight: f64,
) -> SkillMatch {
    let target = requirement.graph_name();

    let mut ordered: Vec<&SkillRating> = skills.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    if let Some(skill) = ordered.iter().find(|s| s.graph_name() == target) {
        return SkillMatch {
            matched: Some((*skill).clone()),
            weight: 1.0,
            path: Some(vec![target]),
        };
    }

    let Some(graph) = graph else {
        // Degraded mode: exact matches only.
        return SkillMatch::none();
    };

    let mut best = SkillMatch::none();
    for skill in ordered {
        let Some(found) = graph.shortest_path(&target, &skill.graph_name()) else {
            continue;
        };
        let weight = (1.0 - found.distance / max_path_weight).max(0.0);
        // Strict comparison: on equal weight the earlier (lexicographically
        // smaller) skill is kept.
        if weight > best.weight {
            best = SkillMatch {
                matched: Some(skill.clone()),
                weight,
                path: Some(found.path),
            };
        }
    }
    best
}
