use std::collections::HashMap;
use std::path::Path;

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Deserialize;
use tracing::info;

use crate::utils::error::{MatchError, Result};

/// Serialized adjacency description of the skill ontology.
///
/// `nodes` may also appear under the key `classes`, the export format of the
/// ontology tooling that produces the file.
#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(alias = "classes")]
    nodes: Vec<String>,
    #[serde(default)]
    edges: Vec<EdgeSpec>,
}

#[derive(Debug, Deserialize)]
struct EdgeSpec {
    source: String,
    target: String,
    weight: f64,
}

/// Shortest-path answer between two skill nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub distance: f64,
    pub path: Vec<String>,
}

/// Weighted, undirected skill graph. Built once per process from its source
/// file and immutable afterwards; all queries are read-only, so a shared
/// `Arc<SkillGraph>` is safe for unsynchronized concurrent reads.
pub struct SkillGraph {
    graph: UnGraph<String, f64>,
    index: HashMap<String, NodeIndex>,
}

impl SkillGraph {
    /// 從檔案載入技能圖；讀取或解析失敗一律回報 GraphUnavailable（可降級，不致命）
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MatchError::GraphUnavailable {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        let graph = Self::from_json_str(&content)?;
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Skill graph loaded from {}",
            path.display()
        );
        Ok(graph)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: GraphFile =
            serde_json::from_str(content).map_err(|e| MatchError::GraphUnavailable {
                reason: format!("invalid graph file: {}", e),
            })?;

        let mut graph = UnGraph::new_undirected();
        let mut index = HashMap::new();

        for name in &file.nodes {
            Self::intern(&mut graph, &mut index, name);
        }

        for edge in &file.edges {
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(MatchError::GraphUnavailable {
                    reason: format!(
                        "edge {} -- {} has invalid weight {}",
                        edge.source, edge.target, edge.weight
                    ),
                });
            }
            // Endpoints missing from the node list are interned on the fly;
            // the ontology export does not always list every class.
            let source = Self::intern(&mut graph, &mut index, &edge.source);
            let target = Self::intern(&mut graph, &mut index, &edge.target);
            graph.add_edge(source, target, edge.weight);
        }

        Ok(Self { graph, index })
    }

    fn intern(
        graph: &mut UnGraph<String, f64>,
        index: &mut HashMap<String, NodeIndex>,
        name: &str,
    ) -> NodeIndex {
        if let Some(ix) = index.get(name) {
            *ix
        } else {
            let ix = graph.add_node(name.to_string());
            index.insert(name.to_string(), ix);
            ix
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Minimal-distance path between two nodes. `None` means either node is
    /// unknown or nothing connects them; callers treat that as a zero-weight
    /// match, never as an error.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<PathResult> {
        let start = *self.index.get(from)?;
        let goal = *self.index.get(to)?;

        // Zero-heuristic A* is Dijkstra with path recovery.
        let (distance, path) = astar(&self.graph, start, |n| n == goal, |e| *e.weight(), |_| 0.0)?;

        Some(PathResult {
            distance,
            path: path.into_iter().map(|ix| self.graph[ix].clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> SkillGraph {
        SkillGraph::from_json_str(
            r#"{
                "nodes": ["python", "machine-learning", "deep-learning", "rust"],
                "edges": [
                    {"source": "python", "target": "machine-learning", "weight": 2.5},
                    {"source": "machine-learning", "target": "deep-learning", "weight": 10.0}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_shortest_path_direct_edge() {
        let graph = sample_graph();
        let result = graph.shortest_path("python", "machine-learning").unwrap();
        assert_eq!(result.distance, 2.5);
        assert_eq!(result.path, vec!["python", "machine-learning"]);
    }

    #[test]
    fn test_shortest_path_sums_edge_weights() {
        let graph = sample_graph();
        let result = graph.shortest_path("python", "deep-learning").unwrap();
        assert_eq!(result.distance, 12.5);
        assert_eq!(
            result.path,
            vec!["python", "machine-learning", "deep-learning"]
        );
    }

    #[test]
    fn test_shortest_path_is_symmetric() {
        let graph = sample_graph();
        let forward = graph.shortest_path("python", "deep-learning").unwrap();
        let backward = graph.shortest_path("deep-learning", "python").unwrap();
        assert_eq!(forward.distance, backward.distance);
    }

    #[test]
    fn test_unreachable_node_returns_none() {
        let graph = sample_graph();
        assert!(graph.shortest_path("python", "rust").is_none());
    }

    #[test]
    fn test_unknown_node_returns_none() {
        let graph = sample_graph();
        assert!(graph.shortest_path("python", "cobol").is_none());
    }

    #[test]
    fn test_picks_cheaper_of_two_routes() {
        let graph = SkillGraph::from_json_str(
            r#"{
                "nodes": ["a", "b", "c"],
                "edges": [
                    {"source": "a", "target": "b", "weight": 1.0},
                    {"source": "b", "target": "c", "weight": 1.0},
                    {"source": "a", "target": "c", "weight": 5.0}
                ]
            }"#,
        )
        .unwrap();
        let result = graph.shortest_path("a", "c").unwrap();
        assert_eq!(result.distance, 2.0);
        assert_eq!(result.path, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_accepts_classes_alias() {
        let graph = SkillGraph::from_json_str(r#"{"classes": ["python", "rust"]}"#).unwrap();
        assert!(graph.contains("python"));
        assert!(graph.contains("rust"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_negative_edge_weight_rejected() {
        let result = SkillGraph::from_json_str(
            r#"{
                "nodes": ["a", "b"],
                "edges": [{"source": "a", "target": "b", "weight": -1.0}]
            }"#,
        );
        assert!(matches!(
            result,
            Err(MatchError::GraphUnavailable { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_is_recoverable_error() {
        let result = SkillGraph::from_json_str("not json at all");
        assert!(matches!(
            result,
            Err(MatchError::GraphUnavailable { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_recoverable_error() {
        let result = SkillGraph::load("/nonexistent/skill_graph.json");
        assert!(matches!(
            result,
            Err(MatchError::GraphUnavailable { .. })
        ));
    }
}
