use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::model::{ExternalCandidate, PersistedCandidate, ProjectSnapshot, SkillRating};
use crate::utils::error::Result;

/// 由 JSON 檔載入專案快照
pub fn load_project<P: AsRef<Path>>(path: P) -> Result<ProjectSnapshot> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Candidate pool as a JSON array of persisted snapshots.
pub fn load_pool<P: AsRef<Path>>(path: P) -> Result<Vec<PersistedCandidate>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Externally supplied candidates (no storage identity, levels in [0,1]).
pub fn load_external<P: AsRef<Path>>(path: P) -> Result<Vec<ExternalCandidate>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// One skill-matrix row: a single rating for a single person.
#[derive(Debug, Deserialize)]
struct MatrixRow {
    name: String,
    email: String,
    skill: String,
    level: f64,
}

/// Load a candidate pool from a CSV skill matrix (`name,email,skill,level`
/// rows). People are grouped by (name, email) in first-seen order and ids are
/// assigned sequentially from 1.
pub fn load_pool_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PersistedCandidate>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut by_person: HashMap<(String, String), usize> = HashMap::new();
    let mut pool: Vec<PersistedCandidate> = Vec::new();

    for row in reader.deserialize() {
        let row: MatrixRow = row?;
        let key = (row.name.clone(), row.email.clone());
        let slot = match by_person.get(&key) {
            Some(slot) => *slot,
            None => {
                pool.push(PersistedCandidate {
                    id: pool.len() as u64 + 1,
                    name: row.name,
                    email: row.email,
                    skills: Vec::new(),
                });
                by_person.insert(key, pool.len() - 1);
                pool.len() - 1
            }
        };
        pool[slot].skills.push(SkillRating {
            name: row.skill,
            graph_name: None,
            level: row.level,
        });
    }

    debug!(candidates = pool.len(), "Skill matrix loaded");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_project_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "id": 1,
                "min_participants": 2,
                "max_participants": 4,
                "requirements": [
                    {"skill_id": 1, "skill_name": "Python", "level": 5}
                ]
            }"#,
        )
        .unwrap();

        let project = load_project(file.path()).unwrap();
        assert_eq!(project.id, 1);
        assert_eq!(project.requirements.len(), 1);
        assert_eq!(project.requirements[0].skill_name, "Python");
    }

    #[test]
    fn test_load_pool_csv_groups_rows_by_person() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"name,email,skill,level\n\
              Alice,alice@example.com,Python,1.0\n\
              Bob,bob@example.com,Rust,0.6\n\
              Alice,alice@example.com,Machine Learning,0.8\n",
        )
        .unwrap();

        let pool = load_pool_csv(file.path()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].id, 1);
        assert_eq!(pool[0].name, "Alice");
        assert_eq!(pool[0].skills.len(), 2);
        assert_eq!(pool[1].name, "Bob");
        assert_eq!(pool[1].skills.len(), 1);
    }

    #[test]
    fn test_malformed_csv_row_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"name,email,skill,level\nAlice,alice@example.com,Python,not-a-number\n")
            .unwrap();
        assert!(load_pool_csv(file.path()).is_err());
    }

    #[test]
    fn test_missing_external_field_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        // email missing
        file.write_all(br#"[{"name": "Alice", "skills": []}]"#).unwrap();
        assert!(load_external(file.path()).is_err());
    }
}
