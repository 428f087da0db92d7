use crate::core::resolver::DEFAULT_MAX_PATH_WEIGHT;
use crate::domain::ports::MatchConfig;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSettings {
    pub engine: EngineConfig,
    pub graph: GraphConfig,
    pub scoring: Option<ScoringConfig>,
    pub inputs: Option<InputsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub max_path_weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    pub project_file: Option<String>,
    pub candidates_file: Option<String>,
}

impl MatchSettings {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GRAPH_FILE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("engine.name", &self.engine.name)?;
        validation::validate_path("graph.file", &self.graph.file)?;
        validation::validate_positive_float("scoring.max_path_weight", self.max_path_weight())?;

        if let Some(inputs) = &self.inputs {
            if let Some(project_file) = &inputs.project_file {
                validation::validate_path("inputs.project_file", project_file)?;
            }
            if let Some(candidates_file) = &inputs.candidates_file {
                validation::validate_path("inputs.candidates_file", candidates_file)?;
            }
        }

        Ok(())
    }

    pub fn max_path_weight(&self) -> f64 {
        self.scoring
            .as_ref()
            .and_then(|s| s.max_path_weight)
            .unwrap_or(DEFAULT_MAX_PATH_WEIGHT)
    }

    pub fn graph_file(&self) -> &str {
        &self.graph.file
    }

    pub fn project_file(&self) -> Result<&String> {
        let inputs = self.inputs.as_ref().ok_or(MatchError::MissingConfigError {
            field: "inputs".to_string(),
        })?;
        validation::validate_required_field("inputs.project_file", &inputs.project_file)
    }

    pub fn candidates_file(&self) -> Option<&String> {
        self.inputs
            .as_ref()
            .and_then(|inputs| inputs.candidates_file.as_ref())
    }
}

impl MatchConfig for MatchSettings {
    fn graph_file(&self) -> &str {
        &self.graph.file
    }

    fn max_path_weight(&self) -> f64 {
        self.max_path_weight()
    }
}

impl Validate for MatchSettings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
