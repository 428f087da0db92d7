pub mod settings;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use crate::core::resolver::DEFAULT_MAX_PATH_WEIGHT;
    use crate::domain::ports::MatchConfig;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "skillmatch")]
    #[command(about = "Match a candidate pool against a project's weighted skill requirements")]
    pub struct CliConfig {
        /// Skill graph adjacency file (JSON)
        #[arg(long, default_value = "skill_graph.json")]
        pub graph_file: String,

        /// Project snapshot file (JSON)
        #[arg(long, default_value = "project.json")]
        pub project_file: String,

        /// Candidate pool file: JSON array, or a CSV skill matrix when the
        /// path ends in .csv
        #[arg(long, default_value = "candidates.json")]
        pub candidates_file: String,

        /// Maximum meaningful semantic distance in the skill graph
        #[arg(long, default_value_t = DEFAULT_MAX_PATH_WEIGHT)]
        pub max_path_weight: f64,

        /// Treat the candidates file as an external batch and return a
        /// virtual team without persisting anything
        #[arg(long = "virtual")]
        pub virtual_match: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl MatchConfig for CliConfig {
        fn graph_file(&self) -> &str {
            &self.graph_file
        }

        fn max_path_weight(&self) -> f64 {
            self.max_path_weight
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("graph_file", &self.graph_file)?;
            validation::validate_path("project_file", &self.project_file)?;
            validation::validate_path("candidates_file", &self.candidates_file)?;
            validation::validate_positive_float("max_path_weight", self.max_path_weight)?;
            Ok(())
        }
    }

}
