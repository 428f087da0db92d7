pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::settings::MatchSettings;

pub use adapters::memory::InMemoryRegistry;
pub use crate::core::engine::{CandidateSource, MatchEngine};
pub use crate::core::graph::SkillGraph;
pub use crate::core::resolver::DEFAULT_MAX_PATH_WEIGHT;
pub use crate::core::scorer::Scorer;
pub use utils::error::{MatchError, Result};
