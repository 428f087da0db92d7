pub mod engine;
pub mod graph;
pub mod resolver;
pub mod scorer;

pub use crate::domain::model::{Candidate, MatchOutcome, ProjectSnapshot, Team, VirtualTeam};
pub use crate::domain::ports::{CandidateRepository, MatchConfig, TeamRepository};
pub use crate::utils::error::Result;
