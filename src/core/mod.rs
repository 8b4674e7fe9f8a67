pub mod config;
pub mod error;
pub mod types;

pub use config::{HydrologyParams, LearningParams, ScenarioConfig};
pub use error::{ConfigError, ContractViolation, Result, SimError, ViolationKind, ViolationSource};
pub use types::{Action, ActorId, CrisisLevel, ImpactBounds, Priority, Scarcity, Turn, TURNS_PER_YEAR};
