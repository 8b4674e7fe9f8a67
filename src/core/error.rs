use thiserror::Error;

use crate::core::types::Turn;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("total_turns must be positive")]
    NoTurns,

    #[error("nb_iterations must be positive")]
    NoIterations,

    #[error("nb_actors must be positive")]
    NoActors,

    #[error("{field} has {got} entries, expected one per actor ({expected})")]
    ActorCountMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("actor {actor} has priority {value}, expected 0, 1 or 2")]
    InvalidPriority { actor: usize, value: u8 },

    #[error("DOE ({doe}) must be greater than DCR ({dcr})")]
    ThresholdOrder { doe: f64, dcr: f64 },

    #[error("intermediate thresholds {0:?} must be a single value strictly between DOE and DCR")]
    IntermediateThreshold(Vec<f64>),

    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Hydrology base series is invalid: {0}")]
    HydrologySeries(String),

    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Failed to parse config TOML: {0}")]
    Parse(String),

    #[error("Unknown {kind} policy '{name}'")]
    UnknownPolicy { kind: &'static str, name: String },
}

/// Which stage produced an invalid value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationSource {
    QuotaPolicy(String),
    IncentivePolicy(String),
    Hydrology,
    Ecology,
    Economics,
}

impl std::fmt::Display for ViolationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaPolicy(name) => write!(f, "quota policy '{}'", name),
            Self::IncentivePolicy(name) => write!(f, "incentive policy '{}'", name),
            Self::Hydrology => write!(f, "hydrology"),
            Self::Ecology => write!(f, "ecology"),
            Self::Economics => write!(f, "economics"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViolationKind {
    #[error("returned {got} values, expected {expected}")]
    WrongLength { expected: usize, got: usize },

    #[error("negative value {value} for actor {actor}")]
    Negative { actor: usize, value: f64 },

    #[error("non-finite {what}: {value}")]
    NonFinite { what: String, value: f64 },
}

/// A policy or numeric stage broke its contract during a turn
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} violated its contract at iteration {iteration}, turn {turn}: {kind}")]
pub struct ContractViolation {
    pub stage: ViolationSource,
    pub iteration: u32,
    pub turn: Turn,
    pub kind: ViolationKind,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractViolation),

    #[error("Iteration {0} is out of range")]
    IterationOutOfRange(u32),

    #[error("Failed to serialize report: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
