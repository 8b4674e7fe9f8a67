//! Cross-scenario analysis

pub mod pareto;

pub use pareto::{is_pareto_efficient, pareto_front, ScenarioPoint};
