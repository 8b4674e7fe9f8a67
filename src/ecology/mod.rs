//! River ecology: crisis classification and ecological impact

pub mod crisis;
pub mod impact;

pub use crisis::{classify_crisis, CrisisThresholds};
pub use impact::{compute_ecological_bounds, compute_ecological_impact, EcologyManager};
