//! Crisis classification from river flow
//!
//! Thresholds are an ordered list from DOE down to DCR. Each boundary the
//! flow falls strictly below raises the crisis level by one step; the last
//! boundary (DCR) always maps to Crisis. A flow exactly on a boundary stays
//! on the less severe side.

use serde::{Deserialize, Serialize};

use crate::core::config::ScenarioConfig;
use crate::core::error::ConfigError;
use crate::core::types::CrisisLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisThresholds {
    /// Strictly descending: DOE, optional intermediate boundary, DCR
    boundaries: Vec<f64>,
}

impl CrisisThresholds {
    pub fn new(doe: f64, intermediate: &[f64], dcr: f64) -> Result<Self, ConfigError> {
        if !(doe > dcr) {
            return Err(ConfigError::ThresholdOrder { doe, dcr });
        }
        if intermediate.len() > 1 || intermediate.iter().any(|&t| !(t > dcr && t < doe)) {
            return Err(ConfigError::IntermediateThreshold(intermediate.to_vec()));
        }

        let mut boundaries = Vec::with_capacity(intermediate.len() + 2);
        boundaries.push(doe);
        boundaries.extend_from_slice(intermediate);
        boundaries.push(dcr);
        Ok(Self { boundaries })
    }

    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ConfigError> {
        Self::new(config.doe, &config.intermediate_thresholds, config.dcr)
    }

    pub fn doe(&self) -> f64 {
        self.boundaries[0]
    }

    pub fn dcr(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }
}

/// Map a flow to its crisis level
pub fn classify_crisis(flow: f64, thresholds: &CrisisThresholds) -> CrisisLevel {
    let crossed = thresholds
        .boundaries
        .iter()
        .filter(|&&boundary| flow < boundary)
        .count();

    if crossed == 0 {
        CrisisLevel::Normal
    } else if crossed == thresholds.boundaries.len() {
        CrisisLevel::Crisis
    } else if crossed == 1 {
        CrisisLevel::Alert
    } else {
        CrisisLevel::HighAlert
    }
}
