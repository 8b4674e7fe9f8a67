//! Ecological impact of withdrawals
//!
//! Impact is the deficit of the residual river flow (after withdrawals)
//! below the ecological objective DOE. Bounds bracket every turn: the
//! minimum is the deficit with no withdrawal at all, the maximum is the
//! deficit under unrestricted extraction.

use crate::core::types::{CrisisLevel, ImpactBounds};
use crate::ecology::crisis::{classify_crisis, CrisisThresholds};

/// Deficit of a residual flow below the reference flow, never negative
pub fn compute_ecological_impact(residual_flow: f64, reference: f64) -> f64 {
    (reference - residual_flow).max(0.0)
}

/// Impact with zero withdrawal (min) and with `unrestricted_withdrawal` (max)
pub fn compute_ecological_bounds(
    flow: f64,
    unrestricted_withdrawal: f64,
    reference: f64,
) -> ImpactBounds {
    ImpactBounds {
        min: compute_ecological_impact(flow, reference),
        max: compute_ecological_impact(flow - unrestricted_withdrawal, reference),
    }
}

/// Per-iteration ecological state: thresholds and crisis history
#[derive(Debug, Clone)]
pub struct EcologyManager {
    thresholds: CrisisThresholds,
    crisis_history: Vec<CrisisLevel>,
}

impl EcologyManager {
    pub fn new(thresholds: CrisisThresholds) -> Self {
        Self {
            thresholds,
            crisis_history: Vec::new(),
        }
    }

    pub fn thresholds(&self) -> &CrisisThresholds {
        &self.thresholds
    }

    /// Classify the current flow and append it to the crisis history
    pub fn observe(&mut self, flow: f64) -> CrisisLevel {
        let level = classify_crisis(flow, &self.thresholds);
        self.crisis_history.push(level);
        level
    }

    pub fn crisis_history(&self) -> &[CrisisLevel] {
        &self.crisis_history
    }

    pub fn impact(&self, flow: f64, withdrawn: f64) -> f64 {
        compute_ecological_impact(flow - withdrawn, self.thresholds.doe())
    }

    pub fn bounds(&self, flow: f64, unrestricted_withdrawal: f64) -> ImpactBounds {
        compute_ecological_bounds(flow, unrestricted_withdrawal, self.thresholds.doe())
    }
}
