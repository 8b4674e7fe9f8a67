//! Economic value of water used

use serde::{Deserialize, Serialize};

use crate::core::types::ImpactBounds;

/// Income earned per unit of water, identical for every actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueFunction {
    pub price: f64,
}

impl ValueFunction {
    pub fn linear(price: f64) -> Self {
        Self { price }
    }

    pub fn income(&self, water: f64) -> f64 {
        self.price * water.max(0.0)
    }
}

impl Default for ValueFunction {
    fn default() -> Self {
        Self { price: 1.0 }
    }
}

/// Per-actor outcome of one turn
#[derive(Debug, Clone, PartialEq)]
pub struct EconomicOutcome {
    pub incomes: Vec<f64>,
    /// income minus incentive (fines lower it, subsidies raise it)
    pub rewards: Vec<f64>,
    /// Gross income of all actors; incentives are transfers and excluded
    pub total: f64,
}

pub fn compute_economic_impact(
    realized: &[f64],
    incentives: &[f64],
    value: &ValueFunction,
) -> EconomicOutcome {
    let incomes: Vec<f64> = realized.iter().map(|&w| value.income(w)).collect();
    let rewards = incomes
        .iter()
        .zip(incentives)
        .map(|(income, incentive)| income - incentive)
        .collect();
    let total = incomes.iter().sum();

    EconomicOutcome {
        incomes,
        rewards,
        total,
    }
}

/// Zero-quota income (min) and no-quota income (max)
///
/// `unrestricted_realized` is the allocation every actor would get when
/// all of them extract at full capacity.
pub fn compute_economic_bounds(
    nb_actors: usize,
    unrestricted_realized: &[f64],
    value: &ValueFunction,
) -> ImpactBounds {
    ImpactBounds {
        min: value.income(0.0) * nb_actors as f64,
        max: unrestricted_realized.iter().map(|&w| value.income(w)).sum(),
    }
}
