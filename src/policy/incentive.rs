//! Incentive policies
//!
//! Incentives are signed per-actor transfers: positive values are fines
//! paid by the actor, negative values are subsidies received.

use crate::core::types::{Action, CrisisLevel, Priority};

/// Inputs an incentive policy may read
#[derive(Debug, Clone, Copy)]
pub struct IncentiveContext<'a> {
    pub actions: &'a [Action],
    pub priorities: &'a [Priority],
    pub avg_incomes: &'a [f64],
    /// Realized withdrawal this turn
    pub water_pump: &'a [f64],
    pub avg_pump: &'a [f64],
    /// Crisis levels of every turn so far, current turn last
    pub crisis_history: &'a [CrisisLevel],
    /// River flows of every turn so far, current turn last
    pub water_flows: &'a [f64],
    pub quota: &'a [f64],
    pub doe: f64,
    pub dcr: f64,
}

impl<'a> IncentiveContext<'a> {
    pub fn nb_actors(&self) -> usize {
        self.actions.len()
    }
}

/// Incentive strategy
///
/// Same contract as quota policies: stateless, one finite value per actor.
pub trait IncentivePolicy: Send + Sync {
    fn name(&self) -> &str;

    fn compute_incentive(&self, ctx: &IncentiveContext) -> Vec<f64>;
}

/// Default transfer size of the reference policies
pub const DEFAULT_INCENTIVE_AMOUNT: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoIncentive;

impl IncentivePolicy for NoIncentive {
    fn name(&self) -> &str {
        "no_incentive"
    }

    fn compute_incentive(&self, ctx: &IncentiveContext) -> Vec<f64> {
        vec![0.0; ctx.nb_actors()]
    }
}

/// Defectors pay `amount`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinePolicy {
    pub amount: f64,
}

impl Default for FinePolicy {
    fn default() -> Self {
        Self {
            amount: DEFAULT_INCENTIVE_AMOUNT,
        }
    }
}

impl IncentivePolicy for FinePolicy {
    fn name(&self) -> &str {
        "fine"
    }

    fn compute_incentive(&self, ctx: &IncentiveContext) -> Vec<f64> {
        ctx.actions
            .iter()
            .map(|a| (1.0 - a.as_f64()) * self.amount)
            .collect()
    }
}

/// Cooperators receive `amount`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsidyPolicy {
    pub amount: f64,
}

impl Default for SubsidyPolicy {
    fn default() -> Self {
        Self {
            amount: DEFAULT_INCENTIVE_AMOUNT,
        }
    }
}

impl IncentivePolicy for SubsidyPolicy {
    fn name(&self) -> &str {
        "subsidy"
    }

    fn compute_incentive(&self, ctx: &IncentiveContext) -> Vec<f64> {
        ctx.actions.iter().map(|a| -a.as_f64() * self.amount).collect()
    }
}

/// Half subsidy for cooperators, half fine for defectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixedPolicy {
    pub amount: f64,
}

impl Default for MixedPolicy {
    fn default() -> Self {
        Self {
            amount: DEFAULT_INCENTIVE_AMOUNT,
        }
    }
}

impl IncentivePolicy for MixedPolicy {
    fn name(&self) -> &str {
        "mixed"
    }

    fn compute_incentive(&self, ctx: &IncentiveContext) -> Vec<f64> {
        ctx.actions
            .iter()
            .map(|a| -(a.as_f64() - 0.5) * self.amount)
            .collect()
    }
}
