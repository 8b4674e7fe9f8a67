//! Quota enforcement, water sharing and incentives for one iteration

use crate::allocation::economics::{
    compute_economic_bounds, compute_economic_impact, EconomicOutcome, ValueFunction,
};
use crate::core::error::{ContractViolation, ViolationSource};
use crate::core::types::{CrisisLevel, ImpactBounds, Priority, Turn};
use crate::policy::{check_incentive, check_quota, IncentiveContext, IncentivePolicy, QuotaContext, QuotaPolicy};

/// Tolerance when comparing a withdrawal to its quota
pub const QUOTA_TOLERANCE: f64 = 1e-9;

/// Result of sharing the available flow
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub realized: Vec<f64>,
    /// intended minus realized, per actor
    pub shortfall: Vec<f64>,
}

impl Allocation {
    pub fn total(&self) -> f64 {
        self.realized.iter().sum()
    }
}

/// Share `flow - dcr` among the intended withdrawals
///
/// Priority classes are served from high to low. A class that cannot be
/// served in full is scaled proportionally and lower classes get nothing.
/// Class totals are summed over sorted values so the result does not depend
/// on the order actors are listed in.
pub fn allocate(intended: &[f64], priorities: &[Priority], flow: f64, dcr: f64) -> Allocation {
    let mut available = (flow - dcr).max(0.0);
    let mut realized = vec![0.0; intended.len()];

    for class in Priority::ALL.iter().rev() {
        let members: Vec<usize> = priorities
            .iter()
            .enumerate()
            .filter(|(_, p)| *p == class)
            .map(|(i, _)| i)
            .collect();

        let mut requests: Vec<f64> = members.iter().map(|&i| intended[i].max(0.0)).collect();
        requests.sort_by(f64::total_cmp);
        let requested: f64 = requests.iter().sum();
        if requested <= 0.0 {
            continue;
        }

        if requested <= available {
            for &i in &members {
                realized[i] = intended[i].max(0.0);
            }
            available -= requested;
        } else {
            let ratio = available / requested;
            for &i in &members {
                realized[i] = intended[i].max(0.0) * ratio;
            }
            available = 0.0;
        }
    }

    let shortfall = intended
        .iter()
        .zip(&realized)
        .map(|(want, got)| (want - got).max(0.0))
        .collect();

    Allocation {
        realized,
        shortfall,
    }
}

/// True if any actor withdrew more than its quota
pub fn has_quota_violation(realized: &[f64], quotas: &[f64]) -> bool {
    realized
        .iter()
        .zip(quotas)
        .any(|(pump, quota)| *pump > quota + QUOTA_TOLERANCE)
}

/// Applies the active policies for one iteration
pub struct WaterAllocator<'p> {
    quota_policy: &'p dyn QuotaPolicy,
    incentive_policy: &'p dyn IncentivePolicy,
    value: ValueFunction,
    doe: f64,
    dcr: f64,
    iteration: u32,
}

impl<'p> WaterAllocator<'p> {
    pub fn new(
        quota_policy: &'p dyn QuotaPolicy,
        incentive_policy: &'p dyn IncentivePolicy,
        value: ValueFunction,
        doe: f64,
        dcr: f64,
        iteration: u32,
    ) -> Self {
        Self {
            quota_policy,
            incentive_policy,
            value,
            doe,
            dcr,
            iteration,
        }
    }

    pub fn doe(&self) -> f64 {
        self.doe
    }

    pub fn dcr(&self) -> f64 {
        self.dcr
    }

    /// Run the quota policy and enforce its contract
    pub fn compute_quota(
        &self,
        turn: Turn,
        crisis_level: CrisisLevel,
        priorities: &[Priority],
        avg_pump: &[f64],
    ) -> Result<Vec<f64>, ContractViolation> {
        let ctx = QuotaContext {
            crisis_level,
            priorities,
            avg_pump,
            doe: self.doe,
            dcr: self.dcr,
        };
        let quotas = self.quota_policy.compute_quota(&ctx);
        check_quota(&quotas, priorities.len()).map_err(|kind| ContractViolation {
            stage: ViolationSource::QuotaPolicy(self.quota_policy.name().to_string()),
            iteration: self.iteration,
            turn,
            kind,
        })?;
        Ok(quotas)
    }

    pub fn allocate(&self, intended: &[f64], priorities: &[Priority], flow: f64) -> Allocation {
        allocate(intended, priorities, flow, self.dcr)
    }

    /// Run the incentive policy and enforce its contract
    pub fn compute_incentive(
        &self,
        turn: Turn,
        ctx: &IncentiveContext,
    ) -> Result<Vec<f64>, ContractViolation> {
        let incentives = self.incentive_policy.compute_incentive(ctx);
        check_incentive(&incentives, ctx.nb_actors()).map_err(|kind| ContractViolation {
            stage: ViolationSource::IncentivePolicy(self.incentive_policy.name().to_string()),
            iteration: self.iteration,
            turn,
            kind,
        })?;
        Ok(incentives)
    }

    pub fn economic_impact(&self, realized: &[f64], incentives: &[f64]) -> EconomicOutcome {
        compute_economic_impact(realized, incentives, &self.value)
    }

    pub fn economic_bounds(&self, nb_actors: usize, unrestricted_realized: &[f64]) -> ImpactBounds {
        compute_economic_bounds(nb_actors, unrestricted_realized, &self.value)
    }
}
