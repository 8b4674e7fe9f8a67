//! Quota policies
//!
//! A quota policy maps the crisis level and each actor's recent withdrawal
//! to the maximum volume each actor may take this turn.

use crate::core::types::{CrisisLevel, Priority};

/// Quota returned by `NoQuota`; the largest finite value, so it passes the
/// quota contract and exceeds any withdrawal whatever the flow units
pub const UNRESTRICTED_QUOTA: f64 = f64::MAX;

/// Inputs a quota policy may read
#[derive(Debug, Clone, Copy)]
pub struct QuotaContext<'a> {
    pub crisis_level: CrisisLevel,
    pub priorities: &'a [Priority],
    pub avg_pump: &'a [f64],
    pub doe: f64,
    pub dcr: f64,
}

impl<'a> QuotaContext<'a> {
    pub fn nb_actors(&self) -> usize {
        self.priorities.len()
    }
}

/// Quota strategy
///
/// Implementations must be stateless: one instance is shared by every
/// iteration, possibly across threads. The result must hold one finite,
/// nonnegative value per actor.
pub trait QuotaPolicy: Send + Sync {
    fn name(&self) -> &str;

    fn compute_quota(&self, ctx: &QuotaContext) -> Vec<f64>;
}

/// Cut actors by ascending priority as the crisis deepens
///
/// An actor whose priority is at or below the crisis level gets nothing,
/// except the high-priority class, which keeps its allowance even in Crisis.
/// Everyone else may take `fraction` of their rolling average withdrawal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardQuota {
    pub fraction: f64,
}

impl Default for HardQuota {
    fn default() -> Self {
        Self { fraction: 1.0 }
    }
}

impl QuotaPolicy for HardQuota {
    fn name(&self) -> &str {
        "hard_quota"
    }

    fn compute_quota(&self, ctx: &QuotaContext) -> Vec<f64> {
        let fraction = self.fraction.clamp(0.0, 1.0);
        ctx.priorities
            .iter()
            .zip(ctx.avg_pump)
            .map(|(&priority, &avg)| {
                let cut = priority != Priority::High && ctx.crisis_level.restricts(priority);
                if cut {
                    0.0
                } else {
                    (avg * fraction).max(0.0)
                }
            })
            .collect()
    }
}

/// No regulation; the upper baseline for scaling
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoQuota;

impl QuotaPolicy for NoQuota {
    fn name(&self) -> &str {
        "no_quota"
    }

    fn compute_quota(&self, ctx: &QuotaContext) -> Vec<f64> {
        vec![UNRESTRICTED_QUOTA; ctx.nb_actors()]
    }
}
