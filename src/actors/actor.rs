//! Actor records and their rolling statistics

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Priority};

/// Exponentially weighted averages of an actor's recent history
///
/// Quota policies read `avg_pump`; the learning rule uses `avg_income`
/// as the aspiration baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingStats {
    pub avg_pump: f64,
    pub avg_income: f64,
}

impl RollingStats {
    pub fn new(avg_pump: f64, avg_income: f64) -> Self {
        Self {
            avg_pump,
            avg_income,
        }
    }

    /// Stats after observing one more turn, weighted 1/horizon
    pub fn updated(self, pump: f64, income: f64, horizon: u32) -> Self {
        let weight = 1.0 / horizon.max(1) as f64;
        Self {
            avg_pump: self.avg_pump + weight * (pump - self.avg_pump),
            avg_income: self.avg_income + weight * (income - self.avg_income),
        }
    }
}

/// Rolling statistics after one turn of withdrawal and income
pub fn update_rolling_stats(stats: RollingStats, pump: f64, income: f64, horizon: u32) -> RollingStats {
    stats.updated(pump, income, horizon)
}

/// A water user on the river
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub priority: Priority,
    /// Probability of cooperating this turn, always in [0, 1]
    pub tendency: f64,
    pub demand: f64,
    pub stats: RollingStats,
}

impl Actor {
    pub fn new(id: ActorId, priority: Priority, tendency: f64, demand: f64, stats: RollingStats) -> Self {
        Self {
            id,
            priority,
            tendency: tendency.clamp(0.0, 1.0),
            demand,
            stats,
        }
    }
}
