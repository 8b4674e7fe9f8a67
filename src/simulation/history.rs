//! Per-turn records and the named series built from them

use serde::{Deserialize, Serialize};

use crate::core::types::{Action, ActorId, CrisisLevel, ImpactBounds, Turn};

/// What one actor did and got in one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorTurn {
    pub actor: ActorId,
    pub action: Action,
    /// Tendency the action was drawn with
    pub tendency: f64,
    /// Rolling average withdrawal the quota was computed from
    pub avg_pump: f64,
    pub quota: f64,
    /// Intended withdrawal
    pub water_pumped: f64,
    /// Withdrawal after sharing the available flow
    pub water_used: f64,
    /// Signed incentive (positive = fine)
    pub incentive: f64,
    pub income: f64,
    pub reward: f64,
}

impl ActorTurn {
    pub fn fine(&self) -> f64 {
        self.incentive.max(0.0)
    }

    pub fn subsidy(&self) -> f64 {
        (-self.incentive).max(0.0)
    }
}

/// Snapshot of one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: Turn,
    pub flow: f64,
    pub forecast: f64,
    pub crisis_level: CrisisLevel,
    pub actors: Vec<ActorTurn>,
    pub ecological_impact: f64,
    pub ecological_bounds: ImpactBounds,
    pub economic_impact: f64,
    pub economic_bounds: ImpactBounds,
    pub quota_violation: bool,
}

/// Named time series of one iteration, ready for plotting
///
/// Per-actor series are indexed `[actor][turn]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub river_flow: Vec<f64>,
    pub forecast: Vec<f64>,
    pub crisis_level: Vec<i8>,
    pub actions: Vec<Vec<bool>>,
    pub tendency: Vec<Vec<f64>>,
    pub avg_pump: Vec<Vec<f64>>,
    pub water_pumped: Vec<Vec<f64>>,
    pub water_used: Vec<Vec<f64>>,
    pub quota: Vec<Vec<f64>>,
    pub fines: Vec<Vec<f64>>,
    pub subsidies: Vec<Vec<f64>>,
    pub reward: Vec<Vec<f64>>,
    pub economic_impact: Vec<f64>,
    pub economic_min: Vec<f64>,
    pub economic_max: Vec<f64>,
    pub ecological_impact: Vec<f64>,
    pub ecological_min: Vec<f64>,
    pub ecological_max: Vec<f64>,
}

impl Series {
    pub fn from_history(history: &[TurnRecord]) -> Self {
        let nb_actors = history.first().map_or(0, |r| r.actors.len());
        let per_actor = || vec![Vec::with_capacity(history.len()); nb_actors];

        let mut series = Series {
            actions: vec![Vec::with_capacity(history.len()); nb_actors],
            tendency: per_actor(),
            avg_pump: per_actor(),
            water_pumped: per_actor(),
            water_used: per_actor(),
            quota: per_actor(),
            fines: per_actor(),
            subsidies: per_actor(),
            reward: per_actor(),
            ..Default::default()
        };

        for record in history {
            series.river_flow.push(record.flow);
            series.forecast.push(record.forecast);
            series.crisis_level.push(record.crisis_level.code());
            series.economic_impact.push(record.economic_impact);
            series.economic_min.push(record.economic_bounds.min);
            series.economic_max.push(record.economic_bounds.max);
            series.ecological_impact.push(record.ecological_impact);
            series.ecological_min.push(record.ecological_bounds.min);
            series.ecological_max.push(record.ecological_bounds.max);

            for (i, a) in record.actors.iter().enumerate().take(nb_actors) {
                series.actions[i].push(a.action.is_cooperate());
                series.tendency[i].push(a.tendency);
                series.avg_pump[i].push(a.avg_pump);
                series.water_pumped[i].push(a.water_pumped);
                series.water_used[i].push(a.water_used);
                series.quota[i].push(a.quota);
                series.fines[i].push(a.fine());
                series.subsidies[i].push(a.subsidy());
                series.reward[i].push(a.reward);
            }
        }

        series
    }

    pub fn len(&self) -> usize {
        self.river_flow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.river_flow.is_empty()
    }
}
