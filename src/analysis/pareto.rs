//! Pareto comparison of scenario outcomes

use serde::{Deserialize, Serialize};

use crate::simulation::FinalScores;

/// For each point, whether no other point dominates it
///
/// Every coordinate is a cost to minimize. A point is dominated when another
/// point is no worse on every objective and strictly better on at least one.
pub fn is_pareto_efficient(costs: &[Vec<f64>]) -> Vec<bool> {
    costs
        .iter()
        .map(|c| !costs.iter().any(|other| dominates(other, c)))
        .collect()
}

fn dominates(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| x <= y)
        && a.iter().zip(b).any(|(x, y)| x < y)
}

/// A labelled scenario outcome expressed as costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub label: String,
    pub costs: Vec<f64>,
}

impl ScenarioPoint {
    /// Costs from scaled scores: ecological impact, lost income, non-compliance
    pub fn from_scores(label: impl Into<String>, scaled: &FinalScores) -> Self {
        Self {
            label: label.into(),
            costs: vec![
                scaled.ecological_impact,
                1.0 - scaled.economic_impact,
                1.0 - scaled.compliance,
            ],
        }
    }
}

/// Labels of the non-dominated scenarios, in input order
pub fn pareto_front(points: &[ScenarioPoint]) -> Vec<&str> {
    let costs: Vec<Vec<f64>> = points.iter().map(|p| p.costs.clone()).collect();
    points
        .iter()
        .zip(is_pareto_efficient(&costs))
        .filter(|(_, efficient)| *efficient)
        .map(|(p, _)| p.label.as_str())
        .collect()
}
