//! Batch orchestration of independent iterations

use rayon::prelude::*;
use serde::Serialize;

use crate::core::config::ScenarioConfig;
use crate::core::error::{ContractViolation, Result, SimError};
use crate::ecology::CrisisThresholds;
use crate::policy::{IncentivePolicy, QuotaPolicy};
use crate::simulation::iteration::{IterationResult, IterationRunner};
use crate::simulation::scores::FinalScores;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationState {
    /// Configuration validated, nothing run yet
    Init,
    /// Every iteration has completed or aborted
    Finished,
}

/// An iteration aborted by a contract violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationFailure {
    pub index: u32,
    pub reason: String,
    #[serde(skip_serializing)]
    pub violation: ContractViolation,
}

/// Outcome of a batch: completed iterations and failures, both by index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub completed: Vec<IterationResult>,
    pub failures: Vec<IterationFailure>,
}

impl BatchReport {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failed_indices(&self) -> Vec<u32> {
        self.failures.iter().map(|f| f.index).collect()
    }

    pub fn iteration(&self, index: u32) -> Option<&IterationResult> {
        self.completed.iter().find(|r| r.index == index)
    }

    pub fn iteration_scores(&self) -> Vec<(u32, FinalScores)> {
        self.completed.iter().map(|r| (r.index, r.scores())).collect()
    }

    pub fn iteration_scores_scaled(&self) -> Vec<(u32, FinalScores)> {
        self.completed
            .iter()
            .map(|r| (r.index, r.scaled_scores()))
            .collect()
    }

    /// Mean raw scores over completed iterations
    pub fn final_scores(&self) -> Option<FinalScores> {
        let scores: Vec<FinalScores> = self.completed.iter().map(|r| r.scores()).collect();
        FinalScores::mean(&scores)
    }

    /// Mean scaled scores over completed iterations
    pub fn final_scores_scaled(&self) -> Option<FinalScores> {
        let scores: Vec<FinalScores> = self.completed.iter().map(|r| r.scaled_scores()).collect();
        FinalScores::mean(&scores)
    }

    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} iterations completed, {} failed",
            self.completed.len(),
            self.failure_count()
        );
        if let Some(scaled) = self.final_scores_scaled() {
            out.push_str(&format!(
                "\nscaled ecological impact {:.3}, scaled economic impact {:.3}, compliance {:.3}",
                scaled.ecological_impact, scaled.economic_impact, scaled.compliance
            ));
        }
        for failure in &self.failures {
            out.push_str(&format!("\niteration {} aborted: {}", failure.index, failure.reason));
        }
        out
    }
}

/// Runs a scenario under injected quota and incentive policies
pub struct Simulation {
    config: ScenarioConfig,
    thresholds: CrisisThresholds,
    quota_policy: Box<dyn QuotaPolicy>,
    incentive_policy: Box<dyn IncentivePolicy>,
    state: SimulationState,
    report: Option<BatchReport>,
}

impl Simulation {
    /// Validate the configuration; an invalid one never starts an iteration
    pub fn new(
        config: ScenarioConfig,
        quota_policy: Box<dyn QuotaPolicy>,
        incentive_policy: Box<dyn IncentivePolicy>,
    ) -> Result<Self> {
        config.validate()?;
        let thresholds = CrisisThresholds::from_config(&config)?;
        Ok(Self {
            config,
            thresholds,
            quota_policy,
            incentive_policy,
            state: SimulationState::Init,
            report: None,
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn report(&self) -> Option<&BatchReport> {
        self.report.as_ref()
    }

    /// Run iteration `index` on its own stream, independent of the batch
    pub fn run_iteration(&self, index: u32) -> Result<IterationResult> {
        if index >= self.config.nb_iterations {
            return Err(SimError::IterationOutOfRange(index));
        }
        Ok(self.execute(index)?)
    }

    fn execute(&self, index: u32) -> std::result::Result<IterationResult, ContractViolation> {
        IterationRunner::with_thresholds(
            &self.config,
            self.thresholds.clone(),
            self.quota_policy.as_ref(),
            self.incentive_policy.as_ref(),
            index,
        )
        .run()
    }

    /// Run every iteration and keep the report
    ///
    /// Aborted iterations are collected as failures; the rest of the batch
    /// still runs.
    pub fn run(&mut self) -> &BatchReport {
        tracing::info!(
            "Running {} iterations of {} turns ({} actors, quota '{}', incentive '{}')",
            self.config.nb_iterations,
            self.config.total_turns,
            self.config.nb_actors,
            self.quota_policy.name(),
            self.incentive_policy.name()
        );

        type Outcome = std::result::Result<IterationResult, ContractViolation>;
        let outcomes: Vec<(u32, Outcome)> = if self.config.parallel {
            (0..self.config.nb_iterations)
                .into_par_iter()
                .map(|i| (i, self.execute(i)))
                .collect()
        } else {
            (0..self.config.nb_iterations)
                .map(|i| (i, self.execute(i)))
                .collect()
        };

        let mut completed = Vec::new();
        let mut failures = Vec::new();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    let scaled = result.scaled_scores();
                    tracing::debug!(
                        "Iteration {} done: ecological {:.3}, economic {:.3}, compliance {:.3}",
                        index,
                        scaled.ecological_impact,
                        scaled.economic_impact,
                        scaled.compliance
                    );
                    completed.push(result);
                }
                Err(violation) => {
                    tracing::warn!("Iteration {} aborted: {}", index, violation);
                    failures.push(IterationFailure {
                        index,
                        reason: violation.to_string(),
                        violation,
                    });
                }
            }
        }

        tracing::info!(
            "Batch finished: {} completed, {} failed",
            completed.len(),
            failures.len()
        );

        self.state = SimulationState::Finished;
        self.report.insert(BatchReport {
            completed,
            failures,
        })
    }

    /// Mean raw scores, once the batch has run
    pub fn get_final_scores(&self) -> Option<FinalScores> {
        self.report.as_ref()?.final_scores()
    }

    /// Mean scaled scores, once the batch has run
    pub fn get_final_scores_scaled(&self) -> Option<FinalScores> {
        self.report.as_ref()?.final_scores_scaled()
    }
}
