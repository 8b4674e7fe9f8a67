//! One iteration of the allocation game
//!
//! Every turn runs the same pipeline:
//! 1. Generate flow and forecast
//! 2. Classify the crisis level
//! 3. Compute quotas from the active quota policy
//! 4. Actors draw actions and intended withdrawals
//! 5. Share the available flow
//! 6. Compute incentives, incomes and rewards
//! 7. Compute ecological and economic impact with their bounds
//! 8. Actors learn from their reward
//! 9. Append the turn record

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::actors::ActorManager;
use crate::allocation::{has_quota_violation, ValueFunction, WaterAllocator};
use crate::core::config::ScenarioConfig;
use crate::core::error::{ContractViolation, ConfigError, ViolationKind, ViolationSource};
use crate::core::types::{ActorId, Turn};
use crate::ecology::{CrisisThresholds, EcologyManager};
use crate::hydrology::HydrologyModel;
use crate::policy::{IncentiveContext, IncentivePolicy, QuotaPolicy};
use crate::simulation::history::{ActorTurn, Series, TurnRecord};
use crate::simulation::scores::{FinalScores, RunTotals};

/// Random stream of an iteration: the base seed with the iteration as stream id
pub fn iteration_rng(base_seed: u64, index: u32) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(index as u64);
    rng
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationPhase {
    Running { turn: Turn },
    Done,
}

/// Completed iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationResult {
    pub index: u32,
    pub history: Vec<TurnRecord>,
    pub totals: RunTotals,
    pub final_tendencies: Vec<f64>,
}

impl IterationResult {
    pub fn scores(&self) -> FinalScores {
        self.totals.raw_scores()
    }

    pub fn scaled_scores(&self) -> FinalScores {
        self.totals.scaled_scores()
    }

    pub fn series(&self) -> Series {
        Series::from_history(&self.history)
    }
}

/// Owns all mutable state of one iteration
pub struct IterationRunner<'a> {
    index: u32,
    total_turns: Turn,
    rng: ChaCha8Rng,
    hydrology: HydrologyModel,
    ecology: EcologyManager,
    actors: ActorManager,
    allocator: WaterAllocator<'a>,
    flows: Vec<f64>,
    history: Vec<TurnRecord>,
    totals: RunTotals,
    phase: IterationPhase,
}

impl<'a> IterationRunner<'a> {
    /// Fresh state for iteration `index`; the config must already be valid
    pub fn new(
        config: &ScenarioConfig,
        quota_policy: &'a dyn QuotaPolicy,
        incentive_policy: &'a dyn IncentivePolicy,
        index: u32,
    ) -> Result<Self, ConfigError> {
        let thresholds = CrisisThresholds::from_config(config)?;
        Ok(Self::with_thresholds(
            config,
            thresholds,
            quota_policy,
            incentive_policy,
            index,
        ))
    }

    /// Fresh state for iteration `index` from already validated thresholds
    pub fn with_thresholds(
        config: &ScenarioConfig,
        thresholds: CrisisThresholds,
        quota_policy: &'a dyn QuotaPolicy,
        incentive_policy: &'a dyn IncentivePolicy,
        index: u32,
    ) -> Self {
        let allocator = WaterAllocator::new(
            quota_policy,
            incentive_policy,
            ValueFunction::linear(config.unit_value),
            config.doe,
            config.dcr,
            index,
        );

        Self {
            index,
            total_turns: config.total_turns,
            rng: iteration_rng(config.seed, index),
            hydrology: HydrologyModel::from_config(config),
            ecology: EcologyManager::new(thresholds),
            actors: ActorManager::from_config(config),
            allocator,
            flows: Vec::with_capacity(config.total_turns as usize),
            history: Vec::with_capacity(config.total_turns as usize),
            totals: RunTotals::default(),
            phase: if config.total_turns == 0 {
                IterationPhase::Done
            } else {
                IterationPhase::Running { turn: 0 }
            },
        }
    }

    pub fn phase(&self) -> IterationPhase {
        self.phase
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn actors(&self) -> &ActorManager {
        &self.actors
    }

    fn violation(&self, stage: ViolationSource, turn: Turn, what: &str, value: f64) -> ContractViolation {
        ContractViolation {
            stage,
            iteration: self.index,
            turn,
            kind: ViolationKind::NonFinite {
                what: what.to_string(),
                value,
            },
        }
    }

    fn ensure_finite(
        &self,
        stage: ViolationSource,
        turn: Turn,
        what: &str,
        value: f64,
    ) -> Result<(), ContractViolation> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(self.violation(stage, turn, what, value))
        }
    }

    /// Advance one turn; a no-op once the iteration is done
    pub fn step(&mut self) -> Result<(), ContractViolation> {
        let turn = match self.phase {
            IterationPhase::Running { turn } => turn,
            IterationPhase::Done => return Ok(()),
        };

        let flow = self.hydrology.generate_flow(turn, &mut self.rng);
        self.ensure_finite(ViolationSource::Hydrology, turn, "flow", flow)?;
        let forecast = self.hydrology.generate_forecast(flow, &mut self.rng);
        self.ensure_finite(ViolationSource::Hydrology, turn, "forecast", forecast)?;

        self.flows.push(flow);
        let crisis_level = self.ecology.observe(flow);

        let priorities = self.actors.priorities();
        let avg_pump = self.actors.avg_pumps();
        let avg_incomes = self.actors.avg_incomes();
        let tendencies = self.actors.tendencies();

        let quotas = self
            .allocator
            .compute_quota(turn, crisis_level, &priorities, &avg_pump)?;

        let actions = self.actors.decide_actions(&mut self.rng);
        let intended = self.actors.intended_pumps(&actions, &quotas);
        let allocation = self.allocator.allocate(&intended, &priorities, flow);

        let incentives = {
            let ctx = IncentiveContext {
                actions: &actions,
                priorities: &priorities,
                avg_incomes: &avg_incomes,
                water_pump: &allocation.realized,
                avg_pump: &avg_pump,
                crisis_history: self.ecology.crisis_history(),
                water_flows: &self.flows,
                quota: &quotas,
                doe: self.allocator.doe(),
                dcr: self.allocator.dcr(),
            };
            self.allocator.compute_incentive(turn, &ctx)?
        };

        let economics = self
            .allocator
            .economic_impact(&allocation.realized, &incentives);
        self.ensure_finite(ViolationSource::Economics, turn, "economic impact", economics.total)?;
        if let Some(&reward) = economics.rewards.iter().find(|r| !r.is_finite()) {
            return Err(self.violation(ViolationSource::Economics, turn, "reward", reward));
        }

        let unrestricted = self
            .allocator
            .allocate(&self.actors.unrestricted_pumps(), &priorities, flow);
        let withdrawn = allocation.total();
        let ecological_impact = self.ecology.impact(flow, withdrawn);
        let ecological_bounds = self.ecology.bounds(flow, unrestricted.total());
        self.ensure_finite(ViolationSource::Ecology, turn, "ecological impact", ecological_impact)?;
        let economic_bounds = self
            .allocator
            .economic_bounds(self.actors.len(), &unrestricted.realized);

        let quota_violation = has_quota_violation(&allocation.realized, &quotas);

        self.actors.learn(
            &actions,
            &allocation.realized,
            &economics.incomes,
            &economics.rewards,
        );

        self.totals.record_turn(
            ecological_impact,
            ecological_bounds,
            economics.total,
            economic_bounds,
            quota_violation,
        );

        let actor_turns = (0..self.actors.len())
            .map(|i| ActorTurn {
                actor: ActorId(i as u32),
                action: actions[i],
                tendency: tendencies[i],
                avg_pump: avg_pump[i],
                quota: quotas[i],
                water_pumped: intended[i],
                water_used: allocation.realized[i],
                incentive: incentives[i],
                income: economics.incomes[i],
                reward: economics.rewards[i],
            })
            .collect();

        tracing::trace!(
            "iteration {} turn {}: flow {:.2}, {:?}, {} cooperators, withdrawn {:.2}",
            self.index,
            turn,
            flow,
            crisis_level,
            actions.iter().filter(|a| a.is_cooperate()).count(),
            withdrawn
        );

        self.history.push(TurnRecord {
            turn,
            flow,
            forecast,
            crisis_level,
            actors: actor_turns,
            ecological_impact,
            ecological_bounds,
            economic_impact: economics.total,
            economic_bounds,
            quota_violation,
        });

        self.phase = if turn + 1 >= self.total_turns {
            IterationPhase::Done
        } else {
            IterationPhase::Running { turn: turn + 1 }
        };

        Ok(())
    }

    /// Run every remaining turn
    pub fn run(mut self) -> Result<IterationResult, ContractViolation> {
        while self.phase != IterationPhase::Done {
            self.step()?;
        }

        Ok(IterationResult {
            index: self.index,
            final_tendencies: self.actors.tendencies(),
            history: self.history,
            totals: self.totals,
        })
    }
}
