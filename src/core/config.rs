//! Scenario configuration with documented defaults
//!
//! A `ScenarioConfig` is immutable for the whole run. Every iteration
//! rebuilds its actors, ecology and allocator from it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::types::{Priority, Scarcity, TURNS_PER_YEAR};

/// Parameters of the stochastic flow generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrologyParams {
    /// Deterministic base flow per turn, cycled over the run
    ///
    /// The default is a monthly regime with a summer low-flow period,
    /// sized against the default DOE (15) and DCR (10).
    pub base_series: Vec<f64>,

    /// Relative amplitude of the multiplicative noise on the base flow
    ///
    /// Must lie in [0, 1) so that generated flows stay nonnegative.
    pub volatility: f64,
}

impl Default for HydrologyParams {
    fn default() -> Self {
        Self {
            base_series: vec![
                34.0, 36.0, 32.0, 27.0, 22.0, 17.0, 13.0, 11.0, 14.0, 20.0, 27.0, 32.0,
            ],
            volatility: 0.2,
        }
    }
}

/// Reinforcement learning parameters for actor tendencies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningParams {
    /// Step size of the tendency update, in (0, 1]
    pub learning_rate: f64,

    /// Reward difference that counts as a full-strength stimulus
    ///
    /// Rewards further from the baseline than this saturate, which keeps
    /// the update bounded no matter how large a fine or subsidy is.
    pub reward_scale: f64,

    /// Horizon (in turns) of the rolling withdrawal and income averages
    pub rolling_horizon: u32,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            reward_scale: 5.0,
            rolling_horizon: TURNS_PER_YEAR,
        }
    }
}

/// Complete description of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    // === RUN SHAPE ===
    /// Turns simulated per iteration
    pub total_turns: u32,

    /// Independent iterations (each with its own random stream)
    pub nb_iterations: u32,

    /// Base seed; iteration i uses ChaCha stream i of this seed
    pub seed: u64,

    /// Run iterations on the rayon pool
    ///
    /// Results are identical either way since each iteration owns its stream.
    pub parallel: bool,

    // === HYDROLOGY ===
    pub scarcity: Scarcity,

    /// Relative bias of the forecast (0.1 = forecasts 10% high)
    pub forecast_bias: f64,

    /// Amplitude of the additive forecast noise, >= 0
    pub forecast_uncertainty: f64,

    pub hydrology: HydrologyParams,

    // === ACTORS ===
    pub nb_actors: usize,

    /// Priority class per actor (0 = low, 1 = medium, 2 = high)
    pub actor_priorities: Vec<u8>,

    /// Water demand per actor and turn; empty means `default_demand` for all
    pub actor_demands: Vec<f64>,

    pub default_demand: f64,

    /// Cooperation tendency every actor starts an iteration with
    pub initial_tendency: f64,

    /// Physical extraction capacity per actor and turn (caps defectors)
    pub max_pump: f64,

    pub learning: LearningParams,

    // === REGULATION ===
    /// Objective low-water flow; at or above it the river is Normal
    pub doe: f64,

    /// Crisis flow; below it the river is in Crisis
    pub dcr: f64,

    /// Optional boundary between Alert and High-Alert, strictly inside (DCR, DOE)
    ///
    /// Empty by default: with only DOE and DCR the High-Alert level is
    /// never reached.
    pub intermediate_thresholds: Vec<f64>,

    // === ECONOMY ===
    /// Income per unit of water used
    pub unit_value: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            total_turns: 10 * TURNS_PER_YEAR,
            nb_iterations: 10,
            seed: 42,
            parallel: true,

            scarcity: Scarcity::Medium,
            forecast_bias: 0.0,
            forecast_uncertainty: 1.0,
            hydrology: HydrologyParams::default(),

            nb_actors: 3,
            actor_priorities: vec![2, 1, 0],
            actor_demands: Vec::new(),
            default_demand: 4.0,
            initial_tendency: 0.5,
            max_pump: 6.0,
            learning: LearningParams::default(),

            doe: 15.0,
            dcr: 10.0,
            intermediate_thresholds: Vec::new(),

            unit_value: 1.0,
        }
    }
}

impl ScenarioConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML scenario
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Priorities as typed classes (only meaningful after `validate`)
    pub fn priorities(&self) -> Vec<Priority> {
        self.actor_priorities
            .iter()
            .map(|&p| Priority::from_level(p).unwrap_or(Priority::Low))
            .collect()
    }

    /// Demand of every actor, expanding the default when none are listed
    pub fn demands(&self) -> Vec<f64> {
        if self.actor_demands.is_empty() {
            vec![self.default_demand; self.nb_actors]
        } else {
            self.actor_demands.clone()
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_turns == 0 {
            return Err(ConfigError::NoTurns);
        }
        if self.nb_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if self.nb_actors == 0 {
            return Err(ConfigError::NoActors);
        }

        if self.actor_priorities.len() != self.nb_actors {
            return Err(ConfigError::ActorCountMismatch {
                field: "actor_priorities",
                expected: self.nb_actors,
                got: self.actor_priorities.len(),
            });
        }
        if let Some((actor, &value)) = self
            .actor_priorities
            .iter()
            .enumerate()
            .find(|(_, &p)| Priority::from_level(p).is_none())
        {
            return Err(ConfigError::InvalidPriority { actor, value });
        }

        if !self.actor_demands.is_empty() && self.actor_demands.len() != self.nb_actors {
            return Err(ConfigError::ActorCountMismatch {
                field: "actor_demands",
                expected: self.nb_actors,
                got: self.actor_demands.len(),
            });
        }
        for &demand in self.demands().iter() {
            require_nonnegative("actor_demands", demand)?;
        }

        // NaN thresholds fail this comparison too
        if !(self.doe > self.dcr) || !self.dcr.is_finite() || !self.doe.is_finite() {
            return Err(ConfigError::ThresholdOrder {
                doe: self.doe,
                dcr: self.dcr,
            });
        }
        let intermediate_ok = self.intermediate_thresholds.len() <= 1
            && self
                .intermediate_thresholds
                .iter()
                .all(|&t| t > self.dcr && t < self.doe);
        if !intermediate_ok {
            return Err(ConfigError::IntermediateThreshold(
                self.intermediate_thresholds.clone(),
            ));
        }

        if !self.forecast_bias.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "forecast_bias",
                value: self.forecast_bias,
                reason: "must be finite",
            });
        }
        require_nonnegative("forecast_uncertainty", self.forecast_uncertainty)?;

        if self.hydrology.base_series.is_empty() {
            return Err(ConfigError::HydrologySeries("empty".into()));
        }
        if let Some(bad) = self
            .hydrology
            .base_series
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0)
        {
            return Err(ConfigError::HydrologySeries(format!(
                "flow {} is negative or non-finite",
                bad
            )));
        }
        if !(0.0..1.0).contains(&self.hydrology.volatility) {
            return Err(ConfigError::InvalidParameter {
                name: "hydrology.volatility",
                value: self.hydrology.volatility,
                reason: "must lie in [0, 1)",
            });
        }

        if !(0.0..=1.0).contains(&self.initial_tendency) {
            return Err(ConfigError::InvalidParameter {
                name: "initial_tendency",
                value: self.initial_tendency,
                reason: "must lie in [0, 1]",
            });
        }
        require_positive("max_pump", self.max_pump)?;
        require_positive("unit_value", self.unit_value)?;

        let rate = self.learning.learning_rate;
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "learning.learning_rate",
                value: rate,
                reason: "must lie in (0, 1]",
            });
        }
        require_positive("learning.reward_scale", self.learning.reward_scale)?;
        if self.learning.rolling_horizon == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "learning.rolling_horizon",
                value: 0.0,
                reason: "must be positive",
            });
        }

        Ok(())
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

fn require_nonnegative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be nonnegative and finite",
        })
    }
}
