//! Stochastic river hydrology
//!
//! Flow is a deterministic base series scaled by scarcity and perturbed by
//! multiplicative noise. Forecasts add a scenario-level bias and additive
//! noise. All randomness comes from the iteration's stream.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::ScenarioConfig;
use crate::core::types::{Scarcity, Turn};

/// Flow generator for one iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrologyModel {
    base_series: Vec<f64>,
    scarcity: Scarcity,
    volatility: f64,
    forecast_bias: f64,
    forecast_uncertainty: f64,
}

impl HydrologyModel {
    pub fn new(
        base_series: Vec<f64>,
        scarcity: Scarcity,
        volatility: f64,
        forecast_bias: f64,
        forecast_uncertainty: f64,
    ) -> Self {
        Self {
            base_series,
            scarcity,
            volatility,
            forecast_bias,
            forecast_uncertainty,
        }
    }

    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self::new(
            config.hydrology.base_series.clone(),
            config.scarcity,
            config.hydrology.volatility,
            config.forecast_bias,
            config.forecast_uncertainty,
        )
    }

    /// Base flow for a turn after scarcity scaling, before noise
    pub fn base_flow(&self, turn: Turn) -> f64 {
        if self.base_series.is_empty() {
            return 0.0;
        }
        let idx = turn as usize % self.base_series.len();
        self.base_series[idx] * self.scarcity.flow_factor()
    }

    /// True river flow for a turn
    ///
    /// Consumes exactly one draw from `rng`.
    pub fn generate_flow<R: Rng>(&self, turn: Turn, rng: &mut R) -> f64 {
        let noise: f64 = rng.gen_range(-1.0..=1.0);
        self.base_flow(turn) * (1.0 + self.volatility * noise)
    }

    /// Forecast of a flow: `flow * (1 + bias) + noise * uncertainty`
    ///
    /// Consumes exactly one draw from `rng`.
    pub fn generate_forecast<R: Rng>(&self, flow: f64, rng: &mut R) -> f64 {
        let noise: f64 = rng.gen_range(-1.0..=1.0);
        flow * (1.0 + self.forecast_bias) + noise * self.forecast_uncertainty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn model(scarcity: Scarcity) -> HydrologyModel {
        HydrologyModel::new(vec![10.0, 20.0, 30.0], scarcity, 0.2, 0.0, 0.0)
    }

    #[test]
    fn test_base_flow_cycles_series() {
        let m = model(Scarcity::Low);
        assert_eq!(m.base_flow(0), 10.0);
        assert_eq!(m.base_flow(4), 20.0);
    }

    #[test]
    fn test_scarcity_scales_flow() {
        assert!(model(Scarcity::High).base_flow(2) < model(Scarcity::Low).base_flow(2));
    }

    #[test]
    fn test_flow_stays_within_volatility_band() {
        let m = model(Scarcity::Medium);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for turn in 0..300 {
            let flow = m.generate_flow(turn, &mut rng);
            let base = m.base_flow(turn);
            assert!(flow >= base * 0.8 - 1e-9 && flow <= base * 1.2 + 1e-9);
            assert!(flow >= 0.0);
        }
    }

    #[test]
    fn test_flow_is_reproducible_for_same_seed() {
        let m = model(Scarcity::Medium);
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for turn in 0..24 {
            assert_eq!(m.generate_flow(turn, &mut a), m.generate_flow(turn, &mut b));
        }
    }

    #[test]
    fn test_forecast_without_noise_applies_bias() {
        let m = HydrologyModel::new(vec![10.0], Scarcity::Low, 0.0, 0.1, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let forecast = m.generate_forecast(20.0, &mut rng);
        assert!((forecast - 22.0).abs() < 1e-12);
    }

    #[test]
    fn test_forecast_noise_bounded_by_uncertainty() {
        let m = HydrologyModel::new(vec![10.0], Scarcity::Low, 0.0, 0.0, 2.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let forecast = m.generate_forecast(20.0, &mut rng);
            assert!((forecast - 20.0).abs() <= 2.0);
        }
    }
}
