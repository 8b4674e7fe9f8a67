//! Tendency learning
//!
//! Bush-Mosteller reinforcement: the action just played becomes more likely
//! when its reward beats the actor's aspiration (rolling average income),
//! less likely otherwise. The stimulus saturates at one reward scale.

use crate::core::config::LearningParams;
use crate::core::types::Action;

/// Normalized stimulus in [-1, 1]
pub fn stimulus(reward: f64, baseline: f64, reward_scale: f64) -> f64 {
    ((reward - baseline) / reward_scale).clamp(-1.0, 1.0)
}

/// New cooperation tendency after playing `action` and earning `reward`
pub fn update_tendency(
    tendency: f64,
    action: Action,
    reward: f64,
    baseline: f64,
    params: &LearningParams,
) -> f64 {
    let s = stimulus(reward, baseline, params.reward_scale);
    let rate = params.learning_rate;

    // propensity of the action actually played
    let p = match action {
        Action::Cooperate => tendency,
        Action::Defect => 1.0 - tendency,
    };
    let p_next = if s >= 0.0 {
        p + rate * s * (1.0 - p)
    } else {
        p + rate * s * p
    };

    let next = match action {
        Action::Cooperate => p_next,
        Action::Defect => 1.0 - p_next,
    };
    next.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LearningParams {
        LearningParams {
            learning_rate: 0.5,
            reward_scale: 2.0,
            rolling_horizon: 12,
        }
    }

    #[test]
    fn test_rewarded_cooperation_increases_tendency() {
        let next = update_tendency(0.5, Action::Cooperate, 4.0, 2.0, &params());
        assert!(next > 0.5);
    }

    #[test]
    fn test_punished_cooperation_decreases_tendency() {
        let next = update_tendency(0.5, Action::Cooperate, 0.0, 2.0, &params());
        assert!(next < 0.5);
    }

    #[test]
    fn test_rewarded_defection_decreases_tendency() {
        let next = update_tendency(0.5, Action::Defect, 4.0, 2.0, &params());
        assert!(next < 0.5);
    }

    #[test]
    fn test_punished_defection_increases_tendency() {
        let next = update_tendency(0.5, Action::Defect, -10.0, 2.0, &params());
        assert!(next > 0.5);
    }

    #[test]
    fn test_reward_at_baseline_is_neutral() {
        let next = update_tendency(0.3, Action::Cooperate, 2.0, 2.0, &params());
        assert_eq!(next, 0.3);
    }

    #[test]
    fn test_extreme_rewards_stay_in_unit_interval() {
        let full = LearningParams {
            learning_rate: 1.0,
            ..params()
        };
        for &reward in &[1e12, -1e12, f64::MAX, f64::MIN] {
            for &action in &[Action::Cooperate, Action::Defect] {
                for &t in &[0.0, 0.01, 0.5, 0.99, 1.0] {
                    let next = update_tendency(t, action, reward, 0.0, &full);
                    assert!((0.0..=1.0).contains(&next));
                }
            }
        }
    }

    #[test]
    fn test_stimulus_saturates() {
        assert_eq!(stimulus(100.0, 0.0, 2.0), 1.0);
        assert_eq!(stimulus(-100.0, 0.0, 2.0), -1.0);
        assert_eq!(stimulus(1.0, 0.0, 2.0), 0.5);
    }
}
