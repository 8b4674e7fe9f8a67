//! Integration tests for River Commons
//!
//! These tests run complete scenarios through the public API:
//! - Crisis classification and hard quotas under a dry river
//! - Unrestricted quotas under high scarcity
//! - Reproducibility of batches and single iterations
//! - Failure reporting for misbehaving policies

use river_commons::core::{
    Action, ConfigError, CrisisLevel, Priority, Scarcity, ScenarioConfig, SimError,
    ViolationKind, ViolationSource,
};
use river_commons::ecology::{classify_crisis, CrisisThresholds};
use river_commons::policy::{
    FinePolicy, HardQuota, IncentiveContext, IncentivePolicy, MixedPolicy, NoIncentive, NoQuota,
    QuotaContext, QuotaPolicy, SubsidyPolicy,
};
use river_commons::simulation::{Simulation, SimulationState};

fn scenario(turns: u32, iterations: u32) -> ScenarioConfig {
    ScenarioConfig {
        total_turns: turns,
        nb_iterations: iterations,
        ..ScenarioConfig::default()
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_dry_river_cuts_low_priority_and_keeps_high() {
    let thresholds = CrisisThresholds::new(15.0, &[], 10.0).unwrap();
    let level = classify_crisis(8.0, &thresholds);
    assert_eq!(level, CrisisLevel::Crisis);
    assert_eq!(level.code(), 2);

    let priorities = [Priority::High, Priority::Medium, Priority::Low];
    let avg_pump = [4.0, 4.0, 4.0];
    let quotas = HardQuota::default().compute_quota(&QuotaContext {
        crisis_level: level,
        priorities: &priorities,
        avg_pump: &avg_pump,
        doe: 15.0,
        dcr: 10.0,
    });

    assert_eq!(quotas[2], 0.0);
    assert!(quotas[0] > 0.0);
}

#[test]
fn test_no_quota_never_restricts_under_high_scarcity() {
    let mut config = scenario(120, 3);
    config.scarcity = Scarcity::High;

    let mut sim = Simulation::new(config, Box::new(NoQuota), Box::new(NoIncentive)).unwrap();
    let report = sim.run();
    assert_eq!(report.failure_count(), 0);

    for result in &report.completed {
        for record in &result.history {
            for actor in &record.actors {
                assert!(actor.quota >= actor.avg_pump);
            }
            assert!(!record.quota_violation);
        }
        assert_eq!(result.scores().compliance, 1.0);
    }
}

#[test]
fn test_no_quota_never_restricts_large_unit_flows() {
    let mut config = scenario(24, 1);
    config.scarcity = Scarcity::Low;
    config.hydrology.base_series = vec![3e10; 12];
    config.default_demand = 5e9;
    config.max_pump = 1e10;
    config.doe = 1.5e10;
    config.dcr = 1e10;

    let result = Simulation::new(config, Box::new(NoQuota), Box::new(NoIncentive))
        .unwrap()
        .run_iteration(0)
        .unwrap();
    for record in &result.history {
        for actor in &record.actors {
            assert!(actor.quota >= actor.avg_pump);
            assert_eq!(actor.water_pumped, 5e9);
        }
        assert!(!record.quota_violation);
    }
    assert_eq!(result.scores().compliance, 1.0);
}

#[test]
fn test_high_scarcity_reaches_crisis() {
    let mut config = scenario(120, 1);
    config.scarcity = Scarcity::High;

    let sim = Simulation::new(config, Box::new(HardQuota::default()), Box::new(NoIncentive)).unwrap();
    let result = sim.run_iteration(0).unwrap();
    assert!(result
        .history
        .iter()
        .any(|r| r.crisis_level == CrisisLevel::Crisis));
}

#[test]
fn test_batch_scores_are_reproducible() {
    let run = || {
        let mut sim = Simulation::new(
            scenario(60, 5),
            Box::new(HardQuota::default()),
            Box::new(MixedPolicy::default()),
        )
        .unwrap();
        sim.run().iteration_scores_scaled()
    };

    let first = run();
    let second = run();
    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_single_iteration_matches_batch() {
    let mut sim = Simulation::new(
        scenario(48, 4),
        Box::new(HardQuota::default()),
        Box::new(FinePolicy::default()),
    )
    .unwrap();

    let alone = sim.run_iteration(2).unwrap();
    let again = sim.run_iteration(2).unwrap();
    assert_eq!(alone, again);

    let report = sim.run();
    assert_eq!(report.iteration(2), Some(&alone));
}

#[test]
fn test_different_seeds_give_different_histories() {
    let mut config = scenario(48, 1);
    let a = Simulation::new(config.clone(), Box::new(NoQuota), Box::new(NoIncentive))
        .unwrap()
        .run_iteration(0)
        .unwrap();
    config.seed += 1;
    let b = Simulation::new(config, Box::new(NoQuota), Box::new(NoIncentive))
        .unwrap()
        .run_iteration(0)
        .unwrap();
    assert_ne!(a.history, b.history);
}

// ============================================================================
// Invariants over full runs
// ============================================================================

#[test]
fn test_tendency_stays_in_unit_interval_with_huge_incentives() {
    let mut sim = Simulation::new(
        scenario(120, 2),
        Box::new(HardQuota::default()),
        Box::new(SubsidyPolicy { amount: 1e9 }),
    )
    .unwrap();

    for result in &sim.run().completed {
        for record in &result.history {
            for actor in &record.actors {
                assert!((0.0..=1.0).contains(&actor.tendency));
            }
        }
        assert!(result.final_tendencies.iter().all(|t| (0.0..=1.0).contains(t)));
    }
}

#[test]
fn test_scaled_turn_impacts_within_unit_interval() {
    let mut config = scenario(120, 2);
    config.scarcity = Scarcity::High;
    let mut sim = Simulation::new(config, Box::new(HardQuota::default()), Box::new(FinePolicy::default())).unwrap();

    for result in &sim.run().completed {
        for record in &result.history {
            for (raw, bounds) in [
                (record.ecological_impact, record.ecological_bounds),
                (record.economic_impact, record.economic_bounds),
            ] {
                if bounds.max > bounds.min {
                    let scaled = (raw - bounds.min) / (bounds.max - bounds.min);
                    assert!((-1e-9..=1.0 + 1e-9).contains(&scaled), "scaled {}", scaled);
                }
            }
        }
        let scaled = result.scaled_scores();
        assert!((0.0..=1.0).contains(&scaled.ecological_impact));
        assert!((0.0..=1.0).contains(&scaled.economic_impact));
    }
}

#[test]
fn test_fines_make_cooperation_more_common_than_subsidy_free_defection() {
    let mut config = scenario(240, 4);
    config.scarcity = Scarcity::High;

    let mean_final_tendency = |incentive: Box<dyn IncentivePolicy>| {
        let mut sim = Simulation::new(config.clone(), Box::new(HardQuota::default()), incentive).unwrap();
        let report = sim.run();
        let all: Vec<f64> = report
            .completed
            .iter()
            .flat_map(|r| r.final_tendencies.iter().copied())
            .collect();
        all.iter().sum::<f64>() / all.len() as f64
    };

    let fined = mean_final_tendency(Box::new(FinePolicy { amount: 50.0 }));
    let free = mean_final_tendency(Box::new(NoIncentive));
    assert!(fined > free, "fined {} vs free {}", fined, free);
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_invalid_priority_is_fatal() {
    let mut config = scenario(12, 1);
    config.actor_priorities = vec![2, 1, 5];
    let result = Simulation::new(config, Box::new(NoQuota), Box::new(NoIncentive));
    assert!(matches!(
        result,
        Err(SimError::Configuration(ConfigError::InvalidPriority { actor: 2, value: 5 }))
    ));
}

struct ShortQuota;

impl QuotaPolicy for ShortQuota {
    fn name(&self) -> &str {
        "short"
    }

    fn compute_quota(&self, ctx: &QuotaContext) -> Vec<f64> {
        vec![1.0; ctx.nb_actors() - 1]
    }
}

#[test]
fn test_broken_quota_policy_aborts_every_iteration() {
    let mut sim = Simulation::new(scenario(12, 3), Box::new(ShortQuota), Box::new(NoIncentive)).unwrap();
    let report = sim.run();

    assert_eq!(report.failure_count(), 3);
    assert_eq!(report.failed_indices(), vec![0, 1, 2]);
    assert!(report.completed.is_empty());
    for failure in &report.failures {
        assert_eq!(failure.violation.turn, 0);
        assert_eq!(
            failure.violation.stage,
            ViolationSource::QuotaPolicy("short".into())
        );
        assert_eq!(
            failure.violation.kind,
            ViolationKind::WrongLength { expected: 3, got: 2 }
        );
    }

    assert_eq!(sim.state(), SimulationState::Finished);
    assert!(sim.get_final_scores().is_none());
}

/// Pays nothing, except NaN when the first actor defects on turn 4
struct FragileIncentive;

const FRAGILE_TURN: usize = 4;

impl IncentivePolicy for FragileIncentive {
    fn name(&self) -> &str {
        "fragile"
    }

    fn compute_incentive(&self, ctx: &IncentiveContext) -> Vec<f64> {
        let mut out = vec![0.0; ctx.nb_actors()];
        if ctx.water_flows.len() == FRAGILE_TURN + 1 && ctx.actions[0] == Action::Defect {
            out[0] = f64::NAN;
        }
        out
    }
}

#[test]
fn test_batch_continues_past_failing_iterations() {
    let config = scenario(24, 8);

    // Until it breaks, the fragile policy behaves exactly like no incentive
    let mut reference =
        Simulation::new(config.clone(), Box::new(HardQuota::default()), Box::new(NoIncentive)).unwrap();
    let expected_failures: Vec<u32> = reference
        .run()
        .completed
        .iter()
        .filter(|r| r.history[FRAGILE_TURN].actors[0].action == Action::Defect)
        .map(|r| r.index)
        .collect();

    let mut sim = Simulation::new(config, Box::new(HardQuota::default()), Box::new(FragileIncentive)).unwrap();
    let report = sim.run();

    assert_eq!(report.failed_indices(), expected_failures);
    assert_eq!(report.completed.len() + report.failure_count(), 8);
    for failure in &report.failures {
        assert_eq!(failure.violation.turn as usize, FRAGILE_TURN);
        assert!(matches!(failure.violation.kind, ViolationKind::NonFinite { .. }));
    }
    for result in &report.completed {
        assert_eq!(result.history.len(), 24);
    }
}

#[test]
fn test_overflowing_forecast_aborts_every_iteration() {
    let mut config = scenario(12, 2);
    config.forecast_bias = 1e308;

    let mut sim = Simulation::new(config, Box::new(HardQuota::default()), Box::new(NoIncentive)).unwrap();
    let report = sim.run();

    assert!(report.completed.is_empty());
    assert_eq!(report.failed_indices(), vec![0, 1]);
    for failure in &report.failures {
        assert_eq!(failure.violation.stage, ViolationSource::Hydrology);
        assert_eq!(failure.violation.turn, 0);
        assert!(matches!(
            &failure.violation.kind,
            ViolationKind::NonFinite { what, value } if what == "forecast" && value.is_infinite()
        ));
    }
}

#[test]
fn test_series_has_one_entry_per_turn() {
    let sim = Simulation::new(scenario(36, 1), Box::new(HardQuota::default()), Box::new(MixedPolicy::default())).unwrap();
    let series = sim.run_iteration(0).unwrap().series();

    assert_eq!(series.len(), 36);
    assert_eq!(series.tendency.len(), 3);
    for per_actor in [&series.quota, &series.water_used, &series.fines, &series.subsidies, &series.reward] {
        assert!(per_actor.iter().all(|s| s.len() == 36));
    }
    assert!(series.crisis_level.iter().all(|l| (-1..=2).contains(l)));
}
