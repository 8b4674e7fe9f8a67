//! Actor decisions and learning for one iteration

use rand::Rng;

use crate::actors::actor::{update_rolling_stats, Actor, RollingStats};
use crate::actors::learning::update_tendency;
use crate::core::config::{LearningParams, ScenarioConfig};
use crate::core::types::{Action, ActorId, Priority};

/// Bernoulli draw with the actor's tendency as success probability
///
/// Consumes exactly one draw from `rng`.
pub fn decide_action<R: Rng>(actor: &Actor, rng: &mut R) -> Action {
    let roll: f64 = rng.gen();
    if roll < actor.tendency {
        Action::Cooperate
    } else {
        Action::Defect
    }
}

/// Intended withdrawal for the chosen action
///
/// Cooperators respect the quota. Defectors ignore it and take their demand,
/// limited only by physical capacity.
pub fn decide_pump(action: Action, demand: f64, quota: f64, max_pump: f64) -> f64 {
    match action {
        Action::Cooperate => demand.min(quota).min(max_pump),
        Action::Defect => demand.min(max_pump),
    }
}

/// Owns the actors of one iteration
#[derive(Debug, Clone)]
pub struct ActorManager {
    actors: Vec<Actor>,
    learning: LearningParams,
    max_pump: f64,
}

impl ActorManager {
    pub fn new(actors: Vec<Actor>, learning: LearningParams, max_pump: f64) -> Self {
        Self {
            actors,
            learning,
            max_pump,
        }
    }

    /// Fresh actors for a new iteration
    ///
    /// Rolling averages start at full demand so the first quotas are not
    /// artificially tight.
    pub fn from_config(config: &ScenarioConfig) -> Self {
        let actors = config
            .priorities()
            .into_iter()
            .zip(config.demands())
            .enumerate()
            .map(|(i, (priority, demand))| {
                let income = config.unit_value * demand.min(config.max_pump);
                Actor::new(
                    ActorId(i as u32),
                    priority,
                    config.initial_tendency,
                    demand,
                    RollingStats::new(demand, income),
                )
            })
            .collect();

        Self::new(actors, config.learning.clone(), config.max_pump)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn max_pump(&self) -> f64 {
        self.max_pump
    }

    pub fn priorities(&self) -> Vec<Priority> {
        self.actors.iter().map(|a| a.priority).collect()
    }

    pub fn demands(&self) -> Vec<f64> {
        self.actors.iter().map(|a| a.demand).collect()
    }

    pub fn tendencies(&self) -> Vec<f64> {
        self.actors.iter().map(|a| a.tendency).collect()
    }

    pub fn avg_pumps(&self) -> Vec<f64> {
        self.actors.iter().map(|a| a.stats.avg_pump).collect()
    }

    pub fn avg_incomes(&self) -> Vec<f64> {
        self.actors.iter().map(|a| a.stats.avg_income).collect()
    }

    /// One action per actor, drawn in actor order
    pub fn decide_actions<R: Rng>(&self, rng: &mut R) -> Vec<Action> {
        self.actors.iter().map(|a| decide_action(a, rng)).collect()
    }

    /// Intended withdrawals given actions and quotas
    pub fn intended_pumps(&self, actions: &[Action], quotas: &[f64]) -> Vec<f64> {
        self.actors
            .iter()
            .zip(actions.iter().zip(quotas))
            .map(|(actor, (&action, &quota))| {
                decide_pump(action, actor.demand, quota, self.max_pump)
            })
            .collect()
    }

    /// Withdrawal every actor would attempt with no regulation at all
    pub fn unrestricted_pumps(&self) -> Vec<f64> {
        self.actors
            .iter()
            .map(|a| decide_pump(Action::Defect, a.demand, 0.0, self.max_pump))
            .collect()
    }

    /// Apply the outcome of a turn: tendency from reward, then rolling stats
    ///
    /// The learning baseline is the average income before this turn.
    pub fn learn(&mut self, actions: &[Action], realized: &[f64], incomes: &[f64], rewards: &[f64]) {
        let horizon = self.learning.rolling_horizon;
        for (i, actor) in self.actors.iter_mut().enumerate() {
            actor.tendency = update_tendency(
                actor.tendency,
                actions[i],
                rewards[i],
                actor.stats.avg_income,
                &self.learning,
            );
            actor.stats = update_rolling_stats(actor.stats, realized[i], incomes[i], horizon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn actor(tendency: f64) -> Actor {
        Actor::new(ActorId(0), Priority::Medium, tendency, 4.0, RollingStats::new(4.0, 4.0))
    }

    #[test]
    fn test_certain_tendencies() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(decide_action(&actor(1.0), &mut rng), Action::Cooperate);
            assert_eq!(decide_action(&actor(0.0), &mut rng), Action::Defect);
        }
    }

    #[test]
    fn test_action_frequency_follows_tendency() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let a = actor(0.3);
        let coop = (0..10_000)
            .filter(|_| decide_action(&a, &mut rng).is_cooperate())
            .count();
        let freq = coop as f64 / 10_000.0;
        assert!((freq - 0.3).abs() < 0.03, "frequency {}", freq);
    }

    #[test]
    fn test_cooperator_respects_quota() {
        assert_eq!(decide_pump(Action::Cooperate, 5.0, 2.0, 6.0), 2.0);
        assert_eq!(decide_pump(Action::Cooperate, 1.0, 2.0, 6.0), 1.0);
        assert_eq!(decide_pump(Action::Cooperate, 5.0, 0.0, 6.0), 0.0);
    }

    #[test]
    fn test_defector_ignores_quota_but_not_capacity() {
        assert_eq!(decide_pump(Action::Defect, 5.0, 0.0, 6.0), 5.0);
        assert_eq!(decide_pump(Action::Defect, 9.0, 2.0, 6.0), 6.0);
    }

    #[test]
    fn test_from_config_builds_fresh_actors() {
        let config = ScenarioConfig::default();
        let manager = ActorManager::from_config(&config);
        assert_eq!(manager.len(), 3);
        assert_eq!(
            manager.priorities(),
            vec![Priority::High, Priority::Medium, Priority::Low]
        );
        assert!(manager.tendencies().iter().all(|&t| t == config.initial_tendency));
        assert_eq!(manager.avg_pumps(), config.demands());
    }

    #[test]
    fn test_learn_updates_tendency_and_stats() {
        let config = ScenarioConfig::default();
        let mut manager = ActorManager::from_config(&config);
        let before = manager.actors()[0].clone();

        manager.learn(&[Action::Cooperate; 3], &[0.0; 3], &[0.0; 3], &[20.0; 3]);

        let after = &manager.actors()[0];
        assert!(after.tendency > before.tendency);
        assert!(after.stats.avg_pump < before.stats.avg_pump);
        assert_eq!(after.priority, before.priority);
    }
}
