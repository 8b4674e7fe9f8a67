//! Simulation orchestration
//!
//! `Simulation` owns the scenario and the injected policies and runs
//! independent iterations, each driven by an `IterationRunner`.

pub mod history;
pub mod iteration;
pub mod orchestrator;
pub mod scores;

pub use history::{ActorTurn, Series, TurnRecord};
pub use iteration::{iteration_rng, IterationPhase, IterationResult, IterationRunner};
pub use orchestrator::{BatchReport, IterationFailure, Simulation, SimulationState};
pub use scores::{scale, FinalScores, ImpactTotals, RunTotals};
