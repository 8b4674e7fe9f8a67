//! Water users: state, decisions and learning

pub mod actor;
pub mod learning;
pub mod manager;

pub use actor::{update_rolling_stats, Actor, RollingStats};
pub use learning::update_tendency;
pub use manager::{decide_action, decide_pump, ActorManager};
