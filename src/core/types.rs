//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for actors (index into the actor table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Simulation turn counter (one turn = one month)
pub type Turn = u32;

/// Number of turns making up one hydrological year
pub const TURNS_PER_YEAR: u32 = 12;

/// Priority class of a water user
///
/// Lower classes are cut first when the river enters a crisis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            _ => None,
        }
    }

    pub fn level(self) -> i8 {
        self as i8
    }
}

/// Regulatory crisis level of the river
///
/// Discriminants match the numeric codes used by quota policies:
/// an actor whose priority is at or below the level gets cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CrisisLevel {
    Normal = -1,
    Alert = 0,
    HighAlert = 1,
    Crisis = 2,
}

impl CrisisLevel {
    /// Levels from least to most severe
    pub const ORDERED: [CrisisLevel; 4] = [
        CrisisLevel::Normal,
        CrisisLevel::Alert,
        CrisisLevel::HighAlert,
        CrisisLevel::Crisis,
    ];

    pub fn code(self) -> i8 {
        self as i8
    }

    /// True when this level removes the quota of an actor of the given priority
    pub fn restricts(self, priority: Priority) -> bool {
        priority.level() <= self.code()
    }
}

impl Default for CrisisLevel {
    fn default() -> Self {
        Self::Normal
    }
}

/// Choice an actor makes each turn in the withdrawal game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Cooperate,
    Defect,
}

impl Action {
    pub fn is_cooperate(self) -> bool {
        matches!(self, Self::Cooperate)
    }

    /// Numeric encoding used by incentive policies (cooperate = 1, defect = 0)
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Cooperate => 1.0,
            Self::Defect => 0.0,
        }
    }
}

/// Theoretical impact range for one turn
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactBounds {
    pub min: f64,
    pub max: f64,
}

/// Scenario-wide water scarcity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scarcity {
    Low,
    Medium,
    High,
}

impl Scarcity {
    /// Multiplier applied to the base hydrology series
    pub fn flow_factor(self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 0.75,
            Self::High => 0.5,
        }
    }
}

impl Default for Scarcity {
    fn default() -> Self {
        Self::Medium
    }
}
