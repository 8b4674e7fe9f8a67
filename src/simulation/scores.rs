//! End-of-run scores and their normalization

use serde::{Deserialize, Serialize};

use crate::core::types::ImpactBounds;

/// `(raw - min) / (max - min)`, or 0 when the range is empty
pub fn scale(raw: f64, min: f64, max: f64) -> f64 {
    if max > min {
        // clamp only absorbs summation rounding; raw is bracketed by construction
        ((raw - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Accumulated impact and its accumulated bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactTotals {
    pub raw: f64,
    pub min: f64,
    pub max: f64,
}

impl ImpactTotals {
    pub fn add(&mut self, raw: f64, bounds: ImpactBounds) {
        self.raw += raw;
        self.min += bounds.min;
        self.max += bounds.max;
    }

    pub fn scaled(&self) -> f64 {
        scale(self.raw, self.min, self.max)
    }
}

/// Running totals of one iteration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTotals {
    pub ecological: ImpactTotals,
    pub economic: ImpactTotals,
    pub compliant_turns: u32,
    pub total_turns: u32,
}

impl RunTotals {
    pub fn record_turn(
        &mut self,
        ecological: f64,
        ecological_bounds: ImpactBounds,
        economic: f64,
        economic_bounds: ImpactBounds,
        quota_violation: bool,
    ) {
        self.ecological.add(ecological, ecological_bounds);
        self.economic.add(economic, economic_bounds);
        self.total_turns += 1;
        if !quota_violation {
            self.compliant_turns += 1;
        }
    }

    /// Fraction of turns in which nobody exceeded their quota
    pub fn compliance(&self) -> f64 {
        if self.total_turns == 0 {
            return 1.0;
        }
        self.compliant_turns as f64 / self.total_turns as f64
    }

    pub fn raw_scores(&self) -> FinalScores {
        FinalScores {
            ecological_impact: self.ecological.raw,
            economic_impact: self.economic.raw,
            compliance: self.compliance(),
        }
    }

    pub fn scaled_scores(&self) -> FinalScores {
        FinalScores {
            ecological_impact: self.ecological.scaled(),
            economic_impact: self.economic.scaled(),
            compliance: self.compliance(),
        }
    }
}

/// Aggregate outcome of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalScores {
    pub ecological_impact: f64,
    pub economic_impact: f64,
    pub compliance: f64,
}

impl FinalScores {
    /// Component-wise mean, `None` for an empty input
    pub fn mean<'a>(scores: impl IntoIterator<Item = &'a FinalScores>) -> Option<FinalScores> {
        let mut sum = FinalScores::default();
        let mut count = 0usize;
        for s in scores {
            sum.ecological_impact += s.ecological_impact;
            sum.economic_impact += s.economic_impact;
            sum.compliance += s.compliance;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(FinalScores {
            ecological_impact: sum.ecological_impact / n,
            economic_impact: sum.economic_impact / n,
            compliance: sum.compliance / n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        assert_eq!(scale(5.0, 0.0, 10.0), 0.5);
        assert_eq!(scale(3.0, 3.0, 3.0), 0.0);
        assert_eq!(scale(12.0, 2.0, 12.0), 1.0);
    }

    #[test]
    fn test_totals_accumulate() {
        let mut totals = RunTotals::default();
        totals.record_turn(1.0, ImpactBounds { min: 0.0, max: 2.0 }, 3.0, ImpactBounds { min: 0.0, max: 4.0 }, false);
        totals.record_turn(1.0, ImpactBounds { min: 1.0, max: 2.0 }, 1.0, ImpactBounds { min: 0.0, max: 4.0 }, true);

        assert_eq!(totals.total_turns, 2);
        assert_eq!(totals.compliance(), 0.5);

        let raw = totals.raw_scores();
        assert_eq!(raw.ecological_impact, 2.0);
        assert_eq!(raw.economic_impact, 4.0);

        let scaled = totals.scaled_scores();
        assert!((scaled.ecological_impact - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(scaled.economic_impact, 0.5);
    }

    #[test]
    fn test_mean() {
        let a = FinalScores { ecological_impact: 1.0, economic_impact: 2.0, compliance: 1.0 };
        let b = FinalScores { ecological_impact: 3.0, economic_impact: 4.0, compliance: 0.0 };
        let mean = FinalScores::mean([a, b].iter()).unwrap();
        assert_eq!(mean.ecological_impact, 2.0);
        assert_eq!(mean.compliance, 0.5);
        assert!(FinalScores::mean(std::iter::empty()).is_none());
    }
}
