//! Pluggable regulation strategies
//!
//! Quota and incentive policies are injected into the simulation as boxed
//! trait objects. Their outputs are checked against the contract every turn.

pub mod incentive;
pub mod quota;

pub use incentive::{
    FinePolicy, IncentiveContext, IncentivePolicy, MixedPolicy, NoIncentive, SubsidyPolicy,
};
pub use quota::{HardQuota, NoQuota, QuotaContext, QuotaPolicy, UNRESTRICTED_QUOTA};

use crate::core::error::{ConfigError, ViolationKind};

pub const QUOTA_POLICY_NAMES: [&str; 2] = ["hard_quota", "no_quota"];
pub const INCENTIVE_POLICY_NAMES: [&str; 4] = ["no_incentive", "fine", "subsidy", "mixed"];

/// Build a reference quota policy from its name
pub fn quota_policy_by_name(name: &str) -> Result<Box<dyn QuotaPolicy>, ConfigError> {
    match name {
        "hard_quota" => Ok(Box::new(HardQuota::default())),
        "no_quota" => Ok(Box::new(NoQuota)),
        _ => Err(ConfigError::UnknownPolicy {
            kind: "quota",
            name: name.to_string(),
        }),
    }
}

/// Build a reference incentive policy from its name
pub fn incentive_policy_by_name(name: &str) -> Result<Box<dyn IncentivePolicy>, ConfigError> {
    match name {
        "no_incentive" | "no_policy" => Ok(Box::new(NoIncentive)),
        "fine" => Ok(Box::new(FinePolicy::default())),
        "subsidy" | "subvention" => Ok(Box::new(SubsidyPolicy::default())),
        "mixed" => Ok(Box::new(MixedPolicy::default())),
        _ => Err(ConfigError::UnknownPolicy {
            kind: "incentive",
            name: name.to_string(),
        }),
    }
}

/// Check one value per actor, all finite
pub fn check_finite(values: &[f64], expected: usize, what: &str) -> Result<(), ViolationKind> {
    if values.len() != expected {
        return Err(ViolationKind::WrongLength {
            expected,
            got: values.len(),
        });
    }
    if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
        return Err(ViolationKind::NonFinite {
            what: what.to_string(),
            value,
        });
    }
    Ok(())
}

/// Quota contract: one finite, nonnegative value per actor
pub fn check_quota(values: &[f64], expected: usize) -> Result<(), ViolationKind> {
    check_finite(values, expected, "quota")?;
    if let Some((actor, &value)) = values.iter().enumerate().find(|(_, &v)| v < 0.0) {
        return Err(ViolationKind::Negative { actor, value });
    }
    Ok(())
}

/// Incentive contract: one finite value per actor, any sign
pub fn check_incentive(values: &[f64], expected: usize) -> Result<(), ViolationKind> {
    check_finite(values, expected, "incentive")
}
