//! Water allocation and economics

pub mod allocator;
pub mod economics;

pub use allocator::{allocate, has_quota_violation, Allocation, WaterAllocator};
pub use economics::{compute_economic_bounds, compute_economic_impact, EconomicOutcome, ValueFunction};
