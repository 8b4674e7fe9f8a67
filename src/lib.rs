//! River Commons - Evolutionary Game of Shared Water Allocation

pub mod actors;
pub mod allocation;
pub mod analysis;
pub mod core;
pub mod ecology;
pub mod hydrology;
pub mod policy;
pub mod simulation;
