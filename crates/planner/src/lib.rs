//! Boothpack Planner - turn probe results into an inclusion plan.

pub mod builder;
pub mod layout;
pub mod plugins;
pub mod report;

pub use builder::{PlanBuilder, PlanOptions};
pub use report::{ModulePresence, ProbeReport};
