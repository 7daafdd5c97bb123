//! Inclusion plan definitions for boothpack.
//!
//! This crate defines the contract between the planner and the bundling
//! backends: the ordered inclusion entries, the plan that owns them, and the
//! schema the serialized plan must satisfy.

pub mod inclusion;
pub mod plan;
pub mod schema;
pub mod validation;

pub use inclusion::InclusionEntry;
pub use plan::{Backend, InclusionPlan, OutputMode, PlanDocument, PlanWarning};
pub use validation::{validate_plan, ValidationError, ValidationResult};

/// Current plan schema version.
pub const PLAN_SCHEMA_VERSION: &str = "1.0.0";
