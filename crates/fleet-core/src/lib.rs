//! fleet-core — shared types for the fleetsizer capacity planner.
//!
//! Everything here is plain owned data passed between the pipeline stages:
//! exact resource quantities, per-axis resource vectors, machine catalog
//! records, schedulable units, and the planning config file.

pub mod config;
pub mod machine;
pub mod quantity;
pub mod resources;
pub mod unit;

pub use config::{AwsNodesConfig, ConfigError, PlanConfig};
pub use machine::Machine;
pub use quantity::{Quantity, QuantityError};
pub use resources::{Axis, Resources};
pub use unit::PodUnit;
