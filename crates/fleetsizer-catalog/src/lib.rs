//! fleetsizer-catalog — the machine catalog adapter.
//!
//! Turns configured instance-type names into enriched [`fleet_core::Machine`]
//! records. Instance specs and per-region pricing come from a document
//! embedded at compile time; the AWS source performs the pipeline's only
//! blocking I/O, a single fetch of the unit-density table (max schedulable
//! units per machine type). Everything downstream of this crate is
//! CPU-bound.

pub mod aws;
pub mod density;
pub mod error;
pub mod source;

pub use aws::AwsNodeSource;
pub use error::{CatalogError, CatalogResult};
pub use source::NodeSource;
