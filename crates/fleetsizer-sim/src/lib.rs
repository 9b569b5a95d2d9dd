//! fleetsizer-sim — the cluster feasibility simulator.
//!
//! Answers one question: can a scheduler honoring capacity and
//! resource-balancing constraints place every schedulable unit on a
//! homogeneous fleet of `n` nodes? The model:
//!
//! ```text
//! Simulator
//!   ├── Submitter (all units at the first tick, then end-of-stream)
//!   ├── ClusterState (per-node remaining capacity, placed units)
//!   └── per tick: placement pass
//!       ├── capacity predicate (axis-wise fit + max-unit density)
//!       └── scoring: balanced-resource + least-requested, summed
//! ```
//!
//! The verdict never depends on wall-clock time except through the
//! safety budget, checked between ticks so no placement is left
//! half-applied.

pub mod cluster;
pub mod scheduler;
pub mod scorer;
pub mod simulator;
pub mod submitter;

pub use cluster::{ClusterState, NodeState};
pub use simulator::{Outcome, PlacementOracle, Simulator, DEFAULT_BUDGET};
pub use submitter::{SubmitEvent, Submitter};
