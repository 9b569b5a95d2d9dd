//! Node scoring for placement decisions.
//!
//! Candidates that pass the capacity predicate are ranked by two
//! components, summed with equal weight:
//!
//! - **balanced-resource**: rewards nodes whose post-placement cpu and
//!   memory utilization ratios sit closest together
//! - **least-requested**: rewards nodes with more remaining free capacity
//!
//! Each component ranges over `0.0..=10.0`. Together they spread load
//! and prefer emptier machines.

use fleet_core::{PodUnit, Quantity, Resources};

use crate::cluster::NodeState;

/// Score a candidate node for one unit. `None` means the unit does not
/// fit and the node is out of the running.
pub fn score_node(node: &NodeState, unit: &PodUnit) -> Option<f64> {
    if !node.fits(unit) {
        return None;
    }
    let projected = node.used.saturating_add(&unit.requests);
    Some(balanced_resource(node, &projected) + least_requested(node, &projected))
}

/// `10 - |cpuFraction - memFraction| * 10`, on post-placement requests.
/// A node missing either axis entirely scores zero here.
fn balanced_resource(node: &NodeState, projected: &Resources) -> f64 {
    let cpu = projected.cpu.fraction_of(node.allocatable.cpu);
    let memory = projected.memory.fraction_of(node.allocatable.memory);
    match (cpu, memory) {
        (Some(cpu), Some(memory)) => (1.0 - (cpu - memory).abs()) * 10.0,
        _ => 0.0,
    }
}

/// Mean over cpu and memory of `free / capacity * 10`, on
/// post-placement requests.
fn least_requested(node: &NodeState, projected: &Resources) -> f64 {
    let cpu = free_fraction(projected.cpu, node.allocatable.cpu);
    let memory = free_fraction(projected.memory, node.allocatable.memory);
    (cpu + memory) / 2.0 * 10.0
}

fn free_fraction(requested: Quantity, capacity: Quantity) -> f64 {
    match capacity.saturating_sub(requested).fraction_of(capacity) {
        Some(fraction) => fraction,
        None => 0.0,
    }
}
