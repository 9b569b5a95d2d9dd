//! Machine pre-filter.
//!
//! A machine that cannot host some unit on a single axis can never host
//! it at any node count, so simulating it would be wasted work. Each
//! rejection logs a warning naming the machine, the violating axis, the
//! machine's capacity and the unit's demand.

use tracing::warn;

use fleet_core::{Machine, PodUnit};

/// Keep exactly the machines whose allocatable covers every unit on
/// every axis. Catalog order is preserved.
pub fn filter_machines(machines: Vec<Machine>, units: &[PodUnit]) -> Vec<Machine> {
    machines
        .into_iter()
        .filter(|machine| {
            let allocatable = machine.allocatable();
            for unit in units {
                if let Some(axis) = allocatable.first_violation(&unit.requests) {
                    warn!(
                        machine = %machine.instance_type,
                        %axis,
                        capacity = %allocatable.get(axis),
                        demand = %unit.requests.get(axis),
                        "ignoring machine type: a unit demands more than one node provides"
                    );
                    return false;
                }
            }
            true
        })
        .collect()
}
