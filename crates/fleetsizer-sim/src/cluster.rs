//! Cluster state owned by a single simulation.

use fleet_core::{Machine, PodUnit, Resources};

/// A transient node view: fixed allocatable capacity plus what the
/// scheduler has placed so far. Destroyed with the simulation.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub name: String,
    pub allocatable: Resources,
    pub max_units: u32,
    pub used: Resources,
    pub placed: Vec<String>,
}

impl NodeState {
    pub fn new(name: impl Into<String>, allocatable: Resources, max_units: u32) -> NodeState {
        NodeState {
            name: name.into(),
            allocatable,
            max_units,
            used: Resources::default(),
            placed: Vec::new(),
        }
    }

    /// The admission rule: axis-wise non-strict fit plus the per-node
    /// unit-density cap. There are no labels, taints or affinities in
    /// this closed world.
    pub fn fits(&self, unit: &PodUnit) -> bool {
        if self.placed.len() as u32 >= self.max_units {
            return false;
        }
        let projected = self.used.saturating_add(&unit.requests);
        self.allocatable.covers(&projected)
    }

    pub fn place(&mut self, unit: &PodUnit) {
        self.used = self.used.saturating_add(&unit.requests);
        self.placed.push(unit.name.clone());
    }
}

/// All nodes of one simulated fleet.
#[derive(Debug, Clone)]
pub struct ClusterState {
    pub nodes: Vec<NodeState>,
}

impl ClusterState {
    /// `count` identical nodes of one machine type, named `node-<j>`.
    pub fn homogeneous(machine: &Machine, count: u32) -> ClusterState {
        let allocatable = machine.allocatable();
        let nodes = (0..count)
            .map(|j| NodeState::new(format!("node-{j}"), allocatable, machine.max_pods))
            .collect();
        ClusterState { nodes }
    }
}
