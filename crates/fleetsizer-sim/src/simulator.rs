//! The simulation loop.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

use fleet_core::{Machine, PodUnit};

use crate::cluster::ClusterState;
use crate::scheduler;
use crate::submitter::{SubmitEvent, Submitter};

/// Wall-clock safety budget per simulation. The logical work for sane
/// inputs is on the order of milliseconds; the budget only catches
/// pathological ones.
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(250);

/// Simulated time advances in ticks of this many units.
const TICK: u64 = 10;

/// Verdict of one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every unit was placed and the submitter's stream drained cleanly.
    Feasible,
    /// The cluster went quiescent with units still pending.
    Infeasible,
    /// The wall-clock budget expired first. Counts as failure.
    TimedOut,
}

impl Outcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Outcome::Feasible)
    }
}

/// The feasibility question the search driver asks, as a seam: any
/// implementation will do as long as success at `n` nodes implies
/// success at `n + 1`.
pub trait PlacementOracle {
    fn assess(&self, units: &[PodUnit], machine: &Machine, node_count: u32) -> Outcome;
}

/// Discrete-time cluster simulator.
pub struct Simulator {
    budget: Duration,
}

impl Simulator {
    pub fn new() -> Simulator {
        Simulator {
            budget: DEFAULT_BUDGET,
        }
    }

    pub fn with_budget(mut self, budget: Duration) -> Simulator {
        self.budget = budget;
        self
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementOracle for Simulator {
    fn assess(&self, units: &[PodUnit], machine: &Machine, node_count: u32) -> Outcome {
        let deadline = Instant::now() + self.budget;
        let mut cluster = ClusterState::homogeneous(machine, node_count);
        let mut submitter = Submitter::new(units);
        let mut pending: VecDeque<PodUnit> = VecDeque::new();
        let mut stream_open = true;
        let mut clock: u64 = 0;

        loop {
            // Cooperative cancellation at tick boundaries only, so a
            // placement is never left half-applied.
            if Instant::now() >= deadline {
                debug!(clock, pending = pending.len(), "simulation budget expired");
                return Outcome::TimedOut;
            }

            for event in submitter.poll() {
                match event {
                    SubmitEvent::Submit(unit) => pending.push_back(unit),
                    SubmitEvent::EndOfStream => stream_open = false,
                }
            }

            let placed = scheduler::run_pass(&mut cluster, &mut pending);
            debug!(clock, placed, pending = pending.len(), "tick");

            if !stream_open {
                if pending.is_empty() {
                    return Outcome::Feasible;
                }
                if placed == 0 {
                    // Quiescent with residual units: nothing will ever
                    // free capacity in this closed world.
                    return Outcome::Infeasible;
                }
            }
            clock += TICK;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::{Quantity, Resources};

    fn machine(vcpu: u32, memory_gib: f32, gpu: u32, max_pods: u32) -> Machine {
        Machine {
            instance_type: "test.large".to_string(),
            on_demand_price_usd: 0.1,
            vcpu,
            memory_gib,
            gpu,
            max_pods,
            arch: vec!["x86_64".to_string()],
        }
    }

    fn unit(index: u64, cpu: &str, memory: &str, gpu: &str) -> PodUnit {
        PodUnit::new(
            index,
            Resources {
                cpu: cpu.parse().unwrap(),
                memory: memory.parse().unwrap(),
                gpu: gpu.parse().unwrap(),
            },
        )
    }

    #[test]
    fn empty_workload_is_feasible() {
        let sim = Simulator::new();
        assert_eq!(
            sim.assess(&[], &machine(2, 8.0, 0, 29), 2),
            Outcome::Feasible
        );
    }

    #[test]
    fn basic_workload_fits_two_nodes() {
        let sim = Simulator::new();
        let units = vec![unit(0, "1", "1Gi", "0")];
        assert_eq!(
            sim.assess(&units, &machine(2, 8.0, 0, 29), 2),
            Outcome::Feasible
        );
    }

    #[test]
    fn unit_equal_to_capacity_is_placeable() {
        let sim = Simulator::new();
        let units = vec![unit(0, "2", "8Gi", "0")];
        assert_eq!(
            sim.assess(&units, &machine(2, 8.0, 0, 29), 2),
            Outcome::Feasible
        );
    }

    #[test]
    fn empty_unit_needs_only_density_headroom() {
        let sim = Simulator::new();
        let units = vec![PodUnit::new(0, Resources::default())];
        assert_eq!(
            sim.assess(&units, &machine(0, 0.0, 0, 1), 1),
            Outcome::Feasible
        );
    }

    #[test]
    fn density_cap_forces_one_node_per_unit() {
        let sim = Simulator::new();
        let units = vec![
            unit(0, "1", "0", "0"),
            unit(1, "1", "0", "0"),
            unit(2, "1", "0", "0"),
        ];
        let tiny = machine(1, 1.0, 0, 1);

        assert_eq!(sim.assess(&units, &tiny, 2), Outcome::Infeasible);
        assert_eq!(sim.assess(&units, &tiny, 3), Outcome::Feasible);
    }

    #[test]
    fn gpu_demand_on_a_gpuless_machine_is_infeasible() {
        let sim = Simulator::new();
        let units = vec![unit(0, "1", "1Gi", "1")];
        assert_eq!(
            sim.assess(&units, &machine(2, 8.0, 0, 29), 4),
            Outcome::Infeasible
        );
    }

    #[test]
    fn bin_packing_workload_spreads_over_enough_nodes() {
        let sim = Simulator::new();
        // 10 units of half a node each: 5 nodes exactly.
        let units: Vec<_> = (0..10).map(|i| unit(i, "1", "4Gi", "0")).collect();
        let m = machine(2, 8.0, 0, 29);

        assert_eq!(sim.assess(&units, &m, 4), Outcome::Infeasible);
        assert_eq!(sim.assess(&units, &m, 5), Outcome::Feasible);
    }

    #[test]
    fn success_is_monotone_in_node_count() {
        let sim = Simulator::new();
        let units: Vec<_> = (0..9)
            .map(|i| {
                if i % 3 == 0 {
                    unit(i, "1500m", "2Gi", "0")
                } else {
                    unit(i, "250m", "3Gi", "0")
                }
            })
            .collect();
        let m = machine(2, 8.0, 0, 10);

        let mut seen_feasible = false;
        for count in 2..12 {
            let outcome = sim.assess(&units, &m, count);
            if seen_feasible {
                assert_eq!(outcome, Outcome::Feasible, "count {count}");
            }
            if outcome.is_feasible() {
                seen_feasible = true;
            }
        }
        assert!(seen_feasible);
    }

    #[test]
    fn zero_budget_times_out() {
        let sim = Simulator::new().with_budget(Duration::ZERO);
        let units = vec![unit(0, "1", "1Gi", "0")];
        assert_eq!(
            sim.assess(&units, &machine(2, 8.0, 0, 29), 2),
            Outcome::TimedOut
        );
    }

    #[test]
    fn identical_runs_produce_identical_outcomes() {
        let sim = Simulator::new();
        let units: Vec<_> = (0..20).map(|i| unit(i, "500m", "1Gi", "0")).collect();
        let m = machine(4, 16.0, 0, 8);
        let first = sim.assess(&units, &m, 3);
        for _ in 0..5 {
            assert_eq!(sim.assess(&units, &m, 3), first);
        }
    }

    #[test]
    fn gpu_workload_fits_gpu_machines() {
        let sim = Simulator::new();
        let units = vec![unit(0, "4", "32Gi", "1"), unit(1, "4", "16Gi", "1")];
        let gpu_machine = machine(8, 61.0, 1, 58);

        assert_eq!(sim.assess(&units, &gpu_machine, 2), Outcome::Feasible);
        // Both units need a whole gpu each; one node cannot host both.
        let one_unit_each = Quantity::from_whole(1);
        assert_eq!(gpu_machine.allocatable().gpu, one_unit_each);
    }
}
