//! The cost-minimizing search.
//!
//! Machines in catalog order; per machine a count-growing loop that
//! stops as soon as the running monthly price exceeds the best feasible
//! fleet found so far. Simulator success is monotone in node count, so
//! the first feasible count per machine is also its cheapest.

use tracing::{debug, info};

use fleet_core::{Machine, PodUnit};
use fleetsizer_sim::PlacementOracle;

pub const HOURS_PER_DAY: f64 = 24.0;
/// Months are billed as 31 days; changing this changes user-visible
/// prices.
pub const DAYS_PER_MONTH: f64 = 31.0;

/// The single best fleet found by the search.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub instance_type: String,
    pub node_count: u32,
    pub monthly_price_usd: f64,
}

/// Sweep every machine and return the cheapest feasible fleet, or
/// `None` when no machine converges.
pub fn find_cheapest_fleet(
    machines: &[Machine],
    units: &[PodUnit],
    oracle: &dyn PlacementOracle,
) -> Option<Recommendation> {
    let mut best: Option<Recommendation> = None;

    for machine in machines {
        // Single-node clusters are never proposed.
        let mut node_count: u32 = 2;

        loop {
            let monthly =
                machine.hourly_price() * f64::from(node_count) * HOURS_PER_DAY * DAYS_PER_MONTH;

            // Growing the count only ever raises the price, so once we
            // pass the best known fleet this machine is done.
            if let Some(best) = &best {
                if monthly > best.monthly_price_usd {
                    debug!(
                        machine = %machine.instance_type,
                        node_count,
                        monthly,
                        "pruned: already costlier than best fleet"
                    );
                    break;
                }
            }

            let outcome = oracle.assess(units, machine, node_count);
            debug!(machine = %machine.instance_type, node_count, ?outcome, "simulated");

            if outcome.is_feasible() {
                let cheaper = best
                    .as_ref()
                    .map_or(true, |b| monthly < b.monthly_price_usd);
                if cheaper {
                    info!(
                        machine = %machine.instance_type,
                        node_count,
                        monthly,
                        "new best fleet"
                    );
                    best = Some(Recommendation {
                        instance_type: machine.instance_type.clone(),
                        node_count,
                        monthly_price_usd: monthly,
                    });
                }
                break;
            }

            // Faster than counting by one on machines that need dozens
            // of nodes, and still exact up to 15.
            node_count += (node_count / 15).max(1);
        }
    }

    best
}
