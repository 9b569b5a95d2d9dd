//! Machine catalog records.

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;
use crate::resources::Resources;

/// One machine type from the catalog, immutable after fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub instance_type: String,
    /// Region-specific Linux on-demand price, USD per hour.
    pub on_demand_price_usd: f64,
    pub vcpu: u32,
    /// Catalog memory in GiB. May be fractional in the catalog; exposed
    /// to the scheduler truncated to whole GiB.
    pub memory_gib: f32,
    pub gpu: u32,
    /// Maximum schedulable units per node of this type.
    pub max_pods: u32,
    pub arch: Vec<String>,
}

impl Machine {
    pub fn hourly_price(&self) -> f64 {
        self.on_demand_price_usd
    }

    /// Allocatable capacity of one node of this type.
    pub fn allocatable(&self) -> Resources {
        Resources {
            cpu: Quantity::from_whole(i64::from(self.vcpu)),
            memory: Quantity::gibi(self.memory_gib as i64),
            gpu: Quantity::from_whole(i64::from(self.gpu)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocatable_truncates_fractional_memory() {
        let machine = Machine {
            instance_type: "t3.small".to_string(),
            on_demand_price_usd: 0.0208,
            vcpu: 2,
            memory_gib: 1.9,
            gpu: 0,
            max_pods: 11,
            arch: vec!["x86_64".to_string()],
        };

        let alloc = machine.allocatable();
        assert_eq!(alloc.cpu, "2".parse().unwrap());
        assert_eq!(alloc.memory, "1Gi".parse().unwrap());
        assert_eq!(alloc.gpu, Quantity::ZERO);
    }
}
