//! AWS machine catalog.
//!
//! Resolves instance-type names against an instance-data document
//! shipped with the binary and the EKS unit-density file. The density
//! fetch is the pipeline's single point of blocking I/O; the assembled
//! [`Machine`] records are plain owned data.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use fleet_core::Machine;

use crate::density::parse_density_table;
use crate::error::{CatalogError, CatalogResult};
use crate::source::NodeSource;

/// Instance specs and per-region pricing, embedded at compile time.
const INSTANCE_DATA: &str = include_str!("../data/instances.json");

const DEFAULT_MAX_PODS_URL: &str =
    "https://raw.githubusercontent.com/awslabs/amazon-eks-ami/master/files/eni-max-pods.txt";

/// One entry of the instance-data document. Only the fields the planner
/// needs are modelled; the document carries many more.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceDoc {
    pub instance_type: String,
    #[serde(rename = "vCPU")]
    pub vcpu: u32,
    pub memory: f32,
    #[serde(rename = "GPU", default)]
    pub gpu: u32,
    #[serde(default)]
    pub arch: Vec<String>,
    #[serde(default)]
    pub pricing: HashMap<String, RegionPricing>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionPricing {
    #[serde(default)]
    pub linux: LinuxPricing,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinuxPricing {
    #[serde(default)]
    pub ondemand: f64,
}

/// Deserialize the embedded instance-data document.
pub fn embedded_instance_data() -> CatalogResult<Vec<InstanceDoc>> {
    Ok(serde_json::from_str(INSTANCE_DATA)?)
}

/// Machine catalog backed by the embedded AWS instance data and the
/// public unit-density file.
pub struct AwsNodeSource {
    region: String,
    instance_types: Vec<String>,
    max_pods_url: String,
}

impl AwsNodeSource {
    pub fn new(region: impl Into<String>, instance_types: Vec<String>) -> AwsNodeSource {
        AwsNodeSource {
            region: region.into(),
            instance_types,
            max_pods_url: DEFAULT_MAX_PODS_URL.to_string(),
        }
    }

    /// Point the density fetch somewhere else (tests, mirrors).
    pub fn with_max_pods_url(mut self, max_pods_url: impl Into<String>) -> AwsNodeSource {
        self.max_pods_url = max_pods_url.into();
        self
    }

    fn fetch_density_table(&self) -> CatalogResult<HashMap<String, u32>> {
        debug!(url = %self.max_pods_url, "fetching max pods list");
        let response =
            reqwest::blocking::get(&self.max_pods_url).map_err(CatalogError::DensityFetch)?;
        if !response.status().is_success() {
            return Err(CatalogError::DensityStatus(response.status().as_u16()));
        }
        let text = response.text().map_err(CatalogError::DensityFetch)?;
        parse_density_table(&text)
    }
}

impl NodeSource for AwsNodeSource {
    fn fetch(&self) -> CatalogResult<Vec<Machine>> {
        let docs = embedded_instance_data()?;
        let density = self.fetch_density_table()?;
        assemble(&self.region, &self.instance_types, &docs, &density)
    }
}

/// Join the two documents into catalog-ordered machine records.
pub fn assemble(
    region: &str,
    instance_types: &[String],
    docs: &[InstanceDoc],
    density: &HashMap<String, u32>,
) -> CatalogResult<Vec<Machine>> {
    let mut machines = Vec::with_capacity(instance_types.len());

    for instance_type in instance_types {
        let max_pods = *density
            .get(instance_type)
            .ok_or_else(|| CatalogError::UnknownDensity(instance_type.clone()))?;

        let doc = docs
            .iter()
            .find(|doc| doc.instance_type == *instance_type)
            .ok_or_else(|| CatalogError::UnknownInstance(instance_type.clone()))?;

        let on_demand = doc
            .pricing
            .get(region)
            .map(|p| p.linux.ondemand)
            .unwrap_or_default();

        machines.push(Machine {
            instance_type: doc.instance_type.clone(),
            on_demand_price_usd: on_demand,
            vcpu: doc.vcpu,
            memory_gib: doc.memory,
            gpu: doc.gpu,
            max_pods,
            arch: doc.arch.clone(),
        });
    }

    Ok(machines)
}
