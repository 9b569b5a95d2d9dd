//! Planning config file parser.
//!
//! ```yaml
//! nodes:
//!   aws:
//!     region: us-east-1
//!     instanceTypes: [m5.large, m5.xlarge]
//! pods: |
//!   pod(cpu: "500m", memory: "2Gi") * 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not deserialize config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub nodes: NodesConfig,
    /// Workload DSL text.
    #[serde(default)]
    pub pods: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodesConfig {
    pub aws: AwsNodesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsNodesConfig {
    /// Catalog region key (e.g. `us-east-1`).
    pub region: String,
    /// Ordered machine-type preference.
    #[serde(rename = "instanceTypes", default)]
    pub instance_types: Vec<String>,
}

impl PlanConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}
