//! Catalog error types.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while building the machine catalog. All of these are
/// fatal for the run; nothing is retried.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not fetch max pods list: {0}")]
    DensityFetch(#[source] reqwest::Error),

    #[error("max pods list fetch did not return 200 ({0} instead)")]
    DensityStatus(u16),

    #[error("could not deserialize instance data: {0}")]
    InstanceFormat(#[from] serde_json::Error),

    #[error("could not parse max pods file, bad line: {0}")]
    DensityLine(String),

    #[error("could not find max pods for instance: {0}")]
    UnknownDensity(String),

    #[error("could not find instance data for {0}")]
    UnknownInstance(String),
}
