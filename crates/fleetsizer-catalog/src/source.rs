//! Catalog provider interface.

use fleet_core::Machine;

use crate::error::CatalogResult;

/// An ordered machine catalog.
///
/// Implementations return one record per configured instance-type name,
/// in the configured preference order. A name the provider cannot
/// resolve is an error for the whole fetch, not a skipped entry.
pub trait NodeSource {
    fn fetch(&self) -> CatalogResult<Vec<Machine>>;
}
