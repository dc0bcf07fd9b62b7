//! Manufacturer entity, referenced (not owned) by perfumes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub manufacturer_id: String,
    /// Display name used to enrich perfume views and to sort listings.
    pub name: String,
    pub country: String,
    pub address: String,
}

impl Manufacturer {
    pub fn new(
        manufacturer_id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            manufacturer_id: manufacturer_id.into(),
            name: name.into(),
            country: country.into(),
            address: address.into(),
        }
    }
}
