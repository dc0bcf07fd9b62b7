//! Perfume catalog entity and its read models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Natural key of a perfume record.
pub type PerfumeId = String;

/// Catalog record owned exclusively by the catalog service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perfume {
    /// Immutable after creation.
    pub perfume_id: PerfumeId,
    pub name: String,
    /// Free text, also the grouping key for search results.
    pub ingredients: String,
    pub release_date: Option<NaiveDate>,
    pub concentration: String,
    pub longevity: String,
    /// Must name an existing manufacturer at write time.
    pub manufacturer_id: String,
}

impl Perfume {
    /// Builds a perfume without a release date.
    pub fn new(
        perfume_id: impl Into<String>,
        name: impl Into<String>,
        ingredients: impl Into<String>,
        concentration: impl Into<String>,
        longevity: impl Into<String>,
        manufacturer_id: impl Into<String>,
    ) -> Self {
        Self {
            perfume_id: perfume_id.into(),
            name: name.into(),
            ingredients: ingredients.into(),
            release_date: None,
            concentration: concentration.into(),
            longevity: longevity.into(),
            manufacturer_id: manufacturer_id.into(),
        }
    }

    pub fn with_release_date(mut self, release_date: NaiveDate) -> Self {
        self.release_date = Some(release_date);
        self
    }

    /// Copies every mutable field from `source`, keeping `perfume_id` untouched.
    pub fn apply_changes(&mut self, source: &Perfume) {
        self.name.clone_from(&source.name);
        self.ingredients.clone_from(&source.ingredients);
        self.release_date = source.release_date;
        self.concentration.clone_from(&source.concentration);
        self.longevity.clone_from(&source.longevity);
        self.manufacturer_id.clone_from(&source.manufacturer_id);
    }
}

/// Perfume enriched with its manufacturer's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfumeView {
    #[serde(flatten)]
    pub perfume: Perfume,
    /// `None` when the referenced manufacturer cannot be resolved.
    pub manufacturer_name: Option<String>,
}

impl PerfumeView {
    pub fn perfume_id(&self) -> &str {
        &self.perfume.perfume_id
    }
}

/// Perfumes sharing the exact same `ingredients` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientGroup {
    pub ingredients: String,
    /// Members in match order.
    pub perfumes: Vec<PerfumeView>,
}

#[cfg(test)]
mod tests {
    use super::Perfume;
    use chrono::NaiveDate;

    #[test]
    fn apply_changes_keeps_identifier() {
        let mut stored = Perfume::new("P1", "Old Name", "Musk", "EDT", "4h", "M1");
        let incoming = Perfume::new("P9", "New Name", "Amber", "EDP", "8h", "M2")
            .with_release_date(NaiveDate::from_ymd_opt(2020, 5, 1).unwrap());

        stored.apply_changes(&incoming);

        assert_eq!(stored.perfume_id, "P1");
        assert_eq!(stored.name, "New Name");
        assert_eq!(stored.ingredients, "Amber");
        assert_eq!(stored.concentration, "EDP");
        assert_eq!(stored.longevity, "8h");
        assert_eq!(stored.manufacturer_id, "M2");
        assert_eq!(stored.release_date, incoming.release_date);
    }
}
