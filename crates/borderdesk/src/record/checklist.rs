//! Per-leg operational checklist.
//!
//! Each leg has a fixed, ordered catalog of item ids and a Schengen
//! classification. Items not in the catalog cannot be set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::flight::Leg;
use crate::error::{Error, Result};

/// Version of the item catalogs below. Bump when items are added or renamed.
pub const CATALOG_VERSION: u32 = 1;

/// Arrival checklist items, in display order.
pub const ARRIVAL_ITEMS: &[&str] = &[
    "gendec_received",
    "passenger_manifest_received",
    "crew_list_checked",
    "travel_documents_inspected",
    "sis_consulted",
    "entry_stamps_applied",
    "customs_notified",
    "aircraft_released",
];

/// Departure checklist items, in display order.
pub const DEPARTURE_ITEMS: &[&str] = &[
    "gendec_received",
    "passenger_manifest_received",
    "crew_list_checked",
    "travel_documents_inspected",
    "exit_stamps_applied",
    "departure_authorized",
];

impl Leg {
    /// The checklist catalog for this leg.
    #[must_use]
    pub fn checklist_items(self) -> &'static [&'static str] {
        match self {
            Self::Arrival => ARRIVAL_ITEMS,
            Self::Departure => DEPARTURE_ITEMS,
        }
    }
}

/// Schengen classification of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    /// Not chosen yet. Invalid for an active leg.
    #[default]
    Unclassified,
    /// Intra-Schengen movement.
    Schengen,
    /// Movement to or from outside the Schengen area.
    NonSchengen,
}

impl Classification {
    /// Map a legacy `{leg}_type_sch` / `{leg}_type_nsch` flag pair.
    ///
    /// Neither or both set yields [`Classification::Unclassified`].
    #[must_use]
    pub fn from_flags(schengen: bool, non_schengen: bool) -> Self {
        match (schengen, non_schengen) {
            (true, false) => Self::Schengen,
            (false, true) => Self::NonSchengen,
            _ => Self::Unclassified,
        }
    }

    /// Whether a classification has been chosen.
    #[must_use]
    pub fn is_classified(self) -> bool {
        self != Self::Unclassified
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unclassified => write!(f, "unclassified"),
            Self::Schengen => write!(f, "schengen"),
            Self::NonSchengen => write!(f, "non-schengen"),
        }
    }
}

/// Checklist state of one leg.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegChecklist {
    /// Schengen classification.
    pub classification: Classification,
    items: BTreeMap<String, bool>,
}

/// Checklist state of both legs.
///
/// Documents written before the catalog was versioned read back as
/// version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Checklist {
    /// Catalog version the items were recorded against.
    #[serde(default = "first_catalog_version")]
    pub catalog_version: u32,
    /// Arrival leg.
    pub arrival: LegChecklist,
    /// Departure leg.
    pub departure: LegChecklist,
}

fn first_catalog_version() -> u32 {
    1
}

impl Default for Checklist {
    fn default() -> Self {
        Self {
            catalog_version: CATALOG_VERSION,
            arrival: LegChecklist::default(),
            departure: LegChecklist::default(),
        }
    }
}

impl Checklist {
    /// Whether the items were recorded against the current catalog.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.catalog_version == CATALOG_VERSION
    }

    fn leg(&self, leg: Leg) -> &LegChecklist {
        match leg {
            Leg::Arrival => &self.arrival,
            Leg::Departure => &self.departure,
        }
    }

    fn leg_mut(&mut self, leg: Leg) -> &mut LegChecklist {
        match leg {
            Leg::Arrival => &mut self.arrival,
            Leg::Departure => &mut self.departure,
        }
    }

    /// Classify a leg. Choosing one classification replaces the other.
    pub fn classify(&mut self, leg: Leg, classification: Classification) {
        self.leg_mut(leg).classification = classification;
    }

    /// The leg's current classification.
    #[must_use]
    pub fn classification(&self, leg: Leg) -> Classification {
        self.leg(leg).classification
    }

    /// Mark a catalog item done or not done.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownChecklistItem`] if `item` is not in the leg's
    /// catalog.
    pub fn set_item(&mut self, leg: Leg, item: &str, done: bool) -> Result<()> {
        if !leg.checklist_items().contains(&item) {
            return Err(Error::UnknownChecklistItem {
                leg: leg.as_str(),
                item: item.to_string(),
            });
        }
        self.leg_mut(leg).items.insert(item.to_string(), done);
        Ok(())
    }

    /// Whether a catalog item is done. Unknown items are never done.
    #[must_use]
    pub fn is_checked(&self, leg: Leg, item: &str) -> bool {
        self.leg(leg).items.get(item).copied().unwrap_or(false)
    }

    /// The leg's items in catalog order with their completion state.
    #[must_use]
    pub fn items(&self, leg: Leg) -> Vec<(&'static str, bool)> {
        leg.checklist_items()
            .iter()
            .map(|item| (*item, self.is_checked(leg, item)))
            .collect()
    }

    /// Completed and total item counts for a leg.
    #[must_use]
    pub fn progress(&self, leg: Leg) -> (usize, usize) {
        let items = self.items(leg);
        let done = items.iter().filter(|(_, done)| *done).count();
        (done, items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_differ() {
        assert_ne!(ARRIVAL_ITEMS.len(), DEPARTURE_ITEMS.len());
        assert!(ARRIVAL_ITEMS.contains(&"entry_stamps_applied"));
        assert!(!DEPARTURE_ITEMS.contains(&"entry_stamps_applied"));
    }

    #[test]
    fn test_classify_is_exclusive() {
        let mut checklist = Checklist::default();
        checklist.classify(Leg::Arrival, Classification::Schengen);
        checklist.classify(Leg::Arrival, Classification::NonSchengen);

        assert_eq!(
            checklist.classification(Leg::Arrival),
            Classification::NonSchengen
        );
        assert_eq!(
            checklist.classification(Leg::Departure),
            Classification::Unclassified
        );
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(
            Classification::from_flags(true, false),
            Classification::Schengen
        );
        assert_eq!(
            Classification::from_flags(false, true),
            Classification::NonSchengen
        );
        assert_eq!(
            Classification::from_flags(false, false),
            Classification::Unclassified
        );
        assert_eq!(
            Classification::from_flags(true, true),
            Classification::Unclassified
        );
    }

    #[test]
    fn test_set_item_known() {
        let mut checklist = Checklist::default();
        checklist
            .set_item(Leg::Departure, "exit_stamps_applied", true)
            .unwrap();

        assert!(checklist.is_checked(Leg::Departure, "exit_stamps_applied"));
        assert!(!checklist.is_checked(Leg::Arrival, "gendec_received"));
    }

    #[test]
    fn test_set_item_unknown_rejected() {
        let mut checklist = Checklist::default();
        let err = checklist
            .set_item(Leg::Departure, "entry_stamps_applied", true)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownChecklistItem { leg: "departure", .. }));
    }

    #[test]
    fn test_items_follow_catalog_order() {
        let mut checklist = Checklist::default();
        checklist
            .set_item(Leg::Arrival, "customs_notified", true)
            .unwrap();

        let items = checklist.items(Leg::Arrival);
        let ids: Vec<_> = items.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, ARRIVAL_ITEMS);
        assert!(items.contains(&("customs_notified", true)));
    }

    #[test]
    fn test_progress() {
        let mut checklist = Checklist::default();
        assert_eq!(checklist.progress(Leg::Departure), (0, DEPARTURE_ITEMS.len()));

        checklist
            .set_item(Leg::Departure, "gendec_received", true)
            .unwrap();
        checklist
            .set_item(Leg::Departure, "crew_list_checked", true)
            .unwrap();
        checklist
            .set_item(Leg::Departure, "crew_list_checked", false)
            .unwrap();

        assert_eq!(checklist.progress(Leg::Departure), (1, DEPARTURE_ITEMS.len()));
    }

    #[test]
    fn test_serialized_shape() {
        let mut checklist = Checklist::default();
        checklist.classify(Leg::Departure, Classification::NonSchengen);
        checklist
            .set_item(Leg::Arrival, "sis_consulted", true)
            .unwrap();

        let json = serde_json::to_value(&checklist).unwrap();
        assert_eq!(json["departure"]["classification"], "nonSchengen");
        assert_eq!(json["arrival"]["classification"], "unclassified");
        assert_eq!(json["arrival"]["items"]["sis_consulted"], true);
        assert_eq!(json["catalogVersion"], CATALOG_VERSION);
    }

    #[test]
    fn test_catalog_version_persisted() {
        let checklist = Checklist::default();
        assert_eq!(checklist.catalog_version, CATALOG_VERSION);
        assert!(checklist.is_current());

        let legacy: Checklist =
            serde_json::from_str(r#"{"arrival": {"classification": "schengen"}}"#).unwrap();
        assert_eq!(legacy.catalog_version, 1);
        assert_eq!(
            legacy.classification(Leg::Arrival),
            Classification::Schengen
        );

        let future: Checklist = serde_json::from_str(r#"{"catalogVersion": 7}"#).unwrap();
        assert_eq!(future.catalog_version, 7);
        assert!(!future.is_current());
    }
}
