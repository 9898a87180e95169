//! Validation of record drafts.
//!
//! Validation never fails: it returns a [`ValidationErrors`] map from field
//! key to message, empty when the draft may be saved. Every rule runs; one
//! failing rule does not hide another.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::{FlightRecord, Leg, Reminder};

/// Field-level validation problems, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// An empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem for a field. A later message for the same field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Whether the draft passed every rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with problems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the given field has a problem.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// The message recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a flight record draft against its movement type.
#[must_use]
pub fn validate_flight(record: &FlightRecord) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if is_blank(&record.flight_number) {
        errors.add("flightNumber", "flight number is required");
    }
    if is_blank(&record.aircraft_type) {
        errors.add("aircraftType", "aircraft type is required");
    }
    if is_blank(&record.operator) {
        errors.add("operator", "operator is required");
    }
    if record.flight_type.is_none() {
        errors.add("flightType", "select arrival, departure or turnaround");
    }
    if record.flight_nature.is_none() {
        errors.add("flightNature", "flight nature is required");
    }

    for &leg in record.active_legs() {
        validate_leg(record, leg, &mut errors);
    }

    errors
}

fn validate_leg(record: &FlightRecord, leg: Leg, errors: &mut ValidationErrors) {
    let details = record.leg(leg);

    if is_blank(&details.airport) {
        let message = match leg {
            Leg::Arrival => "origin is required",
            Leg::Departure => "destination is required",
        };
        errors.add(leg.endpoint_field(), message);
    }
    if is_blank(&details.reg_vp) {
        errors.add(
            leg.registry_field(),
            format!("{leg} registry number is required"),
        );
    }
    if !record.checklist.classification(leg).is_classified() {
        errors.add(
            leg.classification_field(),
            format!("classify the {leg} leg as Schengen or non-Schengen"),
        );
    }
}

/// Validate a reminder before saving.
#[must_use]
pub fn validate_reminder(reminder: &Reminder) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if is_blank(&reminder.subject) {
        errors.add("subject", "subject is required");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Classification, FlightNature, FlightType, ReminderType};

    fn complete(flight_type: FlightType) -> FlightRecord {
        let mut record = FlightRecord::draft("Ana", "inspector");
        record.flight_number = "TP1699".to_string();
        record.aircraft_type = "A320".to_string();
        record.operator = "TAP".to_string();
        record.flight_nature = Some(FlightNature::Private);
        record.set_flight_type(flight_type, "LPPS");
        for &leg in flight_type.active_legs() {
            let details = record.leg_mut(leg);
            details.airport = "LIS".to_string();
            details.reg_vp = format!("{leg}-001");
            record.checklist.classify(leg, Classification::Schengen);
        }
        record
    }

    #[test]
    fn test_complete_records_are_valid() {
        for flight_type in FlightType::ALL {
            let errors = validate_flight(&complete(flight_type));
            assert!(errors.is_empty(), "{flight_type}: {errors}");
        }
    }

    #[test]
    fn test_blank_draft_reports_all_header_fields() {
        let errors = validate_flight(&FlightRecord::default());
        for field in [
            "flightNumber",
            "aircraftType",
            "operator",
            "flightType",
            "flightNature",
        ] {
            assert!(errors.contains(field), "missing {field}");
        }
        // No movement type means no active legs to check.
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let mut record = complete(FlightType::Arrival);
        record.operator = "   ".to_string();
        let errors = validate_flight(&record);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("operator"));
    }

    #[test]
    fn test_arrival_missing_origin_and_registry() {
        let mut record = complete(FlightType::Arrival);
        record.arrival.airport.clear();
        record.arrival.reg_vp.clear();

        let errors = validate_flight(&record);
        assert!(errors.contains("origin"));
        assert!(errors.contains("regVPArrival"));
        assert!(!errors.contains("destination"));
    }

    #[test]
    fn test_inactive_leg_is_not_checked() {
        let record = complete(FlightType::Arrival);
        assert!(record.departure.reg_vp.is_empty());
        assert!(validate_flight(&record).is_empty());
    }

    #[test]
    fn test_departure_unclassified() {
        let mut record = complete(FlightType::Departure);
        record
            .checklist
            .classify(Leg::Departure, Classification::Unclassified);

        let errors = validate_flight(&record);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("departure_checklist_type"));
    }

    #[test]
    fn test_turnaround_requires_both_classifications() {
        let mut record = complete(FlightType::Turnaround);
        record
            .checklist
            .classify(Leg::Departure, Classification::Unclassified);

        let errors = validate_flight(&record);
        assert!(errors.contains("departure_checklist_type"));
        assert!(!errors.contains("arrival_checklist_type"));
    }

    #[test]
    fn test_legacy_conflicting_flags_are_rejected() {
        let mut record = complete(FlightType::Arrival);
        record
            .checklist
            .classify(Leg::Arrival, Classification::from_flags(true, true));

        assert!(validate_flight(&record).contains("arrival_checklist_type"));
    }

    #[test]
    fn test_errors_display() {
        let mut errors = ValidationErrors::new();
        errors.add("origin", "origin is required");
        errors.add("flightNumber", "flight number is required");
        assert_eq!(
            errors.to_string(),
            "flightNumber: flight number is required; origin: origin is required"
        );
        assert_eq!(errors.get("origin"), Some("origin is required"));
    }

    #[test]
    fn test_errors_serialize_as_map() {
        let errors = validate_flight(&FlightRecord::default());
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["operator"], "operator is required");
    }

    #[test]
    fn test_validate_reminder() {
        let reminder = Reminder::new(" ", chrono::Utc::now(), ReminderType::Alert);
        assert!(validate_reminder(&reminder).contains("subject"));

        let reminder = Reminder::new("Brief", chrono::Utc::now(), ReminderType::Alert);
        assert!(validate_reminder(&reminder).is_empty());
    }
}
