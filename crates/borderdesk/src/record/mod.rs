//! Record schema for borderdesk.
//!
//! Two entity types are persisted: [`FlightRecord`] for flight movements and
//! [`Reminder`] for desk reminders.

pub mod checklist;
pub mod flight;
pub mod reminder;

pub use checklist::{Checklist, Classification, LegChecklist, ARRIVAL_ITEMS, DEPARTURE_ITEMS};
pub use flight::{
    FlightNature, FlightRecord, FlightStatus, FlightType, Leg, LegDetails, PassengersOnBoard,
};
pub use reminder::{Recurrence, Reminder, ReminderType};
