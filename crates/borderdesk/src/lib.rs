//! `borderdesk` - Flight movement records for an airport border-control desk
//!
//! This library provides the record schema, draft validation, local
//! persistence and the entry-form state machine for flight movements
//! (arrivals, departures, turnarounds) and desk reminders.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod record;
pub mod storage;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use form::{mark_archived, DraftDefaults, FormController, FormState, SubmitOutcome};
pub use logging::init_logging;
pub use record::{FlightRecord, Reminder};
pub use storage::{Storage, StorageStats};
pub use store::{FlightStore, RecordStore};
pub use validation::{validate_flight, validate_reminder, ValidationErrors};
