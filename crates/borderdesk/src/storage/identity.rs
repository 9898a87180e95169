//! Identity and timestamp source for new records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Supplies ids and creation times for records saved for the first time.
pub trait RecordIdentity: Send + Sync + std::fmt::Debug {
    /// A fresh, collision-resistant record id.
    fn new_id(&self) -> String;

    /// The current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// UUID v4 ids and the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl RecordIdentity for SystemIdentity {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
