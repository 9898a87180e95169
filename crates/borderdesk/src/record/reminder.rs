//! Desk reminders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a reminder is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReminderType {
    /// A general alert.
    #[default]
    #[serde(rename = "Alerta")]
    Alert,
    /// An expected private flight.
    #[serde(rename = "Voo Privado")]
    PrivateFlight,
    /// A meeting.
    #[serde(rename = "Reunião")]
    Meeting,
}

impl std::fmt::Display for ReminderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "Alerta"),
            Self::PrivateFlight => write!(f, "Voo Privado"),
            Self::Meeting => write!(f, "Reunião"),
        }
    }
}

/// How often a reminder repeats. Stored only; occurrences are not expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Recurrence {
    /// Fires once.
    #[default]
    #[serde(rename = "Não repetir")]
    Never,
    /// Every day.
    #[serde(rename = "Diariamente")]
    Daily,
    /// Every week.
    #[serde(rename = "Semanalmente")]
    Weekly,
    /// Every month.
    #[serde(rename = "Mensalmente")]
    Monthly,
    /// Every year.
    #[serde(rename = "Anualmente")]
    Yearly,
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => write!(f, "Não repetir"),
            Self::Daily => write!(f, "Diariamente"),
            Self::Weekly => write!(f, "Semanalmente"),
            Self::Monthly => write!(f, "Mensalmente"),
            Self::Yearly => write!(f, "Anualmente"),
        }
    }
}

/// A reminder kept at the desk.
///
/// Reminders may mention flights, but no link to a [`FlightRecord`] is kept.
///
/// [`FlightRecord`]: super::FlightRecord
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Store-assigned identifier; `None` until first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Short description; required.
    pub subject: String,
    /// When the reminder is due.
    pub date: DateTime<Utc>,
    /// Kind of reminder.
    #[serde(rename = "type", default)]
    pub reminder_type: ReminderType,
    /// Repeat rule.
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Whether an alarm should sound.
    #[serde(default)]
    pub alarm: bool,
    /// Whether the reminder has been dealt with.
    #[serde(default)]
    pub completed: bool,
}

impl Reminder {
    /// Create a one-off, open reminder.
    #[must_use]
    pub fn new(subject: impl Into<String>, date: DateTime<Utc>, reminder_type: ReminderType) -> Self {
        Self {
            id: None,
            subject: subject.into(),
            date,
            reminder_type,
            recurrence: Recurrence::Never,
            alarm: false,
            completed: false,
        }
    }

    /// Whether the store has assigned this reminder an identity yet.
    #[must_use]
    pub fn is_new(&self) -> bool {
        !matches!(self.id.as_deref(), Some(id) if !id.trim().is_empty())
    }

    /// Sort reminders by due date, earliest first.
    pub fn sort_by_date(reminders: &mut [Reminder]) {
        reminders.sort_by_key(|reminder| reminder.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_defaults() {
        let reminder = Reminder::new("Brief night shift", at(9), ReminderType::Meeting);
        assert!(reminder.is_new());
        assert!(!reminder.completed);
        assert!(!reminder.alarm);
        assert_eq!(reminder.recurrence, Recurrence::Never);
    }

    #[test]
    fn test_serialized_labels() {
        let mut reminder = Reminder::new("G-ABCD inbound", at(14), ReminderType::PrivateFlight);
        reminder.recurrence = Recurrence::Weekly;

        let json = serde_json::to_value(&reminder).unwrap();
        assert_eq!(json["type"], "Voo Privado");
        assert_eq!(json["recurrence"], "Semanalmente");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_deserialize_defaults() {
        let reminder: Reminder =
            serde_json::from_str(r#"{"subject": "Check SIS", "date": "2024-05-01T10:00:00Z"}"#)
                .unwrap();
        assert_eq!(reminder.reminder_type, ReminderType::Alert);
        assert_eq!(reminder.recurrence, Recurrence::Never);
        assert!(!reminder.completed);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(ReminderType::Meeting.to_string(), "Reunião");
        assert_eq!(Recurrence::Yearly.to_string(), "Anualmente");
    }

    #[test]
    fn test_sort_by_date() {
        let mut reminders = vec![
            Reminder::new("late", at(18), ReminderType::Alert),
            Reminder::new("early", at(6), ReminderType::Alert),
            Reminder::new("noon", at(12), ReminderType::Alert),
        ];
        Reminder::sort_by_date(&mut reminders);

        let subjects: Vec<_> = reminders.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, ["early", "noon", "late"]);
    }
}
