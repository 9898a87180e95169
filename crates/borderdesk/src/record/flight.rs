//! Flight movement records.
//!
//! A [`FlightRecord`] carries two leg groups, arrival and departure. Which of
//! them are meaningful depends on the [`FlightType`]: a turnaround uses both,
//! an arrival or departure uses exactly one.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::checklist::Checklist;

/// The kind of movement being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightType {
    /// Inbound movement; only the arrival leg is active.
    Arrival,
    /// Outbound movement; only the departure leg is active.
    Departure,
    /// Inbound then outbound; both legs are active.
    Turnaround,
}

impl FlightType {
    /// All movement types.
    pub const ALL: [Self; 3] = [Self::Arrival, Self::Departure, Self::Turnaround];

    /// The legs this movement type activates.
    #[must_use]
    pub fn active_legs(self) -> &'static [Leg] {
        match self {
            Self::Arrival => &[Leg::Arrival],
            Self::Departure => &[Leg::Departure],
            Self::Turnaround => &[Leg::Arrival, Leg::Departure],
        }
    }

    /// Whether the given leg is active for this movement type.
    #[must_use]
    pub fn is_active(self, leg: Leg) -> bool {
        self.active_legs().contains(&leg)
    }
}

impl std::fmt::Display for FlightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arrival => write!(f, "arrival"),
            Self::Departure => write!(f, "departure"),
            Self::Turnaround => write!(f, "turnaround"),
        }
    }
}

/// The nature of the flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightNature {
    /// Private / general aviation.
    Private,
    /// Military.
    Military,
    /// Diverted from its planned destination.
    Diverted,
    /// Cargo only.
    Cargo,
    /// Diplomatic.
    Diplomatic,
    /// Instructional / training.
    Instructional,
}

impl std::fmt::Display for FlightNature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Military => write!(f, "military"),
            Self::Diverted => write!(f, "diverted"),
            Self::Cargo => write!(f, "cargo"),
            Self::Diplomatic => write!(f, "diplomatic"),
            Self::Instructional => write!(f, "instructional"),
        }
    }
}

/// Lifecycle status of a record. Freely settable by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    /// Planned, not yet confirmed.
    #[default]
    Scheduled,
    /// Confirmed by the operator.
    Confirmed,
    /// Movement handled.
    Completed,
    /// Movement will not happen.
    Cancelled,
    /// Closed out and kept for reference.
    Archived,
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// One of the two legs of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    /// The inbound leg.
    Arrival,
    /// The outbound leg.
    Departure,
}

impl Leg {
    /// Both legs, arrival first.
    pub const ALL: [Self; 2] = [Self::Arrival, Self::Departure];

    /// Lowercase name used in keys and messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arrival => "arrival",
            Self::Departure => "departure",
        }
    }

    /// Field key of the leg's external endpoint.
    #[must_use]
    pub fn endpoint_field(self) -> &'static str {
        match self {
            Self::Arrival => "origin",
            Self::Departure => "destination",
        }
    }

    /// Field key of the leg's registry number.
    #[must_use]
    pub fn registry_field(self) -> &'static str {
        match self {
            Self::Arrival => "regVPArrival",
            Self::Departure => "regVPDeparture",
        }
    }

    /// Error key reported when the leg has no Schengen classification.
    #[must_use]
    pub fn classification_field(self) -> &'static str {
        match self {
            Self::Arrival => "arrival_checklist_type",
            Self::Departure => "departure_checklist_type",
        }
    }
}

impl std::fmt::Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persons on board for one leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassengersOnBoard {
    /// EU / Schengen-area passengers.
    pub ue: u32,
    /// Passengers from outside the Schengen area.
    pub non_schengen: u32,
    /// Crew members.
    pub crew: u32,
}

impl PassengersOnBoard {
    /// Everyone on board, crew included.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.ue
            .saturating_add(self.non_schengen)
            .saturating_add(self.crew)
    }
}

/// The fields of one leg.
///
/// `airport` is the external endpoint: the origin for the arrival leg and the
/// destination for the departure leg.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegDetails {
    /// Internal registry number.
    #[serde(rename = "regVP")]
    pub reg_vp: String,
    /// External endpoint airport code.
    pub airport: String,
    /// Scheduled time of the movement.
    pub schedule_time: Option<NaiveTime>,
    /// Date of the movement.
    pub date: Option<NaiveDate>,
    /// Persons on board.
    pub pob: PassengersOnBoard,
}

impl LegDetails {
    /// Total persons on board for this leg.
    #[must_use]
    pub fn total_on_board(&self) -> u32 {
        self.pob.total()
    }
}

/// A flight movement handled at the desk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightRecord {
    /// Store-assigned identifier; `None` until first saved.
    pub id: Option<String>,
    /// Store-assigned creation time; `None` until first saved.
    pub created_at: Option<DateTime<Utc>>,
    /// Name of the agent who created the record.
    pub created_by: String,
    /// Category of the agent who created the record.
    pub created_by_category: String,

    /// Flight number, e.g. `TP1699`.
    pub flight_number: String,
    /// Aircraft type designator.
    pub aircraft_type: String,
    /// Operating company.
    pub operator: String,
    /// Movement type; unset while drafting.
    pub flight_type: Option<FlightType>,
    /// Flight nature; required.
    pub flight_nature: Option<FlightNature>,
    /// Lifecycle status.
    pub status: FlightStatus,

    /// Arrival leg.
    pub arrival: LegDetails,
    /// Departure leg.
    pub departure: LegDetails,

    /// External filing number.
    pub gesdoc_number: Option<String>,
    /// External filing year.
    pub gesdoc_year: Option<i32>,
    /// Free-text notes.
    pub observations: Option<String>,
    /// Name of an attached file.
    pub attachment_name: Option<String>,

    /// Per-leg checklist and Schengen classification.
    pub checklist: Checklist,
}

impl FlightRecord {
    /// Create a blank draft attributed to the given agent.
    #[must_use]
    pub fn draft(created_by: impl Into<String>, created_by_category: impl Into<String>) -> Self {
        Self {
            created_by: created_by.into(),
            created_by_category: created_by_category.into(),
            ..Self::default()
        }
    }

    /// Whether the store has assigned this record an identity yet.
    #[must_use]
    pub fn is_new(&self) -> bool {
        !matches!(self.id.as_deref(), Some(id) if !id.trim().is_empty())
    }

    /// The legs active for the current movement type.
    #[must_use]
    pub fn active_legs(&self) -> &'static [Leg] {
        match self.flight_type {
            Some(flight_type) => flight_type.active_legs(),
            None => &[],
        }
    }

    /// Borrow a leg's fields.
    #[must_use]
    pub fn leg(&self, leg: Leg) -> &LegDetails {
        match leg {
            Leg::Arrival => &self.arrival,
            Leg::Departure => &self.departure,
        }
    }

    /// Mutably borrow a leg's fields.
    pub fn leg_mut(&mut self, leg: Leg) -> &mut LegDetails {
        match leg {
            Leg::Arrival => &mut self.arrival,
            Leg::Departure => &mut self.departure,
        }
    }

    /// The arrival origin.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.arrival.airport
    }

    /// The departure destination.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.departure.airport
    }

    /// Change the movement type and reset the fixed endpoint.
    ///
    /// The home station is pinned on the side that does not need entry: an
    /// arrival lands at home, a departure leaves from home. A turnaround
    /// clears both endpoints so each is entered explicitly.
    pub fn set_flight_type(&mut self, flight_type: FlightType, home_station: &str) {
        self.flight_type = Some(flight_type);
        match flight_type {
            FlightType::Arrival => {
                self.departure.airport = home_station.to_string();
                self.arrival.airport.clear();
            }
            FlightType::Departure => {
                self.arrival.airport = home_station.to_string();
                self.departure.airport.clear();
            }
            FlightType::Turnaround => {
                self.arrival.airport.clear();
                self.departure.airport.clear();
            }
        }
    }

    /// The external filing reference as `number/year`, when both parts exist.
    #[must_use]
    pub fn gesdoc_reference(&self) -> Option<String> {
        match (self.gesdoc_number.as_deref(), self.gesdoc_year) {
            (Some(number), Some(year)) if !number.trim().is_empty() => {
                Some(format!("{}/{year}", number.trim()))
            }
            _ => None,
        }
    }
}
