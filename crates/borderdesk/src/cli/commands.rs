//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand, ValueEnum};

use crate::error::{Error, Result};
use crate::form::FormController;
use crate::record::{
    Classification, FlightNature, FlightStatus, FlightType, Leg, Recurrence, Reminder,
    ReminderType,
};
use crate::store::RecordStore;

/// Flight record commands.
#[derive(Debug, Subcommand)]
pub enum FlightCommand {
    /// List flights, newest first
    List {
        /// Only show flights with this status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one flight
    Show {
        /// Flight record id
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Record a new flight movement
    Add(Box<AddFlightArgs>),

    /// Set a flight's status to archived
    Archive {
        /// Flight record id
        id: String,
    },

    /// Delete a flight
    Delete {
        /// Flight record id
        id: String,
    },
}

/// Arguments for recording a flight.
#[derive(Debug, Args)]
pub struct AddFlightArgs {
    /// Flight number
    #[arg(long)]
    pub number: String,

    /// Aircraft type
    #[arg(long)]
    pub aircraft: String,

    /// Operator
    #[arg(long)]
    pub operator: String,

    /// Movement type
    #[arg(short = 't', long = "type", value_enum)]
    pub flight_type: FlightTypeArg,

    /// Flight nature
    #[arg(short, long, value_enum)]
    pub nature: NatureArg,

    /// Status
    #[arg(long, value_enum, default_value = "scheduled")]
    pub status: StatusArg,

    /// Origin airport (arrival leg)
    #[arg(long)]
    pub origin: Option<String>,

    /// Destination airport (departure leg)
    #[arg(long)]
    pub destination: Option<String>,

    /// Arrival registry number
    #[arg(long)]
    pub reg_arrival: Option<String>,

    /// Departure registry number
    #[arg(long)]
    pub reg_departure: Option<String>,

    /// Arrival leg classification
    #[arg(long, value_enum)]
    pub arrival_class: Option<ClassArg>,

    /// Departure leg classification
    #[arg(long, value_enum)]
    pub departure_class: Option<ClassArg>,

    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub arrival_date: Option<NaiveDate>,

    /// Scheduled arrival time (HH:MM:SS)
    #[arg(long)]
    pub arrival_time: Option<NaiveTime>,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub departure_date: Option<NaiveDate>,

    /// Scheduled departure time (HH:MM:SS)
    #[arg(long)]
    pub departure_time: Option<NaiveTime>,

    /// Arrival EU passengers
    #[arg(long, default_value_t = 0)]
    pub arrival_ue: u32,

    /// Arrival non-Schengen passengers
    #[arg(long, default_value_t = 0)]
    pub arrival_non_schengen: u32,

    /// Arrival crew
    #[arg(long, default_value_t = 0)]
    pub arrival_crew: u32,

    /// Departure EU passengers
    #[arg(long, default_value_t = 0)]
    pub departure_ue: u32,

    /// Departure non-Schengen passengers
    #[arg(long, default_value_t = 0)]
    pub departure_non_schengen: u32,

    /// Departure crew
    #[arg(long, default_value_t = 0)]
    pub departure_crew: u32,

    /// Completed checklist item, as LEG:ITEM (repeatable)
    #[arg(long = "check", value_name = "LEG:ITEM")]
    pub checks: Vec<String>,

    /// GESDOC filing number
    #[arg(long)]
    pub gesdoc_number: Option<String>,

    /// GESDOC filing year
    #[arg(long)]
    pub gesdoc_year: Option<i32>,

    /// Free-text observations
    #[arg(long)]
    pub observations: Option<String>,

    /// Attached file name
    #[arg(long)]
    pub attachment: Option<String>,
}

impl AddFlightArgs {
    /// Fill the form's draft from these arguments.
    ///
    /// The movement type is applied first so the home station lands on the
    /// fixed endpoint; explicit `--origin` / `--destination` then override.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is not editing or a `--check` value is
    /// malformed or names an unknown item.
    pub fn apply<S: RecordStore>(&self, form: &mut FormController<S>) -> Result<()> {
        form.set_flight_type(self.flight_type.into())?;
        if let Some(class) = self.arrival_class {
            form.classify(Leg::Arrival, class.into())?;
        }
        if let Some(class) = self.departure_class {
            form.classify(Leg::Departure, class.into())?;
        }
        for check in &self.checks {
            let (leg, item) = parse_check(check)?;
            form.set_checklist_item(leg, item, true)?;
        }

        let draft = form.draft_mut()?;
        draft.flight_number.clone_from(&self.number);
        draft.aircraft_type.clone_from(&self.aircraft);
        draft.operator.clone_from(&self.operator);
        draft.flight_nature = Some(self.nature.into());
        draft.status = self.status.into();

        if let Some(origin) = &self.origin {
            draft.arrival.airport.clone_from(origin);
        }
        if let Some(reg) = &self.reg_arrival {
            draft.arrival.reg_vp.clone_from(reg);
        }
        draft.arrival.date = self.arrival_date;
        draft.arrival.schedule_time = self.arrival_time;
        draft.arrival.pob.ue = self.arrival_ue;
        draft.arrival.pob.non_schengen = self.arrival_non_schengen;
        draft.arrival.pob.crew = self.arrival_crew;

        if let Some(destination) = &self.destination {
            draft.departure.airport.clone_from(destination);
        }
        if let Some(reg) = &self.reg_departure {
            draft.departure.reg_vp.clone_from(reg);
        }
        draft.departure.date = self.departure_date;
        draft.departure.schedule_time = self.departure_time;
        draft.departure.pob.ue = self.departure_ue;
        draft.departure.pob.non_schengen = self.departure_non_schengen;
        draft.departure.pob.crew = self.departure_crew;

        draft.gesdoc_number.clone_from(&self.gesdoc_number);
        draft.gesdoc_year = self.gesdoc_year;
        draft.observations.clone_from(&self.observations);
        draft.attachment_name.clone_from(&self.attachment);
        Ok(())
    }
}

/// Split a `LEG:ITEM` checklist argument.
fn parse_check(value: &str) -> Result<(Leg, &str)> {
    let invalid = || Error::UnknownChecklistItem {
        leg: "arrival or departure",
        item: value.to_string(),
    };
    let (leg, item) = value.split_once(':').ok_or_else(invalid)?;
    let leg = match leg {
        "arrival" => Leg::Arrival,
        "departure" => Leg::Departure,
        _ => return Err(invalid()),
    };
    Ok((leg, item))
}

/// Reminder commands.
#[derive(Debug, Subcommand)]
pub enum ReminderCommand {
    /// List reminders by due date
    List {
        /// Hide completed reminders
        #[arg(long)]
        open: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a reminder
    Add {
        /// What to be reminded of
        subject: String,

        /// Due date and time (RFC 3339, e.g. 2024-05-01T09:00:00Z)
        #[arg(short, long)]
        date: DateTime<Utc>,

        /// Kind of reminder
        #[arg(short = 't', long = "type", value_enum, default_value = "alert")]
        reminder_type: ReminderTypeArg,

        /// Repeat rule
        #[arg(short, long, value_enum, default_value = "never")]
        recurrence: RecurrenceArg,

        /// Sound an alarm
        #[arg(long)]
        alarm: bool,
    },

    /// Mark a reminder as done
    Done {
        /// Reminder id
        id: String,

        /// Mark as not done instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete a reminder
    Delete {
        /// Reminder id
        id: String,
    },
}

impl ReminderCommand {
    /// Build the reminder described by an `add` command.
    #[must_use]
    pub fn to_reminder(&self) -> Option<Reminder> {
        match self {
            Self::Add {
                subject,
                date,
                reminder_type,
                recurrence,
                alarm,
            } => {
                let mut reminder = Reminder::new(subject.clone(), *date, (*reminder_type).into());
                reminder.recurrence = (*recurrence).into();
                reminder.alarm = *alarm;
                Some(reminder)
            }
            _ => None,
        }
    }
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Movement type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlightTypeArg {
    /// Arrival
    Arrival,
    /// Departure
    Departure,
    /// Arrival followed by departure
    Turnaround,
}

impl From<FlightTypeArg> for FlightType {
    fn from(arg: FlightTypeArg) -> Self {
        match arg {
            FlightTypeArg::Arrival => Self::Arrival,
            FlightTypeArg::Departure => Self::Departure,
            FlightTypeArg::Turnaround => Self::Turnaround,
        }
    }
}

/// Flight nature argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NatureArg {
    /// Private
    Private,
    /// Military
    Military,
    /// Diverted
    Diverted,
    /// Cargo
    Cargo,
    /// Diplomatic
    Diplomatic,
    /// Instructional
    Instructional,
}

impl From<NatureArg> for FlightNature {
    fn from(arg: NatureArg) -> Self {
        match arg {
            NatureArg::Private => Self::Private,
            NatureArg::Military => Self::Military,
            NatureArg::Diverted => Self::Diverted,
            NatureArg::Cargo => Self::Cargo,
            NatureArg::Diplomatic => Self::Diplomatic,
            NatureArg::Instructional => Self::Instructional,
        }
    }
}

/// Status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Scheduled
    Scheduled,
    /// Confirmed
    Confirmed,
    /// Completed
    Completed,
    /// Cancelled
    Cancelled,
    /// Archived
    Archived,
}

impl From<StatusArg> for FlightStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Scheduled => Self::Scheduled,
            StatusArg::Confirmed => Self::Confirmed,
            StatusArg::Completed => Self::Completed,
            StatusArg::Cancelled => Self::Cancelled,
            StatusArg::Archived => Self::Archived,
        }
    }
}

/// Leg classification argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassArg {
    /// Schengen
    #[value(name = "sch")]
    Schengen,
    /// Non-Schengen
    #[value(name = "nsch")]
    NonSchengen,
}

impl From<ClassArg> for Classification {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Schengen => Self::Schengen,
            ClassArg::NonSchengen => Self::NonSchengen,
        }
    }
}

/// Reminder type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReminderTypeArg {
    /// Alerta
    Alert,
    /// Voo Privado
    PrivateFlight,
    /// Reunião
    Meeting,
}

impl From<ReminderTypeArg> for ReminderType {
    fn from(arg: ReminderTypeArg) -> Self {
        match arg {
            ReminderTypeArg::Alert => Self::Alert,
            ReminderTypeArg::PrivateFlight => Self::PrivateFlight,
            ReminderTypeArg::Meeting => Self::Meeting,
        }
    }
}

/// Recurrence argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecurrenceArg {
    /// Não repetir
    Never,
    /// Diariamente
    Daily,
    /// Semanalmente
    Weekly,
    /// Mensalmente
    Monthly,
    /// Anualmente
    Yearly,
}

impl From<RecurrenceArg> for Recurrence {
    fn from(arg: RecurrenceArg) -> Self {
        match arg {
            RecurrenceArg::Never => Self::Never,
            RecurrenceArg::Daily => Self::Daily,
            RecurrenceArg::Weekly => Self::Weekly,
            RecurrenceArg::Monthly => Self::Monthly,
            RecurrenceArg::Yearly => Self::Yearly,
        }
    }
}
