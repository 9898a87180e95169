//! Command-line interface for borderdesk.
//!
//! This module provides the CLI structure for the `bdesk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AddFlightArgs, ClassArg, ConfigCommand, FlightCommand, FlightTypeArg, NatureArg,
    RecurrenceArg, ReminderCommand, ReminderTypeArg, StatusArg, StatusCommand,
};

/// bdesk - Flight movements and reminders for the border-control desk
///
/// Records arrivals, departures and turnarounds with their passenger counts
/// and inspection checklists, and keeps the desk's reminders, all in a local
/// database.
#[derive(Debug, Parser)]
#[command(name = "bdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage flight records
    #[command(subcommand)]
    Flight(FlightCommand),

    /// Manage reminders
    #[command(subcommand)]
    Reminder(ReminderCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
