//! `bdesk` - CLI for borderdesk
//!
//! This binary provides the command-line interface for recording flight
//! movements and managing desk reminders.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;

use borderdesk::cli::{Cli, Command, ConfigCommand, FlightCommand, ReminderCommand};
use borderdesk::record::FlightStatus;
use borderdesk::{
    init_logging, mark_archived, validate_reminder, Config, DraftDefaults, FlightRecord,
    FlightStore, FormController, RecordStore, Reminder, SubmitOutcome,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;
    let store = FlightStore::new(config.database_path());
    debug!("Using database at {}", store.path().display());

    match cli.command {
        Command::Flight(cmd) => handle_flight(&config, store, cmd).await,
        Command::Reminder(cmd) => handle_reminder(&store, cmd).await,
        Command::Status(cmd) => handle_status(&store, cmd.json).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_flight(
    config: &Config,
    store: FlightStore,
    cmd: FlightCommand,
) -> anyhow::Result<()> {
    match cmd {
        FlightCommand::List { status, json } => {
            let mut flights = store.get_flights().await?;
            if let Some(status) = status {
                let status = FlightStatus::from(status);
                flights.retain(|f| f.status == status);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&flights)?);
            } else if flights.is_empty() {
                println!("No flights recorded.");
            } else {
                for flight in &flights {
                    print_flight_line(flight);
                }
            }
        }
        FlightCommand::Show { id, json } => {
            let Some(flight) = store.get_flight(&id).await? else {
                bail!("no flight with id {id}");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&flight)?);
            } else {
                print_flight_detail(&flight);
            }
        }
        FlightCommand::Add(args) => {
            let mut form = FormController::new(store, DraftDefaults::from(config));
            args.apply(&mut form)?;
            match form.submit().await? {
                SubmitOutcome::Saved(id) => println!("{id}"),
                SubmitOutcome::Invalid(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("  {field}: {message}");
                    }
                    bail!("flight not saved: {} field(s) invalid", errors.len());
                }
            }
        }
        FlightCommand::Archive { id } => {
            if !mark_archived(&store, &id).await? {
                bail!("no flight with id {id}");
            }
            println!("Archived {id}");
        }
        FlightCommand::Delete { id } => {
            store.delete_flight(&id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

fn print_flight_line(flight: &FlightRecord) {
    let kind = flight
        .flight_type
        .map_or_else(|| "-".to_string(), |t| t.to_string());
    let created = flight
        .created_at
        .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
    println!(
        "{:<36}  {:<16}  {:<8}  {:<10}  {:>4} -> {:<4}  {:<10}",
        flight.id.as_deref().unwrap_or("-"),
        created,
        flight.flight_number,
        kind,
        flight.origin(),
        flight.destination(),
        flight.status,
    );
}

fn print_flight_detail(flight: &FlightRecord) {
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    println!("Flight {}", flight.flight_number);
    println!("==================");
    println!("  Id:          {}", flight.id.as_deref().unwrap_or("-"));
    println!(
        "  Created:     {} by {} ({})",
        or_dash(flight.created_at.map(|t| t.to_rfc3339())),
        flight.created_by,
        flight.created_by_category
    );
    println!("  Aircraft:    {}", flight.aircraft_type);
    println!("  Operator:    {}", flight.operator);
    println!("  Type:        {}", or_dash(flight.flight_type.map(|t| t.to_string())));
    println!("  Nature:      {}", or_dash(flight.flight_nature.map(|n| n.to_string())));
    println!("  Status:      {}", flight.status);
    println!("  GESDOC:      {}", or_dash(flight.gesdoc_reference()));
    if !flight.checklist.is_current() {
        println!(
            "  Checklist recorded against catalog v{}",
            flight.checklist.catalog_version
        );
    }

    for &leg in flight.active_legs() {
        let details = flight.leg(leg);
        let (done, total) = flight.checklist.progress(leg);
        println!();
        println!("[{leg}]");
        println!("  Airport:     {}", details.airport);
        println!("  Registry:    {}", details.reg_vp);
        println!(
            "  When:        {} {}",
            or_dash(details.date.map(|d| d.to_string())),
            or_dash(details.schedule_time.map(|t| t.to_string()))
        );
        println!(
            "  On board:    {} (UE {}, non-Schengen {}, crew {})",
            details.total_on_board(),
            details.pob.ue,
            details.pob.non_schengen,
            details.pob.crew
        );
        println!(
            "  Checklist:   {} ({done}/{total})",
            flight.checklist.classification(leg)
        );
        for (item, checked) in flight.checklist.items(leg) {
            println!("    [{}] {item}", if checked { "x" } else { " " });
        }
    }

    if let Some(observations) = &flight.observations {
        println!();
        println!("Observations: {observations}");
    }
    if let Some(attachment) = &flight.attachment_name {
        println!("Attachment:   {attachment}");
    }
}

async fn handle_reminder(store: &FlightStore, cmd: ReminderCommand) -> anyhow::Result<()> {
    match &cmd {
        ReminderCommand::List { open, json } => {
            let mut reminders = store.get_reminders().await?;
            if *open {
                reminders.retain(|r| !r.completed);
            }
            Reminder::sort_by_date(&mut reminders);
            if *json {
                println!("{}", serde_json::to_string_pretty(&reminders)?);
            } else if reminders.is_empty() {
                println!("No reminders.");
            } else {
                for reminder in &reminders {
                    println!(
                        "{:<36}  {}  [{}]  {:<12}  {:<14}  {}",
                        reminder.id.as_deref().unwrap_or("-"),
                        reminder.date.format("%Y-%m-%d %H:%M"),
                        if reminder.completed { "x" } else { " " },
                        reminder.reminder_type,
                        reminder.recurrence,
                        reminder.subject,
                    );
                }
            }
        }
        ReminderCommand::Add { .. } => {
            let reminder = cmd
                .to_reminder()
                .context("add command did not describe a reminder")?;
            let errors = validate_reminder(&reminder);
            if !errors.is_empty() {
                bail!("reminder not saved: {errors}");
            }
            let id = store.save_reminder(reminder).await?;
            println!("{id}");
        }
        ReminderCommand::Done { id, undo } => {
            if !store.set_reminder_completed(id, !undo).await? {
                bail!("no reminder with id {id}");
            }
            println!("{} {id}", if *undo { "Reopened" } else { "Completed" });
        }
        ReminderCommand::Delete { id } => {
            store.delete_reminder(id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

async fn handle_status(store: &FlightStore, json: bool) -> anyhow::Result<()> {
    let stats = store.stats().await?;
    if json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("bdesk status");
        println!("------------");
        println!("Database:        {}", store.path().display());
        println!("Schema version:  {}", stats.schema_version);
        println!("Size:            {} bytes", stats.db_size_bytes);
        println!("Flights:         {}", stats.total_flights);
        println!("Reminders:       {}", stats.total_reminders);
        if let Some(newest) = stats.newest_flight {
            println!("Newest flight:   {}", newest.to_rfc3339());
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Station]");
                println!("  Home code:      {}", config.station.home_code);
                println!();
                println!("[Agent]");
                println!("  Name:           {}", config.agent.name);
                println!("  Category:       {}", config.agent.category);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
