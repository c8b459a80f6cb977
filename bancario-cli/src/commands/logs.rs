//! Logs command - inspect the local event log

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;

use bancario_core::services::{EventKind, LogEntry, LogQuery};

use super::{open_log, print_json};
use crate::output;

#[derive(Args)]
pub struct LogFilterArgs {
    /// Only this event (e.g. command_failed, operation_partial_failure)
    #[arg(long, value_parser = clap::value_parser!(EventKind))]
    event: Option<EventKind>,
    /// Only this record kind (account, client, transaction, ...)
    #[arg(long)]
    entity: Option<String>,
    /// Only entries that carry an error
    #[arg(long)]
    errors: bool,
    /// Number of entries
    #[arg(short, long, default_value = "50")]
    limit: usize,
}

impl LogFilterArgs {
    fn to_query(&self) -> LogQuery {
        LogQuery {
            kind: self.event,
            entity: self.entity.clone(),
            failures_only: self.errors,
            limit: self.limit,
        }
    }
}

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, newest first
    List {
        #[command(flatten)]
        filter: LogFilterArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Transactions recorded without their balance update
    Unbalanced {
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Event counts and database location
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old events
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Write selected events to a JSON file
    Export {
        output: PathBuf,
        #[command(flatten)]
        filter: LogFilterArgs,
    },
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn run(command: LogsCommands) -> Result<()> {
    let log = open_log()?;

    match command {
        LogsCommands::List { filter, json } => {
            let entries = log.query(&filter.to_query())?;
            if json {
                return print_json(&entries);
            }
            print_entries(&entries);
        }
        LogsCommands::Unbalanced { limit, json } => {
            let entries = log.query(&LogQuery::recent(limit).kind(EventKind::OperationPartialFailure))?;
            if json {
                return print_json(&entries);
            }
            if entries.is_empty() {
                output::success("No partially failed operations on record");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Command", "Transaction", "Balance error"]);
            for entry in &entries {
                table.add_row(vec![
                    format_timestamp(entry.timestamp),
                    entry.command.clone(),
                    output::or_dash(entry.reference.as_deref()),
                    entry.error.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", table);
            output::warning("Check these accounts' balances before repeating the operations.");
        }
        LogsCommands::Stats { json } => {
            let counts = log.counts_by_event()?;
            let total: u64 = counts.iter().map(|(_, n)| n).sum();
            let db_path = log.db_path();

            if json {
                let by_event: serde_json::Map<String, serde_json::Value> =
                    counts.iter().map(|(e, n)| (e.clone(), (*n).into())).collect();
                return print_json(&serde_json::json!({
                    "total_entries": total,
                    "by_event": by_event,
                    "database_path": db_path.to_string_lossy(),
                }));
            }

            println!("{}", "Event log".bold());
            println!("  Database: {}", db_path.display());
            println!("  Total entries: {}", total);
            for (event, n) in &counts {
                let line = format!("  {:<28}{}", event, n);
                match event.parse::<EventKind>() {
                    Ok(EventKind::OperationPartialFailure) if *n > 0 => println!("{}", line.yellow()),
                    _ => println!("{}", line),
                }
            }
        }
        LogsCommands::Clear {
            older_than_days,
            force,
        } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete events older than {} days?", older_than_days))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            let deleted = log.prune(Duration::days(older_than_days))?;
            output::success(&format!("Deleted {} events", deleted));
        }
        LogsCommands::Export { output: target, filter } => {
            let written = log.export_json(&filter.to_query(), &target)?;
            output::success(&format!("Exported {} events to {}", written, target.display()));
        }
    }

    Ok(())
}

fn print_entries(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("No events found.");
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Command", "Entity", "Stage", "Error"]);
    for entry in entries {
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.event.clone(),
            entry.command.clone(),
            output::or_dash(entry.entity.as_deref()),
            output::or_dash(entry.stage.as_deref()),
            entry
                .error
                .as_deref()
                .map(|m| m.red().to_string())
                .unwrap_or_default(),
        ]);
    }
    println!("{}", table);
}
