//! Entry management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use yahrzeit_core::{EntryStore, EntryUpdate, NewEntry, YahrzeitEntry};

use super::open_registry;

#[derive(Subcommand)]
pub enum EntryAction {
    /// Add a person
    Add {
        /// Name to display
        name: String,
        /// Gregorian date of death (YYYY-MM-DD)
        death_date: NaiveDate,
        /// Hebrew name
        #[arg(long)]
        hebrew_name: Option<String>,
        /// Days ahead of the yahrzeit to flag it as soon
        #[arg(long)]
        notify_days: Option<u32>,
    },
    /// List all entries
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entry as JSON
    Show {
        id: i64,
    },
    /// Change an entry
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_hebrew_name")]
        hebrew_name: Option<String>,
        /// Remove the Hebrew name
        #[arg(long)]
        clear_hebrew_name: bool,
        /// Gregorian date of death (YYYY-MM-DD); the Hebrew date is recomputed
        #[arg(long)]
        death_date: Option<NaiveDate>,
        #[arg(long)]
        notify_days: Option<u32>,
    },
    /// Delete an entry
    Delete {
        id: i64,
    },
}

pub fn run(action: EntryAction) -> Result<(), Box<dyn std::error::Error>> {
    let registry = open_registry()?;

    match action {
        EntryAction::Add {
            name,
            death_date,
            hebrew_name,
            notify_days,
        } => {
            let mut new = NewEntry::new(name, death_date);
            new.hebrew_name = hebrew_name;
            new.notify_days_before = notify_days;
            let entry = registry.add(new)?;
            println!("Entry added: {}", entry.id);
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        EntryAction::List { json } => {
            let (entries, corrupt) = registry.store().scan()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() && corrupt.is_empty() {
                println!("No entries.");
            } else {
                for entry in &entries {
                    println!("{}", summary_line(entry));
                }
            }
            for record in &corrupt {
                eprintln!("warning: entry {}: {}", record.id, record.reason);
            }
        }
        EntryAction::Show { id } => match registry.get(id)? {
            Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
            None => return Err(format!("no entry with id {id}").into()),
        },
        EntryAction::Update {
            id,
            name,
            hebrew_name,
            clear_hebrew_name,
            death_date,
            notify_days,
        } => {
            let update = EntryUpdate {
                name,
                hebrew_name: if clear_hebrew_name {
                    Some(None)
                } else {
                    hebrew_name.map(Some)
                },
                death_date,
                notify_days_before: notify_days,
            };
            if update.is_empty() {
                return Err("nothing to update".into());
            }
            let entry = registry.update(id, update)?;
            println!("Entry updated: {}", entry.id);
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        EntryAction::Delete { id } => {
            registry.remove(id)?;
            println!("Entry deleted: {id}");
        }
    }
    Ok(())
}

fn summary_line(entry: &YahrzeitEntry) -> String {
    let hebrew = entry
        .hebrew_death_date()
        .map(|date| date.to_string())
        .unwrap_or_else(|e| format!("<{e}>"));
    let hebrew_name = entry
        .hebrew_name
        .as_deref()
        .map(|name| format!(" ({name})"))
        .unwrap_or_default();
    format!(
        "{:>4}  {}{}  died {} / {}  notify {}d",
        entry.id, entry.name, hebrew_name, entry.death_date, hebrew, entry.notify_days_before
    )
}
