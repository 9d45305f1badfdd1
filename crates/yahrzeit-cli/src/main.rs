use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "yahrzeit", version, about = "Track yahrzeits by the Hebrew calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage remembered people
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Show the next yahrzeit of every entry
    Upcoming(commands::upcoming::UpcomingArgs),
    /// Convert dates between the Gregorian and Hebrew calendars
    Convert {
        #[command(subcommand)]
        action: commands::convert::ConvertAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Entry { action } => commands::entry::run(action),
        Commands::Upcoming(args) => commands::upcoming::run(args),
        Commands::Convert { action } => commands::convert::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
