use clap::{Parser, Subcommand};

/// Command-line interface definition for sleeptracker
/// CLI application to track nights of sleep with SQLite
#[derive(Parser)]
#[command(
    name = "sleeptracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple sleep tracking CLI: record nights, rate them and review your sleep using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Start tracking a new night
    Start,

    /// Stop tracking the current night
    Stop,

    /// Rate a night of sleep
    Quality {
        /// Night id
        id: i64,

        /// Rating from 0 (very bad) to 5 (excellent)
        value: i32,
    },

    /// List recorded nights
    List {
        #[arg(long = "json", help = "Print the nights as JSON")]
        json: bool,

        #[arg(
            long = "summary",
            help = "Print the plain text summary instead of the grid"
        )]
        summary: bool,
    },

    /// Show a single night
    Detail {
        /// Night id
        id: i64,
    },

    /// Delete every recorded night
    Clear {
        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}
