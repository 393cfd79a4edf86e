use clap::{Parser, Subcommand};

/// Command-line interface definition for timeclock-bot
/// Attendance chat-bot backend: webhook server plus operator tools
#[derive(Parser)]
#[command(
    name = "timeclock-bot",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance chat-bot backend: clock-in/clock-out over a messenger, mirrored to a calendar",
    long_about = None
)]
pub struct Cli {
    /// Override configuration file path
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

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

    /// Create the calendar and rich menu if needed, then serve the webhook
    Serve {
        /// Listen address (overrides `listen` in the config file)
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Show the stored state of a user's day
    Status {
        /// User account id
        account: String,

        /// Date (YYYY-MM-DD); defaults to today in the configured timezone
        #[arg(long)]
        date: Option<String>,

        /// Also print the audit log lines for that day
        #[arg(long = "log", help = "Print audit log lines for the day")]
        log: bool,
    },

    /// Reset a user's day: delete state and schedule rows
    Clean {
        /// User account id
        account: String,

        /// Date (YYYY-MM-DD); defaults to today in the configured timezone
        #[arg(long)]
        date: Option<String>,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
