use clap::{ArgGroup, Args, Parser, Subcommand};

/// Command-line interface definition for hourledger.
/// Every ledger command prints its JSON result on stdout.
#[derive(Parser)]
#[command(
    name = "hourledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Per-user, per-date hour ledger with a lock registry, backed by SQLite",
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

    /// List every user that has logged at least one event
    Users,

    /// Check whether a user has any events
    User { user_id: String },

    /// Read, write and delete hour events
    Event {
        #[command(subcommand)]
        action: EventCmd,
    },

    /// Read, write and delete locks
    Lock {
        #[command(subcommand)]
        action: LockCmd,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum EventCmd {
    /// List events, optionally filtered
    List {
        #[arg(long = "user", help = "Only events of this user")]
        user: Option<String>,

        #[arg(long = "date", help = "Only events on this date", conflicts_with_all = ["user", "from", "to"])]
        date: Option<String>,

        #[arg(long = "from", requires = "user", requires = "to", help = "Range start (inclusive, needs --user)")]
        from: Option<String>,

        #[arg(long = "to", requires = "user", requires = "from", help = "Range end (inclusive, needs --user)")]
        to: Option<String>,
    },

    /// Show the event for one (user, date)
    Get { user_id: String, event_date: String },

    /// Create or overwrite an event
    Add(EventRecordArgs),

    /// Delete one event, or all events of a user or a date
    Del(ScopeArgs),
}

#[derive(Subcommand)]
pub enum LockCmd {
    /// List locks, optionally filtered
    List {
        #[arg(long = "user", help = "Only locks of this user")]
        user: Option<String>,

        #[arg(long = "date", help = "Only locks on this date", conflicts_with = "user")]
        date: Option<String>,
    },

    /// Show the lock for one (user, date)
    Get { user_id: String, event_date: String },

    /// Tell whether (user, date) is locked
    Status { user_id: String, event_date: String },

    /// Lock a (user, date)
    Add {
        #[arg(required_unless_present = "record", conflicts_with = "record")]
        user_id: Option<String>,

        #[arg(required_unless_present = "record", conflicts_with = "record")]
        event_date: Option<String>,

        #[arg(long = "record", help = "Lock as a JSON object")]
        record: Option<String>,
    },

    /// Unlock one (user, date), or everything of a user or a date
    Del(ScopeArgs),
}

#[derive(Args)]
pub struct EventRecordArgs {
    /// Whole event as a JSON object
    #[arg(long = "record", conflicts_with_all = ["user", "date", "name", "reason", "hours"])]
    pub record: Option<String>,

    #[arg(long = "user", required_unless_present = "record")]
    pub user: Option<String>,

    #[arg(long = "date", required_unless_present = "record")]
    pub date: Option<String>,

    #[arg(long = "name")]
    pub name: Option<String>,

    #[arg(long = "reason")]
    pub reason: Option<String>,

    #[arg(long = "hours")]
    pub hours: Option<String>,
}

/// Exactly one of: a (user, date) key, `--user`, or `--date`.
#[derive(Args)]
#[command(group(
    ArgGroup::new("scope")
        .required(true)
        .args(["user_id", "all_user", "all_date"]),
))]
pub struct ScopeArgs {
    #[arg(requires = "event_date")]
    pub user_id: Option<String>,

    pub event_date: Option<String>,

    #[arg(long = "user", help = "Delete everything of this user")]
    pub all_user: Option<String>,

    #[arg(long = "date", help = "Delete everything on this date")]
    pub all_date: Option<String>,
}
