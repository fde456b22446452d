mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;
use streak_core::activity::EntryDetails;

#[derive(Parser)]
#[command(
    name = "streak",
    about = "Adherence tracking: record daily completions, streaks, and progress",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .streak/)
    #[arg(long, global = true, env = "STREAK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a streak project (config + database) in the root
    Init,

    /// Record one qualifying activity for a user
    Record {
        /// User id
        user: String,
        /// Day of the activity, YYYY-MM-DD (default: today in the configured timezone)
        #[arg(long = "on")]
        on: Option<String>,
        /// Mood before the activity (1-10)
        #[arg(long)]
        mood_before: Option<u8>,
        /// Mood after the activity (1-10)
        #[arg(long)]
        mood_after: Option<u8>,
        /// What was done (e.g. "gratitude letter")
        #[arg(long)]
        activity: Option<String>,
        /// Free-form note kept with the entry
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show a user's stored streak record
    Show {
        /// User id
        user: String,
    },

    /// Show streak, weekly/monthly counts, and encouragement for a user
    Progress {
        /// User id
        user: String,
        /// Reference day, YYYY-MM-DD (default: today in the configured timezone)
        #[arg(long)]
        today: Option<String>,
    },

    /// List a user's recent activity, newest first
    History {
        /// User id
        user: String,
        /// Maximum entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Inspect and validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the HTTP API
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Record {
            user,
            on,
            mood_before,
            mood_after,
            activity,
            notes,
        } => {
            let details = EntryDetails {
                mood_before,
                mood_after,
                activity,
                notes,
            };
            cmd::record::run(&root, &user, on.as_deref(), details, cli.json)
        }
        Commands::Show { user } => cmd::show::run(&root, &user, cli.json),
        Commands::Progress { user, today } => {
            cmd::progress::run(&root, &user, today.as_deref(), cli.json)
        }
        Commands::History { user, limit } => cmd::history::run(&root, &user, limit, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
