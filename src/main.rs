mod commands;
mod render;
mod session;
mod time;

use std::path::PathBuf;

use agenda_core::agenda_config::AgendaConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::AgendaContext;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Register users and schedule meetings without double-booking")]
struct Cli {
    /// Directory holding users, meetings and the session (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        name: String,

        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,

        #[arg(short, long)]
        mail: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },
    /// Log in as an existing user
    Login {
        name: String,

        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out the current user
    Logout,
    /// Show the current user
    Whoami,
    /// List all registered users
    Users {
        #[arg(long)]
        json: bool,
    },
    /// Delete your account, canceling the meetings you sponsor
    DeleteAccount {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Create a meeting sponsored by you
    Sponsor {
        title: String,

        /// Start date/time (e.g., "2025-03-20T15:00" or "tomorrow 3pm")
        #[arg(short, long)]
        start: String,

        /// End date/time
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration (e.g., "30m", "1h", "2h30m"); defaults to 1h
        #[arg(short, long, conflicts_with = "end")]
        duration: Option<String>,

        /// Participant username (repeatable)
        #[arg(short, long = "participant")]
        participants: Vec<String>,
    },
    /// Add a participant to a meeting
    Invite { title: String, user: String },
    /// Remove a participant from a meeting
    Dismiss { title: String, user: String },
    /// Cancel a meeting you sponsor
    Cancel { title: String },
    /// Leave a meeting you participate in
    Quit { title: String },
    /// Cancel every meeting you sponsor
    Clear,
    /// List your meetings
    Meetings {
        /// Only meetings ending after this date/time
        #[arg(long)]
        from: Option<String>,

        /// Only meetings starting before this date/time
        #[arg(long)]
        to: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Check whether you are free during an interval
    Free {
        #[arg(short, long)]
        start: String,

        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        #[arg(short, long, conflicts_with = "end")]
        duration: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => AgendaConfig::load()?.data_path(),
    };
    debug!(data_dir = %data_dir.display(), "Using data directory");
    let mut ctx = AgendaContext::load(&data_dir)?;

    match cli.command {
        Commands::Register {
            name,
            password,
            mail,
            phone,
        } => commands::account::register(&mut ctx, name, password, mail, phone),
        Commands::Login { name, password } => commands::account::login(&mut ctx, name, password),
        Commands::Logout => commands::account::logout(&mut ctx),
        Commands::Whoami => commands::account::whoami(&ctx),
        Commands::Users { json } => commands::account::users(&ctx, json),
        Commands::DeleteAccount { yes } => commands::account::delete_account(&mut ctx, yes),
        Commands::Sponsor {
            title,
            start,
            end,
            duration,
            participants,
        } => commands::meeting::sponsor(&mut ctx, title, start, end, duration, participants),
        Commands::Invite { title, user } => commands::meeting::invite(&mut ctx, title, user),
        Commands::Dismiss { title, user } => commands::meeting::dismiss(&mut ctx, title, user),
        Commands::Cancel { title } => commands::meeting::cancel(&mut ctx, title),
        Commands::Quit { title } => commands::meeting::quit(&mut ctx, title),
        Commands::Clear => commands::meeting::clear(&mut ctx),
        Commands::Meetings { from, to, json } => commands::query::meetings(&ctx, from, to, json),
        Commands::Free {
            start,
            end,
            duration,
        } => commands::query::free(&ctx, start, end, duration),
    }
}

/// Diagnostics go to stderr. `AGENDA_LOG` sets the filter; `--verbose` forces debug.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("AGENDA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
