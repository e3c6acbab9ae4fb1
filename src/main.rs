//! # Choreust
//!
//! A terminal chore tracker for small teams. Chores can be one-off or repeat
//! weekly on chosen weekdays or monthly on a day of the month, and are
//! assigned to team members whose colors tint the calendar.
//!
//! ## Features
//!
//! *   **Recurring chores**: `weekly:mon,thu` or `monthly:31` (day 31 falls back
//!     to the last day of shorter months), with an optional end date.
//! *   **Calendar**: every occurrence in a date window, colored per assignee.
//! *   **Team members**: palette colors, workload summary, unassign on removal.
//! *   **Dual Interface**: scriptable CLI and an interactive TUI month view.
//!
//! ## Usage
//!
//! ```bash
//! # Team
//! choreust member add "Alice" --email alice@example.com
//! choreust member list
//!
//! # Chores
//! choreust add "Take out trash" --date 2025-01-06 --recur weekly:mon,thu --assignee 1
//! choreust add "Pay rent" --date 2025-01-31 --recur monthly:31 --until 2025-12-31
//! choreust add "Fix the fence" --date 2025-02-14
//! choreust status 3 completed
//!
//! # Occurrences in a window (defaults to the current month)
//! choreust calendar --from 2025-01-01 --to 2025-03-31
//!
//! # Interactive month view
//! choreust ui
//! ```
//!
//! ## Data Storage
//!
//! Chores are saved in your local data directory (`choreust/chores.json`);
//! set `CHORES_DB` to use another file. Team members live in `members.json`
//! next to it. Optional settings go in `~/.config/choreust/config.toml`
//! (or the file named by `CHOREUST_CONFIG`).

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use choreust::commands::*;
use choreust::config::Config;
use choreust::error::Result;
use choreust::tui::run_tui;

#[derive(Parser)]
#[command(name = "choreust")]
#[command(about = "Team chore tracker with recurring chores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new chore
    Add {
        /// Chore title (quoted if it has spaces)
        title: String,
        /// Date in YYYY-MM-DD (first occurrence for recurring chores)
        #[arg(short, long)]
        date: String,
        /// Team member id
        #[arg(short, long)]
        assignee: Option<u64>,
        /// Recurrence (none, weekly:mon,wed, monthly:15)
        #[arg(short, long)]
        recur: Option<String>,
        /// Last date a recurring chore may occur, YYYY-MM-DD
        #[arg(short, long)]
        until: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List chore definitions
    List {
        /// Only chores assigned to this member id
        #[arg(short, long)]
        assignee: Option<u64>,
        /// Only chores with this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Edit a chore
    Edit {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New assignee id
        #[arg(short, long)]
        assignee: Option<u64>,
        /// Remove the assignee
        #[arg(long)]
        unassign: bool,
        /// New recurrence
        #[arg(short, long)]
        recur: Option<String>,
        /// New end date ("none" clears it)
        #[arg(short, long)]
        until: Option<String>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Set a chore's status (pending, in-progress, completed, cancelled)
    Status {
        id: u64,
        status: String,
    },
    /// Remove a chore
    Remove {
        id: u64,
    },
    /// Show every chore occurrence in a date window
    Calendar {
        /// Window start, YYYY-MM-DD (default: start of the current month)
        #[arg(short, long)]
        from: Option<String>,
        /// Window end, YYYY-MM-DD (default: end of the current month)
        #[arg(short, long)]
        to: Option<String>,
        /// Only occurrences assigned to this member id
        #[arg(short, long)]
        assignee: Option<u64>,
        /// Print occurrences as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show chore counts by status
    Stats,
    /// Show chore counts per team member
    Workload,
    /// Manage team members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Reset the database (delete all chores and team members)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum MemberCommands {
    /// Add a team member
    Add {
        name: String,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        role: Option<String>,
        /// Calendar color as #rrggbb (default: next palette color)
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List team members
    List,
    /// Edit a team member
    Edit {
        id: u64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        role: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a team member and unassign their chores
    Remove {
        id: u64,
    },
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();
}

fn run(command: Option<Commands>, config: &Config) -> Result<()> {
    match command {
        Some(Commands::Add { title, date, assignee, recur, until, notes }) => {
            cmd_add(title, date, assignee, recur, until, notes, false).map(|_| ())
        }
        Some(Commands::List { assignee, status }) => cmd_list(assignee, status),
        Some(Commands::Edit { id, title, date, assignee, unassign, recur, until, notes }) => {
            let update = ChoreUpdate { title, date, assignee, unassign, recur, until, notes };
            cmd_edit(id, update, false)
        }
        Some(Commands::Status { id, status }) => cmd_status(id, &status, false),
        Some(Commands::Remove { id }) => cmd_remove(id, false),
        Some(Commands::Calendar { from, to, assignee, json }) => {
            cmd_calendar(from, to, assignee, json, config)
        }
        Some(Commands::Stats) => cmd_stats().map(|_| ()),
        Some(Commands::Workload) => cmd_workload(),
        Some(Commands::Member { command }) => match command {
            MemberCommands::Add { name, email, role, color } => {
                cmd_member_add(name, email, role, color, false).map(|_| ())
            }
            MemberCommands::List => cmd_member_list(),
            MemberCommands::Edit { id, name, email, role, color } => {
                cmd_member_edit(id, MemberUpdate { name, email, role, color }, false)
            }
            MemberCommands::Remove { id } => cmd_member_remove(id, false).map(|_| ()),
        },
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "choreust", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_tracing(&config);
    if let Some(e) = config_error {
        warn!(error = %e, "ignoring unreadable config file, using defaults");
    }

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
