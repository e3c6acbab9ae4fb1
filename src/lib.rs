//! Library side of choreust: chore and team-member models, JSON storage,
//! the command layer used by the CLI and TUI, and recurrence expansion.

pub mod colors;
pub mod commands;
pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod storage;
pub mod tui;

pub use error::{ChoreError, Result};
pub use recurrence::expand;
