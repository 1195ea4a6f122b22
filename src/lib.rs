//! Plex Throwback List Publisher Library
//!
//! This library finds the titles of a Plex library that were originally released
//! on the current day, week or month in any year since a configured starting year,
//! keeps the ones that pass an IMDb rating or vote threshold, and republishes them
//! as the contents of a TMDb list.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local TMDb approval callback server
//! - `cli` - The sync run and the recurring scheduler
//! - `config` - Environment variables and `.env` loading
//! - `http` - Shared HTTP client with retry policy and a substitutable transport
//! - `management` - Configuration store and TMDb credential handling
//! - `mdblist` - MDBList rating lookups and the inclusion rule
//! - `plex` - Plex library section lookup and release date search
//! - `server` - Local HTTP server for approval callbacks
//! - `tmdb` - TMDb v4 authentication and list operations
//! - `types` - Data structures and type definitions
//! - `utils` - Date windows and formatting helpers
//!
//! # Example
//!
//! ```
//! use throwback::{cli, config};
//!
//! #[tokio::main]
//! async fn main() -> throwback::Res<()> {
//!     config::load_env().await?;
//!     cli::run(config::timezone()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod http;
pub mod management;
pub mod mdblist;
pub mod plex;
pub mod server;
pub mod tmdb;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the orchestration layer and the service traits, where errors from
/// several modules meet. Module seams that callers need to match on (HTTP,
/// configuration, authentication) have their own typed errors which convert
/// into this boxed form with `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Working on library {}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Added {} items to list {}", count, list_id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for failures the process cannot continue from, such as an
/// unreadable configuration document in immediate mode. Code after this
/// macro does not execute.
///
/// # Example
///
/// ```
/// error!("Run failed: {}", e);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues: a failed rating lookup, an invalid `TZ`
/// value that falls back to UTC, a missed scheduler tick.
///
/// # Example
///
/// ```
/// warning!("Invalid TZ '{}', falling back to UTC", value);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
