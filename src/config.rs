//! Environment configuration for Throwback.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. The YAML configuration document itself (server
//! credentials and library rules) is handled by [`crate::management::ConfigStore`];
//! this module only tells the rest of the program where that document lives and
//! how the scheduler should behave.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::{utils, warning};

pub const DEFAULT_CONFIG_FILE: &str = "config.yml";
pub const DEFAULT_RUN_AT: &str = "02:00";
pub const DEFAULT_APPROVAL_TIMEOUT_SECS: u64 = 300;

/// Loads environment variables from optional `.env` files.
///
/// Looks for a `.env` in the working directory first and then in the
/// platform-specific local data directory under `throwback/.env`:
/// - Linux: `~/.local/share/throwback/.env`
/// - macOS: `~/Library/Application Support/throwback/.env`
/// - Windows: `%LOCALAPPDATA%/throwback/.env`
///
/// Variables already present in the process environment are never overwritten,
/// and missing files are not an error.
///
/// # Errors
///
/// Returns an error string if a `.env` file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    if async_fs::metadata(".env").await.is_ok() {
        dotenv::dotenv().map_err(|e| e.to_string())?;
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("throwback/.env");
    if async_fs::metadata(&path).await.is_ok() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Returns the path of the YAML configuration document (`CONFIG_FILE`).
pub fn config_file() -> PathBuf {
    env::var("CONFIG_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Returns the daily trigger time (`RUN_AT`, `HH:MM`).
///
/// An unparseable value is reported and replaced by the default `02:00`.
pub fn run_at() -> NaiveTime {
    let value = env::var("RUN_AT").unwrap_or_else(|_| DEFAULT_RUN_AT.to_string());
    match utils::parse_run_at(&value) {
        Some(time) => time,
        None => {
            warning!(
                "Invalid RUN_AT '{}', expected HH:MM. Using {}",
                value,
                DEFAULT_RUN_AT
            );
            NaiveTime::from_hms_opt(2, 0, 0).unwrap_or_default()
        }
    }
}

/// Returns the timezone used for the schedule and for "today" (`TZ`).
pub fn timezone() -> Tz {
    utils::timezone_or_utc(env::var("TZ").ok().as_deref())
}

/// Returns the bind address of the local approval callback server.
///
/// Retrieves `SERVER_ADDRESS`, e.g. `127.0.0.1:8642`. When unset, TMDb
/// approval is confirmed on the console only.
pub fn server_addr() -> Option<SocketAddr> {
    let value = env::var("SERVER_ADDRESS").ok()?;
    match SocketAddr::from_str(value.trim()) {
        Ok(addr) => Some(addr),
        Err(e) => {
            warning!("Ignoring SERVER_ADDRESS '{}': {}", value, e);
            None
        }
    }
}

/// Returns how long to wait for the user to approve TMDb access
/// (`TMDB_APPROVAL_TIMEOUT`, seconds).
pub fn approval_timeout() -> Duration {
    let secs = env::var("TMDB_APPROVAL_TIMEOUT")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_APPROVAL_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
