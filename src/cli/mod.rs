//! # CLI Module
//!
//! The two ways Throwback runs, selected in `main.rs` by the `--run` flag.
//!
//! - [`run`] - one complete sync of every configured library, then return.
//! - [`schedule`] - run the sync every day at `RUN_AT` in `TZ`, print a status
//!   line every hour, forever.
//!
//! ## Data Flow
//!
//! ```text
//! ConfigStore (YAML) ─→ CredentialManager ─→ TmdbClient
//!        │
//!        └─ for each library:
//!             current window ─→ historical windows (one per year)
//!             Plex section ─→ clear TMDb list
//!             for each window:
//!                 Plex search ─→ tmdb:// guids ─→ MDBList rating rule
//!                 ─→ add survivors to the TMDb list
//! ```
//!
//! Everything is awaited in order; no two remote calls are ever in flight at
//! the same time.
//!
//! ## Error Handling
//!
//! A failing Plex or TMDb call ends the run. Rating lookups that cannot be
//! completed exclude the title instead. In scheduled mode a failed run is
//! reported and the next day's run happens as usual.

pub mod run;
pub mod schedule;

pub use run::run;
pub use schedule::schedule;
