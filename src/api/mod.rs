//! # API Module
//!
//! HTTP endpoints of the local server that runs while Throwback waits for the
//! user to approve TMDb access. The server is only started when
//! `SERVER_ADDRESS` is set.
//!
//! ## Endpoints
//!
//! - [`callback`] - TMDb redirects the browser here after the user approved a
//!   request token. Marks the pending approval as done when the token matches.
//! - [`health`] - Returns status and version, handy to check that the address
//!   given in `SERVER_ADDRESS` is reachable from the browser.
//!
//! ## Related Modules
//!
//! - [`crate::server`] - Router and listener
//! - [`crate::management`] - The approval state shared with the credential manager

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
