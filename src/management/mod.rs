mod auth;
mod config;

pub use auth::ApprovalGate;
pub use auth::ApprovalState;
pub use auth::AuthError;
pub use auth::AuthState;
pub use auth::ConsoleApproval;
pub use auth::CredentialManager;
pub use auth::PendingApproval;
pub use config::ConfigError;
pub use config::ConfigStore;
pub use config::validate;
