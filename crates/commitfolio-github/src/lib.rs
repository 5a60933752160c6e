pub mod client;
pub mod error;
pub mod identity;
pub mod repository;

// Re-exports
pub use client::GitHubClient;
pub use error::{Error, Result};
pub use identity::{resolve_identity, GitHubUser, IdentityService};
pub use repository::Repository;
