pub mod claude;
pub mod claude_cli;
pub mod error;
pub mod generator;
pub mod prompts;

// Re-exports
pub use claude::ClaudeApiGenerator;
pub use claude_cli::ClaudeCliGenerator;
pub use error::{Error, Result};
pub use generator::{Backend, TextGenerator};
