//! meilisearch-mcp — Meilisearch administration and search over the
//! Model Context Protocol.
//!
//! This library crate re-exports modules so integration tests
//! (under `tests/`) can access them.

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod logs;
pub mod managers;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod templates;
pub mod tools;

pub use error::{Error, ErrorKind, Result};

/// Return the meilisearch-mcp home directory.
///
/// Resolution order:
/// 1. `MEILI_MCP_HOME` environment variable
/// 2. `$HOME/.meilisearch-mcp`
pub fn meili_home() -> std::path::PathBuf {
    if let Ok(p) = std::env::var("MEILI_MCP_HOME") {
        std::path::PathBuf::from(p)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join(".meilisearch-mcp")
    }
}
