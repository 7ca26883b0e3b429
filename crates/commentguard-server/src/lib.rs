//! CommentGuard Server
//!
//! HTTP adapter over the scorer/policy core: route table, request
//! validation, wire-format types, and the process-wide application state.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::{create_router, MAX_BATCH_SIZE};
pub use state::AppState;
