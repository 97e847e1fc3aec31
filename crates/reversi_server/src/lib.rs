//! Reversi server - persistence, use cases and REST API
//!
//! Thin plumbing around the [`reversi`] engine. Game rules live in the
//! engine; this crate stores turns and exposes them over HTTP.
//!
//! # Architecture
//!
//! - **Repository / Store**: transactional persistence boundary
//! - **SqliteStore**: diesel-backed SQLite implementation
//! - **MemoryStore**: in-process implementation for tests
//! - **ReversiService**: use cases, one transaction each
//! - **api**: axum router

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod error;
mod memory;
mod repository;
mod service;

/// HTTP routes and wire types.
pub mod api;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Persistence
pub use db::{DbError, DbErrorKind, SqliteStore};
pub use memory::MemoryStore;
pub use repository::{GameSummary, Repository, Store};

// Crate-level exports - Use cases
pub use error::ServiceError;
pub use service::{LAST_GAMES_LIMIT, ReversiService, TurnSnapshot};
