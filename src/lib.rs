//! Account API - Self-service user accounts over HTTP
//!
//! Registration, token verification, and reading, updating and deleting the
//! caller's own account. A caller can never touch anyone else's record.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities, passwords and the ownership rule
//! - **services**: Account use cases and token handling
//! - **infra**: Database, migrations and the user repository
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Response envelope and status wrappers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Print a verification token for account 5
//! cargo run -- token verification 5
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{CurrentUser, Password, User};
pub use errors::{AppError, AppResult};
