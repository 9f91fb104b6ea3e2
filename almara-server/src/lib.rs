//! Almara+ Storefront Server
//!
//! # Module structure
//!
//! ```text
//! almara-server/src/
//! ├── core/   # configuration, state, server assembly
//! ├── auth/   # sessions, password hashing, page gates
//! ├── api/    # HTTP routes and handlers
//! ├── db/     # SQLite pool and repositories
//! └── utils/  # errors, pagination, validation, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::core::server::build_router;
pub use crate::utils::{AppError, AppResult};
pub use crate::utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ___    __                           __
   /   |  / /___ ___  ____ __________ _/ /_
  / /| | / / __ `__ \/ __ `/ ___/ __ `/ __/
 / ___ |/ / / / / / / /_/ / /  / /_/ /_  _/
/_/  |_/_/_/ /_/ /_/\__,_/_/   \__,_/ /_/
    "#
    );
}
