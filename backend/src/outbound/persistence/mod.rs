//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! - **Thin adapter**: [`DieselUserRepository`] only translates between
//!   Diesel rows and domain types.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leave this module.
//! - **Async-safe pooling**: connections come from a `bb8` pool through
//!   `diesel-async`.
//! - **Embedded migrations**: the schema ships inside the binary and is
//!   applied at startup.
//!
//! # Example
//!
//! ```no_run
//! use userbook::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/userbook")).await?;
//! let repo = DieselUserRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, apply_migrations, run_pending_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DbPool, PoolConfig, PoolError,
};
