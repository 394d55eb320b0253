//! Shared helper utilities for integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! small helpers live here instead of being copied between suites.

pub mod cluster_skip;

pub use cluster_skip::handle_cluster_setup_failure;

/// Render a `postgres` error with its SQLSTATE and message.
///
/// `postgres::Error`'s `Display` often collapses to `db error`, which hides
/// the detail needed to diagnose CI failures.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Empty the users table and restart identifier assignment.
pub fn reset_users_table(database_url: &str) -> Result<(), String> {
    let mut client = postgres::Client::connect(database_url, postgres::NoTls)
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("TRUNCATE users RESTART IDENTITY")
        .map_err(|err| format_postgres_error(&err))
}
