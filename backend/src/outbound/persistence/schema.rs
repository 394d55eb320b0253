//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `migrations/` exactly; `diesel print-schema` regenerates it
//! from a live database.

diesel::table! {
    /// Users managed through the HTML workflows.
    ///
    /// `email` carries the `users_email_key` unique constraint.
    users (id) {
        /// Primary key assigned by the `SERIAL` sequence.
        id -> Int4,
        /// Display name, at most 100 characters.
        name -> Varchar,
        /// Unique email address, at most 100 characters.
        email -> Varchar,
    }
}
